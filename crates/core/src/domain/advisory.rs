use crate::domain::canvas::BusinessPlan;
use serde::{Deserialize, Serialize};

pub const NO_REFINED_IDEA: &str = "No refined idea generated.";
pub const NO_MARKET_GAP: &str = "No market gap identified.";
pub const SLIDE_NOT_SPECIFIED: &str = "Not specified.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedIdea {
    pub refined_idea: String,
    pub market_gap: String,
}

impl RefinedIdea {
    pub fn fallback() -> Self {
        Self {
            refined_idea: NO_REFINED_IDEA.to_string(),
            market_gap: NO_MARKET_GAP.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdeaRequest {
    pub industry: String,
    pub idea: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaResponse {
    pub idea: String,
    pub industry: String,
    pub refined_idea: String,
    pub market_gap: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessPlanRequest {
    pub idea: String,
    pub industry: String,
    /// When both of these are supplied the refinement call is skipped.
    #[serde(default)]
    pub refined_idea: Option<String>,
    #[serde(default)]
    pub market_gap: Option<String>,
}

impl BusinessPlanRequest {
    pub fn pre_refined(&self) -> Option<RefinedIdea> {
        let refined_idea = self.refined_idea.as_deref().map(str::trim)?;
        let market_gap = self.market_gap.as_deref().map(str::trim)?;
        if refined_idea.is_empty() || market_gap.is_empty() {
            return None;
        }
        Some(RefinedIdea {
            refined_idea: refined_idea.to_string(),
            market_gap: market_gap.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessPlanResponse {
    pub idea: String,
    pub industry: String,
    pub refined_idea: String,
    pub market_gap: String,
    pub business_plan: BusinessPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideKind {
    Problem,
    Solution,
    Market,
    Team,
    Ask,
}

impl SlideKind {
    pub const DECK: [SlideKind; 5] = [
        SlideKind::Problem,
        SlideKind::Solution,
        SlideKind::Market,
        SlideKind::Team,
        SlideKind::Ask,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlideKind::Problem => "Problem",
            SlideKind::Solution => "Solution",
            SlideKind::Market => "Market",
            SlideKind::Team => "Team",
            SlideKind::Ask => "Ask",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PitchDeckSlide {
    pub slide: SlideKind,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PitchDeckRequest {
    pub refined_idea: String,
    #[serde(default)]
    pub business_plan: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchDeckResponse {
    pub refined_idea: String,
    pub business_plan: serde_json::Map<String, serde_json::Value>,
    pub pitch_deck: Vec<PitchDeckSlide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompetitorsRequest {
    pub industry: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityGrowthRequest {
    pub city: String,
    pub industry: String,
}
