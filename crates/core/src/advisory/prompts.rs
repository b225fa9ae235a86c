use serde_json::{Map, Value};

/// One instruction template per advisory use case. Field values are inserted verbatim.
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'a> {
    IdeaRefinement {
        industry: &'a str,
        idea: &'a str,
    },
    BusinessPlanCanvas {
        refined_idea: &'a str,
        industry: &'a str,
        market_gap: &'a str,
    },
    PitchDeck {
        refined_idea: &'a str,
        business_plan: &'a Map<String, Value>,
    },
    CityGrowth {
        industry: &'a str,
        city: &'a str,
    },
}

impl Prompt<'_> {
    pub fn use_case(&self) -> &'static str {
        match self {
            Prompt::IdeaRefinement { .. } => "idea_refinement",
            Prompt::BusinessPlanCanvas { .. } => "business_plan_canvas",
            Prompt::PitchDeck { .. } => "pitch_deck",
            Prompt::CityGrowth { .. } => "city_growth",
        }
    }

    pub fn render(&self) -> String {
        match self {
            Prompt::IdeaRefinement { industry, idea } => [
                "You are a startup analyst.".to_string(),
                format!("Industry: {industry}"),
                format!("Original Idea: {idea}"),
                "Refine this idea to make it more unique and actionable. Then suggest an unmet market gap it can address.".to_string(),
                "Respond in this format:".to_string(),
                "Refined Idea: <your refined idea>".to_string(),
                "Market Gap: <your market gap>".to_string(),
            ]
            .join("\n"),
            Prompt::BusinessPlanCanvas {
                refined_idea,
                industry,
                market_gap,
            } => [
                "You are a startup advisor. Based on the following:".to_string(),
                format!("Idea: {refined_idea}"),
                format!("Industry: {industry}"),
                format!("Market Gap: {market_gap}"),
                "Generate a Lean Business Model Canvas in JSON format with these keys:".to_string(),
                "Problem, Solution, Value Proposition".to_string(),
            ]
            .join("\n"),
            Prompt::PitchDeck {
                refined_idea,
                business_plan,
            } => {
                // A `Map` always serializes.
                let plan = serde_json::to_string(business_plan).unwrap_or_default();
                [
                    "You are a startup consultant. Based on the following:".to_string(),
                    format!("Idea: {refined_idea}"),
                    format!("Business Plan: {plan}"),
                    "Write slide contents for a 5-slide pitch deck in JSON format with these keys:".to_string(),
                    "Problem, Solution, Market, Team, Ask".to_string(),
                ]
                .join("\n")
            }
            Prompt::CityGrowth { industry, city } => [
                format!("You're a startup market analyst. Analyze the startup landscape for the {industry} industry in {city}."),
                "Include: 1) Market situation, 2) Main challenges/opportunities, 3) Level of competition (0-100).".to_string(),
                "Return JSON with 'situation', 'challenges', 'opportunities', 'competition_score'.".to_string(),
            ]
            .join("\n"),
        }
    }
}
