//! The advisory request pipeline: prompt → completion → parse → (search) → assemble.

pub mod parse;
pub mod prompts;

use crate::config::Settings;
use crate::domain::advisory::{
    BusinessPlanRequest, BusinessPlanResponse, CityGrowthRequest, IdeaRequest, IdeaResponse,
    PitchDeckRequest, PitchDeckResponse, RefinedIdea,
};
use crate::domain::market::{CityGrowthAnalysis, CompetitorEntry, GraphData, MAX_COMPETITORS};
use crate::error::Result;
use crate::llm::chat::ChatCompletionsClient;
use crate::llm::{ChatMessage, CompletionClient};
use crate::search::serpapi::SerpApiClient;
use crate::search::SearchClient;
use prompts::Prompt;
use std::sync::Arc;

pub struct AdvisoryService {
    llm: Arc<dyn CompletionClient>,
    search: Arc<dyn SearchClient>,
    model: String,
}

impl AdvisoryService {
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        search: Arc<dyn SearchClient>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            search,
            model: model.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let llm = ChatCompletionsClient::from_settings(settings)?;
        let search = SerpApiClient::from_settings(settings)?;
        Ok(Self::new(
            Arc::new(llm),
            Arc::new(search),
            settings.llm_model.clone(),
        ))
    }

    async fn complete(&self, prompt: Prompt<'_>) -> Result<String> {
        tracing::debug!(use_case = prompt.use_case(), model = %self.model, "requesting completion");
        self.llm
            .complete(&self.model, vec![ChatMessage::user(prompt.render())])
            .await
    }

    async fn refine(&self, industry: &str, idea: &str) -> Result<RefinedIdea> {
        let text = self
            .complete(Prompt::IdeaRefinement { industry, idea })
            .await?;
        Ok(parse::parse_refined_idea(&text))
    }

    pub async fn refine_idea(&self, req: IdeaRequest) -> Result<IdeaResponse> {
        let refined = self.refine(&req.industry, &req.idea).await?;
        Ok(IdeaResponse {
            idea: req.idea,
            industry: req.industry,
            refined_idea: refined.refined_idea,
            market_gap: refined.market_gap,
        })
    }

    pub async fn business_plan(&self, req: BusinessPlanRequest) -> Result<BusinessPlanResponse> {
        let refined = match req.pre_refined() {
            Some(refined) => refined,
            None => self.refine(&req.industry, &req.idea).await?,
        };

        let text = self
            .complete(Prompt::BusinessPlanCanvas {
                refined_idea: &refined.refined_idea,
                industry: &req.industry,
                market_gap: &refined.market_gap,
            })
            .await?;
        let business_plan = parse::parse_business_plan(&text);

        Ok(BusinessPlanResponse {
            idea: req.idea,
            industry: req.industry,
            refined_idea: refined.refined_idea,
            market_gap: refined.market_gap,
            business_plan,
        })
    }

    pub async fn pitch_deck(&self, req: PitchDeckRequest) -> Result<PitchDeckResponse> {
        let text = self
            .complete(Prompt::PitchDeck {
                refined_idea: &req.refined_idea,
                business_plan: &req.business_plan,
            })
            .await?;
        let pitch_deck = parse::parse_pitch_deck(&text);

        Ok(PitchDeckResponse {
            refined_idea: req.refined_idea,
            business_plan: req.business_plan,
            pitch_deck,
        })
    }

    /// Search failures propagate here, unlike in [`Self::city_growth`].
    pub async fn competitors(&self, industry: &str) -> Result<Vec<CompetitorEntry>> {
        let query = format!("{industry} startup competitors");
        let mut results = self.search.search(&query).await?;
        results.truncate(MAX_COMPETITORS);
        Ok(results)
    }

    pub async fn city_growth(&self, req: CityGrowthRequest) -> Result<CityGrowthAnalysis> {
        let CityGrowthRequest { city, industry } = req;
        tracing::info!(%city, %industry, "city growth analysis requested");

        let text = self
            .complete(Prompt::CityGrowth {
                industry: &industry,
                city: &city,
            })
            .await?;
        let analysis = parse::parse_market_analysis(&text)?;

        let query = format!("{industry} startups in {city}");
        let mut competitors = match self.search.search(&query).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(error = %err, %query, "search failed; continuing without competitors");
                Vec::new()
            }
        };
        competitors.truncate(MAX_COMPETITORS);

        let competition_score = analysis.competition_score();

        Ok(CityGrowthAnalysis {
            situation: analysis.situation(),
            challenges: analysis.challenges(),
            opportunities: analysis.opportunities(),
            competition_score,
            competitors,
            graph_data: GraphData::for_score(competition_score),
            city,
            industry,
        })
    }
}
