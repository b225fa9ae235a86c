use crate::domain::advisory::{PitchDeckSlide, RefinedIdea};
use crate::domain::canvas::BusinessPlan;
use crate::domain::contract::{self, LlmMarketAnalysis};
use crate::error::{AdvisoryError, Result, ANALYSIS_FAILED};
use crate::llm::json::parse_fenced;
use serde_json::Value;

const REFINED_IDEA_MARKER: &str = "Refined Idea:";
const MARKET_GAP_MARKER: &str = "Market Gap:";

/// Splits "Refined Idea: ... Market Gap: ..." text. Never fails: a missing
/// marker or an empty field yields the fixed fallback for both fields.
pub fn parse_refined_idea(text: &str) -> RefinedIdea {
    match split_markers(text) {
        Some((refined_idea, market_gap)) => RefinedIdea {
            refined_idea: refined_idea.to_string(),
            market_gap: market_gap.to_string(),
        },
        None => {
            tracing::warn!("completion lacks refined idea/market gap markers; using defaults");
            RefinedIdea::fallback()
        }
    }
}

fn split_markers(text: &str) -> Option<(&str, &str)> {
    let (_, after_idea) = text.split_once(REFINED_IDEA_MARKER)?;
    let (_, after_gap) = text.split_once(MARKET_GAP_MARKER)?;

    // A repeated marker ends its own field.
    let refined_idea = before(before(after_idea, REFINED_IDEA_MARKER), MARKET_GAP_MARKER).trim();
    let market_gap = before(after_gap, MARKET_GAP_MARKER).trim();

    if refined_idea.is_empty() || market_gap.is_empty() {
        return None;
    }
    Some((refined_idea, market_gap))
}

fn before<'a>(text: &'a str, marker: &str) -> &'a str {
    text.split_once(marker).map_or(text, |(head, _)| head)
}

/// Fail-soft: anything that does not decode becomes the all-"Not specified" plan.
pub fn parse_business_plan(text: &str) -> BusinessPlan {
    match parse_fenced::<Value>(text) {
        Ok(value) => contract::business_plan_from_json(&value),
        Err(err) => {
            tracing::warn!(error = %err, "business plan completion is not JSON; using defaults");
            BusinessPlan::not_specified()
        }
    }
}

/// Fail-soft: undecodable output leaves every slide "Not specified.".
pub fn parse_pitch_deck(text: &str) -> Vec<PitchDeckSlide> {
    match parse_fenced::<Value>(text) {
        Ok(value) => contract::pitch_deck_from_json(Some(&value)),
        Err(err) => {
            tracing::warn!(error = %err, "pitch deck completion is not JSON; using defaults");
            contract::pitch_deck_from_json(None)
        }
    }
}

/// Fail-hard: the city-growth analysis has no safe default.
pub fn parse_market_analysis(text: &str) -> Result<LlmMarketAnalysis> {
    let decoded = parse_fenced::<Value>(text).and_then(|value| match value {
        // Derived struct decoding would also accept a JSON array.
        Value::Object(_) => serde_json::from_value::<LlmMarketAnalysis>(value),
        other => Err(serde::de::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    });

    decoded.map_err(|err| {
        tracing::error!(error = %err, raw = text, "market analysis completion is not valid JSON");
        AdvisoryError::Domain(ANALYSIS_FAILED.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advisory::{SlideKind, NO_MARKET_GAP, NO_REFINED_IDEA};
    use crate::domain::canvas::CanvasField;
    use serde_json::json;

    #[test]
    fn marker_split_extracts_trimmed_fields() {
        let text = "Refined Idea:  A marketplace for surplus restaurant food \n\nMarket Gap: Small restaurants lack a channel for leftovers.\n";
        let parsed = parse_refined_idea(text);
        assert_eq!(
            parsed.refined_idea,
            "A marketplace for surplus restaurant food"
        );
        assert_eq!(
            parsed.market_gap,
            "Small restaurants lack a channel for leftovers."
        );
    }

    #[test]
    fn marker_split_ignores_preamble() {
        let parsed = parse_refined_idea("Sure!\nRefined Idea: X\nMarket Gap: Y");
        assert_eq!(parsed.refined_idea, "X");
        assert_eq!(parsed.market_gap, "Y");
    }

    #[test]
    fn missing_marker_yields_both_defaults() {
        for text in [
            "Refined Idea: only the idea",
            "Market Gap: only the gap",
            "no markers at all",
            "",
        ] {
            let parsed = parse_refined_idea(text);
            assert_eq!(parsed.refined_idea, NO_REFINED_IDEA, "input: {text:?}");
            assert_eq!(parsed.market_gap, NO_MARKET_GAP, "input: {text:?}");
        }
    }

    #[test]
    fn repeated_markers_end_their_field() {
        let parsed = parse_refined_idea("Refined Idea: A\nMarket Gap: B\n\nMarket Gap: C");
        assert_eq!(parsed.refined_idea, "A");
        assert_eq!(parsed.market_gap, "B");

        let parsed = parse_refined_idea("Refined Idea: A\nRefined Idea: A2\nMarket Gap: B");
        assert_eq!(parsed.refined_idea, "A");
        assert_eq!(parsed.market_gap, "B");
    }

    #[test]
    fn empty_field_yields_defaults() {
        let parsed = parse_refined_idea("Refined Idea:   Market Gap: a gap");
        assert_eq!(parsed, RefinedIdea::fallback());
    }

    #[test]
    fn business_plan_with_core_keys_only() {
        let text = json!({
            "Problem": "P",
            "Solution": "S",
            "Value Proposition": "V",
        })
        .to_string();
        let plan = parse_business_plan(&text);
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({"Problem": "P", "Solution": "S", "Value Proposition": "V"})
        );
    }

    #[test]
    fn fenced_business_plan_is_accepted() {
        let text = "```json\n{\"Problem\": \"P\", \"Key Metrics\": \"Weekly orders\"}\n```";
        let plan = parse_business_plan(text);
        assert_eq!(plan.get(CanvasField::Problem), Some("P"));
        assert_eq!(plan.get(CanvasField::KeyMetrics), Some("Weekly orders"));
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn non_json_business_plan_falls_back() {
        let plan = parse_business_plan("Problem: people are hungry. Solution: food.");
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({
                "Problem": "Not specified",
                "Solution": "Not specified",
                "Value Proposition": "Not specified",
            })
        );
    }

    #[test]
    fn pitch_deck_always_has_five_ordered_slides() {
        for text in ["not json", "{}", r#"{"Team": "Two founders"}"#, "[1,2,3]"] {
            let deck = parse_pitch_deck(text);
            let kinds: Vec<_> = deck.iter().map(|s| s.slide).collect();
            assert_eq!(kinds, SlideKind::DECK.to_vec(), "input: {text}");
        }
        assert_eq!(
            parse_pitch_deck(r#"{"Team": "Two founders"}"#)[3].content,
            "Two founders"
        );
    }

    #[test]
    fn market_analysis_failure_is_a_domain_error() {
        let err = parse_market_analysis("The market is competitive.").unwrap_err();
        assert!(matches!(err, AdvisoryError::Domain(ref msg) if msg == ANALYSIS_FAILED));

        let err = parse_market_analysis("[\"not\", \"an object\"]").unwrap_err();
        assert!(matches!(err, AdvisoryError::Domain(_)));
    }

    #[test]
    fn market_analysis_accepts_fenced_json() {
        let text = "```json\n{\"situation\": \"Hot\", \"competition_score\": \"80\"}\n```";
        let analysis = parse_market_analysis(text).unwrap();
        assert_eq!(analysis.situation(), json!("Hot"));
        assert_eq!(analysis.competition_score(), 80.0);
    }
}
