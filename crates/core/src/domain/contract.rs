use crate::domain::advisory::{PitchDeckSlide, SlideKind, SLIDE_NOT_SPECIFIED};
use crate::domain::canvas::{BusinessPlan, CanvasField, NOT_SPECIFIED};
use serde::Deserialize;
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "Not available";

/// Shape the city-growth prompt asks the model to return.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmMarketAnalysis {
    #[serde(default)]
    pub situation: Option<Value>,
    #[serde(default)]
    pub challenges: Option<Value>,
    #[serde(default)]
    pub opportunities: Option<Value>,
    #[serde(default)]
    pub competition_score: Option<Value>,
}

impl LlmMarketAnalysis {
    pub fn situation(&self) -> Value {
        or_not_available(self.situation.as_ref())
    }

    pub fn challenges(&self) -> Value {
        or_not_available(self.challenges.as_ref())
    }

    pub fn opportunities(&self) -> Value {
        or_not_available(self.opportunities.as_ref())
    }

    /// Coerces the reported score to a number in [0, 100]. Values that are not
    /// numeric (or not finite) become 0.
    pub fn competition_score(&self) -> f64 {
        let Some(raw) = self.competition_score.as_ref() else {
            return 0.0;
        };

        match coerce_score(raw) {
            Some(score) => {
                if !(0.0..=100.0).contains(&score) {
                    tracing::warn!(score, "competition_score outside 0..=100; clamping");
                }
                score.clamp(0.0, 100.0)
            }
            None => {
                tracing::warn!(value = %raw, "invalid competition_score value; defaulting to 0");
                0.0
            }
        }
    }
}

fn or_not_available(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::String(NOT_AVAILABLE.to_string()),
        Some(v) => v.clone(),
    }
}

fn coerce_score(raw: &Value) -> Option<f64> {
    let score = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    score.is_finite().then_some(score)
}

/// Maps a decoded canvas payload onto the fixed section set. Unknown keys are
/// dropped; sections the model omitted stay absent unless they are core.
pub fn business_plan_from_json(value: &Value) -> BusinessPlan {
    let Some(object) = value.as_object() else {
        return BusinessPlan::not_specified();
    };

    let sections = object.iter().filter_map(|(key, raw)| {
        let field = CanvasField::from_key(key)?;
        let text = render_text(raw).unwrap_or_else(|| NOT_SPECIFIED.to_string());
        Some((field, text))
    });

    BusinessPlan::from_sections(sections)
}

/// Fills the fixed five-slide deck from a decoded payload.
pub fn pitch_deck_from_json(value: Option<&Value>) -> Vec<PitchDeckSlide> {
    let object = value.and_then(Value::as_object);
    SlideKind::DECK
        .into_iter()
        .map(|slide| {
            let content = object
                .and_then(|o| o.get(slide.as_str()))
                .and_then(render_text)
                .unwrap_or_else(|| SLIDE_NOT_SPECIFIED.to_string());
            PitchDeckSlide { slide, content }
        })
        .collect()
}

/// Flattens a model-supplied value to display text.
fn render_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(render_text)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}
