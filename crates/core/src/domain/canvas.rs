use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Lean canvas sections, declared in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanvasField {
    Problem,
    Solution,
    ValueProposition,
    CustomerSegments,
    Channels,
    RevenueStreams,
    CostStructure,
    KeyMetrics,
    UnfairAdvantage,
}

impl CanvasField {
    pub const ALL: [CanvasField; 9] = [
        CanvasField::Problem,
        CanvasField::Solution,
        CanvasField::ValueProposition,
        CanvasField::CustomerSegments,
        CanvasField::Channels,
        CanvasField::RevenueStreams,
        CanvasField::CostStructure,
        CanvasField::KeyMetrics,
        CanvasField::UnfairAdvantage,
    ];

    pub const CORE: [CanvasField; 3] = [
        CanvasField::Problem,
        CanvasField::Solution,
        CanvasField::ValueProposition,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanvasField::Problem => "Problem",
            CanvasField::Solution => "Solution",
            CanvasField::ValueProposition => "Value Proposition",
            CanvasField::CustomerSegments => "Customer Segments",
            CanvasField::Channels => "Channels",
            CanvasField::RevenueStreams => "Revenue Streams",
            CanvasField::CostStructure => "Cost Structure",
            CanvasField::KeyMetrics => "Key Metrics",
            CanvasField::UnfairAdvantage => "Unfair Advantage",
        }
    }

    /// Matches a model-supplied key loosely: "value_proposition", "ValueProposition"
    /// and "Value Proposition" all resolve to the same field.
    pub fn from_key(key: &str) -> Option<Self> {
        let wanted = normalize_key(key);
        Self::ALL
            .into_iter()
            .find(|field| normalize_key(field.as_str()) == wanted)
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A lean business-model canvas. The core sections are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPlan {
    sections: BTreeMap<CanvasField, String>,
}

impl BusinessPlan {
    /// The plan returned when the model output cannot be decoded at all.
    pub fn not_specified() -> Self {
        let sections = CanvasField::CORE
            .into_iter()
            .map(|field| (field, NOT_SPECIFIED.to_string()))
            .collect();
        Self { sections }
    }

    /// Builds a plan from whatever sections were extracted, filling core gaps.
    pub fn from_sections(extracted: impl IntoIterator<Item = (CanvasField, String)>) -> Self {
        let mut plan = Self::not_specified();
        for (field, value) in extracted {
            plan.sections.insert(field, value);
        }
        plan
    }

    pub fn get(&self, field: CanvasField) -> Option<&str> {
        self.sections.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for BusinessPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (field, value) in &self.sections {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_specified_plan_has_exactly_core_keys() {
        let plan = BusinessPlan::not_specified();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Problem": "Not specified",
                "Solution": "Not specified",
                "Value Proposition": "Not specified",
            })
        );
    }

    #[test]
    fn serializes_in_canvas_order() {
        let plan = BusinessPlan::from_sections([
            (CanvasField::KeyMetrics, "MAU".to_string()),
            (CanvasField::Problem, "p".to_string()),
            (CanvasField::Channels, "SEO".to_string()),
        ]);
        let text = serde_json::to_string(&plan).unwrap();
        assert_eq!(
            text,
            r#"{"Problem":"p","Solution":"Not specified","Value Proposition":"Not specified","Channels":"SEO","Key Metrics":"MAU"}"#
        );
    }

    #[test]
    fn from_key_is_loose_about_case_and_separators() {
        assert_eq!(
            CanvasField::from_key("value_proposition"),
            Some(CanvasField::ValueProposition)
        );
        assert_eq!(
            CanvasField::from_key("UnfairAdvantage"),
            Some(CanvasField::UnfairAdvantage)
        );
        assert_eq!(CanvasField::from_key("Team"), None);
    }
}
