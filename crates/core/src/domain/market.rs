use serde::{Deserialize, Serialize};

pub const MAX_COMPETITORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionBucket {
    High,
    Medium,
    Low,
}

impl CompetitionBucket {
    pub const LABELS: [CompetitionBucket; 3] = [
        CompetitionBucket::High,
        CompetitionBucket::Medium,
        CompetitionBucket::Low,
    ];

    /// High above 70, Medium in (40, 70], Low at or below 40.
    pub fn classify(score: f64) -> Self {
        if score > 70.0 {
            CompetitionBucket::High
        } else if score > 40.0 {
            CompetitionBucket::Medium
        } else {
            CompetitionBucket::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphData {
    pub labels: [CompetitionBucket; 3],
    pub values: [u8; 3],
}

impl GraphData {
    pub fn for_score(score: f64) -> Self {
        let bucket = CompetitionBucket::classify(score);
        let values = CompetitionBucket::LABELS.map(|label| u8::from(label == bucket));
        Self {
            labels: CompetitionBucket::LABELS,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityGrowthAnalysis {
    pub city: String,
    pub industry: String,
    pub situation: serde_json::Value,
    pub challenges: serde_json::Value,
    pub opportunities: serde_json::Value,
    pub competition_score: f64,
    pub competitors: Vec<CompetitorEntry>,
    pub graph_data: GraphData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries_are_half_open() {
        assert_eq!(GraphData::for_score(71.0).values, [1, 0, 0]);
        assert_eq!(GraphData::for_score(70.0).values, [0, 1, 0]);
        assert_eq!(GraphData::for_score(40.5).values, [0, 1, 0]);
        assert_eq!(GraphData::for_score(40.0).values, [0, 0, 1]);
        assert_eq!(GraphData::for_score(0.0).values, [0, 0, 1]);
    }

    #[test]
    fn graph_data_serializes_labels_as_strings() {
        let json = serde_json::to_value(GraphData::for_score(85.0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"labels": ["High", "Medium", "Low"], "values": [1, 0, 0]})
        );
    }
}
