//! Data model shared by every stage of the analysis pipeline.
//! Nothing here outlives a single request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::catalog::ImportanceTier;
use crate::analysis::scorer::ScoringProfile;

/// Keyword name → occurrence count. Zero counts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedKeywords(BTreeMap<String, u32>);

impl ExtractedKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, occurrences: u32) {
        if occurrences == 0 {
            return;
        }
        *self.0.entry(name.to_string()).or_insert(0) += occurrences;
    }

    pub fn count(&self, name: &str) -> u32 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_mentions(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, u32)> for ExtractedKeywords {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut keywords = ExtractedKeywords::new();
        for (name, count) in iter {
            keywords.record(&name, count);
        }
        keywords
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedKeyword {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub resume_count: u32,
    pub job_count: u32,
    /// importance × job count
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingKeyword {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub importance: ImportanceTier,
    pub job_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched: Vec<MatchedKeyword>,
    pub missing: Vec<MissingKeyword>,
    pub possible_weight: f64,
    pub achieved_weight: f64,
    /// achieved / possible × 100, two decimals. 0 when nothing was possible.
    pub raw_percentage: f64,
    /// Raw percentage after the optional optimization curve, integer, capped at 100.
    pub adjusted_percentage: f64,
}

/// One named sub-score in the final composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub name: String,
    /// Sub-score on a 0–100 scale.
    pub score: f64,
    /// Share of the composite, in percent.
    pub weight: u32,
    /// Rounded points this component adds to the composite.
    pub contribution: u32,
}

pub type ScoreBreakdown = Vec<ScoreComponent>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureAnalysis {
    pub score: u32,
    pub found_sections: Vec<String>,
    pub missing_sections: Vec<String>,
    /// Formatting markers detected (bullets, date ranges, contact details).
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthAnalysis {
    pub word_count: usize,
    pub page_estimate: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuality {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDensity {
    pub total_mentions: u32,
    pub unique_keywords: usize,
    /// Mentions per unique keyword, one decimal.
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub profile: ScoringProfile,
    pub optimized: bool,
    pub breakdown: ScoreBreakdown,
    pub skill_match: MatchResult,
    pub keyword_density: KeywordDensity,
    pub structure: StructureAnalysis,
    pub length: LengthAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_quality: Option<ContentQuality>,
    /// TF-IDF cosine similarity in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_similarity: Option<f64>,
    pub recommendations: Vec<String>,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counts_are_not_stored() {
        let mut keywords = ExtractedKeywords::new();
        keywords.record("Java", 0);
        assert!(keywords.is_empty());
        keywords.record("Java", 2);
        keywords.record("Java", 1);
        assert_eq!(keywords.count("Java"), 3);
        assert_eq!(keywords.count("AWS"), 0);
    }

    #[test]
    fn test_extracted_keywords_serialize_as_object() {
        let keywords: ExtractedKeywords =
            vec![("Java".to_string(), 2), ("AWS".to_string(), 1)].into_iter().collect();
        let json = serde_json::to_value(&keywords).unwrap();
        assert_eq!(json, serde_json::json!({"AWS": 1, "Java": 2}));
        assert_eq!(keywords.total_mentions(), 3);
    }

    #[test]
    fn test_missing_keyword_wire_format() {
        let missing = MissingKeyword {
            name: "AWS".to_string(),
            category: None,
            importance: ImportanceTier::High,
            job_count: 1,
        };
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "AWS", "importance": "High", "jobCount": 1})
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(52.380952, 2), 52.38);
        assert_eq!(round_to(2.25, 1), 2.3);
    }
}
