//! Resume scoring: pluggable, trait-based scorer over one keyword catalog.
//!
//! Two profiles share the same pipeline stages (extract → match → structure →
//! length/content → compose → recommend) and differ only in the data they
//! pass through them. `AppState` holds an `Arc<dyn ResumeScorer>`, chosen at
//! startup from `SCORING_PROFILE`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::catalog::KeywordCatalog;
use crate::analysis::composer::{compose, CompositionRules, WeightedComponent};
use crate::analysis::content::{content_quality, keyword_density, LengthRules};
use crate::analysis::extractor::KeywordExtractor;
use crate::analysis::matcher::{score_match, Tiering};
use crate::analysis::models::{round_to, AnalysisResult};
use crate::analysis::recommendations::{generate, RecommendationInputs, RecommendationRules};
use crate::analysis::similarity::semantic_similarity;
use crate::analysis::structure::StructureRules;

// ────────────────────────────────────────────────────────────────────────────
// Profile selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringProfile {
    Contract,
    Categorized,
}

#[derive(Debug, Error)]
#[error("unknown scoring profile '{0}'")]
pub struct UnknownProfile(String);

impl FromStr for ScoringProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contract" => Ok(ScoringProfile::Contract),
            "categorized" => Ok(ScoringProfile::Categorized),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringProfile::Contract => write!(f, "contract"),
            ScoringProfile::Categorized => write!(f, "categorized"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to add a scoring profile without touching the handlers.
///
/// `analyze` is synchronous and CPU-bound; callers run it on the blocking pool.
pub trait ResumeScorer: Send + Sync {
    fn profile(&self) -> ScoringProfile;

    fn catalog(&self) -> &KeywordCatalog;

    /// Never fails. Degenerate text yields low sub-scores, not errors.
    fn analyze(&self, resume_text: &str, job_text: &str, optimized: bool) -> AnalysisResult;
}

/// Composite weights. Each set sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileWeights {
    pub skill_match: f64,
    pub secondary: f64,
    pub tertiary: f64,
    pub quaternary: f64,
}

impl ProfileWeights {
    pub const CONTRACT: ProfileWeights = ProfileWeights {
        skill_match: 0.70,
        secondary: 0.15,
        tertiary: 0.05,
        quaternary: 0.10,
    };

    pub const CATEGORIZED: ProfileWeights = ProfileWeights {
        skill_match: 0.60,
        secondary: 0.20,
        tertiary: 0.15,
        quaternary: 0.05,
    };
}

/// Mentions per keyword at which the density component saturates.
const DENSITY_SATURATION: f64 = 3.5;

// ────────────────────────────────────────────────────────────────────────────
// ContractScorer
// ────────────────────────────────────────────────────────────────────────────

/// Flat importance weights, optimization curve and boost bands, cap 100.
///
/// Components: skill match 70%, keyword density 15%, resume length 5%,
/// formatting 10%.
pub struct ContractScorer {
    catalog: Arc<KeywordCatalog>,
    extractor: KeywordExtractor,
    structure: StructureRules,
    length: LengthRules,
    composition: CompositionRules,
    weights: ProfileWeights,
}

impl ContractScorer {
    pub fn new(catalog: Arc<KeywordCatalog>) -> Result<Self> {
        Ok(Self {
            extractor: KeywordExtractor::new(&catalog)?,
            catalog,
            structure: StructureRules::section_signals()?,
            length: LengthRules::default(),
            composition: CompositionRules::contract(),
            weights: ProfileWeights::CONTRACT,
        })
    }
}

impl ResumeScorer for ContractScorer {
    fn profile(&self) -> ScoringProfile {
        ScoringProfile::Contract
    }

    fn catalog(&self) -> &KeywordCatalog {
        &self.catalog
    }

    fn analyze(&self, resume_text: &str, job_text: &str, optimized: bool) -> AnalysisResult {
        let resume_keywords = self.extractor.extract(resume_text);
        let job_keywords = self.extractor.extract(job_text);

        let skill_match = score_match(
            &job_keywords,
            &resume_keywords,
            &self.catalog,
            Tiering::ByWeight,
            job_text,
            optimized,
        );
        let density = keyword_density(&resume_keywords);
        let length = self.length.analyze(resume_text);
        let structure = self.structure.analyze(resume_text);

        let density_score = (density.density / DENSITY_SATURATION).min(1.0) * 100.0;
        let components = [
            WeightedComponent {
                name: "Skill Match",
                score: skill_match.adjusted_percentage,
                weight: self.weights.skill_match,
            },
            WeightedComponent {
                name: "Keyword Density",
                score: density_score,
                weight: self.weights.secondary,
            },
            WeightedComponent {
                name: "Resume Length",
                score: length.score,
                weight: self.weights.tertiary,
            },
            WeightedComponent {
                name: "Formatting",
                score: f64::from(structure.score),
                weight: self.weights.quaternary,
            },
        ];
        let (overall_score, breakdown) = compose(&components, &self.composition, optimized);

        let recommendations = generate(
            &RecommendationInputs {
                missing: &skill_match.missing,
                match_percentage: skill_match.adjusted_percentage,
                keyword_density: density.density,
                page_estimate: length.page_estimate,
                max_pages: self.length.max_pages,
                word_count: length.word_count,
                missing_sections: &structure.missing_sections,
                semantic_similarity: None,
            },
            RecommendationRules::Contract,
        );

        AnalysisResult {
            overall_score,
            profile: ScoringProfile::Contract,
            optimized,
            breakdown,
            skill_match,
            keyword_density: density,
            structure,
            length,
            content_quality: None,
            semantic_similarity: None,
            recommendations,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CategorizedScorer
// ────────────────────────────────────────────────────────────────────────────

/// Category-weighted keywords tiered by job-description context, no curve or
/// boost, cap 95.
///
/// Components: skill match 60%, semantic similarity 20%, structure 15%,
/// content quality 5%.
pub struct CategorizedScorer {
    catalog: Arc<KeywordCatalog>,
    extractor: KeywordExtractor,
    structure: StructureRules,
    length: LengthRules,
    composition: CompositionRules,
    weights: ProfileWeights,
}

impl CategorizedScorer {
    pub fn new(catalog: Arc<KeywordCatalog>) -> Result<Self> {
        Ok(Self {
            extractor: KeywordExtractor::new(&catalog)?,
            catalog,
            structure: StructureRules::weighted_sections()?,
            length: LengthRules::default(),
            composition: CompositionRules::categorized(),
            weights: ProfileWeights::CATEGORIZED,
        })
    }
}

impl ResumeScorer for CategorizedScorer {
    fn profile(&self) -> ScoringProfile {
        ScoringProfile::Categorized
    }

    fn catalog(&self) -> &KeywordCatalog {
        &self.catalog
    }

    fn analyze(&self, resume_text: &str, job_text: &str, optimized: bool) -> AnalysisResult {
        let resume_keywords = self.extractor.extract(resume_text);
        let job_keywords = self.extractor.extract(job_text);

        // the curve belongs to the contract profile only
        let skill_match = score_match(
            &job_keywords,
            &resume_keywords,
            &self.catalog,
            Tiering::ByJobContext,
            job_text,
            false,
        );
        let similarity = semantic_similarity(resume_text, job_text);
        let structure = self.structure.analyze(resume_text);
        let quality = content_quality(resume_text);
        let density = keyword_density(&resume_keywords);
        let length = self.length.analyze(resume_text);

        // two-decimal match percentage, not the integer one
        let components = [
            WeightedComponent {
                name: "Skill Match",
                score: skill_match.raw_percentage,
                weight: self.weights.skill_match,
            },
            WeightedComponent {
                name: "Semantic Similarity",
                score: similarity * 100.0,
                weight: self.weights.secondary,
            },
            WeightedComponent {
                name: "Structure",
                score: f64::from(structure.score),
                weight: self.weights.tertiary,
            },
            WeightedComponent {
                name: "Content Quality",
                score: quality.score,
                weight: self.weights.quaternary,
            },
        ];
        let (overall_score, breakdown) = compose(&components, &self.composition, optimized);

        let recommendations = generate(
            &RecommendationInputs {
                missing: &skill_match.missing,
                match_percentage: skill_match.raw_percentage,
                keyword_density: density.density,
                page_estimate: length.page_estimate,
                max_pages: self.length.max_pages,
                word_count: quality.word_count,
                missing_sections: &structure.missing_sections,
                semantic_similarity: Some(similarity),
            },
            RecommendationRules::Categorized,
        );

        AnalysisResult {
            overall_score,
            profile: ScoringProfile::Categorized,
            optimized,
            breakdown,
            skill_match,
            keyword_density: density,
            structure,
            length,
            content_quality: Some(quality),
            semantic_similarity: Some(round_to(similarity, 4)),
            recommendations,
        }
    }
}

/// Builds the scorer for `profile`, using `catalog` when given and the
/// profile's built-in table otherwise.
pub fn build_scorer(
    profile: ScoringProfile,
    catalog: Option<KeywordCatalog>,
) -> Result<Arc<dyn ResumeScorer>> {
    let scorer: Arc<dyn ResumeScorer> = match profile {
        ScoringProfile::Contract => {
            let catalog = catalog.unwrap_or_else(KeywordCatalog::contract);
            Arc::new(ContractScorer::new(Arc::new(catalog))?)
        }
        ScoringProfile::Categorized => {
            let catalog = catalog.unwrap_or_else(KeywordCatalog::categorized);
            Arc::new(CategorizedScorer::new(Arc::new(catalog))?)
        }
    };
    Ok(scorer)
}
