//! Match Scorer: weighted overlap between job-description and resume keywords.
//!
//! Algorithm:
//! 1. For each keyword found in the job description:
//!    weight = importance × job mentions (importance defaults to 1 when uncatalogued)
//! 2. possible += weight; if the resume mentions it too, achieved += weight
//! 3. raw = achieved / possible × 100 (0 when possible is 0)
//! 4. Optional optimization curve on the raw percentage, capped at 100

use crate::analysis::catalog::{ImportanceTier, KeywordCatalog};
use crate::analysis::extractor::normalize_text;
use crate::analysis::models::{
    round_to, ExtractedKeywords, MatchResult, MatchedKeyword, MissingKeyword,
};

/// How a missing keyword's importance tier is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tiering {
    /// From the catalog weight against the catalog's tier thresholds.
    ByWeight,
    /// From the words surrounding each mention in the job description.
    ByJobContext,
}

const CONTEXT_WINDOW: usize = 50;

const HIGH_IMPORTANCE_CUES: &[&str] = &[
    "required",
    "must",
    "essential",
    "critical",
    "mandatory",
    "years",
];

const MEDIUM_IMPORTANCE_CUES: &[&str] =
    &["preferred", "desirable", "plus", "bonus", "nice to have"];

pub fn score_match(
    job: &ExtractedKeywords,
    resume: &ExtractedKeywords,
    catalog: &KeywordCatalog,
    tiering: Tiering,
    job_text: &str,
    apply_curve: bool,
) -> MatchResult {
    let normalized_job = match tiering {
        Tiering::ByJobContext => normalize_text(job_text),
        Tiering::ByWeight => String::new(),
    };

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut possible_weight = 0.0_f64;
    let mut achieved_weight = 0.0_f64;

    for (name, job_count) in ordered_by_catalog(job, catalog) {
        let entry = catalog.entry(name);
        let importance = catalog.weight_of(name);
        let weight = importance * f64::from(job_count);
        possible_weight += weight;

        let resume_count = resume.count(name);
        if resume_count > 0 {
            achieved_weight += weight;
            matched.push(MatchedKeyword {
                name: name.to_string(),
                category: entry.and_then(|e| e.category.clone()),
                resume_count,
                job_count,
                weight,
            });
        } else {
            let importance_tier = match tiering {
                Tiering::ByWeight => catalog.tiers.tier_for(importance),
                Tiering::ByJobContext => {
                    let mut terms = vec![normalize_text(name)];
                    if let Some(entry) = entry {
                        terms.extend(entry.aliases.iter().map(|a| normalize_text(a)));
                    }
                    tier_from_context(&normalized_job, &terms)
                }
            };
            missing.push(MissingKeyword {
                name: name.to_string(),
                category: entry.and_then(|e| e.category.clone()),
                importance: importance_tier,
                job_count,
            });
        }
    }

    let exact_percentage = if possible_weight > 0.0 {
        achieved_weight / possible_weight * 100.0
    } else {
        0.0
    };

    // curve and integer rounding work on the exact ratio; two decimals are for display
    let adjusted_percentage = if apply_curve {
        apply_optimization_curve(exact_percentage)
    } else {
        exact_percentage.round().min(100.0)
    };

    MatchResult {
        matched,
        missing,
        possible_weight,
        achieved_weight,
        raw_percentage: round_to(exact_percentage, 2),
        adjusted_percentage,
    }
}

/// Contract optimization curve. The raw percentage is first rounded to an
/// integer, then scaled by its bracket and rounded again:
/// below 40 → ×1.75, 40–59 → ×1.4, 60–79 → ×1.15, 80 and up → ×1.05. Capped at 100.
pub fn apply_optimization_curve(raw_percentage: f64) -> f64 {
    let base = raw_percentage.round();
    let multiplier = if base < 40.0 {
        1.75
    } else if base < 60.0 {
        1.4
    } else if base < 80.0 {
        1.15
    } else {
        1.05
    };
    (base * multiplier).round().clamp(0.0, 100.0)
}

/// Job keywords in catalog order, then any uncatalogued keywords alphabetically.
fn ordered_by_catalog<'a>(
    job: &'a ExtractedKeywords,
    catalog: &KeywordCatalog,
) -> Vec<(&'a str, u32)> {
    let mut ordered: Vec<(Option<usize>, &'a str, u32)> = job
        .iter()
        .map(|(name, count)| (catalog.position_of(name), name, count))
        .collect();
    // None sorts before Some, so map uncatalogued keywords past the end
    ordered.sort_by_key(|(position, name, _)| (position.unwrap_or(usize::MAX), *name));
    ordered
        .into_iter()
        .map(|(_, name, count)| (name, count))
        .collect()
}

/// Scans ±50 chars around every mention of the keyword for requirement cues.
/// A high cue anywhere wins; otherwise any medium cue gives Medium.
fn tier_from_context(normalized_job: &str, terms: &[String]) -> ImportanceTier {
    let mut tier = ImportanceTier::Low;

    for term in terms.iter().filter(|t| !t.is_empty()) {
        for (index, _) in normalized_job.match_indices(term.as_str()) {
            let window = context_window(normalized_job, index, index + term.len());
            if HIGH_IMPORTANCE_CUES.iter().any(|cue| window.contains(cue)) {
                return ImportanceTier::High;
            }
            if MEDIUM_IMPORTANCE_CUES.iter().any(|cue| window.contains(cue)) {
                tier = ImportanceTier::Medium;
            }
        }
    }

    tier
}

fn context_window(text: &str, start: usize, end: usize) -> &str {
    let mut from = start.saturating_sub(CONTEXT_WINDOW);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_WINDOW).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }
    &text[from..to]
}
