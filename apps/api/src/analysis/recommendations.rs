//! Recommendation Generator: fixed, ordered rules. Same input, same output.

use crate::analysis::catalog::ImportanceTier;
use crate::analysis::models::MissingKeyword;

const MAX_NAMED_SKILLS: usize = 5;

/// Everything the rules look at, gathered from the earlier pipeline stages.
#[derive(Debug, Clone)]
pub struct RecommendationInputs<'a> {
    pub missing: &'a [MissingKeyword],
    pub match_percentage: f64,
    pub keyword_density: f64,
    pub page_estimate: u32,
    pub max_pages: u32,
    pub word_count: usize,
    pub missing_sections: &'a [String],
    pub semantic_similarity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationRules {
    Contract,
    Categorized,
}

pub fn generate(inputs: &RecommendationInputs<'_>, rules: RecommendationRules) -> Vec<String> {
    match rules {
        RecommendationRules::Contract => contract_rules(inputs),
        RecommendationRules::Categorized => categorized_rules(inputs),
    }
}

fn high_priority_names(missing: &[MissingKeyword]) -> Option<String> {
    let names: Vec<&str> = missing
        .iter()
        .filter(|kw| kw.importance == ImportanceTier::High)
        .take(MAX_NAMED_SKILLS)
        .map(|kw| kw.name.as_str())
        .collect();

    (!names.is_empty()).then(|| names.join(", "))
}

fn contract_rules(inputs: &RecommendationInputs<'_>) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(skills) = high_priority_names(inputs.missing) {
        recommendations.push(format!(
            "Add these critical missing skills (if you have them): {skills}"
        ));
    }

    if inputs.keyword_density < 2.0 {
        recommendations
            .push("Increase keyword frequency to 3-4 mentions for important skills".to_string());
    } else if inputs.keyword_density > 5.0 {
        recommendations.push(
            "Your keyword density is high. Consider more natural integration of keywords"
                .to_string(),
        );
    }

    if inputs.page_estimate > inputs.max_pages {
        recommendations.push(format!(
            "Your resume exceeds {} pages. Consider focusing on most relevant experience",
            inputs.max_pages
        ));
    }

    recommendations.push(
        "Create a dedicated \"Technical Skills\" section organized by categories".to_string(),
    );
    recommendations.push("Include 5-7 important skills in your professional summary".to_string());
    recommendations.push(
        "Use both acronyms and full terms (e.g., \"AWS (Amazon Web Services)\")".to_string(),
    );

    recommendations
}

fn categorized_rules(inputs: &RecommendationInputs<'_>) -> Vec<String> {
    let mut recommendations = Vec::new();
    let section_missing = |name: &str| inputs.missing_sections.iter().any(|s| s == name);

    if section_missing("summary") {
        recommendations.push("Add a professional summary or objective section".to_string());
    }
    if section_missing("skills") {
        recommendations.push("Include a dedicated technical skills section".to_string());
    }

    if let Some(skills) = high_priority_names(inputs.missing) {
        recommendations.push(format!(
            "Critical: Add these high-priority skills if you have them: {skills}"
        ));
    }

    if inputs.match_percentage < 40.0 {
        recommendations.push(
            "Consider highlighting more relevant technical skills and experience".to_string(),
        );
    }

    if inputs.word_count < 300 {
        recommendations.push(
            "Your resume is quite brief. Consider adding more detail about your experience"
                .to_string(),
        );
    } else if inputs.word_count > 2000 {
        recommendations.push(
            "Your resume is lengthy. Consider condensing to focus on most relevant experience"
                .to_string(),
        );
    }

    if inputs.semantic_similarity.is_some_and(|s| s < 0.3) {
        recommendations.push(
            "Try to better align your resume content with the job description language"
                .to_string(),
        );
    }

    recommendations
}
