//! Structure / Format Scorer: section headers and formatting markers, as points.

use anyhow::{Context, Result};
use regex::Regex;

use crate::analysis::models::StructureAnalysis;

#[derive(Debug, Clone)]
pub struct SectionRule {
    pub name: &'static str,
    pattern: Regex,
}

#[derive(Debug, Clone)]
pub struct MarkerRule {
    pub name: &'static str,
    pub points: u32,
    pattern: Regex,
}

/// Point table for one structure variant. Compiled once at scorer construction.
#[derive(Debug, Clone)]
pub struct StructureRules {
    pub points_per_section: u32,
    pub sections: Vec<SectionRule>,
    pub markers: Vec<MarkerRule>,
    pub max_score: u32,
}

fn section(name: &'static str, pattern: &str) -> Result<SectionRule> {
    Ok(SectionRule {
        name,
        pattern: Regex::new(pattern)
            .with_context(|| format!("Invalid pattern for section '{name}'"))?,
    })
}

fn marker(name: &'static str, points: u32, pattern: &str) -> Result<MarkerRule> {
    Ok(MarkerRule {
        name,
        points,
        pattern: Regex::new(pattern)
            .with_context(|| format!("Invalid pattern for marker '{name}'"))?,
    })
}

impl StructureRules {
    /// 20 points per signal: four sections plus bullet formatting.
    pub fn section_signals() -> Result<Self> {
        Ok(Self {
            points_per_section: 20,
            sections: vec![
                section("summary", r"(?i)professional\s+summary|profile|objective")?,
                section("experience", r"(?i)experience|work history|employment")?,
                section("education", r"(?i)education|academic|degree|university")?,
                section("skills", r"(?i)skills|technologies|technical skills")?,
            ],
            markers: vec![marker("bullets", 20, r"•|-|\*")?],
            max_score: 100,
        })
    }

    /// 15 points per section out of six, plus bullets, date ranges and contact details.
    pub fn weighted_sections() -> Result<Self> {
        Ok(Self {
            points_per_section: 15,
            sections: vec![
                section("summary", r"(?i)summary|profile|objective|about")?,
                section(
                    "experience",
                    r"(?i)experience|work history|employment|professional experience",
                )?,
                section("education", r"(?i)education|academic|degree|university|college")?,
                section("skills", r"(?i)skills|technical skills|competencies|technologies")?,
                section("projects", r"(?i)projects|portfolio|accomplishments")?,
                section("certifications", r"(?i)certifications|certificates|credentials")?,
            ],
            markers: vec![
                marker("bullets", 10, r"•|\*|-|\d+\.")?,
                marker("date_ranges", 10, r"(?i)\b\d{4}\s*-\s*(\d{4}|present)\b")?,
                marker("email", 5, r"@\w+\.\w+")?,
                marker("phone", 5, r"\(\d{3}\)\s*\d{3}-\d{4}|\d{3}-\d{3}-\d{4}")?,
            ],
            max_score: 100,
        })
    }

    pub fn analyze(&self, text: &str) -> StructureAnalysis {
        let mut score = 0;
        let mut found_sections = Vec::new();
        let mut missing_sections = Vec::new();
        let mut markers = Vec::new();

        for rule in &self.sections {
            if rule.pattern.is_match(text) {
                score += self.points_per_section;
                found_sections.push(rule.name.to_string());
            } else {
                missing_sections.push(rule.name.to_string());
            }
        }

        for rule in &self.markers {
            if rule.pattern.is_match(text) {
                score += rule.points;
                markers.push(rule.name.to_string());
            }
        }

        StructureAnalysis {
            score: score.min(self.max_score),
            found_sections,
            missing_sections,
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_SECTIONS_NO_BULLETS: &str = "Professional Summary\nSeasoned engineer.\n\
        Experience\nAcme Corp 2019 to 2023\n\
        Education\nState University\n\
        Skills\nJava Spring AWS";

    #[test]
    fn test_four_sections_without_bullets_is_80() {
        let rules = StructureRules::section_signals().unwrap();
        let analysis = rules.analyze(FOUR_SECTIONS_NO_BULLETS);
        assert_eq!(analysis.score, 80);
        assert_eq!(
            analysis.found_sections,
            vec!["summary", "experience", "education", "skills"]
        );
        assert!(analysis.missing_sections.is_empty());
        assert!(analysis.markers.is_empty());
    }

    #[test]
    fn test_all_five_signals_is_100() {
        let rules = StructureRules::section_signals().unwrap();
        let text = format!("{FOUR_SECTIONS_NO_BULLETS}\n• Built payment APIs");
        assert_eq!(rules.analyze(&text).score, 100);
    }

    #[test]
    fn test_missing_sections_reported() {
        let rules = StructureRules::section_signals().unwrap();
        let analysis = rules.analyze("Experience at Acme\n* shipped things");
        assert_eq!(analysis.score, 40);
        assert_eq!(analysis.missing_sections, vec!["summary", "education", "skills"]);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let rules = StructureRules::section_signals().unwrap();
        let analysis = rules.analyze("");
        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.missing_sections.len(), 4);
    }

    #[test]
    fn test_weighted_variant_markers() {
        let rules = StructureRules::weighted_sections().unwrap();
        let text = "Summary\nExperience 2018 - Present\nEducation\nSkills\n\
                    jane@mail.com (555) 123-4567";
        let analysis = rules.analyze(text);
        // 4 sections × 15 + bullets("-") 10 + dates 10 + email 5 + phone 5
        assert_eq!(analysis.score, 90);
        assert_eq!(analysis.missing_sections, vec!["projects", "certifications"]);
        assert_eq!(
            analysis.markers,
            vec!["bullets", "date_ranges", "email", "phone"]
        );
    }

    #[test]
    fn test_weighted_variant_caps_at_100() {
        let rules = StructureRules::weighted_sections().unwrap();
        let text = "Summary Experience Education Skills Projects Certifications\n\
                    - 2015 - 2020 a@b.io 555-123-4567";
        assert_eq!(rules.analyze(text).score, 100);
    }
}
