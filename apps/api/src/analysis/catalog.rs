//! Keyword catalog: the immutable skill table every analysis reads from.
//!
//! Two built-in tables exist, one per scoring profile. A catalog can also be
//! loaded from JSON at startup (`CATALOG_PATH`) to substitute a different table.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Importance of a missing skill. Ordered High → Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImportanceTier {
    High,
    Medium,
    Low,
}

/// Weight cut-offs for tiering a keyword by its catalog importance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 2.5,
            medium: 1.5,
        }
    }
}

impl TierThresholds {
    pub fn tier_for(&self, weight: f64) -> ImportanceTier {
        if weight >= self.high {
            ImportanceTier::High
        } else if weight >= self.medium {
            ImportanceTier::Medium
        } else {
            ImportanceTier::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name, also the key in extracted keyword maps.
    pub name: String,
    /// Importance weight; multiplied by job-description mentions when scoring.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Alternate spellings counted toward this entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCatalog {
    #[serde(default)]
    pub categories: Vec<SkillCategory>,
    pub entries: Vec<CatalogEntry>,
    #[serde(default)]
    pub tiers: TierThresholds,
}

/// Weight used for keywords the catalog does not know.
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 1.0;

impl KeywordCatalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn weight_of(&self, name: &str) -> f64 {
        self.entry(name)
            .map(|e| e.weight)
            .unwrap_or(DEFAULT_KEYWORD_WEIGHT)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Loads and validates a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file '{}'", path.display()))?;
        let catalog: KeywordCatalog = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file '{}'", path.display()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            bail!("Keyword catalog has no entries");
        }
        if self.tiers.medium > self.tiers.high {
            bail!(
                "Tier thresholds out of order: medium {} > high {}",
                self.tiers.medium,
                self.tiers.high
            );
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                bail!("Keyword catalog contains an entry with an empty name");
            }
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                bail!("Keyword '{}' has invalid weight {}", entry.name, entry.weight);
            }
            if !seen.insert(entry.name.to_lowercase()) {
                bail!("Keyword '{}' is listed twice", entry.name);
            }
        }
        Ok(())
    }

    /// Contract-role table: flat importance weights, tiered at 2.5 / 1.5.
    pub fn contract() -> Self {
        const ENTRIES: &[(&str, f64, &[&str])] = &[
            ("Java", 3.0, &[]),
            ("Spring", 2.5, &[]),
            ("Spring Boot", 2.5, &[]),
            ("AWS", 3.0, &["amazon web services"]),
            ("Cloud", 1.0, &[]),
            ("Microservices", 2.5, &[]),
            ("Kubernetes", 2.0, &["k8s"]),
            ("Docker", 2.0, &[]),
            ("REST", 2.0, &[]),
            ("API", 2.0, &[]),
            ("Angular", 1.0, &[]),
            ("React", 1.0, &[]),
            ("CI/CD", 1.0, &[]),
            ("Jenkins", 1.0, &[]),
            ("Git", 1.0, &[]),
            ("GitHub", 1.0, &[]),
            ("SQL", 1.0, &[]),
            ("Oracle", 1.0, &[]),
            ("MySQL", 1.0, &[]),
            ("PostgreSQL", 1.0, &["postgres"]),
            ("NoSQL", 1.0, &[]),
            ("MongoDB", 1.0, &[]),
            ("Agile", 1.0, &[]),
            ("Scrum", 1.0, &[]),
        ];

        KeywordCatalog {
            categories: vec![],
            entries: ENTRIES
                .iter()
                .map(|(name, weight, aliases)| CatalogEntry {
                    name: name.to_string(),
                    weight: *weight,
                    category: None,
                    aliases: aliases.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
            tiers: TierThresholds::default(),
        }
    }

    /// Category-weighted table: every keyword carries its category's weight.
    pub fn categorized() -> Self {
        const CATEGORIES: &[(&str, f64, &[(&str, &[&str])])] = &[
            (
                "programming_languages",
                0.25,
                &[
                    ("python", &[]),
                    ("java", &[]),
                    ("javascript", &[]),
                    ("typescript", &[]),
                    ("c++", &[]),
                    ("c#", &[]),
                    ("go", &["golang"]),
                    ("rust", &[]),
                    ("kotlin", &[]),
                    ("swift", &[]),
                    ("scala", &[]),
                    ("r", &[]),
                    ("php", &[]),
                    ("ruby", &[]),
                    ("perl", &[]),
                    ("node.js", &["nodejs"]),
                ],
            ),
            (
                "frameworks_libraries",
                0.20,
                &[
                    ("react", &[]),
                    ("angular", &[]),
                    ("vue", &[]),
                    ("spring", &[]),
                    ("spring boot", &[]),
                    ("django", &[]),
                    ("flask", &[]),
                    ("express", &[]),
                    ("laravel", &[]),
                    (".net", &[]),
                    ("asp.net", &[]),
                    ("hibernate", &[]),
                    ("jquery", &[]),
                    ("bootstrap", &[]),
                ],
            ),
            (
                "databases",
                0.15,
                &[
                    ("mysql", &[]),
                    ("postgresql", &["postgres"]),
                    ("mongodb", &[]),
                    ("redis", &[]),
                    ("elasticsearch", &[]),
                    ("oracle", &[]),
                    ("sql server", &[]),
                    ("sqlite", &[]),
                    ("cassandra", &[]),
                    ("dynamodb", &[]),
                    ("firebase", &[]),
                ],
            ),
            (
                "cloud_platforms",
                0.20,
                &[
                    ("aws", &["amazon web services"]),
                    ("azure", &[]),
                    ("google cloud", &["gcp", "google cloud platform"]),
                    ("heroku", &[]),
                    ("digital ocean", &[]),
                    ("kubernetes", &["k8s"]),
                    ("docker", &[]),
                    ("terraform", &[]),
                    ("ansible", &[]),
                ],
            ),
            (
                "tools_technologies",
                0.15,
                &[
                    ("git", &[]),
                    ("github", &[]),
                    ("gitlab", &[]),
                    ("jenkins", &[]),
                    ("ci/cd", &[]),
                    ("webpack", &[]),
                    ("babel", &[]),
                    ("npm", &[]),
                    ("yarn", &[]),
                    ("maven", &[]),
                    ("gradle", &[]),
                    ("linux", &[]),
                    ("unix", &[]),
                    ("rest api", &[]),
                    ("graphql", &[]),
                ],
            ),
            (
                "methodologies",
                0.05,
                &[
                    ("agile", &[]),
                    ("scrum", &[]),
                    ("kanban", &[]),
                    ("devops", &[]),
                    ("microservices", &[]),
                    ("tdd", &[]),
                    ("bdd", &[]),
                    ("solid principles", &[]),
                    ("design patterns", &[]),
                    ("mvc", &[]),
                    ("api design", &[]),
                ],
            ),
        ];

        let mut categories = Vec::new();
        let mut entries = Vec::new();
        for (category, weight, keywords) in CATEGORIES {
            categories.push(SkillCategory {
                name: category.to_string(),
                weight: *weight,
            });
            for (name, aliases) in keywords.iter() {
                entries.push(CatalogEntry {
                    name: name.to_string(),
                    weight: *weight,
                    category: Some(category.to_string()),
                    aliases: aliases.iter().map(|a| a.to_string()).collect(),
                });
            }
        }

        KeywordCatalog {
            categories,
            entries,
            tiers: TierThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalogs_validate() {
        KeywordCatalog::contract().validate().unwrap();
        KeywordCatalog::categorized().validate().unwrap();
    }

    #[test]
    fn test_contract_weights() {
        let catalog = KeywordCatalog::contract();
        assert_eq!(catalog.weight_of("Java"), 3.0);
        assert_eq!(catalog.weight_of("spring boot"), 2.5);
        assert_eq!(catalog.weight_of("Docker"), 2.0);
        assert_eq!(catalog.weight_of("Scrum"), 1.0);
        assert_eq!(catalog.weight_of("Haskell"), DEFAULT_KEYWORD_WEIGHT);
    }

    #[test]
    fn test_tier_thresholds() {
        let tiers = TierThresholds::default();
        assert_eq!(tiers.tier_for(3.0), ImportanceTier::High);
        assert_eq!(tiers.tier_for(2.5), ImportanceTier::High);
        assert_eq!(tiers.tier_for(2.0), ImportanceTier::Medium);
        assert_eq!(tiers.tier_for(1.5), ImportanceTier::Medium);
        assert_eq!(tiers.tier_for(1.0), ImportanceTier::Low);
    }

    #[test]
    fn test_categorized_entries_carry_category_weight() {
        let catalog = KeywordCatalog::categorized();
        assert_eq!(catalog.categories.len(), 6);
        let docker = catalog.entry("docker").unwrap();
        assert_eq!(docker.category.as_deref(), Some("cloud_platforms"));
        assert_eq!(docker.weight, 0.20);
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_weights() {
        let mut catalog = KeywordCatalog::contract();
        catalog.entries.push(CatalogEntry {
            name: "JAVA".to_string(),
            weight: 1.0,
            category: None,
            aliases: vec![],
        });
        assert!(catalog.validate().is_err());

        let mut catalog = KeywordCatalog::contract();
        catalog.entries[0].weight = 0.0;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_from_json_file_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"entries": [{{"name": "Rust", "weight": 3}}, {{"name": "Tokio", "weight": 1.5, "aliases": ["tokio-rs"]}}]}}"#
        )
        .unwrap();

        let catalog = KeywordCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.categories.is_empty());
        assert_eq!(catalog.tiers, TierThresholds::default());
        assert_eq!(catalog.entry("tokio").unwrap().aliases, vec!["tokio-rs"]);
    }

    #[test]
    fn test_from_json_file_rejects_empty_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"entries": []}}"#).unwrap();
        assert!(KeywordCatalog::from_json_file(file.path()).is_err());
    }
}
