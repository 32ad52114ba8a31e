//! Keyword Extractor: counts catalog terms in free text with word-aware boundaries.
//!
//! Text and catalog terms go through the same `normalize_text`, so `CI/CD`,
//! `ci cd` and `Ci/Cd` all compare equal. Matching collects every overlapping
//! Aho–Corasick hit, discards hits glued to a neighbouring letter or digit, and
//! resolves the rest leftmost-longest: `spring boot` counts once as
//! *Spring Boot*, never also as *Spring*, and `java` never fires inside
//! `javascript`.

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};

use crate::analysis::catalog::KeywordCatalog;
use crate::analysis::models::ExtractedKeywords;

/// Technology names whose punctuation would otherwise be stripped away.
const SYMBOL_REWRITES: &[(&str, &str)] = &[
    ("c++", "cplusplus"),
    ("c#", "csharp"),
    (".net", "dotnet"),
];

/// Lowercases, rewrites symbol-bearing names, and reduces everything else to
/// alphanumeric tokens separated by single spaces. `-` and `.` survive only
/// between two alphanumerics (`node.js`, `front-end`).
pub fn normalize_text(text: &str) -> String {
    let mut lowered = text.to_lowercase();
    for (symbol, word) in SYMBOL_REWRITES {
        if lowered.contains(symbol) {
            lowered = lowered.replace(symbol, word);
        }
    }

    let chars: Vec<char> = lowered.chars().collect();
    let mut normalized = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for (i, &c) in chars.iter().enumerate() {
        let internal_joiner = (c == '-' || c == '.')
            && i > 0
            && chars[i - 1].is_alphanumeric()
            && chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());

        if c.is_alphanumeric() || internal_joiner {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(c);
        } else {
            pending_space = true;
        }
    }

    normalized
}

pub struct KeywordExtractor {
    automaton: AhoCorasick,
    /// Pattern index → catalog entry name.
    pattern_names: Vec<String>,
}

impl KeywordExtractor {
    pub fn new(catalog: &KeywordCatalog) -> Result<Self> {
        let mut patterns = Vec::new();
        let mut pattern_names = Vec::new();

        for entry in &catalog.entries {
            for term in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let normalized = normalize_text(term);
                if normalized.is_empty() {
                    continue;
                }
                patterns.push(normalized);
                pattern_names.push(entry.name.clone());
            }
        }

        let automaton =
            AhoCorasick::new(&patterns).context("Failed to build keyword matcher")?;

        Ok(Self {
            automaton,
            pattern_names,
        })
    }

    pub fn extract(&self, text: &str) -> ExtractedKeywords {
        let normalized = normalize_text(text);
        let mut keywords = ExtractedKeywords::new();
        if normalized.is_empty() {
            return keywords;
        }

        let mut hits: Vec<(usize, usize, usize)> = self
            .automaton
            .find_overlapping_iter(&normalized)
            .filter(|m| is_word_bounded(&normalized, m.start(), m.end()))
            .map(|m| (m.start(), m.end(), m.pattern().as_usize()))
            .collect();

        // leftmost first, longest first at the same start
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut cursor = 0;
        for (start, end, pattern) in hits {
            if start < cursor {
                continue;
            }
            keywords.record(&self.pattern_names[pattern], 1);
            cursor = end;
        }

        keywords
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::CatalogEntry;

    fn catalog_of(names: &[&str]) -> KeywordCatalog {
        KeywordCatalog {
            categories: vec![],
            entries: names
                .iter()
                .map(|n| CatalogEntry {
                    name: n.to_string(),
                    weight: 1.0,
                    category: None,
                    aliases: vec![],
                })
                .collect(),
            tiers: Default::default(),
        }
    }

    #[test]
    fn test_normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(
            normalize_text("  Required:  Java,\tSpring   Boot!! "),
            "required java spring boot"
        );
    }

    #[test]
    fn test_normalize_keeps_internal_hyphen_and_period() {
        assert_eq!(normalize_text("Node.js, front-end."), "node.js front-end");
        assert_eq!(normalize_text("-lead- .dot."), "lead dot");
    }

    #[test]
    fn test_normalize_rewrites_symbol_names() {
        assert_eq!(normalize_text("C++ / C# / .NET"), "cplusplus csharp dotnet");
        assert_eq!(normalize_text("ASP.NET"), "aspdotnet");
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let extractor = KeywordExtractor::new(&catalog_of(&["Java"])).unwrap();
        let found = extractor.extract("JavaScript and TypeScript developer");
        assert!(found.is_empty());
    }

    #[test]
    fn test_java_and_javascript_counted_separately() {
        let extractor = KeywordExtractor::new(&catalog_of(&["Java", "JavaScript"])).unwrap();
        let found = extractor.extract("Java, JavaScript, java.");
        assert_eq!(found.count("Java"), 2);
        assert_eq!(found.count("JavaScript"), 1);
    }

    #[test]
    fn test_multi_word_phrase_wins_over_its_prefix() {
        let extractor = KeywordExtractor::new(&catalog_of(&["Spring", "Spring Boot"])).unwrap();
        let found = extractor.extract("Spring Boot services; plain Spring MVC");
        assert_eq!(found.count("Spring Boot"), 1);
        assert_eq!(found.count("Spring"), 1);
    }

    #[test]
    fn test_rejected_long_match_falls_back_to_prefix() {
        let extractor = KeywordExtractor::new(&catalog_of(&["Spring", "Spring Boot"])).unwrap();
        let found = extractor.extract("spring bootcamp graduate");
        assert_eq!(found.count("Spring"), 1);
        assert_eq!(found.count("Spring Boot"), 0);
    }

    #[test]
    fn test_symbol_terms_match() {
        let extractor =
            KeywordExtractor::new(&catalog_of(&["C++", "C#", ".NET", "CI/CD", "Git", "GitHub"]))
                .unwrap();
        let found = extractor.extract("C++ and c# on .NET with CI/CD via GitHub");
        assert_eq!(found.count("C++"), 1);
        assert_eq!(found.count("C#"), 1);
        assert_eq!(found.count(".NET"), 1);
        assert_eq!(found.count("CI/CD"), 1);
        assert_eq!(found.count("GitHub"), 1);
        assert_eq!(found.count("Git"), 0);
    }

    #[test]
    fn test_aliases_count_toward_canonical_name() {
        let catalog = KeywordCatalog::contract();
        let extractor = KeywordExtractor::new(&catalog).unwrap();
        let found = extractor.extract("AWS and Amazon Web Services, plus k8s");
        assert_eq!(found.count("AWS"), 2);
        assert_eq!(found.count("Kubernetes"), 1);
    }

    #[test]
    fn test_hyphenated_compound_still_bounds_words() {
        let extractor = KeywordExtractor::new(&catalog_of(&["Java"])).unwrap();
        assert_eq!(extractor.extract("Java-based backend").count("Java"), 1);
    }

    #[test]
    fn test_empty_and_short_text_yield_empty_mapping() {
        let extractor = KeywordExtractor::new(&KeywordCatalog::contract()).unwrap();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("  ,.; ").is_empty());
        assert!(extractor.extract("hi").is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = KeywordExtractor::new(&KeywordCatalog::categorized()).unwrap();
        let text = "Python, Django and PostgreSQL on AWS; Docker + Kubernetes; python scripts";
        let first = extractor.extract(text);
        let second = extractor.extract(text);
        assert_eq!(first, second);
        assert_eq!(first.count("python"), 2);
    }
}
