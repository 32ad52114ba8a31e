//! TF-IDF cosine similarity between a resume and a job description.
//!
//! Two-document corpus: tf = raw term count, idf = 1 + ln(N / (1 + df)).
//! Terms in both documents are damped (idf ≈ 0.59), terms unique to one keep idf 1.

use std::collections::{HashMap, HashSet};

use crate::analysis::extractor::normalize_text;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "do", "for", "from", "had", "has", "have", "he", "her", "his", "i", "if",
    "in", "into", "is", "it", "its", "me", "my", "no", "not", "of", "on", "or", "our", "she",
    "so", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "to", "up", "us", "was", "we", "were", "what", "when", "which", "while", "who", "will",
    "with", "would", "you", "your",
];

pub fn tokenize(text: &str) -> Vec<String> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    normalize_text(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !stop_words.contains(token))
        .map(str::to_string)
        .collect()
}

fn term_counts(tokens: &[String]) -> HashMap<&str, f64> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of the two TF-IDF vectors, in [0, 1].
/// Zero when either document has no indexable terms.
pub fn semantic_similarity(resume_text: &str, job_text: &str) -> f64 {
    let resume_tokens = tokenize(resume_text);
    let job_tokens = tokenize(job_text);
    if resume_tokens.is_empty() || job_tokens.is_empty() {
        return 0.0;
    }

    let resume_tf = term_counts(&resume_tokens);
    let job_tf = term_counts(&job_tokens);

    let idf = |term: &str| {
        let df = [&resume_tf, &job_tf]
            .iter()
            .filter(|doc| doc.contains_key(term))
            .count() as f64;
        1.0 + (2.0 / (1.0 + df)).ln()
    };

    let vocabulary: HashSet<&str> = resume_tf.keys().chain(job_tf.keys()).copied().collect();

    let mut dot = 0.0;
    let mut resume_norm = 0.0;
    let mut job_norm = 0.0;
    for term in vocabulary {
        let weight = idf(term);
        let r = resume_tf.get(term).copied().unwrap_or(0.0) * weight;
        let j = job_tf.get(term).copied().unwrap_or(0.0) * weight;
        dot += r * j;
        resume_norm += r * r;
        job_norm += j * j;
    }

    if resume_norm == 0.0 || job_norm == 0.0 {
        return 0.0;
    }
    (dot / (resume_norm.sqrt() * job_norm.sqrt())).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_punctuation() {
        assert_eq!(
            tokenize("The team uses Node.js and Docker!"),
            vec!["team", "uses", "node", "js", "docker"]
        );
    }

    #[test]
    fn test_identical_documents_are_fully_similar() {
        let text = "Java Spring Boot microservices on AWS";
        let similarity = semantic_similarity(text, text);
        assert!((similarity - 1.0).abs() < 1e-9, "got {similarity}");
    }

    #[test]
    fn test_disjoint_documents_have_zero_similarity() {
        assert_eq!(
            semantic_similarity("python django postgres", "welding forklift safety"),
            0.0
        );
    }

    #[test]
    fn test_partial_overlap_is_between_bounds() {
        let similarity = semantic_similarity(
            "Java developer with Spring experience",
            "Hiring a Java developer familiar with Kubernetes",
        );
        assert!(similarity > 0.0 && similarity < 1.0, "got {similarity}");
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(semantic_similarity("", "java"), 0.0);
        assert_eq!(semantic_similarity("the and of", "java"), 0.0);
    }
}
