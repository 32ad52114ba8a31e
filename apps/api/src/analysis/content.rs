//! Length, content-quality and keyword-density sub-scores.

use std::sync::OnceLock;

use regex::Regex;

use crate::analysis::models::{
    round_to, ContentQuality, ExtractedKeywords, KeywordDensity, LengthAnalysis,
};

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Page estimate and a score that decays linearly once the resume runs long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthRules {
    pub words_per_page: usize,
    pub max_pages: u32,
    pub penalty_per_page: f64,
}

impl Default for LengthRules {
    fn default() -> Self {
        Self {
            words_per_page: 500,
            max_pages: 6,
            penalty_per_page: 10.0,
        }
    }
}

impl LengthRules {
    pub fn analyze(&self, text: &str) -> LengthAnalysis {
        let words = word_count(text);
        let page_estimate = words.div_ceil(self.words_per_page.max(1)) as u32;

        let score = if page_estimate <= self.max_pages {
            100.0
        } else {
            let over = f64::from(page_estimate - self.max_pages);
            (100.0 - over * self.penalty_per_page).max(0.0)
        };

        LengthAnalysis {
            word_count: words,
            page_estimate,
            score,
        }
    }
}

fn sentence_breaks() -> &'static Regex {
    static BREAKS: OnceLock<Regex> = OnceLock::new();
    BREAKS.get_or_init(|| Regex::new(r"[.!?]+").expect("static regex"))
}

/// Sentence-length and word-count bands. Sentences are the segments between
/// runs of `.`, `!` or `?`, empty ones included, so a closing period adds one.
/// 80 when the average sentence is 10–25 words (exclusive), else 60;
/// plus 20 when the resume is 300–2000 words (exclusive), else 10. Capped at 100.
pub fn content_quality(text: &str) -> ContentQuality {
    let words = word_count(text);
    let sentences = sentence_breaks().split(text).count().max(1);
    let avg_words_per_sentence = words as f64 / sentences as f64;

    let sentence_points = if avg_words_per_sentence > 10.0 && avg_words_per_sentence < 25.0 {
        80.0
    } else {
        60.0
    };
    let length_points = if words > 300 && words < 2000 {
        20.0
    } else {
        10.0
    };

    ContentQuality {
        word_count: words,
        sentence_count: sentences,
        avg_words_per_sentence: round_to(avg_words_per_sentence, 1),
        score: f64::min(sentence_points + length_points, 100.0),
    }
}

pub fn keyword_density(resume: &ExtractedKeywords) -> KeywordDensity {
    let total_mentions = resume.total_mentions();
    let unique_keywords = resume.len();
    let density = if resume.is_empty() {
        0.0
    } else {
        round_to(f64::from(total_mentions) / unique_keywords as f64, 1)
    };

    KeywordDensity {
        total_mentions,
        unique_keywords,
        density,
    }
}
