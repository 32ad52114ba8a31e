use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::scorer::ScoringProfile;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MIN_RESUME_CHARS: usize = 100;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

/// Application configuration loaded from environment variables.
/// Every variable is optional; missing ones fall back to `Config::default()`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub min_resume_chars: usize,
    pub accepted_mime_types: Vec<String>,
    /// Default for the optimization curve/boost when a request does not say.
    pub optimized_scoring: bool,
    pub scoring_profile: ScoringProfile,
    /// Optional JSON catalog replacing the profile's built-in keyword table.
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            min_resume_chars: DEFAULT_MIN_RESUME_CHARS,
            accepted_mime_types: vec![
                MIME_PDF.to_string(),
                MIME_DOCX.to_string(),
                MIME_TEXT.to_string(),
            ],
            optimized_scoring: true,
            scoring_profile: ScoringProfile::Contract,
            catalog_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: parse_env("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            min_resume_chars: parse_env("MIN_RESUME_CHARS", defaults.min_resume_chars)
                .context("MIN_RESUME_CHARS must be a character count")?,
            accepted_mime_types: std::env::var("ACCEPTED_MIME_TYPES")
                .map(|raw| parse_mime_list(&raw))
                .unwrap_or(defaults.accepted_mime_types),
            optimized_scoring: parse_env("OPTIMIZED_SCORING", defaults.optimized_scoring)
                .context("OPTIMIZED_SCORING must be true or false")?,
            scoring_profile: match std::env::var("SCORING_PROFILE") {
                Ok(raw) => raw
                    .parse::<ScoringProfile>()
                    .context("SCORING_PROFILE must be 'contract' or 'categorized'")?,
                Err(_) => defaults.scoring_profile,
            },
            catalog_path: std::env::var("CATALOG_PATH").ok().map(PathBuf::from),
        })
    }

    pub fn accepts_mime(&self, mime: &str) -> bool {
        self.accepted_mime_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(mime))
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        Err(_) => Ok(default),
    }
}

fn parse_mime_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}
