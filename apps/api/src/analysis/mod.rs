pub mod catalog;
pub mod composer;
pub mod content;
pub mod extractor;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod recommendations;
pub mod scorer;
pub mod similarity;
pub mod structure;
