pub mod matching;
pub mod query;
pub mod scoring;
