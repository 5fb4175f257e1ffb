//! Citizen complaint classification: deterministic text normalization,
//! topic inference against a pretrained LDA artifact, sentiment labeling,
//! and per-topic aggregation.
//!
//! The flow per complaint: raw text → [`preprocess::TextPreprocessor`] →
//! tokens → [`topic::TopicInferenceEngine`] (topic vector) and
//! [`sentiment::SentimentAnalyzer`] (label, on the raw text) →
//! [`catalog::TopicCatalog::resolve`] → [`report::AggregatedReport`].

pub mod catalog;
pub mod lexicon;
pub mod models;
pub mod preprocess;
pub mod report;
pub mod sentiment;
pub mod stemmer;
pub mod topic;
