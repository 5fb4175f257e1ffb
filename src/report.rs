use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::SentimentLabel;

/// Per-topic sentiment tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub negative: u64,
    pub neutral: u64,
}

/// Per-topic sentiment counts plus global totals, built by folding one
/// classified record at a time. The fold is commutative and associative:
/// record order never changes the totals, which makes batch and streaming
/// aggregation equivalent. `BTreeMap` keeps display order stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedReport {
    pub topics: BTreeMap<String, SentimentCounts>,
    pub total_negative: u64,
    pub total_neutral: u64,
    pub total: u64,
}

impl AggregatedReport {
    pub fn new() -> Self {
        AggregatedReport::default()
    }

    /// Fold one classified record in. Unseen topic titles start from a
    /// zeroed entry. `Unknown` sentiment counts toward the grand total
    /// only: the dashboard never shows a third class.
    pub fn fold(&mut self, topic_title: &str, sentiment: SentimentLabel) {
        let counts = self.topics.entry(topic_title.to_string()).or_default();
        match sentiment {
            SentimentLabel::Negative => {
                counts.negative += 1;
                self.total_negative += 1;
            }
            SentimentLabel::Neutral => {
                counts.neutral += 1;
                self.total_neutral += 1;
            }
            SentimentLabel::Unknown => {}
        }
        self.total += 1;
    }

    /// Combine two partial reports. `a.merge(b)` equals folding all of
    /// `b`'s records into `a`, whichever order they arrived in.
    pub fn merge(&mut self, other: &AggregatedReport) {
        for (title, counts) in &other.topics {
            let entry = self.topics.entry(title.clone()).or_default();
            entry.negative += counts.negative;
            entry.neutral += counts.neutral;
        }
        self.total_negative += other.total_negative;
        self.total_neutral += other.total_neutral;
        self.total += other.total;
    }

    /// Share of negative records among the classified (non-Unknown) ones.
    pub fn negative_ratio(&self) -> f64 {
        let classified = self.total_negative + self.total_neutral;
        if classified == 0 {
            0.0
        } else {
            self.total_negative as f64 / classified as f64
        }
    }
}
