//! End-to-end pipeline scenarios: raw text through normalization, topic
//! inference, resolution and aggregation.

use std::collections::HashMap;
use std::sync::Arc;

use complaint_analyzer::catalog::{TopicCatalog, TopicLabel, UNKNOWN_TOPIC_TITLE};
use complaint_analyzer::lexicon::Lexicon;
use complaint_analyzer::models::SentimentLabel;
use complaint_analyzer::preprocess::TextPreprocessor;
use complaint_analyzer::report::AggregatedReport;
use complaint_analyzer::sentiment::{NaiveBayesModel, SentimentAnalyzer};
use complaint_analyzer::topic::{dominant_topic, LdaArtifact, TopicInferenceEngine, Vocabulary};

fn preprocessor() -> TextPreprocessor {
    TextPreprocessor::new(Arc::new(Lexicon::new()))
}

/// Two topics, roads vs. service queues, over a five-term vocabulary of
/// already-stemmed forms.
fn engine() -> TopicInferenceEngine {
    let vocabulary = Vocabulary::new(
        ["jalan", "rusak", "parah", "layan", "lambat"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    let model = LdaArtifact {
        num_topics: 2,
        alpha: vec![0.1, 0.1],
        topic_word: vec![
            vec![0.30, 0.30, 0.30, 0.05, 0.05],
            vec![0.05, 0.05, 0.05, 0.425, 0.425],
        ],
    };
    TopicInferenceEngine::new(vocabulary, Arc::new(model))
}

fn catalog() -> TopicCatalog {
    let mut entries = HashMap::new();
    entries.insert(
        1,
        TopicLabel {
            title: "Kerusakan Jalan".to_string(),
            institutions: vec!["Dinas Sumber Daya Air dan Bina Marga".to_string()],
        },
    );
    entries.insert(
        2,
        TopicLabel {
            title: "Pelayanan Lambat".to_string(),
            institutions: vec![
                "Dinas Penanaman Modal dan Pelayanan Terpadu Satu Pintu".to_string()
            ],
        },
    );
    TopicCatalog::new(entries)
}

fn analyzer() -> SentimentAnalyzer {
    let mut negatif = HashMap::new();
    negatif.insert("rusak".to_string(), -1.0);
    negatif.insert("parah".to_string(), -1.0);
    negatif.insert("lambat".to_string(), -1.0);
    let mut netral = HashMap::new();
    netral.insert("informasi".to_string(), -1.0);
    netral.insert("jadwal".to_string(), -1.0);

    let mut priors = HashMap::new();
    priors.insert("negatif".to_string(), -0.7);
    priors.insert("netral".to_string(), -0.7);
    let mut likelihoods = HashMap::new();
    likelihoods.insert("negatif".to_string(), negatif);
    likelihoods.insert("netral".to_string(), netral);

    SentimentAnalyzer::new(Box::new(NaiveBayesModel {
        class_log_priors: priors,
        word_log_likelihoods: likelihoods,
        unseen_log_likelihood: -10.0,
    }))
}

#[test]
fn raw_complaint_to_institution() {
    let p = preprocessor();
    let e = engine();
    let c = catalog();
    let a = analyzer();

    let raw = "Jalan rusak parah!! \u{1F621} http://x.co";
    let tokens = p.tokens(raw);
    assert_eq!(tokens, vec!["jalan", "rusak", "parah"]);

    let vector = e.transform_one(&tokens);
    let sum: f64 = vector.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert_eq!(dominant_topic(&vector), 0);

    let label = c.resolve(&vector);
    assert_eq!(label.title, "Kerusakan Jalan");
    assert_eq!(
        label.institutions,
        vec!["Dinas Sumber Daya Air dan Bina Marga"]
    );

    assert_eq!(a.classify(raw), SentimentLabel::Negative);
}

#[test]
fn batch_with_invalid_entry_scatters_back() {
    let e = engine();
    let batch = vec![
        None,
        Some(vec!["jalan".to_string(), "rusak".to_string()]),
    ];
    let vectors = e.transform(&batch);
    assert_eq!(vectors.len(), 2);
    assert!(vectors[0].iter().all(|&v| v == 0.0));
    assert!(vectors[1].iter().any(|&v| v > 0.0));
}

#[test]
fn unknown_topic_resolves_to_sentinel() {
    let c = catalog();
    // Three-topic vector against a two-entry catalog: argmax 2 -> key 3.
    let label = c.resolve(&[0.1, 0.2, 0.7]);
    assert_eq!(label.title, UNKNOWN_TOPIC_TITLE);
    assert!(label.institutions.is_empty());
}

#[test]
fn aggregation_matches_between_batch_and_streaming() {
    let p = preprocessor();
    let e = engine();
    let c = catalog();
    let a = analyzer();

    let texts = [
        "jalan rusak parah di kampung kami",
        "pelayanan sangat lambat sekali",
        "jalan rusak lagi",
        "mohon informasi jadwal pelayanan",
    ];

    let classified: Vec<(String, SentimentLabel)> = texts
        .iter()
        .map(|t| {
            let tokens = p.tokens(t);
            let vector = e.transform_one(&tokens);
            (c.resolve(&vector).title, a.classify(t))
        })
        .collect();

    // Fold everything at once.
    let mut batch = AggregatedReport::new();
    for (title, label) in &classified {
        batch.fold(title, *label);
    }

    // Stream in two chunks, reversed, then merge.
    let mut first = AggregatedReport::new();
    for (title, label) in classified.iter().rev().take(2) {
        first.fold(title, *label);
    }
    let mut second = AggregatedReport::new();
    for (title, label) in classified.iter().rev().skip(2) {
        second.fold(title, *label);
    }
    first.merge(&second);

    assert_eq!(batch, first);
    assert_eq!(batch.total, 4);
    assert!(batch.total_negative >= 2);
}

#[test]
fn empty_and_unknown_text_degrades_gracefully() {
    let p = preprocessor();
    let e = engine();
    let c = catalog();

    let tokens = p.tokens("");
    assert!(tokens.is_empty());

    let vector = e.transform_one(&tokens);
    assert!(vector.iter().all(|&v| v == 0.0));

    // Zero vector argmaxes to index 0; key 1 exists here, so resolution
    // still returns a well-typed label rather than failing.
    let label = c.resolve(&vector);
    assert_eq!(label.title, "Kerusakan Jalan");
}
