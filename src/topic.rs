use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use counter::Counter;
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    ArtifactRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact {path}: {source}")]
    ArtifactParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("model artifact is inconsistent: {0}")]
    Inconsistent(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Term → id mapping built from the topic model's training corpus.
/// Tokens absent from the vocabulary contribute nothing to a document's
/// bag-of-words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Vocabulary { tokens, index }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::ArtifactRead {
            path: path.display().to_string(),
            source,
        })?;
        let vocab: Vocabulary =
            serde_json::from_str(&raw).map_err(|source| ModelError::ArtifactParse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Vocabulary::new(vocab.tokens))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Sparse term-frequency representation of a token sequence. Unknown
    /// terms are dropped silently; term ids come out in ascending order.
    pub fn doc2bow(&self, tokens: &[String]) -> Vec<(usize, usize)> {
        let counts: Counter<usize> = tokens
            .iter()
            .filter_map(|t| self.index.get(t.as_str()).copied())
            .collect();
        let mut bow: Vec<(usize, usize)> = counts.into_map().into_iter().collect();
        bow.sort_unstable_by_key(|&(id, _)| id);
        bow
    }
}

/// The fixed capability surface of a pretrained topic model: topic count
/// plus a per-document transform from bag-of-words to (topic, probability)
/// pairs. Everything downstream depends only on this trait, not on the
/// concrete artifact format.
pub trait TopicModel {
    fn num_topics(&self) -> usize;

    /// All topics with explicit probability for one document, including
    /// exact zeros. An empty bag-of-words yields no pairs.
    fn document_topics(&self, bow: &[(usize, usize)]) -> Result<Vec<(usize, f64)>, ModelError>;
}

/// Pretrained LDA artifact: the topic-word distribution and the Dirichlet
/// document-topic prior, estimated offline. Inference here is the
/// deterministic folding-in pass over a fixed model; no training happens
/// in this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdaArtifact {
    pub num_topics: usize,
    /// Per-topic pseudo-count prior (alpha), length = num_topics.
    pub alpha: Vec<f64>,
    /// topic_word[k][w] = p(term w | topic k); rows length = vocabulary size.
    pub topic_word: Vec<Vec<f64>>,
}

const FOLDING_ITERATIONS: usize = 50;
const FOLDING_TOLERANCE: f64 = 1e-6;

impl LdaArtifact {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::ArtifactRead {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: LdaArtifact =
            serde_json::from_str(&raw).map_err(|source| ModelError::ArtifactParse {
                path: path.display().to_string(),
                source,
            })?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.num_topics == 0 {
            return Err(ModelError::Inconsistent("num_topics is zero".to_string()));
        }
        if self.alpha.len() != self.num_topics {
            return Err(ModelError::Inconsistent(format!(
                "alpha has length {}, expected {}",
                self.alpha.len(),
                self.num_topics
            )));
        }
        if self.topic_word.len() != self.num_topics {
            return Err(ModelError::Inconsistent(format!(
                "topic_word has {} rows, expected {}",
                self.topic_word.len(),
                self.num_topics
            )));
        }
        let width = self.topic_word[0].len();
        if self.topic_word.iter().any(|row| row.len() != width) {
            return Err(ModelError::Inconsistent(
                "topic_word rows have unequal lengths".to_string(),
            ));
        }
        Ok(())
    }

    fn term_prob(&self, topic: usize, term: usize) -> Result<f64, ModelError> {
        self.topic_word[topic]
            .get(term)
            .copied()
            .ok_or_else(|| ModelError::Inference(format!("term id {term} outside model vocabulary")))
    }
}

impl TopicModel for LdaArtifact {
    fn num_topics(&self) -> usize {
        self.num_topics
    }

    fn document_topics(&self, bow: &[(usize, usize)]) -> Result<Vec<(usize, f64)>, ModelError> {
        if bow.is_empty() {
            return Ok(Vec::new());
        }

        let k = self.num_topics;
        let total: f64 = bow.iter().map(|&(_, n)| n as f64).sum();
        let alpha_sum: f64 = self.alpha.iter().sum();

        // Folding-in: iterate responsibilities against the fixed topic-word
        // distribution until the document-topic estimate stops moving.
        let mut theta = vec![1.0 / k as f64; k];
        for _ in 0..FOLDING_ITERATIONS {
            let mut expected = vec![0.0; k];
            for &(term, count) in bow {
                let mut resp = vec![0.0; k];
                let mut resp_sum = 0.0;
                for topic in 0..k {
                    let r = theta[topic] * self.term_prob(topic, term)?;
                    resp[topic] = r;
                    resp_sum += r;
                }
                if resp_sum <= 0.0 {
                    continue;
                }
                for topic in 0..k {
                    expected[topic] += count as f64 * resp[topic] / resp_sum;
                }
            }

            let denom = total + alpha_sum;
            let mut next = vec![0.0; k];
            let mut delta = 0.0f64;
            for topic in 0..k {
                next[topic] = (self.alpha[topic] + expected[topic]) / denom;
                delta = delta.max((next[topic] - theta[topic]).abs());
            }
            theta = next;
            if delta < FOLDING_TOLERANCE {
                break;
            }
        }

        // Renormalize away accumulated rounding so the dense vector sums to 1.
        let sum: f64 = theta.iter().sum();
        if sum <= 0.0 {
            return Err(ModelError::Inference(
                "document-topic estimate collapsed to zero".to_string(),
            ));
        }
        Ok(theta
            .into_iter()
            .enumerate()
            .map(|(topic, p)| (topic, p / sum))
            .collect())
    }
}

/// Batch topic inference: token sequences in, one dense probability vector
/// per input out, in input order. Invalid entries and inference failures
/// become zero vectors; errors are logged, never raised.
pub struct TopicInferenceEngine {
    vocabulary: Vocabulary,
    model: Arc<dyn TopicModel + Send + Sync>,
}

impl TopicInferenceEngine {
    pub fn new(vocabulary: Vocabulary, model: Arc<dyn TopicModel + Send + Sync>) -> Self {
        TopicInferenceEngine { vocabulary, model }
    }

    pub fn num_topics(&self) -> usize {
        self.model.num_topics()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// One vector per input, `None` entries included (as zero vectors).
    pub fn transform(&self, batch: &[Option<Vec<String>>]) -> Vec<Vec<f64>> {
        let num_topics = self.model.num_topics();
        let mut dense = vec![vec![0.0; num_topics]; batch.len()];

        // Collect valid entries with their original positions, process
        // densely, then scatter results back by index.
        let valid: Vec<(usize, Vec<(usize, usize)>)> = batch
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.as_ref().map(|tokens| (i, self.vocabulary.doc2bow(tokens))))
            .collect();

        for (original_idx, bow) in valid {
            match self.model.document_topics(&bow) {
                Ok(pairs) => {
                    for (topic, prob) in pairs {
                        if topic < num_topics {
                            dense[original_idx][topic] = prob;
                        }
                    }
                }
                Err(e) => {
                    // Total-failure fallback: the whole batch degrades to
                    // zero vectors and the caller learns out-of-band.
                    error!("topic inference failed, returning zero vectors: {e}");
                    return vec![vec![0.0; num_topics]; batch.len()];
                }
            }
        }

        dense
    }

    /// Topic vector for a single token sequence.
    pub fn transform_one(&self, tokens: &[String]) -> Vec<f64> {
        self.transform(&[Some(tokens.to_vec())])
            .into_iter()
            .next()
            .unwrap_or_else(|| vec![0.0; self.model.num_topics()])
    }
}

/// Index of the maximum entry, first occurrence winning ties. This is the
/// 0-based dominant topic; catalog lookups add 1.
pub fn dominant_topic(vector: &[f64]) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &v) in vector.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}
