use std::collections::HashMap;
use std::path::Path;

use log::{error, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::SentimentLabel;
use crate::topic::ModelError;

/// The fixed capability surface of a pretrained sentiment classifier:
/// raw text in, raw class string out.
pub trait SentimentModel {
    fn predict(&self, text: &str) -> Result<String, ModelError>;
}

/// Pretrained multinomial naive Bayes artifact. The classifier carries its
/// own minimal tokenization (lowercased `\w+` matches), deliberately
/// decoupled from the topic pipeline's normalizer: it was trained on text
/// prepared that way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    /// Class name -> log prior.
    pub class_log_priors: HashMap<String, f64>,
    /// Class name -> (word -> log likelihood).
    pub word_log_likelihoods: HashMap<String, HashMap<String, f64>>,
    /// Log likelihood for words unseen in training (Laplace floor).
    pub unseen_log_likelihood: f64,
}

impl NaiveBayesModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::ArtifactRead {
            path: path.display().to_string(),
            source,
        })?;
        let model: NaiveBayesModel =
            serde_json::from_str(&raw).map_err(|source| ModelError::ArtifactParse {
                path: path.display().to_string(),
                source,
            })?;
        if model.class_log_priors.is_empty() {
            return Err(ModelError::Inconsistent(
                "sentiment model has no classes".to_string(),
            ));
        }
        Ok(model)
    }
}

impl SentimentModel for NaiveBayesModel {
    fn predict(&self, text: &str) -> Result<String, ModelError> {
        let word_re = Regex::new(r"\w+").map_err(|e| ModelError::Inference(e.to_string()))?;
        let lowered = text.to_lowercase();
        let words: Vec<&str> = word_re.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut best: Option<(&str, f64)> = None;
        // Deterministic class order so exact score ties resolve stably.
        let mut classes: Vec<&String> = self.class_log_priors.keys().collect();
        classes.sort();

        for class in classes {
            let mut score = self.class_log_priors[class];
            let likelihoods = self.word_log_likelihoods.get(class);
            for word in &words {
                score += likelihoods
                    .and_then(|m| m.get(*word))
                    .copied()
                    .unwrap_or(self.unseen_log_likelihood);
            }
            if best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((class, score));
            }
        }

        best.map(|(class, _)| class.to_string())
            .ok_or_else(|| ModelError::Inference("no classes in sentiment model".to_string()))
    }
}

/// Wraps the pretrained classifier behind the label enum. Load failure
/// leaves the adapter in an explicit unavailable state: classification
/// degrades to `Unknown` instead of crashing the process.
pub struct SentimentAnalyzer {
    model: Option<Box<dyn SentimentModel + Send + Sync>>,
}

impl SentimentAnalyzer {
    pub fn new(model: Box<dyn SentimentModel + Send + Sync>) -> Self {
        SentimentAnalyzer { model: Some(model) }
    }

    /// Adapter with no backing model; every classification is `Unknown`.
    pub fn unavailable() -> Self {
        SentimentAnalyzer { model: None }
    }

    /// Load the artifact, degrading to the unavailable state on failure.
    pub fn load(path: &Path) -> Self {
        match NaiveBayesModel::load(path) {
            Ok(model) => SentimentAnalyzer::new(Box::new(model)),
            Err(e) => {
                warn!("sentiment model unavailable, classification degrades to Unknown: {e}");
                SentimentAnalyzer::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Classify raw, unnormalized text. Never fails: unrecognized raw
    /// output, prediction errors and an unavailable model all map to
    /// `Unknown`.
    pub fn classify(&self, text: &str) -> SentimentLabel {
        let Some(model) = &self.model else {
            return SentimentLabel::Unknown;
        };
        match model.predict(text) {
            Ok(raw) => SentimentLabel::from_raw(&raw),
            Err(e) => {
                error!("sentiment prediction failed: {e}");
                SentimentLabel::Unknown
            }
        }
    }
}
