use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::warn;
use stop_words::{get, LANGUAGE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("failed to read normalization dictionary {path}: {source}")]
    DictionaryRead {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("normalization dictionary {path} is missing the '{column}' column")]
    MissingColumn { path: String, column: String },
}

/// Words removed from complaint text after stopword filtering. Curated by
/// hand from noise observed in the deployed corpus (chat filler, laughter,
/// clipped particles).
const MANUAL_EXCLUSIONS: &[&str] = &[
    "e", "kl", "hahaha", "nya", "dll", "mah", "kacau", "dah", "tt", "nge",
    "harieh", "an", "up", "hpp", "kah", "ma", "mpe", "as", "brics", "bkln",
    "bkalan", "brgak", "banngakak", "sih", "lah", "ke", "si", "nih",
    "aamiinn", "lha", "kok", "iya", "ajs", "ab", "ah", "ahh", "ahahaha",
    "ahelah", "altman", "alpenliebe", "alloh", "amir", "tts", "allahumma",
    "amatnape", "an", "alamakk", "amin", "with", "abcd", "aahhh", "wkwk", "yang",
];

/// Read-only word lists shared by the normalizer: the slang-normalization
/// dictionary, both stopword sets, and the manual exclusion list.
/// Loaded once at startup and shared via `Arc`; never mutated afterwards,
/// so concurrent readers need no synchronization.
pub struct Lexicon {
    normalization: HashMap<String, String>,
    stopwords_en: HashSet<String>,
    stopwords_id: HashSet<String>,
    exclusions: HashSet<String>,
}

impl Lexicon {
    /// Build a lexicon with an empty normalization dictionary. Stopword sets
    /// and the exclusion list are always available.
    pub fn new() -> Self {
        Lexicon {
            normalization: HashMap::new(),
            stopwords_en: get(LANGUAGE::English).into_iter().collect(),
            stopwords_id: get(LANGUAGE::Indonesian).into_iter().collect(),
            exclusions: MANUAL_EXCLUSIONS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Load the lexicon with the slang dictionary from a CSV file with
    /// `takbaku,baku` columns. A missing or unreadable file degrades to an
    /// empty dictionary with a warning, so normalization lookups become
    /// no-ops rather than failures.
    pub fn with_normalization_csv(path: &Path) -> Self {
        let mut lexicon = Lexicon::new();
        match load_normalization_csv(path) {
            Ok(map) => lexicon.normalization = map,
            Err(e) => warn!("could not load normalization dictionary: {e}"),
        }
        lexicon
    }

    /// Canonical spelling for a token, or the token itself on a miss.
    pub fn normalize_word<'a>(&'a self, word: &'a str) -> &'a str {
        self.normalization.get(word).map(String::as_str).unwrap_or(word)
    }

    pub fn is_stopword_en(&self, word: &str) -> bool {
        self.stopwords_en.contains(word)
    }

    pub fn is_stopword_id(&self, word: &str) -> bool {
        self.stopwords_id.contains(word)
    }

    pub fn is_excluded(&self, word: &str) -> bool {
        self.exclusions.contains(word)
    }

    pub fn normalization_len(&self) -> usize {
        self.normalization.len()
    }

    #[cfg(test)]
    pub fn insert_normalization(&mut self, from: &str, to: &str) {
        self.normalization.insert(from.to_string(), to.to_string());
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon::new()
    }
}

fn load_normalization_csv(path: &Path) -> Result<HashMap<String, String>, LexiconError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|source| LexiconError::DictionaryRead {
            path: path.display().to_string(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| LexiconError::DictionaryRead {
            path: path.display().to_string(),
            source,
        })?
        .clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LexiconError::MissingColumn {
                path: path.display().to_string(),
                column: name.to_string(),
            })
    };
    let takbaku = col("takbaku")?;
    let baku = col("baku")?;

    let mut map = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(|source| LexiconError::DictionaryRead {
            path: path.display().to_string(),
            source,
        })?;
        if let (Some(from), Some(to)) = (record.get(takbaku), record.get(baku)) {
            map.insert(from.to_string(), to.to_string());
        }
    }
    Ok(map)
}
