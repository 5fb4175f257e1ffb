use std::sync::Arc;

use regex::Regex;

use crate::lexicon::Lexicon;
use crate::stemmer::IndonesianStemmer;

/// Output of the normalizer: a token sequence when tokenization is on,
/// otherwise the single space-joined string. Both forms are convertible.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Tokens(Vec<String>),
    Joined(String),
}

impl Normalized {
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            Normalized::Tokens(tokens) => tokens,
            Normalized::Joined(text) => {
                if text.is_empty() {
                    Vec::new()
                } else {
                    text.split_whitespace().map(str::to_string).collect()
                }
            }
        }
    }

    pub fn into_joined(self) -> String {
        match self {
            Normalized::Tokens(tokens) => tokens.join(" "),
            Normalized::Joined(text) => text,
        }
    }
}

/// Deterministic multi-stage text normalizer. Stage order is fixed:
/// casefold, HTML/URL removal, emoji removal, whitespace collapse,
/// character cleaning, dictionary normalization, English stopwords,
/// Indonesian stopwords, manual exclusions, stemming, tokenization.
/// All regexes are compiled once at construction.
pub struct TextPreprocessor {
    lexicon: Arc<Lexicon>,
    stemmer: IndonesianStemmer,
    do_stemming: bool,
    do_tokens: bool,
    re_anchor: Regex,
    re_url: Regex,
    re_emoji: Regex,
    re_linebreak: Regex,
    re_whitespace: Regex,
    re_non_alnum: Regex,
    re_single_letter: Regex,
    re_digit_token: Regex,
}

impl TextPreprocessor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        TextPreprocessor {
            lexicon,
            stemmer: IndonesianStemmer::new(),
            do_stemming: true,
            do_tokens: true,
            re_anchor: Regex::new(r#"(?i)<a\s+href="[^"]+"[^>]*>(.*?)</a>"#).unwrap(),
            re_url: Regex::new(r"https?://\S+").unwrap(),
            re_emoji: Regex::new(
                "[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}\
                 \u{1F1E0}-\u{1F1FF}\u{2702}-\u{27B0}\u{24C2}-\u{1F251}]+",
            )
            .unwrap(),
            re_linebreak: Regex::new(r"<br\s*/?>").unwrap(),
            re_whitespace: Regex::new(r"\s+").unwrap(),
            re_non_alnum: Regex::new(r"[^a-zA-Z0-9\s]").unwrap(),
            re_single_letter: Regex::new(r"\b[a-zA-Z]\b").unwrap(),
            re_digit_token: Regex::new(r"\b\w*\d\w*\b").unwrap(),
        }
    }

    pub fn with_stemming(mut self, do_stemming: bool) -> Self {
        self.do_stemming = do_stemming;
        self
    }

    pub fn with_tokens(mut self, do_tokens: bool) -> Self {
        self.do_tokens = do_tokens;
        self
    }

    /// Normalize a batch, one output per input, in order.
    pub fn transform(&self, texts: &[String]) -> Vec<Normalized> {
        texts.iter().map(|t| self.normalize(t)).collect()
    }

    /// Normalize a single text. Never fails: text that cleans down to
    /// nothing yields an empty token sequence.
    pub fn normalize(&self, text: &str) -> Normalized {
        let cleaned = self.preprocess_text(text);
        if self.do_tokens {
            let tokens = if cleaned.is_empty() {
                Vec::new()
            } else {
                cleaned.split_whitespace().map(str::to_string).collect()
            };
            Normalized::Tokens(tokens)
        } else {
            Normalized::Joined(cleaned)
        }
    }

    /// Convenience: tokens regardless of the tokenize flag.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.normalize(text).into_tokens()
    }

    fn preprocess_text(&self, text: &str) -> String {
        // Casefolding
        let text = text.to_lowercase();

        // Cleaning
        let text = self.remove_html(&text);
        let text = self.remove_emoji(&text);
        let text = self.clean_space(&text);
        let text = self.complete_clean(&text);

        // Normalize
        let text = self.normalize_words(&text);

        // Remove stopwords
        let text = self.filter_words(&text, |w| !self.lexicon.is_stopword_en(w));
        let text = self.filter_words(&text, |w| !self.lexicon.is_stopword_id(w));
        let text = self.filter_words(&text, |w| !self.lexicon.is_excluded(w));

        // Stemming
        if self.do_stemming {
            self.stem_text(&text)
        } else {
            text
        }
    }

    fn remove_html(&self, text: &str) -> String {
        let text = self.re_anchor.replace_all(text, "$1");
        self.re_url.replace_all(&text, "").into_owned()
    }

    fn remove_emoji(&self, text: &str) -> String {
        self.re_emoji.replace_all(text, "").into_owned()
    }

    fn clean_space(&self, text: &str) -> String {
        let text = self.re_linebreak.replace_all(text, " ");
        self.re_whitespace.replace_all(&text, " ").trim().to_string()
    }

    fn complete_clean(&self, text: &str) -> String {
        let text = self.re_non_alnum.replace_all(text, " ");
        let text = self.re_single_letter.replace_all(&text, " ");
        let text = self.re_digit_token.replace_all(&text, " ");
        self.re_whitespace.replace_all(&text, " ").trim().to_string()
    }

    fn normalize_words(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|w| self.lexicon.normalize_word(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn filter_words<F: Fn(&str) -> bool>(&self, text: &str, keep: F) -> String {
        text.split_whitespace()
            .filter(|w| keep(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn stem_text(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|w| self.stemmer.stem(w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor() -> TextPreprocessor {
        TextPreprocessor::new(Arc::new(Lexicon::new()))
    }

    #[test]
    fn empty_input_yields_empty_tokens() {
        let p = preprocessor();
        assert_eq!(p.tokens(""), Vec::<String>::new());
        assert_eq!(p.tokens("   \n\t "), Vec::<String>::new());
    }

    #[test]
    fn urls_emoji_punctuation_removed() {
        let p = preprocessor();
        let tokens = p.tokens("Jalan rusak parah!! \u{1F621} http://x.co");
        assert_eq!(tokens, vec!["jalan", "rusak", "parah"]);
    }

    #[test]
    fn anchor_tags_keep_label() {
        let p = preprocessor();
        let tokens = p.tokens(r#"lihat <a href="https://contoh.id" target="_blank">jalan rusak</a>"#);
        assert!(tokens.contains(&"jalan".to_string()));
        assert!(tokens.contains(&"rusak".to_string()));
        assert!(!tokens.iter().any(|t| t.contains("contoh")));
        assert!(!tokens.iter().any(|t| t.contains("href")));
    }

    #[test]
    fn output_alphabet_is_lowercase_alnum() {
        let p = preprocessor();
        let tokens = p.tokens("Lampu2 PJU di Jl. Ahmad-Yani MATI total!!! <br> knp ya???");
        for token in &tokens {
            assert!(
                token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "bad token: {token}"
            );
            assert!(token.len() >= 2, "single-letter token survived: {token}");
        }
    }

    #[test]
    fn digit_tokens_and_single_letters_dropped() {
        let p = preprocessor();
        let tokens = p.tokens("jalan no5 rt03 q rusak");
        assert_eq!(tokens, vec!["jalan", "rusak"]);
    }

    #[test]
    fn dictionary_normalization_applies() {
        let mut lexicon = Lexicon::new();
        lexicon.insert_normalization("rsk", "rusak");
        let p = TextPreprocessor::new(Arc::new(lexicon));
        let tokens = p.tokens("jalan rsk parah");
        assert_eq!(tokens, vec!["jalan", "rusak", "parah"]);
    }

    #[test]
    fn stopwords_removed_both_languages() {
        let p = preprocessor();
        let tokens = p.tokens("the jalan dan rusak di kota");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"dan".to_string()));
        assert!(tokens.contains(&"jalan".to_string()));
        assert!(tokens.contains(&"rusak".to_string()));
    }

    #[test]
    fn manual_exclusions_removed() {
        let p = preprocessor();
        let tokens = p.tokens("wkwk jalan rusak yang parah");
        assert_eq!(tokens, vec!["jalan", "rusak", "parah"]);
    }

    #[test]
    fn stemming_reduces_derived_forms() {
        let p = preprocessor();
        let tokens = p.tokens("kerusakan jalan perbaikan");
        assert_eq!(tokens, vec!["rusak", "jalan", "baik"]);
    }

    #[test]
    fn stemming_can_be_disabled() {
        let p = preprocessor().with_stemming(false);
        let tokens = p.tokens("kerusakan jalan");
        assert_eq!(tokens, vec!["kerusakan", "jalan"]);
    }

    #[test]
    fn joined_output_round_trips_to_tokens() {
        let p = preprocessor().with_tokens(false);
        let joined = p.normalize("jalan rusak parah");
        assert_eq!(joined.clone().into_joined(), "jalan rusak parah");
        assert_eq!(joined.into_tokens(), vec!["jalan", "rusak", "parah"]);
    }

    #[test]
    fn batch_transform_preserves_order_and_length() {
        let p = preprocessor();
        let outputs = p.transform(&[
            "jalan rusak".to_string(),
            String::new(),
            "lampu mati".to_string(),
        ]);
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[1].clone().into_tokens(), Vec::<String>::new());
    }
}
