use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single citizen complaint as uploaded, before any processing.
/// The raw text is kept verbatim for storage and audit; normalization
/// always works on a derived copy.
#[derive(Debug, Clone, Deserialize)]
pub struct RawComplaint {
    #[serde(rename = "keluhan")]
    pub text: String,
    #[serde(rename = "tanggal_keluhan", default, deserialize_with = "parse_date")]
    pub submitted_at: Option<NaiveDateTime>,
}

fn parse_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok().or_else(|| {
            chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    }))
}

/// Sentiment classes modeled in this domain. There is no positive class:
/// the deployed classifier only ever distinguishes complaints that are
/// negative from those that are neutral. `Unknown` is the explicit mapping
/// for unrecognized classifier output or an unavailable classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "negatif")]
    Negative,
    #[serde(rename = "netral")]
    Neutral,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SentimentLabel {
    /// Map the raw string a pretrained classifier emits onto a label.
    /// Anything outside the two known classes becomes `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "negatif" => SentimentLabel::Negative,
            "netral" => SentimentLabel::Neutral,
            _ => SentimentLabel::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "Negatif",
            SentimentLabel::Neutral => "Netral",
            SentimentLabel::Unknown => "Unknown",
        }
    }
}

/// One fully classified complaint, ready for display or aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedComplaint {
    pub submitted_at: Option<NaiveDateTime>,
    pub text: String,
    pub tokens: Vec<String>,
    pub sentiment: SentimentLabel,
    pub topic_title: String,
    pub institutions: Vec<String>,
}
