use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topic::dominant_topic;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read topic catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse topic catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub const UNKNOWN_TOPIC_TITLE: &str = "Topik Tidak Diketahui";

/// Human-readable topic title plus the institutions that own it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicLabel {
    pub title: String,
    pub institutions: Vec<String>,
}

impl TopicLabel {
    /// Sentinel for topics outside the catalog. Lookup misses are a
    /// recoverable condition, never an error.
    pub fn unknown() -> Self {
        TopicLabel {
            title: UNKNOWN_TOPIC_TITLE.to_string(),
            institutions: Vec::new(),
        }
    }
}

/// Static 1-based mapping from topic index to title and institutions.
/// Loaded once at startup and never mutated; the topic model's vector
/// indices are 0-based, so every lookup goes through `resolve`, which owns
/// the +1 re-indexing.
pub struct TopicCatalog {
    entries: HashMap<usize, TopicLabel>,
}

impl TopicCatalog {
    pub fn new(entries: HashMap<usize, TopicLabel>) -> Self {
        TopicCatalog { entries }
    }

    /// JSON override file: `{ "1": { "title": ..., "institutions": [...] }, ... }`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let entries: HashMap<usize, TopicLabel> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(TopicCatalog::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog entry for a 1-based topic index.
    pub fn get(&self, index: usize) -> Option<&TopicLabel> {
        self.entries.get(&index)
    }

    /// Resolve a topic vector to its label: 0-based argmax, then the
    /// 1-based catalog lookup. Misses return the sentinel label.
    pub fn resolve(&self, topic_vector: &[f64]) -> TopicLabel {
        let dominant = dominant_topic(topic_vector);
        self.get(dominant + 1).cloned().unwrap_or_else(TopicLabel::unknown)
    }
}

impl Default for TopicCatalog {
    fn default() -> Self {
        let entries = DEFAULT_CATALOG
            .iter()
            .map(|(index, title, institutions)| {
                (
                    *index,
                    TopicLabel {
                        title: title.to_string(),
                        institutions: institutions.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect();
        TopicCatalog::new(entries)
    }
}

/// The 17 topics of the deployed model and their owning institutions.
const DEFAULT_CATALOG: &[(usize, &str, &[&str])] = &[
    (
        1,
        "Kualitas Pelayanan Masyarakat",
        &[
            "Dinas Kependudukan dan Pencatatan Sipil",
            "Dinas Perhubungan",
            "Dinas Sosial",
            "Dinas Pendidikan",
            "Dinas Lingkungan Hidup",
        ],
    ),
    (
        2,
        "Pengaduan dan Penyelesaian Keluhan",
        &["Dinas Komunikasi dan Informatika"],
    ),
    (
        3,
        "Masalah Lingkungan di Masyarakat",
        &["Dinas Lingkungan Hidup"],
    ),
    (
        4,
        "Proses Administrasi dan Informasi Publik",
        &[
            "Bagian Umum Protokol dan Komunikasi Pimpinan",
            "Dinas Komunikasi dan Informatika",
        ],
    ),
    (
        5,
        "Pelaporan dan Tindak Lanjut Masalah",
        &["Dinas Sosial", "Dinas Perhubungan"],
    ),
    (
        6,
        "Kerusakan Fasilitas dan Infrastruktur",
        &[
            "Bagian Pengadaan Barang/Jasa dan Administrasi Pembangunan",
            "Dinas Perumahan Rakyat dan Kawasan Permukiman serta Pertanahan",
            "Dinas Sumber Daya Air dan Bina Marga",
        ],
    ),
    (7, "Pendidikan dan Sekolah", &["Dinas Pendidikan"]),
    (
        8,
        "Keluhan Kebutuhan Lapangan Pekerjaan",
        &["Dinas Perindustrian dan Tenaga Kerja"],
    ),
    (
        9,
        "Permohonan Perbaikan Dan Pembaharuan",
        &[
            "Bagian Pengadaan Barang/Jasa dan Administrasi Pembangunan",
            "Dinas Perumahan Rakyat dan Kawasan Permukiman serta Pertanahan",
        ],
    ),
    (
        10,
        "Lamanya Proses Pengajuan",
        &["Dinas Penanaman Modal dan Pelayanan Terpadu Satu Pintu"],
    ),
    (
        11,
        "Permintaan Dan Pendaftaran Administrasi",
        &["Dinas Komunikasi dan Informatika"],
    ),
    (
        12,
        "Durasi dan Efisiensi Layanan",
        &["Dinas Penanaman Modal dan Pelayanan Terpadu Satu Pintu"],
    ),
    (13, "Permasalahan Parkir", &["Dinas Perhubungan"]),
    (
        14,
        "Masalah Pohon dan Gangguan Lingkungan",
        &["Dinas Lingkungan Hidup"],
    ),
    (
        15,
        "Pemimpin Wilayah yang Bermasalah",
        &[
            "Badan Penanggulangan Bencana Daerah",
            "Dinas Lingkungan Hidup",
        ],
    ),
    (16, "Kondisi Fisik Lingkungan", &["Dinas Perhubungan"]),
    (
        17,
        "Permintaan Dan Pendaftaran",
        &["Dinas Kependudukan dan Pencatatan Sipil"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_seventeen_topics() {
        let catalog = TopicCatalog::default();
        assert_eq!(catalog.len(), 17);
        assert_eq!(
            catalog.get(7).map(|l| l.title.as_str()),
            Some("Pendidikan dan Sekolah")
        );
    }

    #[test]
    fn resolve_applies_plus_one_offset() {
        let catalog = TopicCatalog::default();
        // argmax index 1 (0-based) must hit catalog key 2.
        let label = catalog.resolve(&[0.1, 0.7, 0.2]);
        assert_eq!(label.title, "Pengaduan dan Penyelesaian Keluhan");
        assert_eq!(label.institutions, vec!["Dinas Komunikasi dan Informatika"]);
    }

    #[test]
    fn resolve_miss_returns_sentinel() {
        let catalog = TopicCatalog::default();
        // 18 topics in the vector, argmax at index 17 -> key 18: absent.
        let mut vector = vec![0.0; 18];
        vector[17] = 1.0;
        let label = catalog.resolve(&vector);
        assert_eq!(label, TopicLabel::unknown());
        assert!(label.institutions.is_empty());
    }

    #[test]
    fn resolve_tie_takes_first_index() {
        let catalog = TopicCatalog::default();
        let label = catalog.resolve(&[0.5, 0.5]);
        assert_eq!(label.title, "Kualitas Pelayanan Masyarakat");
    }

    #[test]
    fn zero_vector_resolves_to_first_topic_key() {
        // The all-zero fallback vector argmaxes to index 0, catalog key 1.
        let catalog = TopicCatalog::default();
        let label = catalog.resolve(&vec![0.0; 17]);
        assert_eq!(label.title, "Kualitas Pelayanan Masyarakat");
    }
}
