//! Read-only travel knowledge base.
//!
//! Loaded once at startup from a JSON file shaped like:
//!
//! ```json
//! {
//!   "faqs": { "visa": "...", "currency": "...", ... },
//!   "itineraries": { "1_day_kigali": ["...", "..."], ... },
//!   "highlights": [ { "title": "...", "desc": "...", "tips": ["..."] } ]
//! }
//! ```
//!
//! FAQ key order is kept exactly as written in the file; the resolver walks the
//! topics in that order. The loaded value is never mutated and is shared behind an `Arc`.

mod validate;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// FAQ topics the resolver can answer with.
pub const REQUIRED_FAQ_TOPICS: [&str; 8] = [
    "visa",
    "currency",
    "best_time",
    "safety",
    "health",
    "sim",
    "transport",
    "permits",
];

/// Itinerary keys the resolver formats.
pub const ITINERARY_KEYS: [&str; 3] = ["1_day_kigali", "3_days_adventure", "7_days_grand"];

/// Substrings that must each appear in exactly one highlight title.
pub const HIGHLIGHT_ANCHORS: [&str; 5] = ["Volcanoes", "Akagera", "Nyungwe", "Kivu", "Genocide"];

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed knowledge data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("faq topic `{0}` is missing")]
    MissingFaq(String),
    #[error("itinerary `{0}` is missing")]
    MissingItinerary(String),
    #[error("itinerary `{0}` has no steps")]
    EmptyItinerary(String),
    #[error("no highlight title contains `{0}`")]
    MissingHighlight(String),
    #[error("{count} highlight titles contain `{anchor}`, expected exactly one")]
    AmbiguousHighlight { anchor: String, count: usize },
}

/// A featured place shown on the page and quoted by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// On-disk shape of the knowledge file.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(deserialize_with = "ordered_entries")]
    faqs: Vec<(String, String)>,
    itineraries: HashMap<String, Vec<String>>,
    highlights: Vec<Highlight>,
}

/// Immutable knowledge base: FAQ answers, itineraries and highlights.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    faqs: Vec<(String, String)>,
    itineraries: HashMap<String, Vec<String>>,
    highlights: Vec<Highlight>,
}

impl KnowledgeBase {
    /// Reads and validates the knowledge file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            faqs = kb.faqs.len(),
            itineraries = kb.itineraries.len(),
            highlights = kb.highlights.len(),
            "knowledge base loaded"
        );
        Ok(kb)
    }

    /// Parses and validates knowledge JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, KnowledgeError> {
        let file: KnowledgeFile = serde_json::from_str(raw)?;
        Self::from_parts(file.faqs, file.itineraries, file.highlights)
    }

    /// Builds a knowledge base from already-parsed parts. FAQ order is preserved.
    pub fn from_parts(
        faqs: Vec<(String, String)>,
        itineraries: HashMap<String, Vec<String>>,
        highlights: Vec<Highlight>,
    ) -> Result<Self, KnowledgeError> {
        let kb = Self {
            faqs,
            itineraries,
            highlights,
        };
        validate::check(&kb)?;
        Ok(kb)
    }

    /// FAQ `(topic, answer)` pairs in file order.
    pub fn faqs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.faqs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Answer for a single FAQ topic.
    pub fn faq(&self, topic: &str) -> Option<&str> {
        self.faqs
            .iter()
            .find(|(k, _)| k == topic)
            .map(|(_, v)| v.as_str())
    }

    /// Ordered steps of the itinerary stored under `key`.
    pub fn itinerary(&self, key: &str) -> Option<&[String]> {
        self.itineraries.get(key).map(Vec::as_slice)
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// First highlight whose title contains `anchor` (case-sensitive).
    pub fn highlight_by_anchor(&self, anchor: &str) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.title.contains(anchor))
    }
}

/// Deserializes a JSON object into `(key, value)` pairs, keeping document order.
/// Duplicate keys are rejected.
fn ordered_entries<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping topic to answer text")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries: Vec<(String, String)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, String>()? {
                if entries.iter().any(|(k, _)| *k == key) {
                    return Err(de::Error::custom(format!("duplicate faq topic `{}`", key)));
                }
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Knowledge JSON used across the crate's tests. FAQ keys in the shipped order.
    pub(crate) const SAMPLE_KNOWLEDGE: &str = r#"{
        "faqs": {
            "visa": "VISA ANSWER",
            "currency": "CURRENCY ANSWER",
            "best_time": "BEST TIME ANSWER",
            "safety": "SAFETY ANSWER",
            "health": "HEALTH ANSWER",
            "sim": "SIM ANSWER",
            "transport": "TRANSPORT ANSWER",
            "permits": "PERMITS ANSWER"
        },
        "itineraries": {
            "1_day_kigali": ["Kigali Genocide Memorial", "Kimironko Market", "Inema Arts Center"],
            "3_days_adventure": ["Day 1: Drive to Musanze", "Day 2: Gorilla trek", "Day 3: Twin Lakes"],
            "7_days_grand": ["Kigali", "Volcanoes", "Lake Kivu", "Nyungwe", "Akagera"]
        },
        "highlights": [
            { "title": "Volcanoes National Park", "desc": "Home of mountain gorillas.", "tips": ["Book permits early", "Bring gloves"] },
            { "title": "Akagera National Park", "desc": "Savannah safari.", "tips": ["Self-drive is possible"] },
            { "title": "Nyungwe Forest", "desc": "Ancient rainforest.", "tips": ["Canopy walk at dawn", "Rain jacket"] },
            { "title": "Lake Kivu", "desc": "Great lakes beaches.", "tips": ["Boat to Napoleon Island"] },
            { "title": "Kigali Genocide Memorial", "desc": "Place of remembrance.", "tips": ["Allow two hours", "Dress respectfully"] }
        ]
    }"#;

    pub(crate) fn sample_kb() -> KnowledgeBase {
        KnowledgeBase::from_json_str(SAMPLE_KNOWLEDGE).unwrap()
    }

    #[test]
    fn faq_order_follows_file_order() {
        let kb = sample_kb();
        let keys: Vec<&str> = kb.faqs().map(|(k, _)| k).collect();
        assert_eq!(keys, REQUIRED_FAQ_TOPICS.to_vec());
    }

    #[test]
    fn faq_order_is_not_alphabetized() {
        let raw = SAMPLE_KNOWLEDGE
            .replace(r#""visa": "VISA ANSWER","#, "")
            .replace(
                r#""currency": "CURRENCY ANSWER","#,
                r#""currency": "CURRENCY ANSWER", "visa": "VISA ANSWER","#,
            );
        let kb = KnowledgeBase::from_json_str(&raw).unwrap();
        let first = kb.faqs().next().unwrap();
        assert_eq!(first, ("currency", "CURRENCY ANSWER"));
    }

    #[test]
    fn lookups() {
        let kb = sample_kb();
        assert_eq!(kb.faq("sim"), Some("SIM ANSWER"));
        assert_eq!(kb.faq("nightlife"), None);
        assert_eq!(kb.itinerary("3_days_adventure").unwrap().len(), 3);
        assert_eq!(kb.highlight_by_anchor("Kivu").unwrap().title, "Lake Kivu");
        assert_eq!(kb.highlights().len(), 5);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_KNOWLEDGE.as_bytes()).unwrap();
        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb.faq("visa"), Some("VISA ANSWER"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBase::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, KnowledgeError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = KnowledgeBase::from_json_str("{ \"faqs\": [").unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn duplicate_faq_topic_is_rejected() {
        let raw = SAMPLE_KNOWLEDGE.replace(
            r#""visa": "VISA ANSWER","#,
            r#""visa": "VISA ANSWER", "visa": "OTHER","#,
        );
        let err = KnowledgeBase::from_json_str(&raw).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse(_)));
        assert!(err.to_string().contains("duplicate faq topic"));
    }

    #[test]
    fn highlight_tips_default_to_empty() {
        let h: Highlight = serde_json::from_str(r#"{ "title": "Lake Kivu", "desc": "Beaches." }"#).unwrap();
        assert!(h.tips.is_empty());
    }
}
