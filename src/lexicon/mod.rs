//! Lexicon store: urgency vocabulary, financial stems and the per-role action table.
//!
//! Built once at startup and handed to the feature extractor; never mutated afterwards.

mod tables;

pub use tables::{FINANCE_ROLE, FINANCIAL_WORDS, ROLE_ACTIONS, URGENT_PHRASES, URGENT_WORDS};

use rust_stemmers::{Algorithm, Stemmer};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

pub struct Lexicon {
    urgent_words: HashSet<String>,
    urgent_phrases: Vec<String>,
    fin_stems: Vec<String>,
    /// Role -> stemmed expected actions. Only the keys take part in scoring.
    role_actions: BTreeMap<String, Vec<String>>,
    stemmer: Stemmer,
}

impl Lexicon {
    /// Build from the built-in tables.
    pub fn new() -> Self {
        let stemmer = Stemmer::create(Algorithm::English);
        let stem_all =
            |words: &[&str]| -> Vec<String> { words.iter().map(|w| stemmer.stem(w).into_owned()).collect() };

        let fin_stems = stem_all(FINANCIAL_WORDS);
        let role_actions = ROLE_ACTIONS
            .iter()
            .map(|(role, actions)| (role.to_string(), stem_all(*actions)))
            .collect();

        Self {
            urgent_words: URGENT_WORDS.iter().map(|w| w.to_string()).collect(),
            urgent_phrases: URGENT_PHRASES.iter().map(|p| p.to_string()).collect(),
            fin_stems,
            role_actions,
            stemmer,
        }
    }

    /// Reduce a (lower-cased) word to its root.
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }

    pub fn is_urgent_word(&self, word: &str) -> bool {
        self.urgent_words.contains(word)
    }

    pub fn urgent_phrases(&self) -> &[String] {
        &self.urgent_phrases
    }

    pub fn is_financial_stem(&self, stem: &str) -> bool {
        self.fin_stems.iter().any(|s| s == stem)
    }

    /// Stemmed financial words, in seed order.
    pub fn fin_stems(&self) -> &[String] {
        &self.fin_stems
    }

    pub fn is_known_role(&self, role: &str) -> bool {
        self.role_actions.contains_key(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.role_actions.keys().map(String::as_str)
    }

    /// Per-role action stems. Defined, but the role mismatch signal consults
    /// only the financial stems.
    pub fn dormant_role_actions(&self) -> &BTreeMap<String, Vec<String>> {
        &self.role_actions
    }

    /// Hex SHA-256 over every table in canonical order. Stored in the model bundle so a
    /// server refuses a model trained against different vocabulary.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        let mut words: Vec<&String> = self.urgent_words.iter().collect();
        words.sort();
        hasher.update(b"urgent_words\0");
        for w in words {
            hasher.update(w.as_bytes());
            hasher.update(b"\n");
        }

        hasher.update(b"urgent_phrases\0");
        for p in &self.urgent_phrases {
            hasher.update(p.as_bytes());
            hasher.update(b"\n");
        }

        hasher.update(b"fin_stems\0");
        for s in &self.fin_stems {
            hasher.update(s.as_bytes());
            hasher.update(b"\n");
        }

        hasher.update(b"role_actions\0");
        for (role, actions) in &self.role_actions {
            hasher.update(role.as_bytes());
            hasher.update(b":");
            hasher.update(actions.join(",").as_bytes());
            hasher.update(b"\n");
        }

        hex::encode(hasher.finalize())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("urgent_words", &self.urgent_words.len())
            .field("urgent_phrases", &self.urgent_phrases.len())
            .field("fin_stems", &self.fin_stems)
            .field("roles", &self.role_actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
