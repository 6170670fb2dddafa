//! Feature extraction: body + role → normalized words → urgency, financial intent, role mismatch.
//!
//! Training and inference both go through [`FeatureExtractor::extract`]; there is no
//! other path to a [`FeatureVector`].

use super::text::{normalize, words};
use super::{EmailSample, FeatureVector};
use crate::error::ErrorKind;
use crate::lexicon::{Lexicon, FINANCE_ROLE};
use std::sync::Arc;

/// Emails this short get one extra urgency hit.
const SHORT_EMAIL_MAX_WORDS: usize = 8;

/// Features plus the non-fatal conditions met while computing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub features: FeatureVector,
    pub notes: Vec<ErrorKind>,
}

#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    lexicon: Arc<Lexicon>,
}

impl FeatureExtractor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn extract(&self, sample: &EmailSample) -> FeatureVector {
        let text = normalize(&sample.body);
        let words = words(&text);
        FeatureVector {
            urgency_score: self.urgency_of(&text, &words),
            financial_intent: self.fin_intent_of(&words),
            role_mismatch: self.mismatch_of(&words, &sample.sender_role),
        }
    }

    /// Like [`extract`](Self::extract), also reporting an empty body or unknown role.
    pub fn inspect(&self, sample: &EmailSample) -> Extraction {
        let features = self.extract(sample);
        let mut notes = Vec::new();
        if words(&normalize(&sample.body)).is_empty() {
            notes.push(ErrorKind::EmptyBody);
        }
        if !self.lexicon.is_known_role(&sample.sender_role) {
            tracing::debug!(sender_role = %sample.sender_role, "unrecognized sender role; role_mismatch = 0");
            notes.push(ErrorKind::UnrecognizedRole);
        }
        Extraction { features, notes }
    }

    /// Urgent words + urgent phrases (+1 for short emails), per word.
    pub fn compute_urgency_score(&self, body: &str) -> f64 {
        let text = normalize(body);
        self.urgency_of(&text, &words(&text))
    }

    /// Share of words whose stem is financial.
    pub fn fin_intent(&self, body: &str) -> f64 {
        self.fin_intent_of(&words(&normalize(body)))
    }

    /// 1 if a known role other than Finance uses any financial word.
    pub fn role_action_mismatch(&self, body: &str, sender_role: &str) -> u8 {
        self.mismatch_of(&words(&normalize(body)), sender_role)
    }

    fn urgency_of(&self, text: &str, words: &[&str]) -> f64 {
        if words.is_empty() {
            return 0.0;
        }
        let word_hits = words.iter().filter(|w| self.lexicon.is_urgent_word(w)).count();
        let phrase_hits = self
            .lexicon
            .urgent_phrases()
            .iter()
            .filter(|p| text.contains(p.as_str()))
            .count();
        let mut hits = word_hits + phrase_hits;
        if words.len() <= SHORT_EMAIL_MAX_WORDS {
            hits += 1;
        }
        hits as f64 / words.len() as f64
    }

    fn fin_intent_of(&self, words: &[&str]) -> f64 {
        if words.is_empty() {
            return 0.0;
        }
        let hits = words
            .iter()
            .filter(|w| self.lexicon.is_financial_stem(&self.lexicon.stem(w)))
            .count();
        hits as f64 / words.len() as f64
    }

    // The per-role action table is not consulted here; only financial vocabulary
    // from a non-Finance sender counts.
    fn mismatch_of(&self, words: &[&str], sender_role: &str) -> u8 {
        if !self.lexicon.is_known_role(sender_role) || sender_role == FINANCE_ROLE {
            return 0;
        }
        let financial = words
            .iter()
            .any(|w| self.lexicon.is_financial_stem(&self.lexicon.stem(w)));
        u8::from(financial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(Arc::new(Lexicon::new()))
    }

    #[test]
    fn empty_body_yields_zero_features() {
        let fx = extractor();
        for role in ["Finance", "HR", "Intern", ""] {
            let fv = fx.extract(&EmailSample::new("", role));
            assert_eq!(fv, FeatureVector::default());
            let fv = fx.extract(&EmailSample::new("  ., ", role));
            assert_eq!(fv, FeatureVector::default());
        }
    }

    #[test]
    fn short_email_gets_structural_bonus() {
        let fx = extractor();
        // "reminder:" keeps its colon
        let score = fx.compute_urgency_score("Reminder: team meeting today");
        // "today" is an urgent word: (1 + 1 bonus) / 4
        assert!((score - 0.5).abs() < 1e-12);

        let score = fx.compute_urgency_score("Please review the attached notes");
        assert!((score - 1.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn structural_bonus_stops_after_eight_words() {
        let fx = extractor();
        let eight = "please review the attached notes before our call";
        assert_eq!(words(eight).len(), SHORT_EMAIL_MAX_WORDS);
        assert!((fx.compute_urgency_score(eight) - 1.0 / 8.0).abs() < 1e-12);

        let nine = "please review the attached notes before our next call";
        assert_eq!(words(nine).len(), SHORT_EMAIL_MAX_WORDS + 1);
        assert_eq!(fx.compute_urgency_score(nine), 0.0);
    }

    #[test]
    fn long_email_counts_words_and_phrases() {
        let fx = extractor();
        let body = "Hello team, this is an urgent matter and immediate action required \
                    so please respond immediately to the note below";
        // words: urgent, immediately -> 2; phrases: urgent matter, immediate action required,
        // respond immediately -> 3
        let n = words(&normalize(body)).len();
        assert!(n > SHORT_EMAIL_MAX_WORDS);
        let score = fx.compute_urgency_score(body);
        assert!((score - 5.0 / n as f64).abs() < 1e-12);
    }

    #[test]
    fn financial_intent_is_share_of_words() {
        let fx = extractor();
        let fi = fx.fin_intent("Send the invoices and bank transactions");
        // invoices, bank, transactions out of 6 words
        assert!((fi - 3.0 / 6.0).abs() < 1e-12);
        assert_eq!(fx.fin_intent("lunch is on me"), 0.0);
    }

    #[test]
    fn mismatch_only_for_known_non_finance_roles() {
        let fx = extractor();
        let body = "Please transfer funds urgently";
        assert_eq!(fx.role_action_mismatch(body, "HR"), 1);
        assert_eq!(fx.role_action_mismatch(body, "Engineer"), 1);
        assert_eq!(fx.role_action_mismatch(body, "Manager"), 1);
        assert_eq!(fx.role_action_mismatch(body, "Finance"), 0);
        assert_eq!(fx.role_action_mismatch(body, "CEO"), 0);
        assert_eq!(fx.role_action_mismatch(body, "hr"), 0);
        assert_eq!(fx.role_action_mismatch("deploy the build", "HR"), 0);
    }

    #[test]
    fn extraction_is_idempotent() {
        let fx = extractor();
        let s = EmailSample::new("Urgent: wire the payment to this account now.", "Engineer");
        assert_eq!(fx.extract(&s), fx.extract(&s));
        assert_eq!(fx.extract(&s).urgency_score, fx.compute_urgency_score(&s.body));
        assert_eq!(fx.extract(&s).financial_intent, fx.fin_intent(&s.body));
        assert_eq!(
            fx.extract(&s).role_mismatch,
            fx.role_action_mismatch(&s.body, &s.sender_role)
        );
    }

    #[test]
    fn inspect_reports_non_fatal_conditions() {
        let fx = extractor();
        let e = fx.inspect(&EmailSample::new("", "Contractor"));
        assert_eq!(e.notes, vec![ErrorKind::EmptyBody, ErrorKind::UnrecognizedRole]);
        let e = fx.inspect(&EmailSample::new("see you at the meeting", "Manager"));
        assert!(e.notes.is_empty());
    }
}
