//! Morphological normalization: resolve an inflected surface form to an
//! ordered list of plausible dictionary headwords.
//!
//! Three strategies feed the candidate list: an optional external
//! analyzer, a suffix-stripping rule cascade, and American/British
//! spelling variants of everything gathered so far. A fourth strategy,
//! the dictionary `exchange` field, lives in [`exchange`] and is
//! authoritative when a direct dictionary hit carries one.

use std::collections::HashSet;

pub mod analyzer;
pub mod exchange;
mod rules;
mod variants;

pub use analyzer::MorphAnalyzer;
pub use exchange::{exchange_lemma, parse_exchange};

pub struct Lemmatizer {
    analyzer: Option<Box<dyn MorphAnalyzer>>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self { analyzer: None }
    }

    pub fn with_analyzer(analyzer: Box<dyn MorphAnalyzer>) -> Self {
        Self {
            analyzer: Some(analyzer),
        }
    }

    /// Produce an ordered, deduplicated candidate list of headwords.
    ///
    /// The first element is always the lowercased input; generation
    /// order is preserved otherwise.
    pub fn lemmatize(&self, word: &str) -> Vec<String> {
        let lower = word.trim().to_lowercase();
        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<String> = Vec::new();
        push_unique(&mut out, &mut seen, lower.clone());

        if let Some(analyzer) = &self.analyzer {
            for guess in [
                analyzer.noun(&lower),
                analyzer.verb(&lower),
                analyzer.adjective(&lower),
            ]
            .into_iter()
            .flatten()
            {
                if guess != lower {
                    push_unique(&mut out, &mut seen, guess);
                }
            }
        }

        for stem in rules::cascade(&lower) {
            push_unique(&mut out, &mut seen, stem);
        }

        // Spelling variants of every candidate gathered so far.
        let generated = out.len();
        for i in 0..generated {
            if let Some(counterpart) = variants::counterpart(&out[i]) {
                push_unique(&mut out, &mut seen, counterpart.to_string());
            }
        }

        out
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, candidate: String) {
    if !candidate.is_empty() && seen.insert(candidate.clone()) {
        out.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_is_lowercased_input() {
        let lemmatizer = Lemmatizer::new();
        let candidates = lemmatizer.lemmatize("Running");
        assert_eq!(candidates[0], "running");
    }

    #[test]
    fn resolves_common_inflections() {
        let lemmatizer = Lemmatizer::new();

        assert!(lemmatizer.lemmatize("running").contains(&"run".to_string()));
        assert!(lemmatizer.lemmatize("studies").contains(&"study".to_string()));
        assert!(lemmatizer.lemmatize("bigger").contains(&"big".to_string()));
    }

    #[test]
    fn spelling_variants_apply_to_rule_output() {
        let lemmatizer = Lemmatizer::new();
        let candidates = lemmatizer.lemmatize("kilometers");

        assert!(candidates.contains(&"kilometer".to_string()));
        assert!(candidates.contains(&"kilometre".to_string()));
    }

    #[test]
    fn does_not_overstrip_ss_endings() {
        let lemmatizer = Lemmatizer::new();
        let candidates = lemmatizer.lemmatize("class");

        assert!(candidates.contains(&"class".to_string()));
        assert!(!candidates.contains(&"clas".to_string()));
    }

    #[test]
    fn candidates_are_deduplicated() {
        let lemmatizer = Lemmatizer::new();
        let candidates = lemmatizer.lemmatize("classes");
        let mut unique = candidates.clone();
        unique.dedup();
        let set: HashSet<&String> = candidates.iter().collect();

        assert_eq!(set.len(), candidates.len());
        assert_eq!(unique, candidates);
    }

    struct FixedAnalyzer;

    impl MorphAnalyzer for FixedAnalyzer {
        fn noun(&self, _word: &str) -> Option<String> {
            Some("corpus".to_string())
        }

        fn verb(&self, word: &str) -> Option<String> {
            Some(word.to_string())
        }

        fn adjective(&self, _word: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn analyzer_results_come_before_rule_guesses() {
        let lemmatizer = Lemmatizer::with_analyzer(Box::new(FixedAnalyzer));
        let candidates = lemmatizer.lemmatize("corpora");

        // Input first, analyzer guess second; identical verb guess dropped.
        assert_eq!(candidates[0], "corpora");
        assert_eq!(candidates[1], "corpus");
    }
}
