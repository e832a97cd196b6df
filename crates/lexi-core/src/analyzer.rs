use std::collections::{HashMap, HashSet};

use lexi_lemma::Lemmatizer;
use unicode_normalization::UnicodeNormalization;

use crate::difficulty::{DifficultyIndex, DifficultyTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// Highlight words harder than the threshold that are not already
    /// being learned
    Unknown,
    /// Highlight every word harder than the threshold
    Difficult,
    /// Highlight everything except mastered words
    All,
}

impl HighlightMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unknown" => Some(HighlightMode::Unknown),
            "difficult" => Some(HighlightMode::Difficult),
            "all" => Some(HighlightMode::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightMode::Unknown => "unknown",
            HighlightMode::Difficult => "difficult",
            HighlightMode::All => "all",
        }
    }
}

/// The user's word lists as lookup sets. Mastered always suppresses
/// highlighting; learning always forces it.
#[derive(Debug, Default, Clone)]
pub struct VocabularySets {
    pub learning: HashSet<String>,
    pub mastered: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct WordScore {
    pub word: String,
    pub tier: DifficultyTier,
    pub score: u32,
    pub highlighted: bool,
    pub in_learning: bool,
}

#[derive(Debug, Default)]
pub struct TextAnalysis {
    /// Per unique lowercased word, in first-seen order
    pub words: Vec<WordScore>,
    /// Rounded mean of the per-unique-word scores
    pub difficulty_score: u32,
    /// Highlighted words not already being learned
    pub new_words: Vec<String>,
}

impl TextAnalysis {
    pub fn score_for(&self, word_lower: &str) -> Option<&WordScore> {
        self.words.iter().find(|w| w.word == word_lower)
    }

    pub fn highlighted_count(&self) -> usize {
        self.words.iter().filter(|w| w.highlighted).count()
    }
}

/// A run of the original text, either a word token annotated for
/// rendering or verbatim delimiter text. Concatenating the `text`
/// fields reproduces the input exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySegment {
    pub text: String,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    Word {
        word_lower: String,
        /// Difficulty class, present only on highlighted words
        highlight_class: Option<&'static str>,
        /// HTML-escaped translation, safe for attribute embedding
        translation: Option<String>,
    },
    Delimiter,
}

/// Scores tokenized text against the difficulty tiers and the user's
/// vocabulary, and prepares per-token display annotations.
pub struct TextAnalyzer {
    index: DifficultyIndex,
    lemmatizer: Lemmatizer,
}

impl TextAnalyzer {
    pub fn new(index: DifficultyIndex, lemmatizer: Lemmatizer) -> Self {
        Self { index, lemmatizer }
    }

    /// Tokenize into maximal runs of ASCII letters, keeping tokens
    /// longer than one character.
    pub fn extract_words(&self, text: &str) -> Vec<String> {
        let normalized: String = text.nfkc().collect();
        normalized
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|token| token.len() > 1)
            .map(|token| token.to_string())
            .collect()
    }

    /// Tier for a word: exact match first, then every lemmatizer
    /// candidate; unresolved words are expert by definition.
    pub fn tier_for(&self, word: &str) -> DifficultyTier {
        let lower = word.to_lowercase();
        if let Some(tier) = self.index.tier_exact(&lower) {
            return tier;
        }
        for candidate in self.lemmatizer.lemmatize(&lower) {
            if let Some(tier) = self.index.tier_exact(&candidate) {
                return tier;
            }
        }
        DifficultyTier::Expert
    }

    pub fn analyze(
        &self,
        words: &[String],
        level: DifficultyTier,
        mode: HighlightMode,
        vocabulary: &VocabularySets,
    ) -> TextAnalysis {
        let mut seen = HashSet::new();
        let mut scored = Vec::new();
        let mut new_words = Vec::new();
        let mut score_sum: u64 = 0;

        for word in words {
            let lower = word.to_lowercase();
            if !seen.insert(lower.clone()) {
                continue;
            }

            let tier = self.tier_for(&lower);
            let in_learning = vocabulary.learning.contains(&lower);
            let highlighted = decide_highlight(tier, level, mode, &lower, vocabulary);

            if highlighted && !in_learning {
                new_words.push(lower.clone());
            }
            score_sum += tier.score() as u64;
            scored.push(WordScore {
                word: lower,
                tier,
                score: tier.score(),
                highlighted,
                in_learning,
            });
        }

        let difficulty_score = if scored.is_empty() {
            0
        } else {
            (score_sum as f64 / scored.len() as f64).round() as u32
        };

        TextAnalysis {
            words: scored,
            difficulty_score,
            new_words,
        }
    }

    /// Re-tokenize `text` preserving every delimiter verbatim and
    /// annotate each word token for rendering. `translations` maps
    /// `word_lower` to display translations (typically out of a batch
    /// dictionary query).
    pub fn segment_for_display(
        &self,
        text: &str,
        analysis: &TextAnalysis,
        translations: &HashMap<String, String>,
    ) -> Vec<DisplaySegment> {
        let scores: HashMap<&str, &WordScore> = analysis
            .words
            .iter()
            .map(|score| (score.word.as_str(), score))
            .collect();

        let mut segments: Vec<DisplaySegment> = Vec::new();
        let mut token = String::new();

        let flush_token = |segments: &mut Vec<DisplaySegment>, token: &mut String| {
            if token.is_empty() {
                return;
            }
            let lower = token.to_lowercase();
            let kind = if token.len() > 1 {
                let score = scores.get(lower.as_str());
                SegmentKind::Word {
                    highlight_class: score
                        .filter(|s| s.highlighted)
                        .map(|s| s.tier.css_class()),
                    translation: translations.get(&lower).map(|t| escape_attr(t)),
                    word_lower: lower,
                }
            } else {
                SegmentKind::Delimiter
            };
            segments.push(DisplaySegment {
                text: std::mem::take(token),
                kind,
            });
        };

        let mut delimiter = String::new();
        for c in text.chars() {
            if c.is_ascii_alphabetic() {
                if !delimiter.is_empty() {
                    segments.push(DisplaySegment {
                        text: std::mem::take(&mut delimiter),
                        kind: SegmentKind::Delimiter,
                    });
                }
                token.push(c);
            } else {
                flush_token(&mut segments, &mut token);
                delimiter.push(c);
            }
        }
        flush_token(&mut segments, &mut token);
        if !delimiter.is_empty() {
            segments.push(DisplaySegment {
                text: delimiter,
                kind: SegmentKind::Delimiter,
            });
        }

        segments
    }
}

fn decide_highlight(
    tier: DifficultyTier,
    level: DifficultyTier,
    mode: HighlightMode,
    word_lower: &str,
    vocabulary: &VocabularySets,
) -> bool {
    if vocabulary.mastered.contains(word_lower) {
        return false;
    }
    if vocabulary.learning.contains(word_lower) {
        return true;
    }
    match mode {
        HighlightMode::All => true,
        HighlightMode::Difficult | HighlightMode::Unknown => tier > level,
    }
}

/// Minimal HTML attribute escaping for translation text embedded in
/// rendered segments.
fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// the -> common, hello -> beginner; everything else unresolved.
    fn tiny_index() -> DifficultyIndex {
        let mut list = String::from("the\n");
        for i in 1..1000 {
            list.push_str(&format!("filler{i}\n"));
        }
        list.push_str("hello\n");
        DifficultyIndex::from_word_list(&list)
    }

    fn analyzer() -> TextAnalyzer {
        TextAnalyzer::new(tiny_index(), Lemmatizer::new())
    }

    #[test]
    fn extracts_letter_runs_longer_than_one() {
        let analyzer = analyzer();
        let words = analyzer.extract_words("The quick-brown fox, 42 a B12!");
        assert_eq!(words, vec!["The", "quick", "brown", "fox"]);
    }

    #[test]
    fn tier_lookup_is_deterministic() {
        let analyzer = analyzer();
        assert_eq!(analyzer.tier_for("the"), DifficultyTier::Common);
        assert_eq!(analyzer.tier_for("The"), DifficultyTier::Common);
        assert_eq!(analyzer.tier_for("zyzzyva"), DifficultyTier::Expert);
    }

    #[test]
    fn lemmatization_rescues_inflected_forms() {
        let analyzer = analyzer();
        // "hellos" is absent; its singular is in the beginner bucket.
        assert_eq!(analyzer.tier_for("hellos"), DifficultyTier::Beginner);
    }

    #[test]
    fn unknown_mode_highlights_past_threshold_only() {
        let analyzer = analyzer();
        let words = analyzer.extract_words("The hello world");
        let analysis = analyzer.analyze(
            &words,
            DifficultyTier::Beginner,
            HighlightMode::Unknown,
            &VocabularySets::default(),
        );

        assert!(!analysis.score_for("the").unwrap().highlighted);
        assert!(!analysis.score_for("hello").unwrap().highlighted);
        assert!(analysis.score_for("world").unwrap().highlighted);
        assert_eq!(analysis.new_words, vec!["world"]);
        // (0 + 25 + 100) / 3 rounds to 42.
        assert_eq!(analysis.difficulty_score, 42);
    }

    #[test]
    fn mastered_overrides_all_mode() {
        let analyzer = analyzer();
        let words = analyzer.extract_words("The hello world");
        let vocabulary = VocabularySets {
            mastered: HashSet::from(["world".to_string()]),
            ..Default::default()
        };
        let analysis = analyzer.analyze(
            &words,
            DifficultyTier::Beginner,
            HighlightMode::All,
            &vocabulary,
        );

        assert!(!analysis.score_for("world").unwrap().highlighted);
        assert!(analysis.score_for("the").unwrap().highlighted);
        assert!(analysis.score_for("hello").unwrap().highlighted);
    }

    #[test]
    fn learning_overrides_mode_and_threshold() {
        let analyzer = analyzer();
        let words = analyzer.extract_words("the world");
        let vocabulary = VocabularySets {
            learning: HashSet::from(["the".to_string()]),
            ..Default::default()
        };
        let analysis = analyzer.analyze(
            &words,
            DifficultyTier::Expert,
            HighlightMode::Unknown,
            &vocabulary,
        );

        // "the" is common and below threshold, but learning wins.
        assert!(analysis.score_for("the").unwrap().highlighted);
        // world is expert, threshold expert: not strictly harder.
        assert!(!analysis.score_for("world").unwrap().highlighted);
        assert!(analysis.new_words.is_empty());
    }

    #[test]
    fn duplicate_words_are_scored_once() {
        let analyzer = analyzer();
        let words = analyzer.extract_words("the THE The world");
        let analysis = analyzer.analyze(
            &words,
            DifficultyTier::Beginner,
            HighlightMode::Unknown,
            &VocabularySets::default(),
        );

        assert_eq!(analysis.words.len(), 2);
        // (0 + 100) / 2
        assert_eq!(analysis.difficulty_score, 50);
    }

    #[test]
    fn display_segments_reproduce_text_verbatim() {
        let analyzer = analyzer();
        let text = "The hello, world!  (again)";
        let words = analyzer.extract_words(text);
        let analysis = analyzer.analyze(
            &words,
            DifficultyTier::Beginner,
            HighlightMode::Unknown,
            &VocabularySets::default(),
        );

        let translations =
            HashMap::from([("world".to_string(), "世界 \"wow\" <x>".to_string())]);
        let segments = analyzer.segment_for_display(text, &analysis, &translations);

        let rebuilt: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, text);

        let world = segments
            .iter()
            .find_map(|s| match &s.kind {
                SegmentKind::Word {
                    word_lower,
                    highlight_class,
                    translation,
                } if word_lower == "world" => Some((highlight_class, translation)),
                _ => None,
            })
            .unwrap();
        assert_eq!(*world.0, Some("difficulty-expert"));
        assert_eq!(
            world.1.as_deref(),
            Some("世界 &quot;wow&quot; &lt;x&gt;")
        );

        // Every word token is wrapped, highlighted or not.
        let hello_wrapped = segments.iter().any(|s| {
            matches!(&s.kind, SegmentKind::Word { word_lower, highlight_class, .. }
                if word_lower == "hello" && highlight_class.is_none())
        });
        assert!(hello_wrapped);
    }
}
