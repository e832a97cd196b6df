/// External morphological analyzer, injected as an optional capability.
///
/// Implementations guess the base form of a word read as a noun, verb,
/// or adjective; `None` means no guess. The rule cascade works with
/// this entirely absent, and whichever strategy produces a dictionary
/// hit wins.
pub trait MorphAnalyzer: Send + Sync {
    fn noun(&self, word: &str) -> Option<String>;
    fn verb(&self, word: &str) -> Option<String>;
    fn adjective(&self, word: &str) -> Option<String>;
}
