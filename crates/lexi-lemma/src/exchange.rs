//! The dictionary `exchange` field encodes a word's inflected forms as
//! `tag:value` pairs separated by `/`:
//!
//! `p` past, `d` past participle, `i` present participle, `3` third
//! person, `s` plural, `r` comparative, `t` superlative, `0` lemma,
//! `1` the form the lemma was derived through.
//!
//! A `0` (or `1`) form on a direct dictionary hit is the authoritative
//! lemma and outranks rule-cascade guesses.

/// Parse an exchange field into `(tag, form)` pairs. Malformed
/// segments are skipped.
pub fn parse_exchange(exchange: &str) -> Vec<(char, String)> {
    exchange
        .split('/')
        .filter_map(|segment| {
            let (tag, value) = segment.split_once(':')?;
            let tag = tag.trim();
            let value = value.trim();
            if tag.len() != 1 || value.is_empty() {
                return None;
            }
            let tag = tag.chars().next()?;
            if !matches!(tag, 'p' | 'd' | 'i' | '3' | 's' | 'r' | 't' | '0' | '1') {
                return None;
            }
            Some((tag, value.to_string()))
        })
        .collect()
}

/// The authoritative lemma for `word`, if its exchange field names one
/// that differs from the word itself.
pub fn exchange_lemma(word: &str, exchange: &str) -> Option<String> {
    let pairs = parse_exchange(exchange);
    for wanted in ['0', '1'] {
        if let Some((_, form)) = pairs.iter().find(|(tag, _)| *tag == wanted) {
            if form != word {
                return Some(form.clone());
            }
        }
    }
    None
}

/// Exchange-based lemmatization against a dictionary: `lookup` returns
/// the exchange field of a direct hit, or `None` when the word is not
/// in the dictionary.
pub fn lemma_for<F>(word: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let exchange = lookup(word)?;
    exchange_lemma(word, &exchange)
}
