use std::collections::HashSet;

use lexi_types::WordRecord;

/// Column order of a chunk payload row:
/// word, phonetic, definition, translation, pos, collins, oxford, tag,
/// bnc, frq, exchange, detail, audio
const COLUMNS: usize = 13;

/// Decode a decompressed chunk payload (TSV, one row per word).
///
/// Rows are tolerated, not validated: short rows are padded with empty
/// fields, unparsable integers become 0, blank lines and rows without a
/// word are skipped.
pub fn decode_rows(payload: &[u8]) -> Vec<WordRecord> {
    let text = String::from_utf8_lossy(payload);
    text.lines().filter_map(parse_row).collect()
}

fn parse_row(line: &str) -> Option<WordRecord> {
    if line.trim().is_empty() {
        return None;
    }
    let fields: Vec<&str> = line.split('\t').collect();
    let field = |i: usize| -> String {
        fields
            .get(i)
            .map(|f| unescape(f))
            .unwrap_or_default()
    };
    let int = |i: usize| -> u32 {
        fields
            .get(i)
            .and_then(|f| f.trim().parse::<u32>().ok())
            .unwrap_or(0)
    };

    let word = field(0);
    if word.is_empty() {
        return None;
    }
    if fields.len() != COLUMNS {
        tracing::trace!("Row for '{}' has {} fields, expected {}", word, fields.len(), COLUMNS);
    }

    Some(WordRecord {
        word_lower: word.to_lowercase(),
        word,
        phonetic: field(1),
        definition: field(2),
        translation: field(3),
        pos: field(4),
        collins: int(5).min(5) as u8,
        oxford: matches!(fields.get(6).map(|f| f.trim()), Some("1") | Some("true")),
        tag: field(7),
        bnc: int(8),
        frq: int(9),
        exchange: field(10),
        detail: field(11),
        audio: field(12),
    })
}

/// Newlines inside definitions are escaped by the offline splitter.
fn unescape(field: &str) -> String {
    if field.contains("\\n") {
        field.replace("\\n", "\n")
    } else {
        field.to_string()
    }
}

/// Fold decoded rows into a deduplicated list keyed by `word_lower`.
/// First occurrence wins: chunk order is frequency priority.
pub fn merge_rows(rows: Vec<WordRecord>) -> Vec<WordRecord> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|record| seen.insert(record.word_lower.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_rows() {
        let payload =
            b"Hello\t/h\xc9\x99\xcb\x88lo\xca\x8a/\ta greeting\t\xe4\xbd\xa0\xe5\xa5\xbd\tint\t4\t1\tcet4\t120\t95\t\t\t\n";
        let rows = decode_rows(payload);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.word, "Hello");
        assert_eq!(row.word_lower, "hello");
        assert_eq!(row.definition, "a greeting");
        assert_eq!(row.collins, 4);
        assert!(row.oxford);
        assert_eq!(row.bnc, 120);
        assert_eq!(row.frq, 95);
    }

    #[test]
    fn short_rows_are_padded_and_bad_ints_zeroed() {
        let rows = decode_rows(b"word\t\tdef only\t\t\tnot-a-number\n\n");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].definition, "def only");
        assert_eq!(rows[0].collins, 0);
        assert!(!rows[0].oxford);
        assert_eq!(rows[0].exchange, "");
    }

    #[test]
    fn escaped_newlines_are_restored() {
        let rows = decode_rows(b"word\t\tline one\\nline two\t\t\t\t\t\t\t\t\t\t\n");
        assert_eq!(rows[0].definition, "line one\nline two");
    }

    #[test]
    fn merge_dedups_first_wins() {
        let rows = vec![
            WordRecord {
                frq: 1,
                ..WordRecord::new("the")
            },
            WordRecord::new("of"),
            WordRecord {
                frq: 9,
                ..WordRecord::new("The")
            },
        ];

        let merged = merge_rows(rows);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].word_lower, "the");
        assert_eq!(merged[0].frq, 1);
    }
}
