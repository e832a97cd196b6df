use lexi_types::WordRecord;
use rusqlite::Row;

pub(crate) const WORD_TABLE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS words (
        word        TEXT NOT NULL,
        word_lower  TEXT NOT NULL PRIMARY KEY,
        phonetic    TEXT NOT NULL DEFAULT '',
        definition  TEXT NOT NULL DEFAULT '',
        translation TEXT NOT NULL DEFAULT '',
        pos         TEXT NOT NULL DEFAULT '',
        collins     INTEGER NOT NULL DEFAULT 0,
        oxford      INTEGER NOT NULL DEFAULT 0,
        tag         TEXT NOT NULL DEFAULT '',
        bnc         INTEGER NOT NULL DEFAULT 0,
        frq         INTEGER NOT NULL DEFAULT 0,
        exchange    TEXT NOT NULL DEFAULT '',
        detail      TEXT NOT NULL DEFAULT '',
        audio       TEXT NOT NULL DEFAULT ''
    )
"#;

pub(crate) const WORD_COLUMNS: &str =
    "word, word_lower, phonetic, definition, translation, pos, collins, oxford, \
     tag, bnc, frq, exchange, detail, audio";

pub(crate) const WORD_UPSERT: &str =
    "INSERT OR REPLACE INTO words (word, word_lower, phonetic, definition, translation, \
     pos, collins, oxford, tag, bnc, frq, exchange, detail, audio) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

pub(crate) fn record_from_row(row: &Row) -> rusqlite::Result<WordRecord> {
    Ok(WordRecord {
        word: row.get(0)?,
        word_lower: row.get(1)?,
        phonetic: row.get(2)?,
        definition: row.get(3)?,
        translation: row.get(4)?,
        pos: row.get(5)?,
        collins: row.get::<_, i64>(6)? as u8,
        oxford: row.get::<_, i64>(7)? != 0,
        tag: row.get(8)?,
        bnc: row.get::<_, i64>(9)? as u32,
        frq: row.get::<_, i64>(10)? as u32,
        exchange: row.get(11)?,
        detail: row.get(12)?,
        audio: row.get(13)?,
    })
}

pub(crate) fn bind_record(
    stmt: &mut rusqlite::Statement<'_>,
    record: &WordRecord,
) -> rusqlite::Result<usize> {
    stmt.execute(rusqlite::params![
        record.word,
        record.word_lower,
        record.phonetic,
        record.definition,
        record.translation,
        record.pos,
        record.collins as i64,
        record.oxford as i64,
        record.tag,
        record.bnc as i64,
        record.frq as i64,
        record.exchange,
        record.detail,
        record.audio,
    ])
}
