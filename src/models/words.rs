// Word frequency table

use rusqlite::types::Value;
use rusqlite::Row;
use std::collections::BTreeSet;

use crate::db::{Database, FieldMap, Model};
use crate::error::AppResult;

pub struct Words;

impl Model for Words {
    const TABLE: &'static str = "words";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRow {
    pub id: i64,
    pub word: String,
    pub frequency: i64,
    pub createtime: String,
}

impl WordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            word: row.get("word")?,
            frequency: row.get("frequency")?,
            createtime: row.get("createtime")?,
        })
    }
}

impl Words {
    /// Stored rows for any of `words`
    pub fn find_by_words(db: &Database, words: &[String]) -> AppResult<Vec<WordRow>> {
        let keys: Vec<Value> = words
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|w| Value::Text(w.clone()))
            .collect();
        Self::find_in(db, "word", &keys, WordRow::from_row)
    }

    pub fn incr(db: &Database, id: i64) -> AppResult<usize> {
        Self::increment(db, "frequency", id)
    }

    /// Insert `word` with frequency 0; returns 0 if it already exists
    pub fn create(db: &Database, word: &str, createtime: &str) -> AppResult<i64> {
        let fields = FieldMap::new()
            .with("word", word.to_string())
            .with("frequency", 0_i64)
            .with("createtime", createtime.to_string());
        Self::insert_with(db, &fields, "OR IGNORE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ConnectionProvider;
    use std::sync::Arc;

    const NOW: &str = "2024-05-01 09:00:00";

    #[test]
    fn test_create_find_incr() {
        let db = Database::new(Arc::new(ConnectionProvider::in_memory()));
        let id = Words::create(&db, "cat", NOW).unwrap();
        assert!(id > 0);
        assert_eq!(Words::create(&db, "cat", NOW).unwrap(), 0);

        Words::incr(&db, id).unwrap();
        let rows = Words::find_by_words(&db, &["cat".to_string(), "cat".to_string(), "dog".to_string()]).unwrap();
        assert_eq!(
            rows,
            vec![WordRow {
                id,
                word: "cat".to_string(),
                frequency: 1,
                createtime: NOW.to_string(),
            }]
        );
    }
}
