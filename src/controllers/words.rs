//! Word frequency collection

use chrono::Local;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::TIME_FORMAT;
use crate::dispatch::{Controller, Envelope, RequestContext};
use crate::error::{AppError, AppResult};
use crate::models::Words;

pub struct WordsController;

impl Controller for WordsController {
    fn call(&self, action: &str, ctx: &RequestContext<'_>) -> Option<AppResult<Value>> {
        match action {
            "save" => Some(save(ctx)),
            _ => None,
        }
    }
}

pub fn factory() -> Box<dyn Controller> {
    Box::new(WordsController)
}

/// Split the `words` field on whitespace and commas
fn parse_words(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// Count words already stored, remember new ones
fn save(ctx: &RequestContext<'_>) -> AppResult<Value> {
    let words = parse_words(ctx.form.get("words").unwrap_or_default());
    if words.is_empty() {
        return Err(AppError::Validation("no words given".to_string()));
    }

    let existing: HashMap<String, i64> = Words::find_by_words(ctx.db, &words)?
        .into_iter()
        .map(|row| (row.word, row.id))
        .collect();

    let now = Local::now().format(TIME_FORMAT).to_string();
    let mut inserted = HashSet::new();
    for word in &words {
        if let Some(&id) = existing.get(word) {
            Words::incr(ctx.db, id)?;
        } else if inserted.insert(word.as_str()) {
            Words::create(ctx.db, word, &now)?;
        }
    }

    Ok(Envelope::message("ok").into())
}
