//! Quick task log

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::TIME_FORMAT;
use crate::dispatch::{Controller, Envelope, RequestContext};
use crate::error::{AppError, AppResult};
use crate::logger;
use crate::models::{NewTask, TaskType, Week};

/// Longest accepted task content, in bytes
pub const MAX_CONTENT_BYTES: usize = 1000;

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

pub struct QuickController;

impl Controller for QuickController {
    fn call(&self, action: &str, ctx: &RequestContext<'_>) -> Option<AppResult<Value>> {
        match action {
            "daily" => Some(daily(ctx)),
            _ => None,
        }
    }
}

pub fn factory() -> Box<dyn Controller> {
    Box::new(QuickController)
}

/// Normalize a client timestamp to [`TIME_FORMAT`]
fn normalize_time(field: &str, raw: &str) -> AppResult<String> {
    let raw = raw.trim();
    let parsed = DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()));

    parsed
        .map(|dt| dt.format(TIME_FORMAT).to_string())
        .ok_or_else(|| AppError::Validation(format!("invalid {field} '{raw}'")))
}

/// Log one daily task; it is DONE when an end time is given
fn daily(ctx: &RequestContext<'_>) -> AppResult<Value> {
    let content = ctx.form.get("content").unwrap_or_default().trim();
    if content.len() > MAX_CONTENT_BYTES {
        return Ok(Envelope::error(format!(
            "content must not exceed {MAX_CONTENT_BYTES} bytes"
        ))
        .into());
    }

    let starttime = normalize_time("starttime", ctx.form.get("starttime").unwrap_or_default())?;
    let endtime = match ctx.form.get("endtime").map(str::trim) {
        Some(end) if !end.is_empty() => Some(normalize_time("endtime", end)?),
        _ => None,
    };

    let task = NewTask {
        content: content.to_string(),
        starttime,
        endtime,
        task_type: TaskType::Daily,
    };

    let id = Week::create(ctx.db, &task)?;
    if id == 0 {
        return Ok(Envelope::error("insert error").into());
    }
    logger::log_info(&format!("[Task] #{id} logged ({})", task.summary()));
    Ok(Envelope::success("success", id).into())
}
