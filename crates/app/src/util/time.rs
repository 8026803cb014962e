use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::config::RangeParams;
use crate::error::{AppError, Result};

pub const DEFAULT_RANGE: &str = "last7days";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolves a date selection relative to `today` into inclusive day bounds.
pub fn resolve_dates(params: &RangeParams, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    if let Some(start) = params.start.as_deref() {
        let start = parse_date(start)?;
        let end = match params.end.as_deref() {
            Some(end) => parse_date(end)?,
            None => today,
        };
        return check_order(start, end);
    }
    if params.end.is_some() {
        return Err(AppError::InvalidInput(
            "end date requires a start date".to_string(),
        ));
    }
    let start = match params.range.as_deref().unwrap_or(DEFAULT_RANGE) {
        "today" => today,
        "last7days" => today - Duration::days(7),
        "last14days" => today - Duration::days(14),
        "last30days" => today - Duration::days(30),
        "thismonth" => today
            .with_day(1)
            .ok_or_else(|| AppError::InvalidInput("invalid local date".to_string()))?,
        value => {
            return Err(AppError::InvalidInput(format!(
                "unsupported range {}",
                value
            )));
        }
    };
    Ok((start, today))
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|err| AppError::InvalidInput(format!("invalid date {}: {}", value, err)))
}

fn check_order(start: NaiveDate, end: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    if start > end {
        return Err(AppError::InvalidInput(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    Ok((start, end))
}
