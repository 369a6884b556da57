//! Observation sanitizer.
//!
//! Turns a partially populated observation sequence into one where every
//! element has a date and a numeric close. This stage never fails: malformed
//! entries become placeholders instead of errors.

use chrono::{DateTime, Local, NaiveDate};
use serde_json::{Map, Value};

use crate::numeric::numeric;
use crate::types::Observation;

/// Today's date as `YYYY-MM-DD`, used for observations with no date.
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Parse the date formats observations arrive in. `None` for anything else.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
}

/// Sanitize a typed observation sequence. Same length and order as the input.
pub fn sanitize(observations: &[Observation]) -> Vec<Observation> {
    let today = today();
    observations.iter().map(|o| sanitize_one(o.clone(), &today)).collect()
}

/// Sanitize raw JSON input. Entries that are not objects are replaced with a
/// placeholder dated today with a zero close.
pub fn sanitize_values(values: &[Value]) -> Vec<Observation> {
    sanitize(&observations_from_values(values))
}

/// Decode raw JSON without sanitizing. Entries that are not objects become
/// empty observations.
pub fn observations_from_values(values: &[Value]) -> Vec<Observation> {
    values
        .iter()
        .map(|value| match value {
            Value::Object(map) => observation_from_map(map),
            _ => Observation::default(),
        })
        .collect()
}

/// Lenient decode of a JSON object: only JSON numbers count as numeric, and
/// only string entries of `keywords` are kept.
pub fn observation_from_map(map: &Map<String, Value>) -> Observation {
    let number = |key: &str| numeric(map.get(key).and_then(Value::as_f64));

    Observation {
        date: map
            .get("date")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default(),
        open: number("open"),
        high: number("high"),
        low: number("low"),
        close: number("close"),
        volume: number("volume"),
        sentiment: number("sentiment"),
        confidence: number("confidence"),
        keywords: map
            .get("keywords")
            .and_then(Value::as_array)
            .map(|words| {
                words
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn sanitize_one(mut observation: Observation, today: &str) -> Observation {
    if observation.date.trim().is_empty() {
        observation.date = today.to_string();
    }
    observation.close = Some(
        observation
            .valid_close()
            .or_else(|| observation.valid_sentiment())
            .unwrap_or(0.0),
    );
    observation
}
