//! Typed access helpers over decoded JSON trees.
//!
//! TMDb responses are loosely typed: fields go missing, arrive as `null`,
//! or carry an unexpected type. Every helper here treats such a field as
//! absent instead of failing.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};

/// Date format used by TMDb (`release_date`, `air_date`, ...).
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Regex for the exact `YYYY-MM-DD` shape, ASCII digits only.
#[allow(clippy::expect_used)]
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("failed to compile date regex")
});

/// Parses a `YYYY-MM-DD` string.
///
/// Returns `None` for empty, partial, or otherwise malformed input.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    // chrono alone also takes signed years and space-padded fields.
    if !DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Extracts the calendar year from an optional date.
#[must_use]
pub fn year_from_date(date: Option<NaiveDate>) -> Option<i32> {
    date.map(|d| d.year())
}

/// Returns the string at `key`, if present and a string.
pub(crate) fn get_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Returns an owned, non-empty string at `key`.
pub(crate) fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    get_str(map, key)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Returns the unsigned integer at `key`.
pub(crate) fn get_u64(map: &Map<String, Value>, key: &str) -> Option<u64> {
    map.get(key).and_then(Value::as_u64)
}

/// Returns the unsigned integer at `key`, narrowed to `u32`.
pub(crate) fn get_u32(map: &Map<String, Value>, key: &str) -> Option<u32> {
    get_u64(map, key).and_then(|n| u32::try_from(n).ok())
}

/// Returns the number at `key` as `f64`.
pub(crate) fn get_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

/// Returns the boolean at `key`.
pub(crate) fn get_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

/// Returns the array at `key`, or an empty slice.
pub(crate) fn get_array<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Flattens a sequence of objects into the string found at `field` in each.
///
/// Source order is kept. Elements that are not objects, or whose `field` is
/// missing or not a string, are skipped.
///
/// ```
/// use serde_json::json;
///
/// let genres = json!([{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]);
/// let names = itmdb_api::value::extract_names(genres.as_array().unwrap(), "name");
/// assert_eq!(names, vec!["Action", "Drama"]);
/// ```
#[must_use]
pub fn extract_names(items: &[Value], field: &str) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.get(field).and_then(Value::as_str))
        .map(String::from)
        .collect()
}
