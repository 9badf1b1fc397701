//! JSON records to timeline `Event`s.
//!
//! A document is either an array of record objects or an object carrying such
//! an array under `events`. Every record must have string `Type` and `Color`
//! keys; the configured time fields accept RFC 3339 strings, naive
//! `YYYY-MM-DDTHH:MM:SS` strings (read as UTC) or epoch milliseconds. All
//! other keys are kept as plain field values.

mod config;

pub use config::JsTimelineConfig;

use activity_timeline_core::{
    build_plan, Container, Event, FieldValue, RenderPlan, TimelineCallbacks, TimelineConfig,
    TimelineError,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub const TYPE_KEY: &str = "Type";
pub const COLOR_KEY: &str = "Color";

/// Which record keys hold the time span of an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldMapping {
    pub from_field: String,
    pub to_field: String,
}

impl FieldMapping {
    pub fn from_config(config: &TimelineConfig) -> Self {
        Self {
            from_field: config.from_field.clone(),
            to_field: config.to_field.clone(),
        }
    }

    fn is_time_field(&self, key: &str) -> bool {
        key == self.from_field || key == self.to_field
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::from_config(&TimelineConfig::default())
    }
}

/// Read events from a JSON string.
pub fn events_from_str(json: &str, mapping: &FieldMapping) -> Result<Vec<Event>, TimelineError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| TimelineError::Parse(err.to_string()))?;
    events_from_value(&value, mapping)
}

/// Read events from a `serde_json::Value`.
pub fn events_from_value(
    document: &Value,
    mapping: &FieldMapping,
) -> Result<Vec<Event>, TimelineError> {
    let records = match document {
        Value::Array(records) => records,
        Value::Object(obj) => obj
            .get("events")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                TimelineError::Parse("Expected an array of records or an `events` array".into())
            })?,
        other => {
            return Err(TimelineError::Parse(format!(
                "Expected an array of records, received {}",
                json_kind(other)
            )))
        }
    };

    let events = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let Some(record) = record.as_object() else {
                return Err(TimelineError::Parse(format!(
                    "Record #{index} is {}, expected an object",
                    json_kind(record)
                )));
            };
            event_from_record(record, index, mapping)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(records = events.len(), "parsed timeline records");
    Ok(events)
}

/// Parse records and lay them out in one step.
pub fn plan_from_str(
    json: &str,
    config: &TimelineConfig,
    callbacks: &TimelineCallbacks,
    container: &Container,
) -> Result<RenderPlan, TimelineError> {
    let events = events_from_str(json, &FieldMapping::from_config(config))?;
    build_plan(&events, config, callbacks, container)
}

fn event_from_record(
    record: &Map<String, Value>,
    index: usize,
    mapping: &FieldMapping,
) -> Result<Event, TimelineError> {
    let kind = required_text(record, TYPE_KEY, index)?;
    let color = required_text(record, COLOR_KEY, index)?;
    let mut event = Event::new(kind, color);

    for (key, value) in record {
        if key == TYPE_KEY || key == COLOR_KEY {
            continue;
        }
        let field = if mapping.is_time_field(key) {
            let time = parse_time(value).ok_or_else(|| TimelineError::InvalidFieldType {
                field: key.clone(),
                index,
                expected: "thời gian",
            })?;
            FieldValue::Time(time)
        } else {
            plain_value(value)
        };
        event.fields.insert(key.clone(), field);
    }

    Ok(event)
}

fn required_text(
    record: &Map<String, Value>,
    key: &str,
    index: usize,
) -> Result<String, TimelineError> {
    let value = record.get(key).ok_or_else(|| TimelineError::MissingField {
        field: key.to_string(),
        index,
    })?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| TimelineError::InvalidFieldType {
            field: key.to_string(),
            index,
            expected: "chuỗi",
        })
}

fn plain_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Bool(*flag),
        Value::Number(number) => number
            .as_f64()
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null),
        Value::String(text) => FieldValue::Text(text.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}

fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_datetime(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_fields_accept_rfc3339_naive_and_millis() {
        let doc = json!([
            {"Type": "A", "Color": "red", "StartTime": "2024-03-01T10:00:00+02:00", "EndTime": 1709290800000i64},
            {"Type": "B", "Color": "blue", "StartTime": "2024-03-01T09:00:00", "EndTime": "2024-03-01T09:30:00Z"}
        ]);
        let events = events_from_value(&doc, &FieldMapping::default()).expect("records parse");

        let start = events[0].field("StartTime").and_then(FieldValue::as_time);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).single());
        let end = events[0].field("EndTime").and_then(FieldValue::as_time);
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).single());
        let naive = events[1].field("StartTime").and_then(FieldValue::as_time);
        assert_eq!(naive, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single());
    }

    #[test]
    fn other_fields_keep_their_json_kind() {
        let doc = json!({"events": [
            {"Type": "A", "Color": "red", "crew": 3, "shift": null, "lead": "Ana", "night": true}
        ]});
        let events = events_from_value(&doc, &FieldMapping::default()).expect("records parse");
        let event = &events[0];

        assert_eq!(event.kind, "A");
        assert_eq!(event.field("crew"), Some(&FieldValue::Number(3.0)));
        assert_eq!(event.field("shift"), Some(&FieldValue::Null));
        assert_eq!(event.field("lead"), Some(&FieldValue::from("Ana")));
        assert_eq!(event.field("night"), Some(&FieldValue::Bool(true)));
        assert!(event.field(TYPE_KEY).is_none());
    }

    #[test]
    fn missing_color_is_reported() {
        let doc = json!([{"Type": "A"}]);
        let err = events_from_value(&doc, &FieldMapping::default()).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::MissingField { ref field, index: 0 } if field == COLOR_KEY
        ));
    }

    #[test]
    fn unreadable_time_is_a_type_error() {
        let doc = json!([{"Type": "A", "Color": "red", "StartTime": "yesterday"}]);
        let err = events_from_value(&doc, &FieldMapping::default()).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidFieldType { ref field, .. } if field == "StartTime"));
    }

    #[test]
    fn non_array_document_is_rejected() {
        let err = events_from_str("42", &FieldMapping::default()).unwrap_err();
        assert!(matches!(err, TimelineError::Parse(_)));
        let err = events_from_str("[1]", &FieldMapping::default()).unwrap_err();
        assert!(matches!(err, TimelineError::Parse(_)));
    }
}
