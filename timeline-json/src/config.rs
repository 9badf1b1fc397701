//! Partial configuration supplied by JavaScript hosts.
//!
//! Keys are camelCase and every one is optional; whatever is missing keeps the
//! `TimelineConfig` default. Both the wasm bridge and the yew surface read
//! their config through this type.

use std::collections::HashMap;

use activity_timeline_core::{BoxError, FieldValue, Margin, TimelineCallbacks, TimelineConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsTimelineConfig {
    pub from_field: Option<String>,
    pub to_field: Option<String>,
    pub category_field: Option<String>,
    pub group_field: Option<String>,
    pub time_label_format: Option<String>,
    pub lead_in_minutes: Option<u32>,
    pub legend_font_size: Option<f64>,
    pub margin: Option<Margin>,
    /// Display label per category key, replacing an evaluated formatter.
    pub category_labels: Option<HashMap<String, String>>,
}

impl JsTimelineConfig {
    /// Callbacks derived from the config. Only the category label lookup can
    /// be expressed as data; click handlers are attached by the caller.
    pub fn callbacks(&self) -> TimelineCallbacks {
        match &self.category_labels {
            Some(labels) => label_lookup(labels.clone()),
            None => TimelineCallbacks::default(),
        }
    }
}

impl From<&JsTimelineConfig> for TimelineConfig {
    fn from(cfg: &JsTimelineConfig) -> Self {
        let mut base = TimelineConfig::default();
        if let Some(field) = &cfg.from_field {
            base.from_field = field.clone();
        }
        if let Some(field) = &cfg.to_field {
            base.to_field = field.clone();
        }
        if let Some(field) = &cfg.category_field {
            base.category_field = field.clone();
        }
        if let Some(field) = &cfg.group_field {
            base.group_field = field.clone();
        }
        if let Some(format) = &cfg.time_label_format {
            base.time_label_format = format.clone();
        }
        if let Some(minutes) = cfg.lead_in_minutes {
            base.lead_in_minutes = minutes;
        }
        if let Some(size) = cfg.legend_font_size {
            base.legend_font_size = size;
        }
        if let Some(margin) = cfg.margin {
            base.margin = margin;
        }
        base
    }
}

/// Categories missing from the table keep their own label.
fn label_lookup(labels: HashMap<String, String>) -> TimelineCallbacks {
    TimelineCallbacks::default().with_category_label_formatter(
        move |category: &FieldValue| -> Result<String, BoxError> {
            let key = category.to_string();
            Ok(labels.get(&key).cloned().unwrap_or(key))
        },
    )
}
