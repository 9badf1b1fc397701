//! Bridge WASM <-> JavaScript trung lập framework.

use activity_timeline_core::{Container, TimelineConfig, TimelineError};
use activity_timeline_json::{events_from_value, FieldMapping, JsTimelineConfig};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsContainer {
    width: f64,
    height: f64,
}

#[wasm_bindgen]
pub fn render_timeline(
    records: JsValue,
    config: Option<JsValue>,
    container: JsValue,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let records_value = from_value::<serde_json::Value>(records)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON sự kiện: {err}")))?;

    let js_cfg = match config {
        Some(js_cfg) => from_value::<JsTimelineConfig>(js_cfg)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?,
        None => JsTimelineConfig::default(),
    };
    let cfg = TimelineConfig::from(&js_cfg);

    let bounds: JsContainer = from_value(container)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được kích thước: {err}")))?;

    let events = events_from_value(&records_value, &FieldMapping::from_config(&cfg))
        .map_err(|err| JsValue::from_str(&format_timeline_error(err)))?;
    let plan = activity_timeline_core::build_plan(
        &events,
        &cfg,
        &js_cfg.callbacks(),
        &Container::new(bounds.width, bounds.height),
    )
    .map_err(|err| JsValue::from_str(&format_timeline_error(err)))?;

    to_value(&plan).map_err(|err| JsValue::from_str(&format!("Không serialize plan: {err}")))
}

fn format_timeline_error(err: TimelineError) -> String {
    format!("Timeline error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_errors_are_prefixed() {
        let message = format_timeline_error(TimelineError::EmptyDataset);
        assert!(message.starts_with("Timeline error: "));
    }

    #[test]
    fn container_reads_width_and_height() {
        let bounds: JsContainer =
            serde_json::from_str(r#"{"width": 640, "height": 210}"#).expect("container parses");
        assert_eq!((bounds.width, bounds.height), (640.0, 210.0));
    }
}
