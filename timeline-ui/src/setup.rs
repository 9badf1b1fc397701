//! Ghép config từ JS và handler click thành cấu hình cho timeline.

use activity_timeline_core::{BarClickHandler, TimelineCallbacks, TimelineConfig};
use activity_timeline_json::JsTimelineConfig;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn timeline_setup(
    config: &JsTimelineConfig,
    bar_clicked: Option<BarClickHandler>,
) -> (TimelineConfig, TimelineCallbacks) {
    let mut callbacks = config.callbacks();
    callbacks.bar_clicked = bar_clicked;
    (TimelineConfig::from(config), callbacks)
}
