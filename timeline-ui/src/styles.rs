#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-activity-timeline]";

/// Default CSS for the timeline surface along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --atl-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --atl-text: #1f2933;
  --atl-muted: #52606d;
  --atl-separator: lightgrey;
  --atl-axis: #9aa5b1;
  --atl-popover-bg: #ffffff;
  --atl-popover-border: rgba(148, 163, 184, 0.38);
  --atl-radius: 6px;
}

.atl-root {
  position: relative;
  font-family: var(--atl-font-family);
  color: var(--atl-text);
}

.atl-empty {
  padding: 16px;
  color: var(--atl-muted);
}

.atl-root .axis line {
  stroke: var(--atl-axis);
  shape-rendering: crispEdges;
}

.atl-root .axis text {
  font-size: 11px;
  fill: var(--atl-muted);
}

.atl-separator {
  stroke: var(--atl-separator);
  stroke-width: 0.3px;
}

.atl-bar {
  cursor: pointer;
}

.atl-root .legend-box {
  fill: none;
  stroke: var(--atl-separator);
}

.atl-tooltip {
  position: fixed;
  pointer-events: none;
  padding: 4px 8px;
  border-radius: var(--atl-radius);
  color: #ffffff;
  font-size: 12px;
  white-space: nowrap;
}

.atl-popover {
  position: fixed;
  min-width: 160px;
  background: var(--atl-popover-bg);
  border: 1px solid var(--atl-popover-border);
  border-radius: var(--atl-radius);
  box-shadow: 0 8px 24px rgba(15, 23, 42, 0.12);
}

.atl-popover .header {
  padding: 6px 10px;
  font-weight: 600;
  border-bottom: 1px solid var(--atl-popover-border);
}

.atl-popover .content {
  padding: 6px 10px;
  font-size: 12px;
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-activity-timeline", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
