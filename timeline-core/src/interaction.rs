//! Trạng thái tooltip và popover thuộc riêng từng timeline.
//!
//! Lớp này chỉ giữ nội dung, vị trí và hiệu ứng mờ dần; bề mặt vẽ tự quyết
//! định cách trình bày.

use serde::{Deserialize, Serialize};

/// Độ trễ hiện tooltip.
pub const TOOLTIP_FADE_IN_MS: u64 = 200;
pub const TOOLTIP_FADE_OUT_MS: u64 = 500;
pub const POPOVER_FADE_OUT_MS: u64 = 500;
pub const TOOLTIP_OPACITY: f64 = 0.9;
/// Tooltip nằm phía trên con trỏ.
pub const TOOLTIP_RISE: f64 = 40.0;

/// Đích chuyển tiếp độ mờ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fade {
    pub opacity: f64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub bar_index: usize,
    pub title: String,
    pub time_range: String,
    pub left: f64,
    pub top: f64,
    pub background: String,
    pub fade: Fade,
}

impl Tooltip {
    pub fn is_visible(&self) -> bool {
        self.fade.opacity > 0.0
    }
}

/// Nội dung popover do handler click trả về.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopoverContent {
    pub header: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popover {
    pub header: String,
    pub content: String,
    pub left: f64,
    pub top: f64,
    pub fade: Fade,
}

impl Popover {
    pub fn is_visible(&self) -> bool {
        self.fade.opacity > 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayState {
    tooltip: Option<Tooltip>,
    popover: Option<Popover>,
}

impl OverlayState {
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn popover(&self) -> Option<&Popover> {
        self.popover.as_ref()
    }

    pub fn show_tooltip(&mut self, tooltip: Tooltip) -> &Tooltip {
        self.tooltip.insert(tooltip)
    }

    pub fn fade_tooltip(&mut self) {
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.fade = Fade {
                opacity: 0.0,
                duration_ms: TOOLTIP_FADE_OUT_MS,
            };
        }
    }

    pub fn open_popover(&mut self, header: String, content: String, left: f64, top: f64) {
        self.popover = Some(Popover {
            header,
            content,
            left,
            top,
            fade: Fade {
                opacity: 1.0,
                duration_ms: 0,
            },
        });
    }

    pub fn fade_popover(&mut self) {
        if let Some(popover) = self.popover.as_mut() {
            popover.fade = Fade {
                opacity: 0.0,
                duration_ms: POPOVER_FADE_OUT_MS,
            };
        }
    }

    /// Gỡ mọi overlay.
    pub fn teardown(&mut self) {
        self.tooltip = None;
        self.popover = None;
    }

    pub fn is_empty(&self) -> bool {
        self.tooltip.is_none() && self.popover.is_none()
    }
}
