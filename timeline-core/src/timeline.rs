use tracing::{debug, trace, warn};

use crate::error::TimelineResult;
use crate::interaction::{
    Fade, OverlayState, Tooltip, TOOLTIP_FADE_IN_MS, TOOLTIP_OPACITY, TOOLTIP_RISE,
};
use crate::model::{BarClickHandler, Container, Event, TimelineCallbacks, TimelineConfig};
use crate::plan::{build, RenderPlan};
use crate::scale::TimeSpan;

/// Kết quả của một lần gọi `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Không có dữ liệu, không làm gì.
    Skipped,
    Rendered,
}

#[derive(Debug)]
struct Rendered {
    events: Vec<Event>,
    spans: Vec<TimeSpan>,
    plan: RenderPlan,
}

/// Một timeline gắn với một vùng chứa.
///
/// Mỗi lần `update` dựng lại toàn bộ từ đầu. Lần update lỗi giữ nguyên kết quả
/// render thành công gần nhất. Tooltip và popover thuộc về instance này và bị
/// gỡ trước mỗi lần render mới hoặc khi `dispose`.
#[derive(Debug)]
pub struct Timeline {
    container: Container,
    config: TimelineConfig,
    callbacks: TimelineCallbacks,
    rendered: Option<Rendered>,
    overlays: OverlayState,
}

impl Timeline {
    pub fn new(container: Container, config: TimelineConfig) -> Self {
        Self {
            container,
            config,
            callbacks: TimelineCallbacks::default(),
            rendered: None,
            overlays: OverlayState::default(),
        }
    }

    pub fn with_callbacks(mut self, callbacks: TimelineCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Dựng lại timeline từ danh sách sự kiện; `None` là no-op.
    pub fn update(&mut self, events: Option<&[Event]>) -> TimelineResult<UpdateOutcome> {
        let Some(events) = events else {
            trace!("update called without data, skipping");
            return Ok(UpdateOutcome::Skipped);
        };

        let built = build(events, &self.config, &self.callbacks, &self.container).map_err(
            |err| {
                warn!(error = %err, "timeline update rejected, keeping previous render");
                err
            },
        )?;

        self.overlays.teardown();
        self.rendered = Some(Rendered {
            events: events.to_vec(),
            spans: built.spans,
            plan: built.plan,
        });
        debug!(events = events.len(), "timeline rendered");
        Ok(UpdateOutcome::Rendered)
    }

    pub fn plan(&self) -> Option<&RenderPlan> {
        self.rendered.as_ref().map(|rendered| &rendered.plan)
    }

    pub fn events(&self) -> &[Event] {
        self.rendered
            .as_ref()
            .map(|rendered| rendered.events.as_slice())
            .unwrap_or_default()
    }

    pub fn overlays(&self) -> &OverlayState {
        &self.overlays
    }

    /// Chỉ số thanh dưới điểm `(x, y)` trong vùng vẽ.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.plan()?.bar_at(x, y)
    }

    /// Con trỏ đi vào một thanh: hiện tooltip cạnh con trỏ, cùng màu thanh.
    pub fn hover(&mut self, bar_index: usize, page_x: f64, page_y: f64) -> Option<&Tooltip> {
        let rendered = self.rendered.as_ref()?;
        let bar = rendered.plan.bars.get(bar_index)?;
        let event = rendered.events.get(bar.event_index)?;
        let span = rendered.spans.get(bar.event_index)?;

        let tooltip = Tooltip {
            bar_index,
            title: event.kind.clone(),
            time_range: format!(
                "{}-{}",
                self.config.format_time(span.start),
                self.config.format_time(span.end)
            ),
            left: page_x,
            top: page_y - TOOLTIP_RISE,
            background: event.color.clone(),
            fade: Fade {
                opacity: TOOLTIP_OPACITY,
                duration_ms: TOOLTIP_FADE_IN_MS,
            },
        };
        Some(self.overlays.show_tooltip(tooltip))
    }

    pub fn leave(&mut self) {
        self.overlays.fade_tooltip();
    }

    /// Handler click cùng bản sao sự kiện của thanh; `None` khi chưa cấu hình
    /// handler. Cho phép gọi handler sau khi đã trả mượn timeline.
    pub fn click_target(&self, bar_index: usize) -> Option<(BarClickHandler, Event)> {
        let handler = self.callbacks.bar_clicked.clone()?;
        let rendered = self.rendered.as_ref()?;
        let bar = rendered.plan.bars.get(bar_index)?;
        let event = rendered.events.get(bar.event_index)?.clone();
        Some((handler, event))
    }

    /// Gọi handler click nếu đã cấu hình và mở popover nếu handler trả về nội
    /// dung. Trả về `true` khi handler được gọi.
    pub fn click(&mut self, bar_index: usize, page_x: f64, page_y: f64) -> bool {
        let Some((handler, event)) = self.click_target(bar_index) else {
            return false;
        };

        if let Some(popover) = handler(&event, page_x, page_y) {
            self.open_popover(popover.header, popover.content, page_x, page_y);
        }
        true
    }

    pub fn open_popover(
        &mut self,
        header: impl Into<String>,
        content: impl Into<String>,
        page_x: f64,
        page_y: f64,
    ) {
        self.overlays
            .open_popover(header.into(), content.into(), page_x, page_y);
    }

    /// Click ra ngoài thanh: ẩn popover.
    pub fn click_outside(&mut self) {
        self.overlays.fade_popover();
    }

    /// Gỡ mọi thứ instance đang giữ.
    pub fn dispose(&mut self) {
        self.overlays.teardown();
        self.rendered = None;
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        self.dispose();
    }
}
