use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::axis::{category_axis, time_axis, CategoryAxis, TimeAxis};
use crate::error::{TimelineError, TimelineResult};
use crate::grouping::group_events;
use crate::layout::{layout_bands, BandGeometry, BarGeometry};
use crate::legend::{collect_entries, layout_legend, LegendLayout, LegendMark, LEGEND_OFFSET};
use crate::model::{Container, Event, Margin, Size, TimelineCallbacks, TimelineConfig};
use crate::scale::{event_spans, CategoryScale, TimeScale, TimeSpan};

/// Tập lệnh vẽ hoàn chỉnh cho một lần render.
///
/// Tọa độ của band, thanh và trục tính trong vùng vẽ (đã trừ lề); bề mặt vẽ
/// dịch toàn bộ theo `margin.left`, `margin.top`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub canvas: Size,
    pub margin: Margin,
    pub plot: Size,
    pub domain_start: DateTime<Utc>,
    pub domain_end: DateTime<Utc>,
    pub max_lanes: usize,
    pub time_axis: TimeAxis,
    pub category_axis: CategoryAxis,
    pub bands: Vec<BandGeometry>,
    pub bars: Vec<BarGeometry>,
    pub legend: LegendLayout,
}

impl RenderPlan {
    /// Thanh trên cùng (vẽ sau cùng) chứa điểm `(x, y)` trong vùng vẽ.
    pub fn bar_at(&self, x: f64, y: f64) -> Option<usize> {
        self.bars.iter().rposition(|bar| bar.contains(x, y))
    }
}

pub(crate) struct BuiltPlan {
    pub plan: RenderPlan,
    pub spans: Vec<TimeSpan>,
}

/// Chạy toàn bộ pipeline: kiểm tra dữ liệu, phân nhóm, dựng thang đo, chia
/// band và sinh legend.
pub fn build_plan(
    events: &[Event],
    config: &TimelineConfig,
    callbacks: &TimelineCallbacks,
    container: &Container,
) -> TimelineResult<RenderPlan> {
    build(events, config, callbacks, container).map(|built| built.plan)
}

pub(crate) fn build(
    events: &[Event],
    config: &TimelineConfig,
    callbacks: &TimelineCallbacks,
    container: &Container,
) -> TimelineResult<BuiltPlan> {
    config.validate()?;
    if events.is_empty() {
        return Err(TimelineError::EmptyDataset);
    }

    let spans = event_spans(events, &config.from_field, &config.to_field)?;
    let hierarchy = group_events(events, &config.category_field, &config.group_field)?;

    let canvas = container.canvas();
    let plot = container.plot_area(&config.margin);
    let time_scale = TimeScale::from_spans(&spans, config.lead_in(), plot.width)?;
    let category_scale = CategoryScale::from_hierarchy(
        &hierarchy,
        callbacks.category_label_formatter.as_ref(),
        plot.height,
    )?;

    let layout = layout_bands(&hierarchy, &spans, &time_scale, &category_scale);
    let entries = collect_entries(layout.bars.iter().map(|bar| LegendMark {
        tag: bar.tag.clone(),
        color: bar.fill.clone(),
        position: bar.y,
    }));
    let legend = layout_legend(
        &entries,
        config.legend_font_size,
        plot.height + LEGEND_OFFSET,
    );

    let (domain_start, domain_end) = time_scale.domain();
    debug!(
        events = events.len(),
        categories = hierarchy.category_count(),
        legend_entries = entries.len(),
        %domain_start,
        %domain_end,
        "built timeline render plan"
    );

    Ok(BuiltPlan {
        plan: RenderPlan {
            canvas,
            margin: config.margin,
            plot,
            domain_start,
            domain_end,
            max_lanes: hierarchy.max_lanes,
            time_axis: time_axis(&time_scale, plot.height),
            category_axis: category_axis(&category_scale),
            bands: layout.bands,
            bars: layout.bars,
            legend,
        },
        spans,
    })
}
