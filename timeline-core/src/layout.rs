//! Chia band theo category, lane theo group và tính hình chữ nhật cho từng
//! sự kiện.

use serde::Serialize;
use tracing::{debug, warn};

use crate::grouping::Hierarchy;
use crate::model::FieldValue;
use crate::scale::{CategoryScale, TimeScale, TimeSpan};

/// Khoảng trống phía trên mỗi band.
pub const BAND_TOP_INSET: f64 = 6.0;
/// Phần chiều cao band không dùng cho thanh (inset trên và dưới).
pub const BAR_VERTICAL_INSET: f64 = 12.0;
pub const LANE_GAP: f64 = 3.0;
/// Thanh có độ rộng không dương vẫn được vẽ với độ rộng này.
pub const MIN_BAR_WIDTH: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneGeometry {
    pub group: FieldValue,
    pub y: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandGeometry {
    pub category: FieldValue,
    pub label: String,
    pub y: f64,
    pub height: f64,
    /// Đường phân cách kéo từ `x = 0` tới `separator_width` ở đỉnh band.
    pub separator_width: f64,
    pub lanes: Vec<LaneGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    /// Vị trí của sự kiện trong danh sách đầu vào.
    pub event_index: usize,
    pub category_index: usize,
    pub lane_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub tag: String,
}

impl BarGeometry {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BandLayout {
    pub bands: Vec<BandGeometry>,
    pub bars: Vec<BarGeometry>,
}

/// Chiều cao một lane khi band cao `band_height` được chia cho `lanes` lane,
/// không âm.
pub fn lane_height(band_height: f64, lanes: usize) -> f64 {
    if lanes == 0 {
        return 0.0;
    }
    ((band_height - BAND_TOP_INSET) / lanes as f64).max(0.0)
}

/// Khoảng trống phía trên lane đầu tiên; band thấp hơn inset thì lane nằm ở
/// đáy band.
fn top_inset(band_height: f64) -> f64 {
    BAND_TOP_INSET.min(band_height.max(0.0))
}

/// Chiều cao thanh, không âm.
pub fn bar_height(band_height: f64, lanes: usize) -> f64 {
    if lanes == 0 {
        return 0.0;
    }
    ((band_height - BAR_VERTICAL_INSET) / lanes as f64 - LANE_GAP).max(0.0)
}

/// Dựng hình học cho mọi band, lane và thanh.
///
/// Mọi band đều chia theo `hierarchy.max_lanes`, kể cả khi category đó dùng
/// ít lane hơn; phần lane thừa để trống. `spans` được đánh chỉ số theo vị trí
/// sự kiện trong dữ liệu gốc.
pub fn layout_bands(
    hierarchy: &Hierarchy<'_>,
    spans: &[TimeSpan],
    time_scale: &TimeScale,
    category_scale: &CategoryScale,
) -> BandLayout {
    let lanes = hierarchy.max_lanes;
    if lanes == 0 {
        debug!("no lanes to lay out, skipping band layout");
        return BandLayout::default();
    }

    debug_assert!(
        hierarchy
            .categories
            .iter()
            .flat_map(|category| &category.groups)
            .flat_map(|group| &group.events)
            .all(|&(event_index, _)| event_index < spans.len()),
        "mỗi sự kiện trong hierarchy phải có khoảng thời gian tương ứng"
    );

    let band_height = category_scale.band_height();
    let inset = top_inset(band_height);
    let lane_step = lane_height(band_height, lanes);
    let bar_h = bar_height(band_height, lanes);
    let mut layout = BandLayout::default();

    for (category_index, (node, label)) in hierarchy
        .categories
        .iter()
        .zip(category_scale.labels())
        .enumerate()
    {
        let band_y = category_scale.band_start(category_index);
        let mut band = BandGeometry {
            category: node.category.clone(),
            label: label.clone(),
            y: band_y,
            height: band_height,
            separator_width: time_scale.width(),
            lanes: Vec::with_capacity(node.groups.len()),
        };

        for (lane_index, group) in node.groups.iter().enumerate() {
            let lane_y = band_y + inset + lane_index as f64 * lane_step;
            band.lanes.push(LaneGeometry {
                group: group.group.clone(),
                y: lane_y,
                height: lane_step,
            });

            for &(event_index, event) in &group.events {
                let Some(span) = spans.get(event_index) else {
                    warn!(event_index, "event has no time span, bar skipped");
                    continue;
                };
                let x = time_scale.map(span.start);
                let mut width = time_scale.map(span.end) - x;
                if width <= 0.0 {
                    width = MIN_BAR_WIDTH;
                }
                layout.bars.push(BarGeometry {
                    event_index,
                    category_index,
                    lane_index,
                    x,
                    y: lane_y,
                    width,
                    height: bar_h,
                    fill: event.color.clone(),
                    tag: event.kind.clone(),
                });
            }
        }

        layout.bands.push(band);
    }

    debug!(
        bands = layout.bands.len(),
        bars = layout.bars.len(),
        lanes,
        band_height,
        "laid out timeline bands"
    );

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_events;
    use crate::model::Event;
    use crate::scale::event_spans;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn event(category: &str, group: &str, start: (u32, u32), end: (u32, u32)) -> Event {
        let day = |(h, m): (u32, u32)| Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap();
        Event::new("Shift", "teal")
            .with_field("cat", category)
            .with_field("grp", group)
            .with_field("StartTime", day(start))
            .with_field("EndTime", day(end))
    }

    fn lay_out(events: &[Event], width: f64, height: f64) -> BandLayout {
        let hierarchy = group_events(events, "cat", "grp").unwrap();
        let spans = event_spans(events, "StartTime", "EndTime").unwrap();
        let time = TimeScale::from_spans(&spans, Duration::minutes(10), width).unwrap();
        let categories = CategoryScale::from_hierarchy(&hierarchy, None, height).unwrap();
        layout_bands(&hierarchy, &spans, &time, &categories)
    }

    #[test]
    fn single_category_spans_full_height() {
        let events = vec![event("A", "g1", (10, 0), (11, 0))];
        let layout = lay_out(&events, 300.0, 130.0);

        assert_eq!(layout.bands.len(), 1);
        assert_eq!(layout.bands[0].y, 0.0);
        assert_eq!(layout.bands[0].height, 130.0);
        let bar = &layout.bars[0];
        assert_eq!(bar.y, BAND_TOP_INSET);
        assert_relative_eq!(bar.height, 130.0 - 12.0 - 3.0, epsilon = 1e-9);
    }

    #[test]
    fn lanes_use_global_maximum() {
        let events = vec![
            event("A", "g1", (10, 0), (10, 30)),
            event("A", "g2", (10, 15), (10, 45)),
            event("A", "g3", (10, 15), (10, 45)),
            event("B", "g1", (9, 50), (10, 10)),
        ];
        let layout = lay_out(&events, 300.0, 200.0);

        let band_b = &layout.bands[1];
        assert_eq!(band_b.lanes.len(), 1);
        assert_relative_eq!(band_b.lanes[0].height, (100.0 - 6.0) / 3.0, epsilon = 1e-9);
        assert_relative_eq!(layout.bands[0].lanes[2].y, 6.0 + 2.0 * (100.0 - 6.0) / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_length_event_gets_minimum_width() {
        let events = vec![
            event("A", "g1", (10, 0), (10, 0)),
            event("A", "g1", (10, 0), (12, 0)),
        ];
        let layout = lay_out(&events, 260.0, 100.0);
        assert_eq!(layout.bars[0].width, MIN_BAR_WIDTH);
        assert!(layout.bars[1].width > MIN_BAR_WIDTH);
    }

    #[test]
    fn short_bands_keep_lanes_inside_the_band() {
        let events = vec![
            event("A", "g1", (10, 0), (11, 0)),
            event("A", "g2", (10, 0), (11, 0)),
            event("B", "g1", (10, 30), (11, 0)),
        ];
        let layout = lay_out(&events, 400.0, 8.0);

        for band in &layout.bands {
            assert_eq!(band.height, 4.0);
            for lane in &band.lanes {
                assert_eq!(lane.height, 0.0);
                assert!(lane.y >= band.y && lane.y <= band.y + band.height);
            }
        }
        assert!(layout.bars.iter().all(|bar| bar.height == 0.0));
    }

    #[test]
    fn tiny_bands_clamp_bar_height() {
        assert_eq!(bar_height(10.0, 2), 0.0);
        assert_eq!(bar_height(40.0, 0), 0.0);
        assert_relative_eq!(bar_height(42.0, 2), 12.0, epsilon = 1e-9);
        assert_eq!(lane_height(4.0, 2), 0.0);
        assert_relative_eq!(lane_height(46.0, 2), 20.0, epsilon = 1e-9);
    }
}
