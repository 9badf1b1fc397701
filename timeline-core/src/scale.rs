//! Thang đo thời gian (trục ngang) và thang category (trục dọc).

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{TimelineError, TimelineResult};
use crate::grouping::Hierarchy;
use crate::model::{CategoryLabelFormatter, Event};

/// Khoảng thời gian đã kiểm tra của một sự kiện.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Đọc và kiểm tra khoảng thời gian của mọi sự kiện, theo đúng thứ tự đầu vào.
pub fn event_spans(
    events: &[Event],
    from_field: &str,
    to_field: &str,
) -> TimelineResult<Vec<TimeSpan>> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let start = event.require_time(from_field, index)?;
            let end = event.require_time(to_field, index)?;
            if end < start {
                return Err(TimelineError::InvalidTimeRange { index, start, end });
            }
            Ok(TimeSpan { start, end })
        })
        .collect()
}

/// Ánh xạ tuyến tính `[domain_min, domain_max] -> [0, width]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScale {
    domain_min: DateTime<Utc>,
    domain_max: DateTime<Utc>,
    width: f64,
}

impl TimeScale {
    pub fn new(domain_min: DateTime<Utc>, domain_max: DateTime<Utc>, width: f64) -> Self {
        Self {
            domain_min,
            domain_max,
            width,
        }
    }

    /// Cận dưới lùi `lead_in` trước thời điểm bắt đầu sớm nhất; cận trên
    /// khớp đúng thời điểm kết thúc muộn nhất.
    pub fn from_spans(spans: &[TimeSpan], lead_in: Duration, width: f64) -> TimelineResult<Self> {
        let earliest = spans
            .iter()
            .map(|span| span.start)
            .min()
            .ok_or(TimelineError::EmptyDataset)?;
        let latest = spans
            .iter()
            .map(|span| span.end)
            .max()
            .ok_or(TimelineError::EmptyDataset)?;

        Ok(Self::new(earliest - lead_in, latest, width))
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.domain_min, self.domain_max)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    fn span_millis(&self) -> i64 {
        (self.domain_max - self.domain_min).num_milliseconds()
    }

    pub fn map(&self, value: DateTime<Utc>) -> f64 {
        let span = self.span_millis();
        if span <= 0 {
            return 0.0;
        }
        let elapsed = (value - self.domain_min).num_milliseconds();
        elapsed as f64 / span as f64 * self.width
    }
}

/// Thang category: mỗi category chiếm một band cao bằng nhau.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScale {
    labels: Vec<String>,
    height: f64,
}

impl CategoryScale {
    pub fn new(labels: Vec<String>, height: f64) -> Self {
        Self { labels, height }
    }

    pub fn from_hierarchy(
        hierarchy: &Hierarchy<'_>,
        formatter: Option<&CategoryLabelFormatter>,
        height: f64,
    ) -> TimelineResult<Self> {
        let labels = hierarchy
            .categories
            .iter()
            .map(|node| match formatter {
                Some(format) => format(&node.category).map_err(|err| {
                    TimelineError::FormatterError {
                        category: node.category.to_string(),
                        message: err.to_string(),
                    }
                }),
                None => Ok(node.category.to_string()),
            })
            .collect::<TimelineResult<Vec<_>>>()?;

        Ok(Self::new(labels, height))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn band_height(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.height / self.labels.len() as f64
    }

    pub fn band_start(&self, index: usize) -> f64 {
        index as f64 * self.band_height()
    }

    pub fn band_center(&self, index: usize) -> f64 {
        self.band_start(index) + self.band_height() / 2.0
    }
}
