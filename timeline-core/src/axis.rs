use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::Serialize;

use crate::scale::{CategoryScale, TimeScale};

/// Nhãn giờ 2 chữ số trên trục thời gian.
pub const HOUR_TICK_FORMAT: &str = "%H";
/// Miền dài hơn số giờ này thì bước giữa hai mốc giãn thành bội số giờ.
pub const MAX_HOUR_TICKS: i64 = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    /// Tọa độ dọc theo trục (x với trục thời gian, y với trục category).
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAxis {
    /// Trục nằm ở đáy vùng vẽ.
    pub y: f64,
    pub ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAxis {
    pub ticks: Vec<AxisTick>,
}

/// Các mốc giờ tròn nằm trong miền của thang thời gian, tối đa
/// `MAX_HOUR_TICKS` mốc.
pub fn hour_ticks(scale: &TimeScale) -> Vec<DateTime<Utc>> {
    let (min, max) = scale.domain();
    let hour = Duration::hours(1);
    let Ok(mut tick) = min.duration_trunc(hour) else {
        return Vec::new();
    };
    if tick < min {
        tick += hour;
    }
    if tick > max {
        return Vec::new();
    }

    let whole_hours = (max - tick).num_hours() + 1;
    let stride = (whole_hours + MAX_HOUR_TICKS - 1) / MAX_HOUR_TICKS;
    let step = Duration::hours(stride);

    let mut ticks = Vec::new();
    while tick <= max {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

pub fn time_axis(scale: &TimeScale, plot_height: f64) -> TimeAxis {
    let ticks = hour_ticks(scale)
        .into_iter()
        .map(|tick| AxisTick {
            offset: scale.map(tick),
            label: tick.format(HOUR_TICK_FORMAT).to_string(),
        })
        .collect();
    TimeAxis {
        y: plot_height,
        ticks,
    }
}

pub fn category_axis(scale: &CategoryScale) -> CategoryAxis {
    let ticks = scale
        .labels()
        .iter()
        .enumerate()
        .map(|(index, label)| AxisTick {
            offset: scale.band_center(index),
            label: label.clone(),
        })
        .collect();
    CategoryAxis { ticks }
}
