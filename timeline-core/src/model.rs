use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};
use crate::interaction::PopoverContent;

/// Giá trị của một trường dữ liệu trên sự kiện.
///
/// Các giá trị cùng loại so sánh theo thứ tự tự nhiên; khác loại thì so theo
/// hạng `Null < Bool < Number < Text < Time`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Time(DateTime<Utc>),
}

impl FieldValue {
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Number(_) => 2,
            FieldValue::Text(_) => 3,
            FieldValue::Time(_) => 4,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Time(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Time(a), FieldValue::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            FieldValue::Null => {}
            FieldValue::Bool(value) => value.hash(state),
            // total_cmp bằng nhau <=> cùng bit pattern
            FieldValue::Number(value) => value.to_bits().hash(state),
            FieldValue::Text(value) => value.hash(state),
            FieldValue::Time(value) => value.hash(state),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("undefined"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Time(value) => f.write_str(&value.to_rfc3339()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Time(value)
    }
}

/// Một sự kiện có thời lượng trên timeline.
///
/// `kind` là nhãn phân loại dùng cho legend và tooltip, `color` là màu tô.
/// Các trường thời gian, category và group được tra theo tên cấu hình trong
/// `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldValue>,
}

impl Event {
    pub fn new(kind: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            color: color.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub(crate) fn require(&self, name: &str, index: usize) -> TimelineResult<&FieldValue> {
        self.field(name).ok_or_else(|| TimelineError::MissingField {
            field: name.to_string(),
            index,
        })
    }

    pub(crate) fn require_time(&self, name: &str, index: usize) -> TimelineResult<DateTime<Utc>> {
        self.require(name, index)?
            .as_time()
            .ok_or_else(|| TimelineError::InvalidFieldType {
                field: name.to_string(),
                index,
                expected: "thời gian",
            })
    }
}

/// Lề quanh vùng vẽ, tính bằng pixel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 50.0,
            left: 100.0,
        }
    }
}

/// Cấu hình ánh xạ trường và định dạng hiển thị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    pub from_field: String,
    pub to_field: String,
    pub category_field: String,
    pub group_field: String,
    /// Chuỗi strftime cho tooltip.
    pub time_label_format: String,
    pub margin: Margin,
    /// Khoảng đệm (phút) trước sự kiện sớm nhất.
    pub lead_in_minutes: u32,
    pub legend_font_size: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            from_field: "StartTime".to_string(),
            to_field: "EndTime".to_string(),
            category_field: "Category".to_string(),
            group_field: "Group".to_string(),
            time_label_format: "%H:%M".to_string(),
            margin: Margin::default(),
            lead_in_minutes: 10,
            legend_font_size: 12.0,
        }
    }
}

impl TimelineConfig {
    pub fn lead_in(&self) -> Duration {
        Duration::minutes(i64::from(self.lead_in_minutes))
    }

    /// Kiểm tra chuỗi định dạng thời gian trước khi dùng để render.
    pub fn validate(&self) -> TimelineResult<()> {
        if StrftimeItems::new(&self.time_label_format).any(|item| matches!(item, Item::Error)) {
            return Err(TimelineError::InvalidTimeFormat(
                self.time_label_format.clone(),
            ));
        }
        Ok(())
    }

    pub fn format_time(&self, value: DateTime<Utc>) -> String {
        value.format(&self.time_label_format).to_string()
    }
}

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Hàm định dạng nhãn category.
pub type CategoryLabelFormatter = Rc<dyn Fn(&FieldValue) -> Result<String, BoxError>>;

/// Hàm xử lý khi click vào một thanh: `(event, page_x, page_y)`. Nội dung
/// trả về (nếu có) được mở thành popover tại vị trí click.
pub type BarClickHandler = Rc<dyn Fn(&Event, f64, f64) -> Option<PopoverContent>>;

/// Các callback tùy chọn, truyền trực tiếp dưới dạng hàm có kiểu.
#[derive(Clone, Default)]
pub struct TimelineCallbacks {
    pub category_label_formatter: Option<CategoryLabelFormatter>,
    pub bar_clicked: Option<BarClickHandler>,
}

impl TimelineCallbacks {
    pub fn with_category_label_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<String, BoxError> + 'static,
    {
        self.category_label_formatter = Some(Rc::new(formatter));
        self
    }

    pub fn with_bar_clicked<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Event, f64, f64) -> Option<PopoverContent> + 'static,
    {
        self.bar_clicked = Some(Rc::new(handler));
        self
    }
}

impl fmt::Debug for TimelineCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineCallbacks")
            .field(
                "category_label_formatter",
                &self.category_label_formatter.is_some(),
            )
            .field("bar_clicked", &self.bar_clicked.is_some())
            .finish()
    }
}

/// Kích thước đo được của vùng chứa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub const FALLBACK_WIDTH: f64 = 500.0;
    pub const FALLBACK_HEIGHT: f64 = 200.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Kích thước thực dùng cho canvas, thay giá trị không dương bằng mặc định.
    pub fn canvas(&self) -> Size {
        let width = if self.width > 0.0 {
            self.width
        } else {
            Self::FALLBACK_WIDTH
        };
        let height = if self.height > 0.0 {
            self.height
        } else {
            Self::FALLBACK_HEIGHT
        };
        Size { width, height }
    }

    pub fn plot_area(&self, margin: &Margin) -> Size {
        let canvas = self.canvas();
        Size {
            width: (canvas.width - margin.left - margin.right).max(0.0),
            height: (canvas.height - margin.top - margin.bottom).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Hình chữ nhật nhỏ nhất chứa cả hai.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_kinds_order_by_rank() {
        let mut values = vec![
            FieldValue::from("b"),
            FieldValue::from(2.0),
            FieldValue::Null,
            FieldValue::from(true),
            FieldValue::from("a"),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::from(true),
                FieldValue::from(2.0),
                FieldValue::from("a"),
                FieldValue::from("b"),
            ]
        );
    }

    #[test]
    fn null_displays_as_undefined() {
        assert_eq!(FieldValue::Null.to_string(), "undefined");
        assert_eq!(FieldValue::from(3.0).to_string(), "3");
    }

    #[test]
    fn zero_sized_container_falls_back() {
        let plot = Container::new(0.0, -5.0).plot_area(&Margin::default());
        assert_eq!(plot.width, 370.0);
        assert_eq!(plot.height, 130.0);
    }

    #[test]
    fn invalid_time_format_is_rejected() {
        let config = TimelineConfig {
            time_label_format: "%H:%Q".to_string(),
            ..TimelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TimelineError::InvalidTimeFormat(_))
        ));
        assert!(TimelineConfig::default().validate().is_ok());
    }
}
