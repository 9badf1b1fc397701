use chrono::{DateTime, Utc};

/// Lỗi chung khi dựng timeline.
///
/// Mọi lỗi đều là vi phạm hợp đồng dữ liệu, được trả về đồng bộ cho nơi gọi
/// `update` và không có cơ chế thử lại.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Không có sự kiện nào để dựng timeline")]
    EmptyDataset,
    #[error("Sự kiện #{index} thiếu trường `{field}`")]
    MissingField { field: String, index: usize },
    #[error("Trường `{field}` của sự kiện #{index} không phải kiểu {expected}")]
    InvalidFieldType {
        field: String,
        index: usize,
        expected: &'static str,
    },
    #[error("Không định dạng được nhãn cho category `{category}`: {message}")]
    FormatterError { category: String, message: String },
    #[error("Sự kiện #{index} kết thúc ({end}) trước khi bắt đầu ({start})")]
    InvalidTimeRange {
        index: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Định dạng thời gian không hợp lệ: {0}")]
    InvalidTimeFormat(String),
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}

pub type TimelineResult<T> = Result<T, TimelineError>;
