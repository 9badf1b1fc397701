//! Lõi dựng bố cục cho timeline hoạt động theo category.
//!
//! Luồng dữ liệu: danh sách sự kiện phẳng → phân nhóm category/group →
//! thang thời gian và thang category → hình học band/lane/thanh → legend.
//! Kết quả là một [`RenderPlan`] để bề mặt vẽ bên ngoài tiêu thụ.

pub mod axis;
pub mod error;
pub mod grouping;
pub mod interaction;
pub mod layout;
pub mod legend;
pub mod model;
pub mod plan;
pub mod scale;
pub mod timeline;

pub use axis::{AxisTick, CategoryAxis, TimeAxis};
pub use error::{TimelineError, TimelineResult};
pub use grouping::{group_events, CategoryNode, GroupNode, Hierarchy};
pub use interaction::{Fade, OverlayState, Popover, PopoverContent, Tooltip};
pub use layout::{BandGeometry, BarGeometry, LaneGeometry};
pub use legend::{LegendEntry, LegendItem, LegendLayout};
pub use model::{
    BarClickHandler, BoxError, CategoryLabelFormatter, Container, Event, FieldValue, Margin, Rect,
    Size, TimelineCallbacks, TimelineConfig,
};
pub use plan::{build_plan, RenderPlan};
pub use scale::{CategoryScale, TimeScale, TimeSpan};
pub use timeline::{Timeline, UpdateOutcome};
