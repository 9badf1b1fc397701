//! Legend tự sinh từ các thanh đã vẽ.
//!
//! Mỗi tag chỉ xuất hiện một lần. Khi nhiều thanh cùng tag, thanh có vị trí
//! dọc nhỏ nhất (gần đỉnh nhất) quyết định màu và vị trí của mục; nếu bằng
//! nhau thì giữ thanh gặp trước. Các mục được xếp theo vị trí tăng dần.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::Rect;

pub const LEGEND_PADDING: f64 = 5.0;
/// Khoảng cách từ đáy vùng vẽ tới legend.
pub const LEGEND_OFFSET: f64 = 40.0;
const ENTRY_WIDTH_EM: f64 = 10.0;
const SWATCH_SIZE_EM: f64 = 0.7;
const SWATCH_TOP_EM: f64 = -0.65;
const SWATCH_LEAD_EM: f64 = 1.0;
const CHAR_ADVANCE_EM: f64 = 0.6;
const ASCENT_EM: f64 = 0.8;
const DESCENT_EM: f64 = 0.2;

/// Một phần tử tương tác đã vẽ: tag, màu và vị trí dọc.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendMark {
    pub tag: String,
    pub color: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub tag: String,
    pub color: String,
    pub position: f64,
}

/// Gộp theo tag và sắp xếp theo vị trí xuất hiện đầu tiên.
pub fn collect_entries<I>(marks: I) -> Vec<LegendEntry>
where
    I: IntoIterator<Item = LegendMark>,
{
    let mut by_tag: IndexMap<String, LegendEntry> = IndexMap::new();
    for mark in marks {
        match by_tag.entry(mark.tag) {
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if mark.position < entry.position {
                    entry.color = mark.color;
                    entry.position = mark.position;
                }
            }
            Entry::Vacant(slot) => {
                let tag = slot.key().clone();
                slot.insert(LegendEntry {
                    tag,
                    color: mark.color,
                    position: mark.position,
                });
            }
        }
    }

    let mut entries: Vec<LegendEntry> = by_tag.into_values().collect();
    entries.sort_by(|a, b| a.position.total_cmp(&b.position));
    entries
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub tag: String,
    pub color: String,
    pub text_x: f64,
    pub text_y: f64,
    pub swatch: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendLayout {
    /// Gốc tọa độ của legend trong vùng vẽ.
    pub origin_y: f64,
    pub font_size: f64,
    pub items: Vec<LegendItem>,
    /// Khung bao quanh mọi mục, đã cộng padding.
    pub bounds: Rect,
}

pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * CHAR_ADVANCE_EM * font_size
}

/// Xếp các mục theo hàng ngang, mỗi mục rộng 10em.
pub fn layout_legend(entries: &[LegendEntry], font_size: f64, origin_y: f64) -> LegendLayout {
    let em = font_size;
    let mut items = Vec::with_capacity(entries.len());
    let mut content: Option<Rect> = None;

    for (index, entry) in entries.iter().enumerate() {
        let text_x = index as f64 * ENTRY_WIDTH_EM * em;
        let swatch = Rect::new(
            (index as f64 * ENTRY_WIDTH_EM - SWATCH_LEAD_EM) * em,
            SWATCH_TOP_EM * em,
            SWATCH_SIZE_EM * em,
            SWATCH_SIZE_EM * em,
        );
        let text_box = Rect::new(
            text_x,
            -ASCENT_EM * em,
            estimate_text_width(&entry.tag, em),
            (ASCENT_EM + DESCENT_EM) * em,
        );
        let item_box = text_box.union(&swatch);
        content = Some(match content {
            Some(current) => current.union(&item_box),
            None => item_box,
        });

        items.push(LegendItem {
            tag: entry.tag.clone(),
            color: entry.color.clone(),
            text_x,
            text_y: 0.0,
            swatch,
        });
    }

    let bounds = content
        .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
        .inflate(LEGEND_PADDING);

    LegendLayout {
        origin_y,
        font_size,
        items,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mark(tag: &str, color: &str, position: f64) -> LegendMark {
        LegendMark {
            tag: tag.to_string(),
            color: color.to_string(),
            position,
        }
    }

    #[test]
    fn topmost_mark_supplies_color() {
        let entries = collect_entries(vec![
            mark("Meeting", "orange", 40.0),
            mark("Focus", "green", 20.0),
            mark("Meeting", "red", 6.0),
        ]);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tag, "Meeting");
        assert_eq!(entries[0].color, "red");
        assert_eq!(entries[1].tag, "Focus");
    }

    #[test]
    fn equal_positions_keep_first_seen() {
        let entries = collect_entries(vec![
            mark("B", "blue", 6.0),
            mark("A", "gray", 6.0),
            mark("B", "black", 6.0),
        ]);
        let tags: Vec<&str> = entries.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["B", "A"]);
        assert_eq!(entries[0].color, "blue");
    }

    #[test]
    fn single_entry_bounds_include_swatch_and_padding() {
        let entries = collect_entries(vec![mark("Work", "navy", 0.0)]);
        let layout = layout_legend(&entries, 12.0, 170.0);

        let swatch = layout.items[0].swatch;
        assert_relative_eq!(swatch.x, -12.0, epsilon = 1e-9);
        assert_relative_eq!(swatch.width, 8.4, epsilon = 1e-9);

        let bounds = layout.bounds;
        assert_relative_eq!(bounds.x, -17.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.y, -14.6, epsilon = 1e-9);
        assert_relative_eq!(bounds.width, 50.8, epsilon = 1e-9);
        assert_relative_eq!(bounds.height, 22.0, epsilon = 1e-9);
    }

    #[test]
    fn entries_advance_by_ten_em() {
        let entries = collect_entries(vec![mark("A", "red", 0.0), mark("B", "blue", 10.0)]);
        let layout = layout_legend(&entries, 12.0, 0.0);
        assert_eq!(layout.items[1].text_x, 120.0);
        assert_relative_eq!(layout.items[1].swatch.x, 108.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_legend_is_padding_only() {
        let layout = layout_legend(&[], 12.0, 0.0);
        assert_eq!(layout.bounds, Rect::new(-5.0, -5.0, 10.0, 10.0));
    }
}
