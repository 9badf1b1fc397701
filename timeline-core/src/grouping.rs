//! Phân nhóm sự kiện theo category rồi theo group.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{TimelineError, TimelineResult};
use crate::model::{Event, FieldValue};

/// Các sự kiện cùng cặp (category, group), giữ thứ tự sau khi sắp xếp.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode<'a> {
    pub group: FieldValue,
    /// `(vị trí trong dữ liệu gốc, sự kiện)`.
    pub events: Vec<(usize, &'a Event)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode<'a> {
    pub category: FieldValue,
    pub groups: Vec<GroupNode<'a>>,
}

/// Cây category → group → sự kiện, dựng lại ở mỗi lần update.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy<'a> {
    pub categories: Vec<CategoryNode<'a>>,
    /// Số lane lớn nhất trên mọi category; mọi band đều chia theo số này.
    pub max_lanes: usize,
}

impl Hierarchy<'_> {
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

/// Sắp xếp ổn định theo category, cắt thành từng đoạn liên tiếp, sau đó chia
/// mỗi đoạn theo group với thứ tự xuất hiện đầu tiên.
pub fn group_events<'a>(
    events: &'a [Event],
    category_field: &str,
    group_field: &str,
) -> TimelineResult<Hierarchy<'a>> {
    if events.is_empty() {
        return Err(TimelineError::EmptyDataset);
    }

    let mut keyed = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        let category = event.require(category_field, index)?;
        let group = event.require(group_field, index)?;
        keyed.push((category, group, index, event));
    }
    keyed.sort_by(|a, b| a.0.cmp(b.0));

    let mut categories: Vec<CategoryNode<'a>> = Vec::new();
    let mut run: IndexMap<&FieldValue, Vec<(usize, &'a Event)>> = IndexMap::new();
    let mut current: Option<&FieldValue> = None;

    for (category, group, index, event) in keyed {
        if let Some(previous) = current {
            if previous != category {
                categories.push(close_category(previous, std::mem::take(&mut run)));
            }
        }
        current = Some(category);
        run.entry(group).or_default().push((index, event));
    }
    if let Some(previous) = current {
        categories.push(close_category(previous, run));
    }

    let max_lanes = categories
        .iter()
        .map(|category| category.groups.len())
        .max()
        .unwrap_or(0);

    trace!(
        categories = categories.len(),
        max_lanes,
        "grouped timeline events"
    );

    Ok(Hierarchy {
        categories,
        max_lanes,
    })
}

fn close_category<'a>(
    category: &FieldValue,
    run: IndexMap<&FieldValue, Vec<(usize, &'a Event)>>,
) -> CategoryNode<'a> {
    CategoryNode {
        category: category.clone(),
        groups: run
            .into_iter()
            .map(|(group, events)| GroupNode {
                group: group.clone(),
                events,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(category: &str, group: &str) -> Event {
        Event::new("Work", "steelblue")
            .with_field("cat", category)
            .with_field("grp", group)
    }

    #[test]
    fn categories_follow_sorted_order() {
        let events = vec![event("B", "g1"), event("A", "g2"), event("A", "g1")];
        let hierarchy = group_events(&events, "cat", "grp").unwrap();

        let labels: Vec<String> = hierarchy
            .categories
            .iter()
            .map(|c| c.category.to_string())
            .collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn groups_keep_first_occurrence_order() {
        let events = vec![event("A", "z"), event("A", "a"), event("A", "z")];
        let hierarchy = group_events(&events, "cat", "grp").unwrap();

        let category = &hierarchy.categories[0];
        let groups: Vec<String> = category.groups.iter().map(|g| g.group.to_string()).collect();
        assert_eq!(groups, vec!["z", "a"]);
        assert_eq!(category.groups[0].events.len(), 2);
        assert_eq!(hierarchy.max_lanes, 2);
    }

    #[test]
    fn null_value_is_a_regular_key() {
        let events = vec![
            Event::new("Work", "red")
                .with_field("cat", FieldValue::Null)
                .with_field("grp", "g"),
            event("A", "g"),
        ];
        let hierarchy = group_events(&events, "cat", "grp").unwrap();
        assert_eq!(hierarchy.category_count(), 2);
        assert_eq!(hierarchy.categories[0].category, FieldValue::Null);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = group_events(&[], "cat", "grp").unwrap_err();
        assert!(matches!(err, TimelineError::EmptyDataset));
    }

    #[test]
    fn missing_group_field_reports_index() {
        let events = vec![
            event("A", "g"),
            Event::new("Work", "red").with_field("cat", "A"),
        ];
        let err = group_events(&events, "cat", "grp").unwrap_err();
        assert!(matches!(
            err,
            TimelineError::MissingField { ref field, index: 1 } if field == "grp"
        ));
    }
}
