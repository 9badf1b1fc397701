use activity_timeline_core::{
    build_plan, Container, Event, RenderPlan, TimeScale, TimelineCallbacks, TimelineConfig,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn events_from(specs: &[(u8, u8, i64, i64)]) -> Vec<Event> {
    specs
        .iter()
        .enumerate()
        .map(|(index, &(cat, grp, start, length))| {
            let start_time = base() + Duration::minutes(start);
            Event::new(format!("kind-{}", index % 3), format!("color-{index}"))
                .with_field("Category", format!("cat-{cat}"))
                .with_field("Group", format!("grp-{grp}"))
                .with_field("StartTime", start_time)
                .with_field("EndTime", start_time + Duration::minutes(length))
        })
        .collect()
}

fn plan_for(events: &[Event], height: f64) -> RenderPlan {
    build_plan(
        events,
        &TimelineConfig::default(),
        &TimelineCallbacks::default(),
        &Container::new(640.0, height),
    )
    .expect("plan builds")
}

fn event_specs() -> impl Strategy<Value = Vec<(u8, u8, i64, i64)>> {
    prop::collection::vec((0u8..4, 0u8..3, 0i64..1_440, 0i64..600), 1..40)
}

proptest! {
    #[test]
    fn every_event_lands_in_exactly_one_bar(specs in event_specs()) {
        let events = events_from(&specs);
        let plan = plan_for(&events, 320.0);

        let mut seen: Vec<usize> = plan.bars.iter().map(|bar| bar.event_index).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..events.len()).collect::<Vec<_>>());

        for bar in &plan.bars {
            let event = &events[bar.event_index];
            let band = &plan.bands[bar.category_index];
            prop_assert_eq!(Some(&band.category), event.field("Category"));
            prop_assert_eq!(Some(&band.lanes[bar.lane_index].group), event.field("Group"));
        }
    }

    #[test]
    fn domain_bounds_are_exact(specs in event_specs()) {
        let events = events_from(&specs);
        let plan = plan_for(&events, 320.0);

        let earliest = specs.iter().map(|s| s.2).min().unwrap_or_default();
        let latest = specs.iter().map(|s| s.2 + s.3).max().unwrap_or_default();
        prop_assert_eq!(plan.domain_start, base() + Duration::minutes(earliest - 10));
        prop_assert_eq!(plan.domain_end, base() + Duration::minutes(latest));
    }

    #[test]
    fn bands_fill_plot_height_and_share_lane_count(
        specs in event_specs(),
        height in 120.0f64..1_200.0,
    ) {
        let events = events_from(&specs);
        let plan = plan_for(&events, height);

        let total: f64 = plan.bands.iter().map(|band| band.height).sum();
        prop_assert!((total - plan.plot.height).abs() <= 1e-6);

        let expected_lane = ((plan.bands[0].height - 6.0) / plan.max_lanes as f64).max(0.0);
        for band in &plan.bands {
            for lane in &band.lanes {
                prop_assert!((lane.height - expected_lane).abs() <= 1e-9);
            }
        }
    }

    #[test]
    fn projected_width_grows_with_duration(
        start in 0i64..10_000,
        shorter in 0i64..5_000,
        extra in 0i64..5_000,
        width in 10.0f64..4_000.0,
    ) {
        let origin = base();
        let scale = TimeScale::new(origin, origin + Duration::minutes(20_000), width);
        let from = origin + Duration::minutes(start);
        let short = scale.map(from + Duration::minutes(shorter)) - scale.map(from);
        let long = scale.map(from + Duration::minutes(shorter + extra)) - scale.map(from);

        prop_assert!(short >= 0.0);
        prop_assert!(long >= short);
    }

    #[test]
    fn identical_input_gives_identical_legend(specs in event_specs()) {
        let events = events_from(&specs);
        let first = plan_for(&events, 320.0);
        let second = plan_for(&events, 320.0);

        prop_assert_eq!(&first.legend, &second.legend);
        let mut tags: Vec<&str> = first.legend.items.iter().map(|item| item.tag.as_str()).collect();
        let count = tags.len();
        tags.sort_unstable();
        tags.dedup();
        prop_assert_eq!(tags.len(), count);
    }
}
