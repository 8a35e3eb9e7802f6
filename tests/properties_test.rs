//! Property checks for filter outcomes.

use event_filter::domain::{
    Event, Filter, PipelineContext, Polarity, StageOutcome, StageParams, ValueType,
};
use proptest::prelude::*;

/// Small alphabet so generated names collide with match values often.
fn name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(String::from)
}

fn polarity() -> impl Strategy<Value = Polarity> {
    prop_oneof![Just(Polarity::For), Just(Polarity::Out)]
}

fn build_filter(values: &[String], polarity: Polarity) -> Filter {
    match polarity {
        Polarity::For => Filter::new_for(values.iter().cloned()),
        Polarity::Out => Filter::new_out(values.iter().cloned()),
    }
}

fn build_event(profile: &str, device: &str, resources: &[String]) -> Event {
    let mut event = Event::new(profile, device, "source");
    for (i, r) in resources.iter().enumerate() {
        event
            .add_simple_reading(r.as_str(), ValueType::Uint32, i as u32)
            .unwrap();
    }
    event
}

proptest! {
    #[test]
    fn empty_match_set_always_continues(
        polarity in polarity(),
        profile in name(),
        device in name(),
        resources in prop::collection::vec(name(), 0..6),
    ) {
        let ctx = PipelineContext::new("prop");
        let filter = build_filter(&[], polarity);
        let event = build_event(&profile, &device, &resources);

        let expected = StageOutcome::Continue(event.clone());
        prop_assert_eq!(filter.filter_by_profile_name(&ctx, Some(event.clone()), None), expected.clone());
        prop_assert_eq!(filter.filter_by_device_name(&ctx, Some(event.clone()), None), expected.clone());
        prop_assert_eq!(filter.filter_by_resource_name(&ctx, Some(event), None), expected);
    }

    #[test]
    fn field_filter_is_membership_test(
        polarity in polarity(),
        values in prop::collection::vec(name(), 1..4),
        profile in name(),
        device in name(),
    ) {
        let ctx = PipelineContext::new("prop");
        let filter = build_filter(&values, polarity);
        let event = build_event(&profile, &device, &[]);

        let keep_profile = (polarity == Polarity::For) == values.contains(&profile);
        let outcome = filter.filter_by_profile_name(&ctx, Some(event.clone()), None);
        prop_assert_eq!(outcome.continues(), keep_profile);
        prop_assert!(outcome.error().is_none());

        let keep_device = (polarity == Polarity::For) == values.contains(&device);
        let outcome = filter.filter_by_device_name(&ctx, Some(event), None);
        prop_assert_eq!(outcome.continues(), keep_device);
        prop_assert!(outcome.error().is_none());
    }

    #[test]
    fn resource_filter_retains_predicate_matches_in_order(
        polarity in polarity(),
        values in prop::collection::vec(name(), 1..4),
        resources in prop::collection::vec(name(), 1..8),
    ) {
        let ctx = PipelineContext::new("prop");
        let filter = build_filter(&values, polarity);
        let event = build_event("p", "d", &resources);

        let expected: Vec<_> = event
            .readings
            .iter()
            .filter(|r| polarity.keeps(values.contains(&r.resource_name)))
            .cloned()
            .collect();

        match filter.filter_by_resource_name(&ctx, Some(event), None) {
            StageOutcome::Continue(filtered) => {
                prop_assert!(!expected.is_empty());
                prop_assert_eq!(filtered.readings, expected);
            }
            StageOutcome::Halt => prop_assert!(expected.is_empty()),
            StageOutcome::Fault(err) => prop_assert!(false, "unexpected fault: {}", err),
        }
    }

    #[test]
    fn missing_event_always_faults(
        polarity in polarity(),
        values in prop::collection::vec(name(), 0..4),
    ) {
        let ctx = PipelineContext::new("prop");
        let filter = build_filter(&values, polarity);

        for outcome in [
            filter.filter_by_profile_name(&ctx, None, None),
            filter.filter_by_device_name(&ctx, None, None),
            filter.filter_by_source_name(&ctx, None, None),
            filter.filter_by_resource_name(&ctx, None, None),
        ] {
            prop_assert!(!outcome.continues());
            prop_assert!(outcome.error().is_some());
        }
    }

    #[test]
    fn params_never_change_outcome(
        polarity in polarity(),
        values in prop::collection::vec(name(), 0..4),
        resources in prop::collection::vec(name(), 0..6),
        content_type in "[a-z]{1,8}/[a-z]{1,8}",
    ) {
        let ctx = PipelineContext::new("prop");
        let filter = build_filter(&values, polarity);
        let event = build_event("a", "b", &resources);
        let params = StageParams::with_content_type(content_type);

        prop_assert_eq!(
            filter.filter_by_resource_name(&ctx, Some(event.clone()), None),
            filter.filter_by_resource_name(&ctx, Some(event.clone()), Some(&params))
        );
        prop_assert_eq!(
            filter.filter_by_profile_name(&ctx, Some(event.clone()), None),
            filter.filter_by_profile_name(&ctx, Some(event), Some(&params))
        );
    }
}
