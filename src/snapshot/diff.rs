//! Change detection between consecutive snapshots
//!
//! Used by compaction: a new snapshot is stored only if it differs from the
//! last stored one.
//!
//! Only the keys of `current` are scanned. A key that exists solely in
//! `previous` is caught by the length check alone, which is the behavior
//! existing recordings were produced with.

use super::{AttributeValue, Snapshot, FRAME_KEY, TIME_KEY};

/// Top-level keys that change every tick and are never compared
pub const VOLATILE_KEYS: [&str; 2] = [FRAME_KEY, TIME_KEY];

/// Check whether `current` differs from `previous`
pub fn snapshot_changed(previous: &Snapshot, current: &Snapshot) -> bool {
    changed(previous, current, true)
}

fn changed(previous: &Snapshot, current: &Snapshot, top_level: bool) -> bool {
    if previous.len() != current.len() {
        return true;
    }

    for (key, value) in current.iter() {
        if top_level && VOLATILE_KEYS.contains(&key) {
            continue;
        }

        let Some(old) = previous.get(key) else {
            return true;
        };

        if values_differ(old, value) {
            return true;
        }
    }

    false
}

fn values_differ(old: &AttributeValue, new: &AttributeValue) -> bool {
    match (old, new) {
        // Ordered comparison; lists are sorted when built
        (AttributeValue::List(a), AttributeValue::List(b)) => a != b,
        (AttributeValue::Nested(a), AttributeValue::Nested(b)) => changed(a, b, false),
        // NaN compares equal to itself so a stuck NaN does not defeat compaction
        (AttributeValue::Number(a), AttributeValue::Number(b)) => {
            !(a == b || (a.is_nan() && b.is_nan()))
        }
        (a, b) => a != b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> Snapshot {
        Snapshot::new()
            .with(FRAME_KEY, 0i64)
            .with(TIME_KEY, 0.0f64)
            .with("PositionX", 1.0f64)
            .with("Actions", vec!["Jump".to_string(), "Left".to_string()])
            .with("AnalogActions", Snapshot::new().with("Left", 0.5f64))
    }

    #[test]
    fn test_identical_snapshots_unchanged() {
        assert!(!snapshot_changed(&base(), &base()));
    }

    #[test]
    fn test_frame_and_time_ignored_at_top_level() {
        let mut later = base();
        later.insert(FRAME_KEY, 42i64);
        later.insert(TIME_KEY, 0.84f64);
        assert!(!snapshot_changed(&base(), &later));
    }

    #[test]
    fn test_nested_frame_key_is_compared() {
        let previous = base().with("Nested", Snapshot::new().with(FRAME_KEY, 1i64));
        let current = base().with("Nested", Snapshot::new().with(FRAME_KEY, 2i64));
        assert!(snapshot_changed(&previous, &current));
    }

    #[test]
    fn test_key_count_difference() {
        let previous = Snapshot::new().with("a", 1i64);
        let current = Snapshot::new().with("a", 1i64).with("b", 2i64);
        assert!(snapshot_changed(&previous, &current));
        assert!(snapshot_changed(&current, &previous));
    }

    #[test]
    fn test_renamed_key_detected() {
        let previous = Snapshot::new().with("a", 1i64);
        let current = Snapshot::new().with("b", 1i64);
        assert!(snapshot_changed(&previous, &current));
    }

    #[test]
    fn test_scalar_change() {
        let mut current = base();
        current.insert("PositionX", 1.25f64);
        assert!(snapshot_changed(&base(), &current));
    }

    #[test]
    fn test_list_order_matters() {
        let mut current = base();
        current.insert("Actions", vec!["Left".to_string(), "Jump".to_string()]);
        assert!(snapshot_changed(&base(), &current));
    }

    #[test]
    fn test_list_length_matters() {
        let mut current = base();
        current.insert("Actions", vec!["Jump".to_string()]);
        assert!(snapshot_changed(&base(), &current));
    }

    #[test]
    fn test_nested_value_change() {
        let mut current = base();
        current.insert("AnalogActions", Snapshot::new().with("Left", 0.6f64));
        assert!(snapshot_changed(&base(), &current));
    }

    #[test]
    fn test_nested_key_set_change() {
        let mut current = base();
        current.insert("AnalogActions", Snapshot::new());
        assert!(snapshot_changed(&base(), &current));
    }

    #[test]
    fn test_variant_change() {
        let previous = Snapshot::new().with("v", 1i64);
        let current = Snapshot::new().with("v", 1.0f64);
        assert!(snapshot_changed(&previous, &current));
    }

    #[test]
    fn test_nan_equals_nan() {
        let snapshot = Snapshot::new().with("VelocityX", f64::NAN);
        assert!(!snapshot_changed(&snapshot, &snapshot.clone()));
    }

    fn arb_leaf() -> impl Strategy<Value = AttributeValue> {
        prop_oneof![
            any::<bool>().prop_map(AttributeValue::Bool),
            any::<i64>().prop_map(AttributeValue::Integer),
            any::<f64>().prop_map(AttributeValue::Number),
            "[a-z]{0,6}".prop_map(AttributeValue::Text),
            prop::collection::vec("[A-Z][a-z]{0,5}", 0..4).prop_map(AttributeValue::List),
        ]
    }

    fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
        let leaf_map = prop::collection::vec(("[a-z]{1,4}", arb_leaf()), 0..5).prop_map(|entries| {
            let mut snapshot = Snapshot::new();
            for (k, v) in entries {
                snapshot.insert(k, v);
            }
            snapshot
        });
        (
            prop::collection::vec(("[a-z]{1,4}", arb_leaf()), 0..6),
            prop::option::of(leaf_map),
        )
            .prop_map(|(entries, nested)| {
                let mut snapshot = Snapshot::new();
                for (k, v) in entries {
                    snapshot.insert(k, v);
                }
                if let Some(nested) = nested {
                    snapshot.insert("Nested", nested);
                }
                snapshot
            })
    }

    proptest! {
        #[test]
        fn test_reflexive(snapshot in arb_snapshot()) {
            prop_assert!(!snapshot_changed(&snapshot, &snapshot));
        }

        #[test]
        fn test_volatile_keys_never_matter(
            snapshot in arb_snapshot(),
            frame_a in any::<i64>(),
            frame_b in any::<i64>(),
            time_a in 0.0f64..1e6,
            time_b in 0.0f64..1e6,
        ) {
            let a = snapshot.clone().with(FRAME_KEY, frame_a).with(TIME_KEY, time_a);
            let b = snapshot.with(FRAME_KEY, frame_b).with(TIME_KEY, time_b);
            prop_assert!(!snapshot_changed(&a, &b));
        }

        #[test]
        fn test_extra_key_always_detected(snapshot in arb_snapshot(), value in arb_leaf()) {
            prop_assume!(!snapshot.contains_key("Extra"));
            let extended = snapshot.clone().with("Extra", value);
            prop_assert!(snapshot_changed(&snapshot, &extended));
            prop_assert!(snapshot_changed(&extended, &snapshot));
        }
    }
}
