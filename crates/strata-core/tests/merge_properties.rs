use proptest::prelude::*;
use std::collections::BTreeSet;
use strata_core::{Config, Mapping, Settings, Value, fold, merge, merge_into};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| Value::Number(n as f64)),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::vec(("[a-d]", inner), 0..4)
                .prop_map(|entries| Value::Mapping(entries.into_iter().collect())),
        ]
    })
}

fn mapping() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-e]", tree()), 0..5)
        .prop_map(|entries| Value::Mapping(entries.into_iter().collect::<Mapping>()))
}

fn key_set(value: &Value) -> BTreeSet<String> {
    value.keys().unwrap_or_default().into_iter().collect()
}

proptest! {
    #[test]
    fn overlay_wins_for_non_mapping_values(base in mapping(), overlay in mapping()) {
        let merged = merge(&base, &overlay);
        for (key, overlay_value) in overlay.as_mapping().unwrap() {
            let base_value = base.get(key);
            let both_mappings = overlay_value.is_mapping()
                && base_value.is_some_and(Value::is_mapping);
            if !both_mappings {
                prop_assert_eq!(merged.get(key), Some(overlay_value));
            }
        }
    }

    #[test]
    fn key_set_is_union(base in mapping(), overlay in mapping()) {
        let merged = merge(&base, &overlay);
        let expected: BTreeSet<String> = key_set(&base).union(&key_set(&overlay)).cloned().collect();
        prop_assert_eq!(key_set(&merged), expected);
    }

    #[test]
    fn merging_a_tree_with_itself_is_identity(t in tree()) {
        prop_assert_eq!(merge(&t, &t), t);
    }

    #[test]
    fn empty_overlay_preserves_base(base in mapping()) {
        prop_assert_eq!(merge(&base, &Value::mapping()), base);
    }

    #[test]
    fn explicit_null_overrides(base in mapping(), key in "[a-e]") {
        let mut overlay = Mapping::new();
        overlay.insert(key.clone(), Value::Null);
        let merged = merge(&base, &Value::Mapping(overlay));
        prop_assert_eq!(merged.get(&key), Some(&Value::Null));
    }

    #[test]
    fn fold_equals_left_nested_merge(a in mapping(), b in mapping(), c in mapping()) {
        let folded = fold([&a, &b, &c]);
        prop_assert_eq!(folded, merge(&merge(&a, &b), &c));
    }

    #[test]
    fn in_place_merge_agrees_with_pure_merge(base in tree(), overlay in tree()) {
        let expected = merge(&base, &overlay);
        let mut actual = base.clone();
        merge_into(&mut actual, overlay);
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn mutating_returned_tree_does_not_affect_config(t in mapping(), key in "[a-e]") {
        let config = Config::new("test", t.clone());
        let mut copy = config.get_all();
        copy.set_path(&[key.as_str()], Value::String("mutated-value".into()));
        prop_assert_eq!(config.get_all(), t);
    }
}
