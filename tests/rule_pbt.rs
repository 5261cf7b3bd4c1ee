use petri_lib::model::rule::MAX_NEIGHBORS;
use petri_lib::model::{Rule, ValuePolicy};
use proptest::prelude::*;

prop_compose! {
    fn arb_counts()(mask in 0u16..512) -> Vec<u8> {
        (0..=MAX_NEIGHBORS).filter(|n| mask & (1 << n) != 0).collect()
    }
}

prop_compose! {
    fn arb_rule()(
        birth in arb_counts(),
        survival in arb_counts(),
        aging in proptest::option::of(1u8..=255)
    ) -> Rule {
        let rule = Rule::new(&birth, &survival).unwrap();
        match aging {
            Some(max) => rule.with_policy(ValuePolicy::Aging { max }),
            None => rule,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_next_value_is_total(rule in arb_rule(), current in any::<u8>(), count in any::<u8>()) {
        let next = rule.next_value(current, count);
        prop_assert!(next <= rule.max_value().max(1));
        if count > MAX_NEIGHBORS {
            prop_assert_eq!(next, 0);
        }
    }

    #[test]
    fn test_dead_cells_follow_birth_set(rule in arb_rule(), count in 0u8..=MAX_NEIGHBORS) {
        let born = rule.next_value(0, count) != 0;
        prop_assert_eq!(born, rule.births_on(count));
    }

    #[test]
    fn test_live_cells_follow_survival_set(rule in arb_rule(), count in 0u8..=MAX_NEIGHBORS) {
        let survives = rule.next_value(1, count) != 0;
        prop_assert_eq!(survives, rule.survives_on(count));
    }

    #[test]
    fn test_notation_parses_back(rule in arb_rule()) {
        let text = rule.to_string();
        let parsed = Rule::parse(&text).unwrap();
        prop_assert_eq!(parsed, rule);
    }

    #[test]
    fn test_parse_never_panics(text in "[BSAbsa0-9/]{0,12}") {
        let _ = Rule::parse(&text);
    }
}
