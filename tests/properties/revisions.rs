//! Property tests for publish revisions.

use proptest::prelude::*;

use tbdeploy::domain::services::{next_revision, revision_of};
use tbdeploy::Revision;

fn suffix() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,4}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The successor of a revision always sorts after it.
    #[test]
    fn property_next_is_strictly_greater(s in suffix()) {
        let revision = Revision::parse(&s).unwrap();
        prop_assert!(revision.next() > revision);
    }

    /// PROPERTY: A new publish never reuses or undercuts an existing revision.
    #[test]
    fn property_allocated_revision_exceeds_all_existing(
        existing in proptest::collection::vec(suffix(), 0..8),
        foreign in proptest::collection::vec(suffix(), 0..4),
    ) {
        let mut names: Vec<String> = existing.iter().map(|s| format!("TEST-24-1-{s}")).collect();
        names.extend(foreign.iter().map(|s| format!("OTHER-24-1-{s}.rev")));

        let next = next_revision("TEST-24-1", names.iter().map(String::as_str));

        for s in &existing {
            prop_assert!(next > Revision::parse(s).unwrap());
        }
        if existing.is_empty() {
            prop_assert_eq!(next, Revision::first());
        }
    }

    /// PROPERTY: Longer suffixes sort after shorter ones regardless of letters.
    #[test]
    fn property_length_dominates_order(short in "[a-z]{1,3}", extra in "[a-z]{1,2}") {
        let longer = Revision::parse(&format!("{short}{extra}")).unwrap();
        let all_z = Revision::parse(&"z".repeat(short.len())).unwrap();
        prop_assert!(longer > Revision::parse(&short).unwrap());
        prop_assert!(longer > all_z);
    }

    /// PROPERTY: Names of other deployments never contribute a revision.
    #[test]
    fn property_revision_of_ignores_other_deployments(s in suffix()) {
        prop_assert_eq!(
            revision_of("TEST-24-1", &format!("TEST-24-1-{s}")),
            Some(Revision::parse(&s).unwrap())
        );
        prop_assert_eq!(revision_of("TEST-24-1", &format!("TEST-24-10-{s}")), None);
    }
}
