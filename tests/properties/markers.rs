//! Property tests for revision marker file names.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use tbdeploy::domain::value_objects::RevisionMarker;
use tbdeploy::Revision;

fn deployment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z]{2,6}-[0-9]{2}-[0-9]{1,2}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: An unpublished marker always names its deployment, whatever the clock.
    #[test]
    fn property_unpublished_marker_names_deployment(
        dep in deployment(),
        secs in 0i64..4_102_444_800,
    ) {
        let at = Utc.timestamp_opt(secs, 0).unwrap();
        let marker = RevisionMarker::unpublished_at(dep.clone(), at);

        let parsed = RevisionMarker::parse(&marker.file_name()).unwrap();
        prop_assert_eq!(parsed.deployment(), dep.as_str());
        prop_assert!(!parsed.is_published());
    }

    /// PROPERTY: Published markers never parse as unpublished ones.
    #[test]
    fn property_published_marker_keeps_revision(dep in deployment(), s in "[a-z]{1,3}") {
        let marker = RevisionMarker::published(dep.clone(), Revision::parse(&s).unwrap());

        let parsed = RevisionMarker::parse(&marker.file_name()).unwrap();
        prop_assert!(parsed.is_published());
        prop_assert_eq!(parsed.deployment(), dep.as_str());
    }
}
