//! Revision allocation
//!
//! Scans names found in a publish root (`X-20-1-a`, `X-20-1-b.rev`, ...) and
//! picks the revision that follows the greatest one seen for a deployment.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::value_objects::Revision;

static REVISION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+)-([a-z]+)(?:\.rev)?$").expect("revision name pattern is valid")
});

/// Revision suffix of `name` if it belongs to `deployment`.
pub fn revision_of(deployment: &str, name: &str) -> Option<Revision> {
    let captures = REVISION_NAME.captures(name)?;
    if !captures[1].eq_ignore_ascii_case(deployment) {
        return None;
    }
    Revision::parse(&captures[2]).ok()
}

/// The revision a new publish of `deployment` should get.
pub fn next_revision<'a, I>(deployment: &str, names: I) -> Revision
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| revision_of(deployment, name))
        .max()
        .map(|latest| latest.next())
        .unwrap_or_else(Revision::first)
}
