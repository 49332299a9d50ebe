//! Program specification port

use std::collections::BTreeMap;

use crate::domain::entities::Recipient;

/// Recipients of a program and where their community files live.
pub trait ProgramSpecProvider {
    fn recipients(&self) -> Vec<Recipient>;

    /// Recipient id → community directory name
    fn recipients_map(&self) -> BTreeMap<String, String>;

    /// Recipients taking part in `deployment` who speak `language`.
    fn recipients_for(&self, deployment: u32, language: &str) -> Vec<Recipient> {
        self.recipients()
            .into_iter()
            .filter(|r| r.receives(deployment) && r.language == language)
            .collect()
    }

    /// Community directory for a recipient, defaulting to its id.
    fn community_dir(&self, recipient: &Recipient) -> String {
        self.recipients_map()
            .get(&recipient.id)
            .cloned()
            .unwrap_or_else(|| recipient.id.clone())
    }
}
