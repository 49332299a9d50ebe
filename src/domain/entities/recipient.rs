//! Program recipients

/// A community, group or agent that receives a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub id: String,
    pub language: String,
    pub variant: Option<String>,
    /// Deployment numbers this recipient takes part in; empty means all.
    pub deployments: Vec<u32>,
}

impl Recipient {
    pub fn new(id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
            variant: None,
            deployments: Vec::new(),
        }
    }

    pub fn receives(&self, deployment: u32) -> bool {
        deployment == 0 || self.deployments.is_empty() || self.deployments.contains(&deployment)
    }
}
