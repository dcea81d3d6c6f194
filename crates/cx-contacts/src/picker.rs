//! Contact selection affordance used by `pick_contact`

use async_trait::async_trait;

use crate::models::Contact;
use crate::Result;

/// What the user did with the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The contact with this id was chosen
    Selected(String),
    /// The picker was dismissed
    Cancelled,
}

/// Presents contacts to the user and reports the choice
#[async_trait]
pub trait ContactPicker: Send + Sync {
    /// Show `candidates` (never empty) and wait for a decision
    async fn pick(&self, candidates: &[Contact]) -> Result<PickOutcome>;
}

/// Picker that always answers the same way; meant for tests and scripts
#[derive(Debug, Clone)]
pub struct FixedPicker {
    outcome: PickOutcome,
}

impl FixedPicker {
    pub fn selecting(id: impl Into<String>) -> Self {
        Self {
            outcome: PickOutcome::Selected(id.into()),
        }
    }

    pub fn cancelling() -> Self {
        Self {
            outcome: PickOutcome::Cancelled,
        }
    }
}

#[async_trait]
impl ContactPicker for FixedPicker {
    async fn pick(&self, _candidates: &[Contact]) -> Result<PickOutcome> {
        Ok(self.outcome.clone())
    }
}
