use serde::{Deserialize, Serialize};

use crate::catalog::ContentCatalog;
use crate::error::MigrationStatusResult;
use crate::resolver::MigrationStatusResolver;
use crate::types::{FactSnapshot, PresentationResult};

/// Everything the rendering side needs for one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStatusReport {
    /// Visibility gate decision
    pub visible: bool,
    /// Resolved copy and action; `None` whenever `visible` is false
    pub presentation: Option<PresentationResult>,
    /// Whether the participant is already among the share owners
    pub already_locked: bool,
}

impl MigrationStatusReport {
    /// Whether the lock control should be offered.
    ///
    /// Informational only: a participant who already locked may still be
    /// offered the action, the UI decides how to present that.
    pub fn offers_lock(&self) -> bool {
        self.presentation
            .as_ref()
            .is_some_and(|p| p.action.is_actionable())
    }
}

/// [`MigrationStatusResolver::evaluate`] with the default configuration.
pub fn evaluate(
    snapshot: &FactSnapshot,
    catalog: &ContentCatalog,
) -> MigrationStatusResult<MigrationStatusReport> {
    MigrationStatusResolver::new().evaluate(snapshot, catalog)
}
