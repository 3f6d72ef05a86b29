use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::amount::{coerce_amount, FactAmount};

/// Lifecycle of the overall migration program.
///
/// Owned by the chain; the resolver only reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationPhase {
    #[default]
    NotStarted,
    Started,
    Completed,
}

impl MigrationPhase {
    /// Whether the program has left `NotStarted` (includes `Completed`).
    pub fn is_started(&self) -> bool {
        !matches!(self, MigrationPhase::NotStarted)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MigrationPhase::Completed)
    }
}

impl std::fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MigrationPhase::NotStarted => "NOT_STARTED",
            MigrationPhase::Started => "STARTED",
            MigrationPhase::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

/// Recommended next step for the participant.
///
/// Start, complete, cancel, remove-shares and view-asset actions exist in the
/// wider migration flow but no status rule produces them yet, so they are not
/// variants here. Add them together with the rule that emits them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    #[default]
    None,
    LockShares,
}

impl Action {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Action::None)
    }
}

/// Participant (wallet) address as supplied by the fact source.
///
/// Kept as the raw string: comparison is exact, no checksum normalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantAddress(pub String);

impl ParticipantAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Immutable input record for one evaluation.
///
/// Numeric fields stay as the decimal strings the fact source delivered;
/// the accessors coerce them, so a malformed value reads as zero instead
/// of failing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSnapshot {
    pub phase: MigrationPhase,
    pub threshold_met: bool,
    pub deadline_passed: bool,
    /// Un-migrated pool-share balance
    pub pool_shares: String,
    /// Amount already locked, in smallest units
    #[serde(default)]
    pub locked_shares_v3: Option<String>,
    pub deadline_block: String,
    pub current_block: u64,
    pub can_add_shares: bool,
    #[serde(default)]
    pub participant: Option<ParticipantAddress>,
    /// Participants that have already locked shares (may repeat)
    #[serde(default)]
    pub share_owners: Vec<ParticipantAddress>,
}

impl FactSnapshot {
    pub fn builder(phase: MigrationPhase) -> FactSnapshotBuilder {
        FactSnapshotBuilder::new(phase)
    }

    /// Pool-share balance, zero when malformed.
    pub fn pool_shares(&self) -> FactAmount {
        coerce_amount("poolShares", &self.pool_shares)
    }

    /// Deadline block height, zero when malformed.
    pub fn deadline_block(&self) -> FactAmount {
        coerce_amount("deadlineBlock", &self.deadline_block)
    }

    /// Raw locked amount, `"0"` when absent.
    pub fn locked_shares_raw(&self) -> &str {
        self.locked_shares_v3.as_deref().unwrap_or("0")
    }

    /// Signed block distance to the deadline. Negative once it has passed.
    ///
    /// Reads as zero if the subtraction overflows.
    pub fn remaining_blocks(&self) -> FactAmount {
        self.deadline_block()
            .checked_sub_u64(self.current_block)
            .unwrap_or_else(|| {
                warn!(
                    deadline_block = %self.deadline_block,
                    current_block = self.current_block,
                    "Remaining block count overflowed, reading as zero"
                );
                FactAmount::ZERO
            })
    }
}

/// Chained construction of a [`FactSnapshot`].
#[derive(Clone, Debug)]
pub struct FactSnapshotBuilder {
    snapshot: FactSnapshot,
}

impl FactSnapshotBuilder {
    pub fn new(phase: MigrationPhase) -> Self {
        Self {
            snapshot: FactSnapshot {
                phase,
                threshold_met: false,
                deadline_passed: false,
                pool_shares: "0".into(),
                locked_shares_v3: None,
                deadline_block: "0".into(),
                current_block: 0,
                can_add_shares: false,
                participant: None,
                share_owners: Vec::new(),
            },
        }
    }

    pub fn threshold_met(mut self, met: bool) -> Self {
        self.snapshot.threshold_met = met;
        self
    }

    pub fn deadline_passed(mut self, passed: bool) -> Self {
        self.snapshot.deadline_passed = passed;
        self
    }

    pub fn pool_shares(mut self, shares: impl Into<String>) -> Self {
        self.snapshot.pool_shares = shares.into();
        self
    }

    pub fn locked_shares_v3(mut self, locked: impl Into<String>) -> Self {
        self.snapshot.locked_shares_v3 = Some(locked.into());
        self
    }

    pub fn blocks(mut self, deadline_block: impl Into<String>, current_block: u64) -> Self {
        self.snapshot.deadline_block = deadline_block.into();
        self.snapshot.current_block = current_block;
        self
    }

    pub fn can_add_shares(mut self, can_add: bool) -> Self {
        self.snapshot.can_add_shares = can_add;
        self
    }

    pub fn participant(mut self, participant: impl Into<ParticipantAddress>) -> Self {
        self.snapshot.participant = Some(participant.into());
        self
    }

    pub fn share_owners<I, A>(mut self, owners: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ParticipantAddress>,
    {
        self.snapshot.share_owners = owners.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> FactSnapshot {
        self.snapshot
    }
}

/// Which ordered status rule produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    MigrationComplete,
    MigrationNotStarted,
    SharesLockable,
    SharesLocked,
    DeadlineOrThresholdMet,
    Fallback,
}

impl RuleId {
    /// All rules in evaluation priority order.
    pub fn ordered() -> [RuleId; 6] {
        [
            RuleId::MigrationComplete,
            RuleId::MigrationNotStarted,
            RuleId::SharesLockable,
            RuleId::SharesLocked,
            RuleId::DeadlineOrThresholdMet,
            RuleId::Fallback,
        ]
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RuleId::MigrationComplete => "migration_complete",
            RuleId::MigrationNotStarted => "migration_not_started",
            RuleId::SharesLockable => "shares_lockable",
            RuleId::SharesLocked => "shares_locked",
            RuleId::DeadlineOrThresholdMet => "deadline_or_threshold_met",
            RuleId::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// Output of the resolver: what to tell the participant and what to offer.
///
/// Recomputed from a fresh snapshot every time; never cached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationResult {
    pub title: String,
    pub message: String,
    pub action: Action,
    /// The rule that matched
    pub rule: RuleId,
}
