use tracing::debug;

use crate::types::{FactSnapshot, ParticipantAddress};

/// Visibility Gate: whether the migration status should be shown at all.
///
/// True when the participant still holds pool shares, or has a locked amount
/// that is present and not the literal `"0"`. Malformed balances count as zero.
pub fn should_show(snapshot: &FactSnapshot) -> bool {
    let has_pool_shares = snapshot.pool_shares().is_positive();
    let has_locked = snapshot
        .locked_shares_v3
        .as_deref()
        .is_some_and(|locked| locked != "0");
    let visible = has_pool_shares || has_locked;

    debug!(
        phase = %snapshot.phase,
        has_pool_shares,
        has_locked,
        visible,
        "Visibility gate evaluated"
    );
    visible
}

/// Duplicate-Lock Detector: whether `participant` already appears among the
/// share owners.
///
/// Exact string match; `share_owners` may be unordered and contain repeats.
pub fn has_already_locked(
    participant: &ParticipantAddress,
    share_owners: &[ParticipantAddress],
) -> bool {
    let locked = share_owners.iter().any(|owner| owner == participant);
    debug!(
        participant = %participant,
        owners = share_owners.len(),
        locked,
        "Duplicate-lock check"
    );
    locked
}
