use tracing::debug;

use crate::amount::{coerce_units, format_units};
use crate::catalog::{CatalogKey, ContentCatalog};
use crate::config::ResolverConfig;
use crate::error::MigrationStatusResult;
use crate::gate::{has_already_locked, should_show};
use crate::report::MigrationStatusReport;
use crate::types::{Action, FactSnapshot, PresentationResult, RuleId};

/// Which suffixes follow the catalog text in the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MessageSuffix {
    None,
    LockedShares,
    LockedSharesAndBlocks,
}

#[derive(Clone, Copy, Debug)]
enum Outcome {
    Copy {
        key: CatalogKey,
        suffix: MessageSuffix,
        action: Action,
    },
    Fallback,
}

/// One row of the status table: the first row whose predicate holds decides.
struct StatusRule {
    id: RuleId,
    applies: fn(&FactSnapshot) -> bool,
    outcome: Outcome,
}

fn migration_complete(s: &FactSnapshot) -> bool {
    s.phase.is_completed()
}

fn migration_not_started(s: &FactSnapshot) -> bool {
    !s.phase.is_started()
}

fn shares_lockable(s: &FactSnapshot) -> bool {
    s.phase.is_started()
        && !s.deadline_passed
        && s.pool_shares().is_positive()
        && s.can_add_shares
}

fn shares_locked(s: &FactSnapshot) -> bool {
    s.phase.is_started() && !s.deadline_passed && !s.pool_shares().is_positive()
}

fn deadline_or_threshold_met(s: &FactSnapshot) -> bool {
    s.phase.is_started() && (s.deadline_passed || s.threshold_met) && !s.can_add_shares
}

fn always(_: &FactSnapshot) -> bool {
    true
}

// Order is significant: rows overlap (e.g. shares_locked and
// deadline_or_threshold_met both hold when the threshold is met before the
// deadline with nothing left to lock) and the earlier row wins.
static STATUS_RULES: [StatusRule; 6] = [
    StatusRule {
        id: RuleId::MigrationComplete,
        applies: migration_complete,
        outcome: Outcome::Copy {
            key: CatalogKey::MigrationComplete,
            suffix: MessageSuffix::None,
            action: Action::None,
        },
    },
    StatusRule {
        id: RuleId::MigrationNotStarted,
        applies: migration_not_started,
        outcome: Outcome::Copy {
            key: CatalogKey::MigrationNotStarted,
            suffix: MessageSuffix::None,
            action: Action::None,
        },
    },
    StatusRule {
        id: RuleId::SharesLockable,
        applies: shares_lockable,
        outcome: Outcome::Copy {
            key: CatalogKey::MigrationStarted,
            suffix: MessageSuffix::LockedSharesAndBlocks,
            action: Action::LockShares,
        },
    },
    StatusRule {
        id: RuleId::SharesLocked,
        applies: shares_locked,
        outcome: Outcome::Copy {
            key: CatalogKey::PoolSharesLocked,
            suffix: MessageSuffix::LockedSharesAndBlocks,
            action: Action::LockShares,
        },
    },
    StatusRule {
        id: RuleId::DeadlineOrThresholdMet,
        applies: deadline_or_threshold_met,
        outcome: Outcome::Copy {
            key: CatalogKey::DeadlineMetThresholdMet,
            suffix: MessageSuffix::LockedShares,
            action: Action::None,
        },
    },
    StatusRule {
        id: RuleId::Fallback,
        applies: always,
        outcome: Outcome::Fallback,
    },
];

/// "You have N pool shares / You have locked M shares".
///
/// N is the coerced pool-share balance as-is; M is the locked amount scaled
/// down from smallest units by `share_decimals`.
pub fn locked_shares_suffix(snapshot: &FactSnapshot, share_decimals: u8) -> String {
    let pool_shares = snapshot.pool_shares();
    let locked = format_units(
        coerce_units("lockedSharesV3", snapshot.locked_shares_raw()),
        share_decimals,
    );
    format!("You have {pool_shares} pool shares / You have locked {locked} shares")
}

/// "{deadlineBlock - currentBlock} blocks left for migration deadline".
///
/// Not clamped: a passed deadline renders a negative count.
pub fn remaining_blocks_suffix(snapshot: &FactSnapshot) -> String {
    format!("{} blocks left for migration deadline", snapshot.remaining_blocks())
}

/// Maps a fact snapshot onto the title, message and action to present.
///
/// Stateless: every call reads only its arguments, so it is safe to re-run on
/// each snapshot change and from any thread.
#[derive(Clone, Debug, Default)]
pub struct MigrationStatusResolver {
    config: ResolverConfig,
}

impl MigrationStatusResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Which rule decides this snapshot.
    pub fn matching_rule(&self, snapshot: &FactSnapshot) -> RuleId {
        Self::first_match(snapshot).id
    }

    fn first_match(snapshot: &FactSnapshot) -> &'static StatusRule {
        STATUS_RULES
            .iter()
            .find(|rule| (rule.applies)(snapshot))
            .unwrap_or(&STATUS_RULES[STATUS_RULES.len() - 1])
    }

    /// Resolve a snapshot against the content catalog.
    ///
    /// Fails only when the catalog lacks the entry the matching rule needs.
    pub fn resolve(
        &self,
        snapshot: &FactSnapshot,
        catalog: &ContentCatalog,
    ) -> MigrationStatusResult<PresentationResult> {
        let rule = Self::first_match(snapshot);

        let result = match rule.outcome {
            Outcome::Copy {
                key,
                suffix,
                action,
            } => {
                let entry = catalog.require(key)?;
                let message = match suffix {
                    MessageSuffix::None => entry.text.clone(),
                    MessageSuffix::LockedShares => format!(
                        "{}\n{}",
                        entry.text,
                        locked_shares_suffix(snapshot, self.config.share_decimals)
                    ),
                    MessageSuffix::LockedSharesAndBlocks => format!(
                        "{}\n{}\n{}",
                        entry.text,
                        locked_shares_suffix(snapshot, self.config.share_decimals),
                        remaining_blocks_suffix(snapshot)
                    ),
                };
                PresentationResult {
                    title: entry.title.clone(),
                    message,
                    action,
                    rule: rule.id,
                }
            }
            Outcome::Fallback => PresentationResult {
                title: self.config.fallback_title.clone(),
                message: String::new(),
                action: Action::None,
                rule: rule.id,
            },
        };

        debug!(
            phase = %snapshot.phase,
            rule = %result.rule,
            action = ?result.action,
            "Migration status resolved"
        );
        Ok(result)
    }

    /// Run the gate, and the resolver only when the gate passes.
    pub fn evaluate(
        &self,
        snapshot: &FactSnapshot,
        catalog: &ContentCatalog,
    ) -> MigrationStatusResult<MigrationStatusReport> {
        let visible = should_show(snapshot);
        let presentation = if visible {
            Some(self.resolve(snapshot, catalog)?)
        } else {
            None
        };
        let already_locked = snapshot
            .participant
            .as_ref()
            .is_some_and(|p| has_already_locked(p, &snapshot.share_owners));

        debug!(visible, already_locked, "Migration status report built");
        Ok(MigrationStatusReport {
            visible,
            presentation,
            already_locked,
        })
    }
}

/// Resolve with the default configuration.
pub fn resolve(
    snapshot: &FactSnapshot,
    catalog: &ContentCatalog,
) -> MigrationStatusResult<PresentationResult> {
    MigrationStatusResolver::new().resolve(snapshot, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CopyEntry;
    use crate::error::MigrationStatusError;
    use crate::types::MigrationPhase;

    fn catalog() -> ContentCatalog {
        ContentCatalog::english()
    }

    fn started() -> crate::types::FactSnapshotBuilder {
        FactSnapshot::builder(MigrationPhase::Started).blocks("1200", 1000)
    }

    #[test]
    fn completed_phase_wins_over_everything() {
        let snapshot = FactSnapshot::builder(MigrationPhase::Completed)
            .pool_shares("10")
            .can_add_shares(true)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::MigrationComplete);
        assert_eq!(result.title, "Migration complete");
        assert_eq!(result.message, "The liquidity migration has completed.");
        assert_eq!(result.action, Action::None);
    }

    #[test]
    fn not_started_phase_has_no_action() {
        let snapshot = FactSnapshot::builder(MigrationPhase::NotStarted)
            .pool_shares("10")
            .threshold_met(true)
            .can_add_shares(true)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::MigrationNotStarted);
        assert_eq!(result.title, "Migration has not started");
        assert_eq!(result.action, Action::None);
    }

    #[test]
    fn lockable_shares_offer_lock_action_with_both_suffixes() {
        let snapshot = started()
            .pool_shares("5")
            .locked_shares_v3("1500000000000000000")
            .can_add_shares(true)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::SharesLockable);
        assert_eq!(result.action, Action::LockShares);
        assert_eq!(result.title, "Migration has started");
        assert_eq!(
            result.message,
            "The liquidity migration is open. Lock your pool shares to take part.\n\
             You have 5 pool shares / You have locked 1.5 shares\n\
             200 blocks left for migration deadline"
        );
    }

    #[test]
    fn empty_pool_before_deadline_reports_locked() {
        let snapshot = started().pool_shares("0").locked_shares_v3("2000000000000000000").build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::SharesLocked);
        assert_eq!(result.title, "Pool shares locked");
        assert_eq!(result.action, Action::LockShares);
        assert!(result.message.contains("You have 0 pool shares / You have locked 2 shares"));
        assert!(result.message.contains("200 blocks left for migration deadline"));
    }

    #[test]
    fn shares_locked_outranks_threshold_met() {
        // both rows hold; the earlier one decides
        let snapshot = started()
            .pool_shares("0")
            .threshold_met(true)
            .can_add_shares(false)
            .build();
        assert_eq!(
            MigrationStatusResolver::new().matching_rule(&snapshot),
            RuleId::SharesLocked
        );
    }

    #[test]
    fn deadline_passed_without_new_locks_closes_window() {
        let snapshot = started()
            .deadline_passed(true)
            .pool_shares("3")
            .locked_shares_v3("1000000000000000000")
            .can_add_shares(false)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::DeadlineOrThresholdMet);
        assert_eq!(result.action, Action::None);
        assert!(result.message.ends_with("You have 3 pool shares / You have locked 1 shares"));
        assert!(!result.message.contains("blocks left"));
    }

    #[test]
    fn threshold_met_with_shares_and_no_new_locks_closes_window() {
        let snapshot = started()
            .threshold_met(true)
            .pool_shares("3")
            .can_add_shares(false)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::DeadlineOrThresholdMet);
    }

    #[test]
    fn unmatched_combination_falls_back() {
        let snapshot = started()
            .deadline_passed(true)
            .threshold_met(true)
            .pool_shares("3")
            .can_add_shares(true)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::Fallback);
        assert_eq!(result.title, "No migration information available");
        assert_eq!(result.message, "");
        assert_eq!(result.action, Action::None);
    }

    #[test]
    fn fallback_does_not_need_catalog() {
        let snapshot = started()
            .deadline_passed(true)
            .pool_shares("3")
            .can_add_shares(true)
            .build();
        let result = resolve(&snapshot, &ContentCatalog::new()).unwrap();
        assert_eq!(result.rule, RuleId::Fallback);
    }

    #[test]
    fn fallback_title_comes_from_config() {
        let resolver = MigrationStatusResolver::with_config(ResolverConfig {
            fallback_title: "Nothing to show".into(),
            ..ResolverConfig::default()
        });
        let snapshot = started()
            .deadline_passed(true)
            .pool_shares("3")
            .can_add_shares(true)
            .build();
        assert_eq!(
            resolver.resolve(&snapshot, &catalog()).unwrap().title,
            "Nothing to show"
        );
    }

    #[test]
    fn missing_catalog_entry_is_configuration_error() {
        let partial = ContentCatalog::new().with(
            CatalogKey::MigrationComplete,
            CopyEntry::new("Done", "All done"),
        );
        let snapshot = started().pool_shares("5").can_add_shares(true).build();
        assert!(matches!(
            resolve(&snapshot, &partial),
            Err(MigrationStatusError::MissingCatalogEntry(CatalogKey::MigrationStarted))
        ));
    }

    #[test]
    fn malformed_pool_shares_resolve_like_zero() {
        let garbage = started().pool_shares("not-a-number").build();
        let zero = started().pool_shares("0").build();
        assert_eq!(
            resolve(&garbage, &catalog()).unwrap(),
            resolve(&zero, &catalog()).unwrap()
        );
    }

    #[test]
    fn remaining_blocks_is_not_clamped() {
        let snapshot = started().blocks("100", 150).build();
        assert_eq!(
            remaining_blocks_suffix(&snapshot),
            "-50 blocks left for migration deadline"
        );
    }

    #[test]
    fn malformed_deadline_counts_from_zero() {
        let snapshot = started().blocks("soon", 30).build();
        assert_eq!(
            remaining_blocks_suffix(&snapshot),
            "-30 blocks left for migration deadline"
        );
    }

    #[test]
    fn balance_beyond_decimal_range_is_lockable() {
        let snapshot = started()
            .pool_shares("100000000000000000000000000000")
            .can_add_shares(true)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(result.rule, RuleId::SharesLockable);
        assert_eq!(result.action, Action::LockShares);
        assert!(result
            .message
            .contains("You have 100000000000000000000000000000 pool shares"));
    }

    #[test]
    fn extreme_deadline_does_not_panic() {
        let snapshot = started()
            .pool_shares("5")
            .blocks("-79228162514264337593543950335", 5)
            .can_add_shares(true)
            .build();
        let result = resolve(&snapshot, &catalog()).unwrap();
        assert!(result
            .message
            .ends_with("-79228162514264337593543950340 blocks left for migration deadline"));
    }

    #[test]
    fn overflowing_deadline_counts_as_zero() {
        let snapshot = started()
            .pool_shares("5")
            .blocks("-7.9228162514264337593543950335e28", 5)
            .can_add_shares(true)
            .build();
        assert_eq!(
            remaining_blocks_suffix(&snapshot),
            "0 blocks left for migration deadline"
        );
    }

    #[test]
    fn locked_suffix_defaults_absent_amount_to_zero() {
        let snapshot = started().pool_shares("7").build();
        assert_eq!(
            locked_shares_suffix(&snapshot, 18),
            "You have 7 pool shares / You have locked 0 shares"
        );
    }

    #[test]
    fn locked_suffix_respects_configured_decimals() {
        let snapshot = started().pool_shares("1").locked_shares_v3("2500000").build();
        assert_eq!(
            locked_shares_suffix(&snapshot, 6),
            "You have 1 pool shares / You have locked 2.5 shares"
        );
    }

    #[test]
    fn resolve_is_repeatable() {
        let snapshot = started().pool_shares("5").can_add_shares(true).build();
        let first = resolve(&snapshot, &catalog()).unwrap();
        let second = resolve(&snapshot, &catalog()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn table_follows_documented_order() {
        let ids: Vec<RuleId> = STATUS_RULES.iter().map(|r| r.id).collect();
        assert_eq!(ids, RuleId::ordered().to_vec());
    }
}
