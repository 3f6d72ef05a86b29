//! # migration-status
//!
//! Tells a liquidity provider where they stand in a pool-share migration and
//! what, if anything, they should do next.
//!
//! - **Visibility Gate** ([`should_show`]) — whether the status is shown at all
//! - **Resolver** ([`MigrationStatusResolver`]) — ordered status rules mapping
//!   a [`FactSnapshot`] onto a [`PresentationResult`] (title, message, action)
//! - **Duplicate-Lock Detector** ([`has_already_locked`]) — whether the
//!   participant is already among the share owners
//!
//! All three are pure and synchronous. Nothing here performs I/O apart from
//! the optional catalog/config file loaders, and nothing is cached: callers
//! re-evaluate on every new snapshot.
//!
//! ## Status rules (first match wins)
//!
//! 1. Completed → `migrationComplete`, no action
//! 2. Not started → `migrationNotStarted`, no action
//! 3. Before deadline, pool shares > 0, locks accepted → `migrationStarted`, lock
//! 4. Before deadline, pool shares ≤ 0 → `poolSharesLocked`, lock
//! 5. Deadline passed or threshold met, locks closed → `deadlineMetThresholdMet`, no action
//! 6. Otherwise → fallback title, empty message, no action

pub mod amount;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gate;
pub mod report;
pub mod resolver;
pub mod types;

pub use amount::FactAmount;
pub use catalog::{CatalogKey, ContentCatalog, CopyEntry};
pub use config::ResolverConfig;
pub use error::{MigrationStatusError, MigrationStatusResult};
pub use gate::{has_already_locked, should_show};
pub use report::{evaluate, MigrationStatusReport};
pub use resolver::{locked_shares_suffix, remaining_blocks_suffix, resolve, MigrationStatusResolver};
pub use types::{
    Action, FactSnapshot, FactSnapshotBuilder, MigrationPhase, ParticipantAddress,
    PresentationResult, RuleId,
};
