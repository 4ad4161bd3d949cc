//! Push publishing change tracking.
//!
//! Decides which assets of a bundle actually need to travel to each remote
//! environment and keeps the push history that makes repeated evaluations
//! idempotent:
//!
//! - [`DependencySet`]: the per-bundle decision engine and accumulator.
//! - [`ports`]: collaborator traits (history store, cache, environment and
//!   bundle lookups, version metadata).
//! - [`PushedAssetsCache`] / [`CachedPushHistory`]: in-process push cache.
//! - [`memory`]: in-memory collaborators.

pub mod asset_type;
pub mod bundle;
pub mod cache;
pub mod dependency_set;
pub mod error;
pub mod memory;
pub mod ports;
pub mod push;
pub mod types;
pub mod version;

pub use asset_type::AssetType;
pub use bundle::{Bundle, Environment, PushMode};
pub use cache::{CachedPushHistory, PushedAssetsCache};
pub use dependency_set::DependencySet;
pub use error::{CoreError, StoreError};
pub use ports::Collaborators;
pub use push::{AssetCandidate, NewPushRecord, PushRecord};
pub use version::{Locale, VersionInfo};
