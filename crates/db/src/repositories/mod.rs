//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async queries that
//! accept `&PgPool` as the first argument.

pub mod bundle_repo;
pub mod environment_repo;
pub mod pushed_asset_repo;
pub mod version_info_repo;

pub use bundle_repo::BundleRepo;
pub use environment_repo::EnvironmentRepo;
pub use pushed_asset_repo::PushedAssetRepo;
pub use version_info_repo::VersionInfoRepo;
