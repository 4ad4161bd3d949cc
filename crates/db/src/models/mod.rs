//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, a `Deserialize` create DTO where rows are inserted, and the
//! conversion into the matching `pushtrack_core` type.

pub mod bundle;
pub mod environment;
pub mod pushed_asset;
pub mod version_info;
