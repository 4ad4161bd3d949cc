/// History rows use PostgreSQL BIGSERIAL keys.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque asset identifier (content identifier, template id, ...).
pub type AssetId = String;

/// Bundle identifiers are opaque strings assigned by the bundle service.
pub type BundleId = String;

/// Environment identifiers are opaque strings assigned at registration.
pub type EnvironmentId = String;

/// Locale (language) key used for localized content versions.
pub type LocaleId = i64;
