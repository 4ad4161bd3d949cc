use pushtrack_core::{AssetType, CoreError};

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bundle_id: String,
    pub asset_type: AssetType,
    pub is_download: bool,
    pub is_publish: bool,
    pub log_format: LogFormat,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default    |
    /// |----------------------|------------|
    /// | `DATABASE_URL`       | required   |
    /// | `DB_MAX_CONNECTIONS` | `20`       |
    /// | `BUNDLE_ID`          | required   |
    /// | `ASSET_TYPE`         | `content`  |
    /// | `PUSH_DOWNLOAD`      | `false`    |
    /// | `PUSH_UNPUBLISH`     | `false`    |
    /// | `LOG_FORMAT`         | `pretty`   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CoreError::Config(format!("{key} must be set")))
        };

        let database_url = required("DATABASE_URL")?;
        let bundle_id = required("BUNDLE_ID")?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                CoreError::Config(format!("DB_MAX_CONNECTIONS must be a valid u32, got {raw}"))
            })?,
            None => 20,
        };

        let asset_type = match lookup("ASSET_TYPE") {
            Some(raw) => raw.parse::<AssetType>()?,
            None => AssetType::Content,
        };

        let is_download = parse_flag("PUSH_DOWNLOAD", lookup("PUSH_DOWNLOAD"))?;
        let is_publish = !parse_flag("PUSH_UNPUBLISH", lookup("PUSH_UNPUBLISH"))?;

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("pretty") | Some("") | None => LogFormat::Pretty,
            Some(other) => {
                return Err(CoreError::Config(format!(
                    "LOG_FORMAT must be `pretty` or `json`, got {other}"
                )))
            }
        };

        Ok(Self {
            database_url,
            max_connections,
            bundle_id,
            asset_type,
            is_download,
            is_publish,
            log_format,
        })
    }
}

fn parse_flag(key: &str, value: Option<String>) -> Result<bool, CoreError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            _ => Err(CoreError::Config(format!("{key} must be a boolean, got {v}"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WorkerConfig, CoreError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/push"), ("BUNDLE_ID", "b1")])
            .unwrap();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.asset_type, AssetType::Content);
        assert!(!config.is_download);
        assert!(config.is_publish);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/push"),
            ("BUNDLE_ID", "b1"),
            ("DB_MAX_CONNECTIONS", "5"),
            ("ASSET_TYPE", "htmlpage"),
            ("PUSH_DOWNLOAD", "yes"),
            ("PUSH_UNPUBLISH", "true"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.asset_type, AssetType::Page);
        assert!(config.is_download);
        assert!(!config.is_publish);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_required_variable() {
        assert_matches!(
            load(&[("DATABASE_URL", "postgres://localhost/push")]),
            Err(CoreError::Config(msg)) if msg.contains("BUNDLE_ID")
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = [("DATABASE_URL", "postgres://x"), ("BUNDLE_ID", "b1")];
        let with = |extra: (&'static str, &'static str)| {
            let mut vars = base.to_vec();
            vars.push(extra);
            load(&vars)
        };
        assert_matches!(with(("DB_MAX_CONNECTIONS", "many")), Err(CoreError::Config(_)));
        assert_matches!(with(("PUSH_DOWNLOAD", "maybe")), Err(CoreError::Config(_)));
        assert_matches!(with(("ASSET_TYPE", "widget")), Err(CoreError::UnknownAssetType(_)));
        assert_matches!(with(("LOG_FORMAT", "xml")), Err(CoreError::Config(_)));
    }
}
