/// Input and configuration errors raised by the core domain.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown asset type: {0}")]
    UnknownAssetType(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure reported by a data-access collaborator.
///
/// `NotFound` is an information state for history lookups ("never pushed"),
/// not a hard failure; the engine treats it the same as `Data`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data access error: {0}")]
    Data(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_asset_type() {
        let err = CoreError::UnknownAssetType("widget".to_string());
        assert_eq!(err.to_string(), "Unknown asset type: widget");
    }

    #[test]
    fn display_store_errors() {
        assert_eq!(
            StoreError::NotFound("asset abc".into()).to_string(),
            "Not found: asset abc"
        );
        assert_eq!(
            StoreError::Data("connection reset".into()).to_string(),
            "Data access error: connection reset"
        );
    }
}
