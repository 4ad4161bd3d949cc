//! Closed set of asset kinds a bundle can carry.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of asset being evaluated.
///
/// The string forms are the ones stored in `pushed_assets.asset_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "content")]
    Content,
    #[serde(rename = "template")]
    Template,
    #[serde(rename = "links")]
    Link,
    #[serde(rename = "container")]
    Container,
    #[serde(rename = "htmlpage")]
    Page,
}

impl AssetType {
    pub const ALL: [AssetType; 5] = [
        Self::Content,
        Self::Template,
        Self::Link,
        Self::Container,
        Self::Page,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Template => "template",
            Self::Link => "links",
            Self::Container => "container",
            Self::Page => "htmlpage",
        }
    }

    /// Content carries one version row per locale; every other kind has a
    /// single non-localized version row.
    pub fn is_localized(&self) -> bool {
        matches!(self, Self::Content)
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" | "contentlet" => Ok(Self::Content),
            "template" => Ok(Self::Template),
            "links" | "link" => Ok(Self::Link),
            "container" => Ok(Self::Container),
            "htmlpage" | "page" => Ok(Self::Page),
            other => Err(CoreError::UnknownAssetType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_stored_names_and_aliases() {
        for t in AssetType::ALL {
            assert_eq!(t.as_str().parse::<AssetType>().unwrap(), t);
        }
        assert_eq!("Page".parse::<AssetType>().unwrap(), AssetType::Page);
        assert_eq!("link".parse::<AssetType>().unwrap(), AssetType::Link);
    }

    #[test]
    fn rejects_unknown_names() {
        assert_matches!(
            "workflow".parse::<AssetType>(),
            Err(CoreError::UnknownAssetType(name)) if name == "workflow"
        );
    }

    #[test]
    fn serde_uses_stored_names() {
        let json = serde_json::to_string(&AssetType::Page).unwrap();
        assert_eq!(json, "\"htmlpage\"");
        let parsed: AssetType = serde_json::from_str("\"links\"").unwrap();
        assert_eq!(parsed, AssetType::Link);
    }

    #[test]
    fn only_content_is_localized() {
        assert!(AssetType::Content.is_localized());
        assert!(!AssetType::Template.is_localized());
    }
}
