/*
 * asset.rs
 */

use serde::{Deserialize, Serialize};

/// The terminal, side-effect-free form of a reference to a binary asset.
///
/// `deny_unknown_fields` keeps the untagged field-value representation
/// unambiguous: a plain object that happens to carry a `url` key along
/// with others is not an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedAsset {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformParams>,
}

/// URL transform parameters, passed through opaquely to the store's
/// asset-delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Parsed form of a store asset id: `image-<hash>-<width>x<height>-<format>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId<'a> {
    pub hash: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: &'a str,
}

impl<'a> AssetId<'a> {
    /// Parse a store asset id. Returns `None` for anything that does not
    /// follow the naming convention, letting callers degrade instead of
    /// guessing at a URL.
    pub fn parse(id: &'a str) -> Option<Self> {
        let rest = id.strip_prefix("image-")?;
        let (body, format) = rest.rsplit_once('-')?;
        let (hash, dims) = body.rsplit_once('-')?;
        let (w, h) = dims.split_once('x')?;
        if hash.is_empty() || format.is_empty() {
            return None;
        }
        Some(AssetId {
            hash,
            width: w.parse().ok()?,
            height: h.parse().ok()?,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_asset_id() {
        let id = AssetId::parse("image-abc123def-1200x800-webp").unwrap();
        assert_eq!(id.hash, "abc123def");
        assert_eq!(id.width, 1200);
        assert_eq!(id.height, 800);
        assert_eq!(id.format, "webp");
    }

    #[test]
    fn rejects_malformed_asset_ids() {
        for bad in [
            "file-abc123-100x100-png",
            "image-abc123",
            "image-abc123-100-png",
            "image-abc123-axb-png",
            "image--100x100-png",
        ] {
            assert!(AssetId::parse(bad).is_none(), "{bad} should not parse");
        }
    }
}
