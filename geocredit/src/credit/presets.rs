//! Built-in imagery tile presets and the credits they require.

use super::CreditItem;

const OSM_CREDIT: &str =
    r#"© <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

const GSI_CREDIT: &str = r#"<a href="https://maps.gsi.go.jp/development/ichiran.html">国土地理院</a>, Shoreline data is derived from: United States. National Imagery and Mapping Agency. "Vector Map Level 0 (VMAP0)." Bethesda, MD: Denver, CO: The Agency; USGS Information Services, 1997."#;

/// Imagery tile source that can be selected for a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilePreset {
    /// Open Street Map standard tiles.
    OpenStreetMap,
    /// Standard map of the Geospatial Information Authority of Japan.
    JapanGsiStandard,
    /// Custom tile url template. Such sources carry no built-in credit.
    Url(String),
}

impl TilePreset {
    /// Parses the preset key stored in the scene property.
    ///
    /// Returns `None` for unknown keys, and for the `url` key without a template.
    pub fn from_name(name: &str, url: Option<&str>) -> Option<Self> {
        match name {
            "open_street_map" => Some(Self::OpenStreetMap),
            "japan_gsi_standard" => Some(Self::JapanGsiStandard),
            "url" => url.map(|url| Self::Url(url.to_owned())),
            _ => None,
        }
    }

    /// Base url of the tile service.
    pub fn url(&self) -> &str {
        match self {
            Self::OpenStreetMap => "https://tile.openstreetmap.org",
            Self::JapanGsiStandard => "https://cyberjapandata.gsi.go.jp/xyz/std/",
            Self::Url(url) => url,
        }
    }

    /// Credit that must be displayed when the preset is in use.
    pub fn credit(&self) -> Option<CreditItem> {
        match self {
            Self::OpenStreetMap => Some(CreditItem::html(OSM_CREDIT)),
            Self::JapanGsiStandard => Some(CreditItem::html(GSI_CREDIT)),
            Self::Url(_) => None,
        }
    }
}
