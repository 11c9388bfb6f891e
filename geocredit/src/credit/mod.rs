//! Credit model and the normalize/merge pipeline.
//!
//! Rendering engines report their credits as a [`CreditsSnapshot`]: one engine-native credit
//! (e.g. the branding of the engine itself) and two lists of data provider credits. Each
//! [`CreditItem`] is converted into a uniform [`ProcessedCredit`] by [`normalize_credit`], and
//! [`merge_credits`] combines them with the entries a user configured for the attribution widget.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attribution::Attribution;

mod merge;
mod normalize;
pub mod presets;

pub use merge::{merge_credits, CreditAggregator, MergedCredits};
pub use normalize::normalize_credit;

/// A single credit as reported by the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CreditItem {
    /// The engine reported the credit without any content.
    Empty,
    /// Small HTML fragment, usually with at most one image and one link.
    Html(String),
    /// Structured attribution that does not need to be parsed.
    Attribution(Attribution),
}

impl CreditItem {
    /// Creates an HTML credit.
    pub fn html(markup: impl Into<String>) -> Self {
        Self::Html(markup.into())
    }
}

impl From<Attribution> for CreditItem {
    fn from(value: Attribution) -> Self {
        Self::Attribution(value)
    }
}

/// Credit in a form ready to be displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessedCredit {
    /// Url of the logo image.
    pub logo: Option<String>,
    /// Text of the credit.
    pub description: Option<String>,
    /// Link to the credited source.
    pub credit_url: Option<String>,
}

impl From<&Attribution> for ProcessedCredit {
    fn from(value: &Attribution) -> Self {
        Self {
            logo: value.get_logo().map(str::to_owned),
            description: Some(value.get_text().to_owned()),
            credit_url: value.get_url().map(str::to_owned),
        }
    }
}

/// All credits reported by the engine at some point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CreditsSnapshot {
    /// Credit the engine itself requires to be shown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub engine: Option<CreditItem>,
    /// Credits shown in the expanded credit list of the engine.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lightbox: Vec<CreditItem>,
    /// Credits shown on top of the rendered scene.
    #[cfg_attr(feature = "serde", serde(default))]
    pub screen: Vec<CreditItem>,
}

/// Credit entry configured by a user in the attribution widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WidgetCredit {
    /// Id of the property item.
    pub id: String,
    /// Text of the credit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Url of the logo image.
    #[cfg_attr(feature = "serde", serde(default))]
    pub logo: Option<String>,
    /// Link to the credited source.
    #[cfg_attr(feature = "serde", serde(default))]
    pub credit_url: Option<String>,
}

impl From<&WidgetCredit> for ProcessedCredit {
    fn from(value: &WidgetCredit) -> Self {
        Self {
            logo: value.logo.clone(),
            description: value.description.clone(),
            credit_url: value.credit_url.clone(),
        }
    }
}

/// Stored property of the attribution widget.
///
/// The entries live in the `default` property group of the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WidgetCreditConfig {
    /// Configured credits in display order.
    #[cfg_attr(feature = "serde", serde(rename = "default", default))]
    pub entries: Vec<WidgetCredit>,
}

impl WidgetCreditConfig {
    /// Creates a config with the given entries.
    pub fn new(entries: Vec<WidgetCredit>) -> Self {
        Self { entries }
    }
}
