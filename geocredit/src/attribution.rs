//! This module provides functionality for handling attributions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents an attribution, typically used for citing sources or providing credit.
///
/// This struct stores a text description along with an optional URL where more information
/// or the source can be found, and an optional logo image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribution {
    text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    logo: Option<String>,
}

impl Attribution {
    /// Creates a new `Attribution` with the given text and optional URL.
    pub fn new(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            url,
            logo: None,
        }
    }

    /// Sets the url of the logo image of the attribution.
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Returns a reference to the text of the attribution.
    pub fn get_text(&self) -> &str {
        &self.text
    }

    /// Returns a reference to the URL associated with the attribution, if any.
    pub fn get_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the logo image url, if any.
    pub fn get_logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }
}

/// Something that can report an attribution, e.g. a map layer or an imagery provider.
pub trait Attributed: Send + Sync {
    /// Returns the attribution of the item, if available.
    fn attribution(&self) -> Option<Attribution>;
}

impl Attributed for Attribution {
    fn attribution(&self) -> Option<Attribution> {
        Some(self.clone())
    }
}
