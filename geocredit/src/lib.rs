//! Geocredit collects the data attribution ("credits") of a map visualizer and packs developer
//! plugins into installable bundles.
//!
//! # Credits
//!
//! A rendering engine reports the credits of the data it displays as a [`CreditsSnapshot`]. The
//! snapshot goes through a small pipeline before it can be displayed:
//!
//! * [`CreditPoller`] calls the engine [`CreditSource`] on creation and then periodically, and
//!   keeps the latest snapshot if it changed,
//! * [`normalize_credit`] converts each engine credit (usually a small HTML fragment) into a
//!   [`ProcessedCredit`],
//! * [`merge_credits`] puts the engine credits together with the entries the user configured in
//!   the attribution widget.
//!
//! ```
//! use std::time::Duration;
//! use geocredit::clock::ManualClock;
//! use geocredit::{CreditAggregator, CreditItem, CreditPoller, CreditsSnapshot, WidgetCreditConfig};
//!
//! let clock = ManualClock::new();
//! let mut poller = CreditPoller::new(
//!     || {
//!         Some(CreditsSnapshot {
//!             screen: vec![CreditItem::html(r#"<a href="https://osm.org">OSM</a>"#)],
//!             ..Default::default()
//!         })
//!     },
//!     clock.clone(),
//! );
//!
//! let mut aggregator = CreditAggregator::new(WidgetCreditConfig::default());
//! clock.advance(Duration::from_secs(3));
//! poller.tick();
//! if let Some(snapshot) = poller.snapshot() {
//!     aggregator.set_snapshot(snapshot);
//! }
//!
//! let merged = aggregator.merged().unwrap();
//! assert_eq!(merged.others[0].credit_url.as_deref(), Some("https://osm.org"));
//! ```
//!
//! # Plugins
//!
//! [`PluginBundler`](plugin::PluginBundler) loads a plugin manifest and the scripts of its
//! extensions from a development server and packs them into a zip archive.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod attribution;
pub mod clock;
pub mod credit;
pub mod error;
mod messenger;
pub mod platform;
pub mod plugin;
pub mod poller;
pub mod source;

pub use attribution::{Attributed, Attribution};
pub use credit::{
    merge_credits, normalize_credit, CreditAggregator, CreditItem, CreditsSnapshot,
    MergedCredits, ProcessedCredit, WidgetCredit, WidgetCreditConfig,
};
pub use messenger::{DummyMessenger, Messenger};
pub use poller::{CreditPoller, PollingHandle, DEFAULT_POLL_PERIOD};
pub use source::{AttributionCollector, CreditSource};

// Reexport the manifest reader
pub use geocredit_manifest;
