//! Sources of engine credits.

use std::sync::Arc;

use crate::attribution::Attributed;
use crate::credit::{CreditItem, CreditsSnapshot};
use crate::error::GeocreditError;

/// Getter of the current engine credits.
///
/// `Ok(None)` means the engine has nothing to report right now (e.g. it is not initialized yet).
/// Any closure returning `Option<CreditsSnapshot>` is a credit source.
pub trait CreditSource {
    /// Returns the current credits of the engine.
    fn credits(&self) -> Result<Option<CreditsSnapshot>, GeocreditError>;
}

impl<F> CreditSource for F
where
    F: Fn() -> Option<CreditsSnapshot>,
{
    fn credits(&self) -> Result<Option<CreditsSnapshot>, GeocreditError> {
        Ok(self())
    }
}

/// Credit source built from typed attributions, e.g. of the layers of a map.
///
/// Attributions of the registered items are reported as screen credits in the order of
/// registration. Items without an attribution are skipped.
#[derive(Default)]
pub struct AttributionCollector {
    engine: Option<CreditItem>,
    items: Vec<Arc<dyn Attributed>>,
}

impl AttributionCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine-native credit.
    pub fn with_engine_credit(mut self, credit: impl Into<CreditItem>) -> Self {
        self.engine = Some(credit.into());
        self
    }

    /// Registers an item whose attribution should be reported.
    pub fn push(&mut self, item: Arc<dyn Attributed>) {
        self.items.push(item);
    }
}

impl CreditSource for AttributionCollector {
    fn credits(&self) -> Result<Option<CreditsSnapshot>, GeocreditError> {
        let screen = self
            .items
            .iter()
            .filter_map(|item| item.attribution())
            .map(CreditItem::Attribution)
            .collect();

        Ok(Some(CreditsSnapshot {
            engine: self.engine.clone(),
            lightbox: vec![],
            screen,
        }))
    }
}
