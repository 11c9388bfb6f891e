use super::{normalize_credit, CreditsSnapshot, ProcessedCredit, WidgetCreditConfig};

/// Result of merging engine credits with the configured ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedCredits {
    /// Engine-native credit, displayed separately from the list.
    pub engine: Option<ProcessedCredit>,
    /// Lightbox credits, then screen credits, then configured entries.
    pub others: Vec<ProcessedCredit>,
}

/// Merges the engine credits with the user-configured entries.
///
/// Engine credits that normalize to nothing are dropped. Configured entries are already
/// structured and are taken as is.
pub fn merge_credits(snapshot: &CreditsSnapshot, config: &WidgetCreditConfig) -> MergedCredits {
    let engine = normalize_credit(snapshot.engine.as_ref());

    let others = snapshot
        .lightbox
        .iter()
        .chain(snapshot.screen.iter())
        .filter_map(|credit| normalize_credit(Some(credit)))
        .chain(config.entries.iter().map(ProcessedCredit::from))
        .collect();

    MergedCredits { engine, others }
}

/// Keeps the merged credits up to date with the latest snapshot and widget config.
///
/// The merge is only recomputed when one of the inputs changes by value. Until the first
/// snapshot is received there are no merged credits at all, even if the widget has configured
/// entries.
#[derive(Debug, Default)]
pub struct CreditAggregator {
    snapshot: Option<CreditsSnapshot>,
    config: WidgetCreditConfig,
    merged: Option<MergedCredits>,
}

impl CreditAggregator {
    /// Creates an aggregator with the given widget config.
    pub fn new(config: WidgetCreditConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Sets the latest engine snapshot. Returns true if the merged credits were recomputed.
    pub fn set_snapshot(&mut self, snapshot: &CreditsSnapshot) -> bool {
        if self.snapshot.as_ref() == Some(snapshot) {
            return false;
        }

        self.snapshot = Some(snapshot.clone());
        self.recompute();
        true
    }

    /// Sets the widget config. Returns true if the merged credits were recomputed.
    pub fn set_config(&mut self, config: &WidgetCreditConfig) -> bool {
        if &self.config == config {
            return false;
        }

        self.config = config.clone();
        self.recompute()
    }

    /// Merged credits for the latest inputs.
    pub fn merged(&self) -> Option<&MergedCredits> {
        self.merged.as_ref()
    }

    fn recompute(&mut self) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };

        log::debug!("Recomputing merged credits");
        self.merged = Some(merge_credits(snapshot, &self.config));
        true
    }
}
