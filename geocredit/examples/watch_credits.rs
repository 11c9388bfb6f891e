//! This example polls credits from a JSON file, as an engine integration would report them,
//! and prints the merged list every time it changes.
//!
//! ```text
//! cargo run --example watch_credits -- credits.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use geocredit::credit::presets::TilePreset;
use geocredit::error::GeocreditError;
use geocredit::{
    CreditAggregator, CreditPoller, CreditSource, CreditsSnapshot, Messenger, PollingHandle,
    WidgetCredit, WidgetCreditConfig,
};

struct FileCreditSource {
    path: PathBuf,
}

impl CreditSource for FileCreditSource {
    fn credits(&self) -> Result<Option<CreditsSnapshot>, GeocreditError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut snapshot: CreditsSnapshot = serde_json::from_str(&content)
            .map_err(|err| GeocreditError::Generic(err.to_string()))?;
        snapshot.screen.extend(TilePreset::OpenStreetMap.credit());

        Ok(Some(snapshot))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "credits.json".to_string());

    let config = WidgetCreditConfig::new(vec![WidgetCredit {
        id: "project".into(),
        description: Some("Project data".into()),
        logo: None,
        credit_url: Some("https://example.com/data".into()),
    }]);
    let mut aggregator = CreditAggregator::new(config);

    let poller = CreditPoller::with_system_clock(FileCreditSource { path: path.into() });
    let messenger: Arc<dyn Messenger> = Arc::new(|| log::debug!("Redraw requested"));
    let handle = PollingHandle::spawn(poller, Some(messenger))?;
    let mut receiver = handle.subscribe();

    loop {
        if let Some(snapshot) = receiver.borrow_and_update().clone() {
            if aggregator.set_snapshot(&snapshot) {
                print_credits(&aggregator);
            }
        }

        if receiver.changed().await.is_err() {
            break;
        }
    }

    Ok(())
}

fn print_credits(aggregator: &CreditAggregator) {
    let Some(merged) = aggregator.merged() else {
        return;
    };

    if let Some(engine) = &merged.engine {
        println!("[engine] {}", engine.description.as_deref().unwrap_or_default());
    }

    for credit in &merged.others {
        println!(
            "- {} {}",
            credit.description.as_deref().unwrap_or_default(),
            credit.credit_url.as_deref().unwrap_or_default()
        );
    }
}
