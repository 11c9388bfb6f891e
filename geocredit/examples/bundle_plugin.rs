//! This example loads a plugin from a development server and saves it as a zip bundle.
//!
//! ```text
//! cargo run --example bundle_plugin -- http://localhost:5005 ./target
//! ```

use anyhow::{anyhow, Context};
use geocredit::plugin::PluginBundler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let base_url = args
        .next()
        .ok_or_else(|| anyhow!("usage: bundle_plugin <plugin url> [output folder]"))?;
    let output = args.next().unwrap_or_else(|| ".".to_string());

    let bundler = PluginBundler::new()?;

    let extensions = bundler.dev_extensions(&[base_url.as_str()]).await?;
    for extension in &extensions {
        log::info!("Found extension {} at {}", extension.id, extension.url);
    }

    let bundle = bundler
        .bundle(&base_url)
        .await
        .context("failed to bundle the plugin, see the log for details")?;
    let path = bundle.write_to(&output)?;

    println!("{} files written to {}", bundle.entries().len(), path.display());
    Ok(())
}
