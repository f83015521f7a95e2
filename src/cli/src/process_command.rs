use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use forwarder_client::config_manager::{ConfigLoader, PublisherDefaults};
use forwarder_client::{Destination, RiemannPublisher, SamplePublisher};
use forwarder_common::PublishContext;
use tracing::warn;

use crate::commands::{Cli, Commands};
use crate::logging::setup_logging;
use crate::utils::read_samples;

pub fn process_cli() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_dir.as_deref())?;

    // Use the --config flag, if provided, when loading the configuration
    let defaults = ConfigLoader::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Publish {
            url,
            file,
            request_id,
        } => publish(&url, file.as_deref(), request_id, &defaults),
        Commands::Resolve { url } => {
            let destination = Destination::resolve(&url, &defaults)
                .with_context(|| format!("Invalid destination {url}"))?;
            println!("{}", serde_json::to_string_pretty(&destination)?);
            Ok(())
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&defaults)?);
            Ok(())
        }
    }
}

fn publish(
    url: &str,
    file: Option<&str>,
    request_id: Option<String>,
    defaults: &PublisherDefaults,
) -> Result<()> {
    // a misconfigured destination can never succeed, fail before reading input
    let publisher = RiemannPublisher::from_url(url, defaults)
        .with_context(|| format!("Invalid destination {url}"))?;

    let samples = match file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
            read_samples(BufReader::new(file))?
        }
        None => read_samples(io::stdin().lock())?,
    };

    let context = PublishContext { request_id };

    tokio::runtime::Runtime::new()?.block_on(async {
        publisher.publish_samples(&context, &samples).await;
        if let Err(err) = publisher.close().await {
            warn!("Failed to close connection to {}: {}", publisher.destination(), err);
        }
    });

    println!(
        "Handed {} samples to {}",
        samples.len(),
        publisher.destination()
    );
    Ok(())
}
