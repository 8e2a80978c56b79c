use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use cmdreduce::config::{Config, EffectOrdering};
use cmdreduce::demo::Demo;
use cmdreduce::logging::init_tracing;

/// Run the recipes demo: a reducer whose commands fetch data in the
/// background and feed the results back into the store.
#[derive(Debug, Parser)]
#[command(name = "cmdreduce", version, about)]
struct Cli {
    /// Config file (default: ~/.config/cmdreduce/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delay before the first batch arrives, in milliseconds
    #[arg(long)]
    fetch_delay_ms: Option<u64>,

    /// Delay before the follow-up batch arrives, in milliseconds
    #[arg(long)]
    more_delay_ms: Option<u64>,

    /// Number of follow-up recipes to request
    #[arg(long)]
    more: Option<usize>,

    /// How commands from one reducer call are scheduled
    #[arg(long, value_enum)]
    ordering: Option<EffectOrdering>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let path = self.config.clone().unwrap_or_else(Config::config_path);
        let mut config = Config::load_from(&path)?;

        if let Some(ms) = self.fetch_delay_ms {
            config.demo.fetch_delay_ms = ms;
        }
        if let Some(ms) = self.more_delay_ms {
            config.demo.more_delay_ms = ms;
        }
        if let Some(count) = self.more {
            config.demo.more_count = count;
        }
        if let Some(ordering) = self.ordering {
            config.effects.ordering = ordering;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("loading configuration")?;
    init_tracing(&config.logging);

    let demo = Demo::start(&config)?;
    let mut last = String::new();
    let run = demo.run(|state| {
        let view = state.render();
        if view != last {
            println!("{view}");
            last = view;
        }
    });

    tokio::select! {
        state = run => {
            tracing::info!(recipes = state.recipes.len(), "Demo finished");
        }
        result = tokio::signal::ctrl_c() => {
            result.context("waiting for Ctrl-C")?;
            tracing::info!(in_flight = demo.dispatcher.in_flight(), "Interrupted");
        }
    }

    Ok(())
}
