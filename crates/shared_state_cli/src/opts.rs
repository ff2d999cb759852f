#![deny(missing_docs)]

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use bus::BusConfig;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cli::args::DeliveryArg;

#[derive(Parser, Debug)]
#[command(name = "shared_state_cli")]
#[command(bin_name = "shared_state_cli")]
#[command(version, about, long_about = None)]
pub(crate) struct Opts {
    #[command(subcommand)]
    pub(crate) command: Command,

    /// Trace log file
    #[arg(long, num_args = 0..=1, default_missing_value = "trace.log")]
    pub(crate) trace: Option<PathBuf>,

    /// Bus config file (JSON), e.g. '{"delivery": "queued"}'
    #[arg(long, value_name = "CONFIG_FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Message delivery, overrides the config file
    #[arg(long, value_enum)]
    pub(crate) delivery: Option<DeliveryArg>,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run a script, printing the result of each 'read' step
    Run {
        /// Script file
        #[arg(long, value_name = "SCRIPT_FILE")]
        script: PathBuf,
    },
    /// Parse a script without running it
    Check {
        /// Script file
        #[arg(long, value_name = "SCRIPT_FILE")]
        script: PathBuf,
    },
}

impl Opts {
    /// The config file, if any, with the command line overrides applied.
    pub(crate) fn build_config(&self) -> anyhow::Result<BusConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let content = fs::read_to_string(path).with_context(|| format!("Reading config. path: {:?}", path))?;
                serde_json::from_str::<BusConfig>(&content)
                    .with_context(|| format!("Parsing config. path: {:?}", path))?
            }
            None => BusConfig::default(),
        };

        if let Some(delivery) = self.delivery {
            config.delivery = delivery.into();
        }

        Ok(config)
    }
}
