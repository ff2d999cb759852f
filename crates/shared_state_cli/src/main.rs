use std::fs::read_to_string;
use std::io;
use std::path::Path;

use anyhow::Context;
use bus::Bus;
use clap::Parser;
use tracing::{debug, info};

use crate::opts::{Command, Opts};
use crate::script::{parse_script, ScriptStep};
use crate::session::Session;

mod opts;
mod script;
mod session;

fn main() -> anyhow::Result<()> {
    let args = argfile::expand_args(argfile::parse_fromfile, argfile::PREFIX)?;

    let opts = Opts::parse_from(args);

    cli::tracing::configure_tracing(opts.trace.clone(), opts.verbose.clone())?;

    let config = opts.build_config()?;
    debug!("Using bus config. config: {:?}", config);

    match &opts.command {
        Command::Run {
            script,
        } => {
            let steps = load_script(script)?;

            let stdout = io::stdout();
            let mut session = Session::new(Bus::with_config(config), stdout.lock());
            session.run(&steps)?;

            info!("Finished script. steps: {}", steps.len());
        }
        Command::Check {
            script,
        } => {
            let steps = load_script(script)?;

            println!("Script OK. steps: {}", steps.len());
        }
    }

    Ok(())
}

fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let content = read_to_string(path).with_context(|| format!("Reading script. path: {:?}", path))?;

    let steps = parse_script(&content).with_context(|| format!("Parsing script. path: {:?}", path))?;
    debug!("Loaded script. path: {:?}, steps: {}", path, steps.len());

    Ok(steps)
}
