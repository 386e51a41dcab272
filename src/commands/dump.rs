//! Dump command implementation
//!
//! Acts as the host after an install or update: loads the project in the
//! working directory and fires the requested lifecycle events through a
//! single dispatcher. The plugin generates the locator on the first event
//! and ignores the rest.

use anyhow::{Context, Result};
use clap::Args;
use std::env;
use std::time::Instant;

use resource_locator::defaults;
use resource_locator::host::Host;
use resource_locator::output::{ConsoleIo, OutputConfig};
use resource_locator::plugin::{Event, EventDispatcher, LocatorPlugin, ScriptEvent};

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Lifecycle event to fire (post-install-cmd, post-update-cmd); repeatable
    #[arg(long = "event", value_name = "EVENT")]
    pub events: Vec<ScriptEvent>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl DumpArgs {
    /// Events to fire, in order
    fn events(&self) -> Vec<ScriptEvent> {
        if self.events.is_empty() {
            vec![ScriptEvent::PostInstallCmd, ScriptEvent::PostUpdateCmd]
        } else {
            self.events.clone()
        }
    }
}

/// Execute the dump command
pub fn execute(args: DumpArgs, color: &str) -> Result<()> {
    let start_time = Instant::now();
    let working_dir = env::current_dir().context("Failed to get current directory")?;

    let host = Host::load(&working_dir)?;
    let io = ConsoleIo::new(OutputConfig::from_env_and_flag(color), args.quiet);
    let mut dispatcher = EventDispatcher::new(LocatorPlugin::new());

    for name in args.events() {
        let handled = dispatcher
            .dispatch(&Event::new(name, &host, &io))
            .with_context(|| format!("Failed to handle {}", name))?;
        log::debug!("Dispatched {} (handled: {})", name, handled);
    }

    log::info!(
        "Locator written to {} in {:.2?}",
        defaults::locator_path(&host.config().vendor_dir()).display(),
        start_time.elapsed()
    );
    Ok(())
}
