//! # Locator Plugin
//!
//! The plugin is the single entry point the host calls after installing or
//! updating packages. It subscribes to two lifecycle events and maps both to
//! the same handler, [`LocatorPlugin::on_lifecycle_event`].
//!
//! ## Run-once guarantee
//!
//! The host may fire both events (or one of them several times) during a
//! single logical operation. The plugin therefore carries a [`RunState`]:
//! the first call flips it to `Executed` before doing any work, and every
//! later call returns immediately. A failed run is not retried; only a new
//! plugin instance (a new process) runs the pipeline again.
//!
//! ## Pipeline
//!
//! 1.  Ensure the vendor directory exists and normalize the base and vendor paths.
//! 2.  Announce the run on the IO sink.
//! 3.  Load the root package, then every installed package in host order.
//! 4.  Validate overrides, apply overrides, apply tags.
//! 5.  Write the cache into `<vendor>/composer`.
//! 6.  Write the stub to `<vendor>/resource-locator.php`.
//!
//! Nothing is written to the cache directory before step 4 has succeeded.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;

use log::{debug, info};

use crate::defaults;
use crate::dump;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::loader::RepositoryLoader;
use crate::output::Io;
use crate::path;
use crate::repository::ResourceRepository;

/// Message written to the IO sink when the pipeline starts.
pub const PROGRESS_MESSAGE: &str = "Generating resource locator";

/// Lifecycle events the host can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScriptEvent {
    PostInstallCmd,
    PostUpdateCmd,
}

impl ScriptEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptEvent::PostInstallCmd => "post-install-cmd",
            ScriptEvent::PostUpdateCmd => "post-update-cmd",
        }
    }
}

impl fmt::Display for ScriptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptEvent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "post-install-cmd" => Ok(ScriptEvent::PostInstallCmd),
            "post-update-cmd" => Ok(ScriptEvent::PostUpdateCmd),
            other => Err(format!("unknown script event '{}'", other)),
        }
    }
}

/// A fired lifecycle event and everything the handler may use
pub struct Event<'a> {
    name: ScriptEvent,
    host: &'a Host,
    io: &'a dyn Io,
}

impl<'a> Event<'a> {
    pub fn new(name: ScriptEvent, host: &'a Host, io: &'a dyn Io) -> Self {
        Self { name, host, io }
    }

    pub fn name(&self) -> ScriptEvent {
        self.name
    }

    pub fn host(&self) -> &Host {
        self.host
    }

    pub fn io(&self) -> &dyn Io {
        self.io
    }
}

/// Whether the pipeline already ran for this plugin instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Pending,
    Executed,
}

/// Event handler signature
pub type Handler = fn(&mut LocatorPlugin, &Event<'_>) -> Result<()>;

/// Generates the resource locator after installs and updates
#[derive(Debug, Default)]
pub struct LocatorPlugin {
    state: RunState,
}

impl LocatorPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events the plugin listens to, and the handler for each
    pub fn subscribed_events() -> [(ScriptEvent, Handler); 2] {
        [
            (ScriptEvent::PostInstallCmd, LocatorPlugin::on_lifecycle_event),
            (ScriptEvent::PostUpdateCmd, LocatorPlugin::on_lifecycle_event),
        ]
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the pipeline, at most once per plugin instance.
    pub fn on_lifecycle_event(&mut self, event: &Event<'_>) -> Result<()> {
        if self.state == RunState::Executed {
            debug!("Resource locator already generated, ignoring {}", event.name());
            return Ok(());
        }
        self.state = RunState::Executed;

        let host = event.host();
        let vendor_dir = host.config().vendor_dir();
        dump::ensure_directory_exists(&vendor_dir)?;

        let current_dir = env::current_dir().map_err(|e| Error::PathResolution {
            path: ".".to_string(),
            message: e.to_string(),
        })?;
        let base_path = path::normalize(current_dir)?;
        let vendor_path = path::normalize(&vendor_dir)?;

        event.io().info(PROGRESS_MESSAGE);
        info!(
            "Generating resource locator for {} (triggered by {})",
            base_path.display(),
            event.name()
        );

        let mut repository = ResourceRepository::new();
        {
            let mut loader = RepositoryLoader::new(&mut repository);
            loader.load_package(host.root_package(), &base_path)?;
            for package in host.repository().packages() {
                let install_path = host.installation_manager().install_path(package);
                loader.load_package(package, &install_path)?;
            }
            debug!("Load order: {}", loader.package_names().join(", "));

            loader.validate_overrides()?;
            loader.apply_overrides()?;
            loader.apply_tags()?;
        }

        let cache_dir = defaults::cache_dir(&vendor_path);
        dump::ensure_directory_exists(&cache_dir)?;
        dump::dump_repository(&repository, &cache_dir)?;
        let stub = dump::write_locator_stub(&vendor_path)?;

        info!(
            "Wrote {} resources, locator at {}",
            repository.len(),
            stub.display()
        );
        Ok(())
    }
}

/// Routes fired events to the plugin's handlers
pub struct EventDispatcher {
    plugin: LocatorPlugin,
    listeners: BTreeMap<ScriptEvent, Handler>,
}

impl EventDispatcher {
    /// Create a dispatcher with the plugin's subscriptions registered
    pub fn new(plugin: LocatorPlugin) -> Self {
        let listeners = LocatorPlugin::subscribed_events().into_iter().collect();
        Self { plugin, listeners }
    }

    /// Call the handler registered for the event.
    ///
    /// Returns `Ok(false)` if nothing listens to the event.
    pub fn dispatch(&mut self, event: &Event<'_>) -> Result<bool> {
        match self.listeners.get(&event.name()) {
            Some(handler) => {
                handler(&mut self.plugin, event)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn plugin(&self) -> &LocatorPlugin {
        &self.plugin
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("plugin", &self.plugin)
            .field("events", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}
