//! Locate command implementation
//!
//! Reads the cache written by `dump` and prints physical paths, one per
//! line on stdout.

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeMap;
use std::env;

use resource_locator::config::Config;
use resource_locator::defaults;
use resource_locator::host::{Host, MANIFEST_FILE};
use resource_locator::locator::CacheLocator;

/// Arguments for the locate command
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Logical path to resolve, e.g. /acme/blog/css/style.css
    #[arg(value_name = "PATH", required_unless_present_any = ["tag", "list"])]
    pub path: Option<String>,

    /// List the logical paths carrying this tag instead
    #[arg(short, long, value_name = "TAG", conflicts_with = "path")]
    pub tag: Option<String>,

    /// List every mapping in the cache
    #[arg(short, long, conflicts_with_all = ["path", "tag"])]
    pub list: bool,
}

/// Execute the locate command
pub fn execute(args: LocateArgs) -> Result<()> {
    let working_dir = env::current_dir().context("Failed to get current directory")?;
    // A project without a manifest still has the default vendor directory
    let vendor_dir = if working_dir.join(MANIFEST_FILE).exists() {
        Host::load(&working_dir)?.config().vendor_dir()
    } else {
        Config::from_manifest(&BTreeMap::new()).vendor_dir()
    };

    let locator = CacheLocator::open(defaults::cache_dir(&vendor_dir))
        .context("No resource locator found, run `resource-locator dump` first")?;

    if args.list {
        for (logical, physical) in locator.resources() {
            println!("{} {}", logical, physical.display());
        }
    } else if let Some(tag) = &args.tag {
        for logical in locator.paths_with_tag(tag) {
            println!("{}", logical);
        }
    } else if let Some(path) = &args.path {
        println!("{}", locator.locate(path)?.display());
    }

    Ok(())
}
