//! Tag application

use log::{debug, warn};

use super::RepositoryLoader;
use crate::error::Result;
use crate::path::Selector;

impl RepositoryLoader<'_> {
    /// Tag every resource matched by a tag selector.
    ///
    /// Selectors are matched against the final repository, after overrides,
    /// including files below mapped directories. A selector that matches
    /// nothing is reported as a warning.
    pub fn apply_tags(&mut self) -> Result<()> {
        let order = self.precedence()?;
        let reachable = self.repository.walk()?;

        for &index in &order {
            let package = &self.packages[index];
            for (selector, tag) in &package.tags {
                let pattern = Selector::new(selector)?;
                let mut matched = 0usize;
                for logical in reachable.iter().filter(|p| pattern.matches(p)) {
                    self.repository.tag(logical, tag);
                    matched += 1;
                }

                if matched == 0 {
                    warn!(
                        "Tag selector '{}' of {} matched no resources",
                        selector, package.name
                    );
                } else {
                    debug!("Tagged {} resources with '{}'", matched, tag);
                }
            }
        }
        Ok(())
    }
}
