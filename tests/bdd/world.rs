//! Per-scenario world for the cucumber suite.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use storefront_e2e::pages::finish_scenario;
use storefront_e2e::{Backend, Browser, Driver, Pages, ScenarioContext, SuiteConfig};
use tracing::warn;

use crate::common;

/// One browser page, its page objects and the scenario record.
#[derive(cucumber::World)]
#[world(init = Self::new)]
pub struct StorefrontWorld {
    pub config: SuiteConfig,
    pub pages: Pages,
    pub ctx: ScenarioContext,
    pub browser: Arc<dyn Browser>,
}

impl StorefrontWorld {
    async fn new() -> Result<Self, anyhow::Error> {
        let config = SuiteConfig::from_env()?;
        config.validate()?;

        let browser: Arc<dyn Browser> = match config.backend {
            Backend::Memory => Arc::new(common::storefront(&config)),
            Backend::Cdp => {
                let driver = Driver::from_config(&config)?;
                Arc::new(driver.new_page().await?)
            }
        };

        let pages = Pages::new(Arc::clone(&browser), &config)?;
        Ok(Self {
            config,
            pages,
            ctx: ScenarioContext::new(),
            browser,
        })
    }
}

impl StorefrontWorld {
    /// Screenshots a failed scenario, then releases the page.
    pub async fn finish(&mut self, scenario: &str, failed: bool) {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/screenshots");
        if let Some(path) = finish_scenario(self.browser.as_ref(), &dir, scenario, failed).await {
            warn!(scenario, path = %path.display(), "Scenario failed, screenshot saved");
        }
    }
}

impl fmt::Debug for StorefrontWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontWorld")
            .field("base_url", &self.config.base_url)
            .field("backend", &self.config.backend)
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}
