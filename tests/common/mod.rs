//! Shared helpers for integration tests.
//!
//! - Logging initialization
//! - Seeded in-memory storefront

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use storefront_e2e::{Browser, MemoryStorefront, Pages, SuiteConfig};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Account that exists on the storefront.
pub const KNOWN_USER: &str = "testuser123";

/// Password of [`KNOWN_USER`].
pub const KNOWN_PASSWORD: &str = "testpass123";

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging once; `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storefront_e2e=info"));

    // Several tests in one binary call this; only the first wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// In-memory storefront with [`KNOWN_USER`] registered.
pub fn storefront(config: &SuiteConfig) -> MemoryStorefront {
    MemoryStorefront::builder()
        .base_url(config.base_url.clone())
        .api_url(config.api_url.clone())
        .user(KNOWN_USER, KNOWN_PASSWORD)
        .build()
        .expect("storefront")
}

/// Page objects over a fresh seeded storefront.
pub fn memory_pages() -> (MemoryStorefront, Pages) {
    let config = SuiteConfig::default();
    let store = storefront(&config);
    let browser: Arc<dyn Browser> = Arc::new(store.clone());
    let pages = Pages::new(browser, &config).expect("pages");
    (store, pages)
}
