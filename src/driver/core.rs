//! Chrome launcher and page factory.
//!
//! The [`Driver`] either spawns one Chrome process per page, each with its
//! own temporary profile, or attaches to a running browser and isolates
//! every page in a fresh browser context.
//!
//! # Example
//!
//! ```ignore
//! use storefront_e2e::Driver;
//!
//! let driver = Driver::builder()
//!     .binary("/usr/bin/chromium")
//!     .headless()
//!     .build()?;
//!
//! let page = driver.new_page().await?;
//! page.goto("https://www.demoblaze.com").await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::time::timeout;
use tracing::{debug, info, trace};

use crate::browser::CdpBrowser;
use crate::config::SuiteConfig;
use crate::error::{Error, Result};
use crate::transport::Connection;

use super::builder::DriverBuilder;
use super::options::ChromeOptions;

// ============================================================================
// Constants
// ============================================================================

/// Maximum time for Chrome to print its DevTools endpoint.
const LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Line prefix Chrome prints on stderr once the endpoint is up.
const DEVTOOLS_PREFIX: &str = "DevTools listening on ";

// ============================================================================
// LaunchTarget
// ============================================================================

/// Where pages come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LaunchTarget {
    /// Spawn this binary for every page.
    Launch(PathBuf),
    /// Attach to this DevTools endpoint.
    Connect(String),
}

// ============================================================================
// ChromeProcess
// ============================================================================

/// Guards a Chrome process and its profile directory.
///
/// The process is killed and the directory removed on drop.
pub struct ChromeProcess {
    /// The child process handle.
    child: Option<Child>,
    /// Process ID for logging.
    pid: u32,
    /// Temporary user-data directory.
    _user_data_dir: TempDir,
}

impl ChromeProcess {
    /// Returns the process id.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Kills the process and waits for it to exit.
    pub async fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!(pid = self.pid, "Killing Chrome process");
            if let Err(e) = child.kill().await {
                debug!(pid = self.pid, error = %e, "Failed to kill process");
            }
            info!(pid = self.pid, "Process terminated");
        }
    }
}

impl fmt::Debug for ChromeProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromeProcess")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl Drop for ChromeProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
        {
            debug!(pid = self.pid, error = %e, "Failed to send kill signal in Drop");
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Internal shared state for the driver.
struct DriverInner {
    /// Page source.
    target: LaunchTarget,
    /// Launch options.
    options: ChromeOptions,
}

/// Factory for CDP-backed pages.
#[derive(Clone)]
pub struct Driver {
    inner: Arc<DriverInner>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("target", &self.inner.target)
            .field("headless", &self.inner.options.headless)
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// Creates a configuration builder for the driver.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Builds a driver from suite configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if neither `CHROME_BIN` nor `CDP_WS_URL` is usable.
    pub fn from_config(config: &SuiteConfig) -> Result<Self> {
        DriverBuilder::from_config(config).build()
    }

    /// Creates a driver; use [`Driver::builder`].
    pub(crate) fn new(target: LaunchTarget, options: ChromeOptions) -> Self {
        Self {
            inner: Arc::new(DriverInner { target, options }),
        }
    }

    /// Opens an isolated page.
    ///
    /// # Errors
    ///
    /// - [`Error::BrowserLaunch`] if Chrome fails to start
    /// - [`Error::Connection`] if the DevTools endpoint is unreachable
    /// - [`Error::Protocol`] if target setup fails
    pub async fn new_page(&self) -> Result<CdpBrowser> {
        match &self.inner.target {
            LaunchTarget::Connect(url) => {
                let connection = Connection::connect(url).await?;
                CdpBrowser::attach(connection, None, true).await
            }
            LaunchTarget::Launch(binary) => {
                let (process, ws_url) = self.spawn_chrome(binary).await?;
                let connection = Connection::connect(&ws_url).await?;
                CdpBrowser::attach(connection, Some(process), false).await
            }
        }
    }

    /// Spawns Chrome and waits for its DevTools endpoint.
    async fn spawn_chrome(&self, binary: &Path) -> Result<(ChromeProcess, String)> {
        let user_data_dir = tempfile::Builder::new()
            .prefix("storefront-e2e-")
            .tempdir()?;

        let mut cmd = Command::new(binary);
        cmd.args(self.inner.options.to_args())
            .arg(format!("--user-data-dir={}", user_data_dir.path().display()))
            .arg("about:blank")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::browser_launch(format!("{}: {e}", binary.display())))?;
        let pid = child.id().unwrap_or_default();
        info!(pid, "Chrome process spawned");

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::browser_launch("Chrome stderr not captured"))?;

        let process = ChromeProcess {
            child: Some(child),
            pid,
            _user_data_dir: user_data_dir,
        };

        let ws_url = timeout(LAUNCH_TIMEOUT, read_devtools_url(stderr))
            .await
            .map_err(|_| {
                Error::browser_launch(format!(
                    "No DevTools endpoint within {}ms",
                    LAUNCH_TIMEOUT.as_millis()
                ))
            })??;

        debug!(pid, url = %ws_url, "DevTools endpoint ready");
        Ok((process, ws_url))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Reads stderr until the DevTools line, then keeps draining it in the background.
async fn read_devtools_url(stderr: ChildStderr) -> Result<String> {
    let mut lines = BufReader::new(stderr).lines();

    while let Some(line) = lines.next_line().await? {
        if let Some(url) = parse_devtools_line(&line) {
            let url = url.to_string();

            // A full pipe would stall Chrome
            tokio::spawn(async move {
                while let Ok(Some(line)) = lines.next_line().await {
                    trace!(target: "chrome", "{line}");
                }
            });

            return Ok(url);
        }
        trace!(target: "chrome", "{line}");
    }

    Err(Error::browser_launch(
        "Chrome exited before printing its DevTools endpoint",
    ))
}

/// Extracts the endpoint from a `DevTools listening on ws://...` line.
fn parse_devtools_line(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(DEVTOOLS_PREFIX)
        .map(str::trim)
        .filter(|url| url.starts_with("ws://"))
}

// ============================================================================
// Tests
// ============================================================================
