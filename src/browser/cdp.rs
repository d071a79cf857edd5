//! [`Browser`] over the Chrome DevTools Protocol.
//!
//! Locators are resolved inside the page by a small script that walks the
//! segment chain, so every operation is a single `Runtime.evaluate`.
//!
//! Dialog and response events are routed from the connection's event loop:
//!
//! - `Page.javascriptDialogOpening` goes to the armed one-shot, or is
//!   dismissed immediately when nothing is armed
//! - `Network.responseReceived` is published on a broadcast channel
//! - `Page.domContentEventFired` completes a pending [`Browser::goto`]

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{broadcast, oneshot};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::driver::ChromeProcess;
use crate::error::{Error, Result};
use crate::protocol::{Command, Event, EventReply, ParsedEvent};
use crate::transport::{Connection, DEFAULT_COMMAND_TIMEOUT};

use super::{Browser, Dialog, DialogAction, DialogKind, ElementState, Key, Locator, NetworkResponse};

// ============================================================================
// Constants
// ============================================================================

/// Capacity of the response broadcast channel.
const RESPONSE_CHANNEL_CAPACITY: usize = 256;

/// Resolves a serialized [`Locator`] to an element array.
///
/// `hasText` matching is case-insensitive on whitespace-normalized text.
const RESOLVE_JS: &str = r#"(segments) => {
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
  let scope = [document];
  for (const seg of segments) {
    let found = [];
    for (const root of scope) {
      for (const el of root.querySelectorAll(seg.css)) {
        if (!found.includes(el)) found.push(el);
      }
    }
    if (seg.hasText !== undefined) {
      const needle = norm(seg.hasText);
      found = found.filter((el) => norm(el.textContent).includes(needle));
    }
    if (seg.nth !== undefined) {
      found = found[seg.nth] ? [found[seg.nth]] : [];
    }
    scope = found;
  }
  return scope;
}"#;

/// Visibility test for `els[0]`.
const VISIBLE_JS: &str = r#"
  const el = els[0];
  if (!el) return false;
  const style = getComputedStyle(el);
  const rect = el.getBoundingClientRect();
  return style.visibility !== 'hidden' && style.display !== 'none' && rect.width > 0 && rect.height > 0;
"#;

// ============================================================================
// Types
// ============================================================================

/// Slot for the armed dialog receiver.
type DialogSlot = Arc<Mutex<Option<oneshot::Sender<Dialog>>>>;

/// Slot for a pending navigation.
type LoadSlot = Arc<Mutex<Option<oneshot::Sender<()>>>>;

/// Internal shared state for a page.
struct CdpInner {
    /// Connection to the browser endpoint.
    connection: Connection,
    /// Flattened page session.
    session_id: String,
    /// Page target.
    target_id: String,
    /// Context created for this page, `None` when it uses the default one.
    browser_context_id: Option<String>,
    /// Set by the first [`Browser::close`].
    closed: AtomicBool,
    /// Next-dialog registration.
    dialog_slot: DialogSlot,
    /// Pending `DOMContentLoaded`.
    load_slot: LoadSlot,
    /// Response fan-out.
    responses: broadcast::Sender<NetworkResponse>,
    /// Launched process, `None` when attached to an external browser.
    process: tokio::sync::Mutex<Option<ChromeProcess>>,
}

// ============================================================================
// CdpBrowser
// ============================================================================

/// A Chrome page driven over CDP.
///
/// Cheap to clone; clones share the page.
#[derive(Clone)]
pub struct CdpBrowser {
    inner: Arc<CdpInner>,
}

impl fmt::Debug for CdpBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdpBrowser")
            .field("target_id", &self.inner.target_id)
            .field("session_id", &self.inner.session_id)
            .finish_non_exhaustive()
    }
}

impl CdpBrowser {
    /// Opens a page target on `connection` and attaches to it.
    ///
    /// With `isolate`, the page gets its own browser context.
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] if the browser rejects target setup.
    pub(crate) async fn attach(
        connection: Connection,
        process: Option<ChromeProcess>,
        isolate: bool,
    ) -> Result<Self> {
        let browser_context_id = if isolate {
            let result = connection
                .execute(None, Command::TargetCreateBrowserContext {})
                .await?;
            Some(string_field(&result, "browserContextId")?)
        } else {
            None
        };

        let result = connection
            .execute(
                None,
                Command::TargetCreateTarget {
                    url: "about:blank".to_string(),
                    browser_context_id: browser_context_id.clone(),
                },
            )
            .await?;
        let target_id = string_field(&result, "targetId")?;

        let result = connection
            .execute(
                None,
                Command::TargetAttachToTarget {
                    target_id: target_id.clone(),
                    flatten: true,
                },
            )
            .await?;
        let session_id = string_field(&result, "sessionId")?;

        let (responses, _) = broadcast::channel(RESPONSE_CHANNEL_CAPACITY);
        let inner = Arc::new(CdpInner {
            connection,
            session_id,
            target_id,
            browser_context_id,
            closed: AtomicBool::new(false),
            dialog_slot: Arc::new(Mutex::new(None)),
            load_slot: Arc::new(Mutex::new(None)),
            responses,
            process: tokio::sync::Mutex::new(process),
        });

        Self::install_event_handler(&inner);

        for command in [
            Command::PageEnable {},
            Command::NetworkEnable {},
            Command::RuntimeEnable {},
        ] {
            inner
                .connection
                .execute(Some(&inner.session_id), command)
                .await?;
        }

        info!(target_id = %inner.target_id, "Page attached");
        Ok(Self { inner })
    }

    /// Routes page events to the dialog slot, load slot and response channel.
    fn install_event_handler(inner: &Arc<CdpInner>) {
        let session_id = inner.session_id.clone();
        let dialog_slot = Arc::clone(&inner.dialog_slot);
        let load_slot = Arc::clone(&inner.load_slot);
        let responses = inner.responses.clone();

        inner
            .connection
            .set_event_handler(Box::new(move |event: Event| {
                if event.session_id.as_deref() != Some(session_id.as_str()) {
                    return None;
                }

                match event.parse() {
                    ParsedEvent::DialogOpening { kind, message } => {
                        let dialog = Dialog {
                            kind: DialogKind::from_cdp(&kind),
                            message,
                        };

                        let unobserved = match dialog_slot.lock().take() {
                            Some(tx) => tx.send(dialog).err(),
                            None => Some(dialog),
                        };

                        unobserved.map(|dialog| {
                            debug!(message = %dialog.message, "Dismissing unobserved dialog");
                            EventReply::dismiss_dialog(&event)
                        })
                    }

                    ParsedEvent::DomContentLoaded => {
                        if let Some(tx) = load_slot.lock().take() {
                            let _ = tx.send(());
                        }
                        None
                    }

                    ParsedEvent::ResponseReceived { url, status } => {
                        // No subscribers is fine
                        let _ = responses.send(NetworkResponse::new(url, status));
                        None
                    }

                    _ => None,
                }
            }));
    }

    /// Sends a page-session command.
    async fn execute(&self, command: Command) -> Result<Value> {
        self.inner
            .connection
            .execute(Some(&self.inner.session_id), command)
            .await
    }

    /// Evaluates an expression and returns its JSON value.
    async fn eval(&self, expression: String) -> Result<Value> {
        let result = self.execute(Command::evaluate(expression)).await?;

        if let Some(details) = result.get("exceptionDetails") {
            let message = details
                .pointer("/exception/description")
                .or_else(|| details.get("text"))
                .and_then(Value::as_str)
                .unwrap_or("script threw");
            return Err(Error::script(message));
        }

        Ok(result.pointer("/result/value").cloned().unwrap_or(Value::Null))
    }

    /// Evaluates `body` with `els` bound to the locator's matches.
    async fn eval_on(&self, locator: &Locator, body: &str) -> Result<Value> {
        let segments = serde_json::to_string(locator)?;
        let expression =
            format!("(() => {{ const els = ({RESOLVE_JS})({segments}); {body} }})()");
        self.eval(expression).await
    }

    /// Runs an action script that returns `false` when nothing matched.
    async fn act_on(&self, locator: &Locator, body: &str) -> Result<()> {
        let acted = self.eval_on(locator, body).await?;
        if acted.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(Error::element_not_found(locator.to_string(), ElementState::Attached, 0))
        }
    }
}

// ============================================================================
// Browser Implementation
// ============================================================================

#[async_trait]
impl Browser for CdpBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        *self.inner.load_slot.lock() = Some(tx);

        debug!(url, "Navigating");
        let result = self
            .execute(Command::PageNavigate {
                url: url.to_string(),
            })
            .await?;

        if let Some(error_text) = result.get("errorText").and_then(Value::as_str) {
            self.inner.load_slot.lock().take();
            return Err(Error::protocol(format!("Navigation to {url} failed: {error_text}")));
        }

        timeout(DEFAULT_COMMAND_TIMEOUT, rx)
            .await
            .map_err(|_| {
                Error::connection_timeout(
                    format!("goto {url}"),
                    DEFAULT_COMMAND_TIMEOUT.as_millis() as u64,
                )
            })??;

        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let value = self.eval("location.href".to_string()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        debug!(%locator, "Click");
        // Deferred so a synchronous alert cannot hold up the evaluate reply
        self.act_on(
            locator,
            "if (!els.length) return false; \
             const el = els[0]; \
             el.scrollIntoView({ block: 'center' }); \
             setTimeout(() => el.click(), 0); \
             return true;",
        )
        .await
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        debug!(%locator, "Fill");
        let text = serde_json::to_string(text)?;
        self.act_on(
            locator,
            &format!(
                "if (!els.length) return false; \
                 const el = els[0]; \
                 el.focus(); \
                 el.value = {text}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true;"
            ),
        )
        .await
    }

    async fn press(&self, locator: &Locator, key: Key) -> Result<()> {
        debug!(%locator, ?key, "Press");
        self.act_on(locator, "if (!els.length) return false; els[0].focus(); return true;")
            .await?;

        for event_type in ["keyDown", "keyUp"] {
            self.execute(Command::InputDispatchKeyEvent {
                event_type: event_type.to_string(),
                key: key.key().to_string(),
                code: key.code().to_string(),
                key_code: key.key_code(),
                text: (event_type == "keyDown")
                    .then(|| key.text().map(str::to_string))
                    .flatten(),
            })
            .await?;
        }

        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        let value = self.eval_on(locator, "return els.length;").await?;
        Ok(value.as_u64().unwrap_or_default() as usize)
    }

    async fn text_content(&self, locator: &Locator) -> Result<Option<String>> {
        let value = self
            .eval_on(locator, "return els.length ? els[0].textContent : null;")
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>> {
        let value = self
            .eval_on(locator, "return els.map((el) => el.textContent || '');")
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        let name = serde_json::to_string(name)?;
        let value = self
            .eval_on(
                locator,
                &format!("return els.length ? els[0].getAttribute({name}) : null;"),
            )
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let value = self.eval_on(locator, VISIBLE_JS).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn arm_dialog(&self) -> oneshot::Receiver<Dialog> {
        let (tx, rx) = oneshot::channel();
        *self.inner.dialog_slot.lock() = Some(tx);
        rx
    }

    async fn resolve_dialog(&self, action: DialogAction) -> Result<()> {
        self.execute(Command::PageHandleJavaScriptDialog {
            accept: action.is_accept(),
        })
        .await?;
        Ok(())
    }

    fn subscribe_responses(&self) -> broadcast::Receiver<NetworkResponse> {
        self.inner.responses.subscribe()
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let result = self
            .execute(Command::PageCaptureScreenshot {
                format: "png".to_string(),
            })
            .await?;

        let data = string_field(&result, "data")?;
        Base64Standard
            .decode(data)
            .map_err(|e| Error::protocol(format!("Invalid screenshot data: {e}")))
    }

    /// Closes the tab, disposes its context and, if launched, stops Chrome.
    ///
    /// An attached browser outlives the suite, so anything left open here
    /// accumulates there. Cleanup failures are logged, not returned.
    async fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut cleanup = vec![Command::TargetCloseTarget {
            target_id: self.inner.target_id.clone(),
        }];
        if let Some(id) = &self.inner.browser_context_id {
            cleanup.push(Command::TargetDisposeBrowserContext {
                browser_context_id: id.clone(),
            });
        }

        for command in cleanup {
            let method = command.method();
            if let Err(e) = self.inner.connection.execute(None, command).await {
                debug!(error = %e, method, "Cleanup command failed");
            }
        }

        self.inner.connection.shutdown();

        if let Some(mut process) = self.inner.process.lock().await.take() {
            process.kill().await;
        }

        info!(target_id = %self.inner.target_id, "Page closed");
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Reads a required string field from a command result.
fn string_field(result: &Value, key: &str) -> Result<String> {
    result
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::protocol(format!("Missing '{key}' in response")))
}

// ============================================================================
// Tests
// ============================================================================
