//! Per-scenario record shared by step definitions.
//!
//! A [`ScenarioContext`] is created when a scenario starts and dropped when it
//! ends. Steps borrow it mutably one at a time; nothing in it outlives the
//! scenario.

use crate::model::UserCredentials;

/// What earlier steps of the current scenario observed.
#[derive(Debug, Clone, Default)]
pub struct ScenarioContext {
    product_names: Vec<String>,
    /// Last captured native dialog message.
    pub alert_message: Option<String>,
    /// Last order confirmation text.
    pub order_confirmation: Option<String>,
    /// Name of the product last opened.
    pub last_product_name: Option<String>,
    /// Price of the product last opened.
    pub last_product_price: Option<f64>,
    /// Credentials of the account created by a signup step.
    pub credentials: Option<UserCredentials>,
}

impl ScenarioContext {
    /// Creates an empty context.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selected product. The list only grows.
    pub fn remember_product(&mut self, name: impl Into<String>) {
        self.product_names.push(name.into());
    }

    /// Products selected so far, in order.
    #[inline]
    #[must_use]
    pub fn product_names(&self) -> &[String] {
        &self.product_names
    }

    /// Records a dialog message, replacing the previous one.
    pub fn record_alert(&mut self, message: impl Into<String>) {
        self.alert_message = Some(message.into());
    }

    /// Records the product currently shown.
    pub fn record_product(&mut self, name: impl Into<String>, price: f64) {
        self.last_product_name = Some(name.into());
        self.last_product_price = Some(price);
    }

    /// Last alert, lowercased for `contains` checks; empty if none.
    #[must_use]
    pub fn alert_lowercase(&self) -> String {
        self.alert_message.as_deref().unwrap_or_default().to_lowercase()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_names_accumulate() {
        let mut ctx = ScenarioContext::new();
        ctx.remember_product("Nexus 6");
        ctx.remember_product("MacBook air");
        ctx.remember_product("Nexus 6");

        assert_eq!(ctx.product_names(), ["Nexus 6", "MacBook air", "Nexus 6"]);
    }

    #[test]
    fn test_alert_is_replaced() {
        let mut ctx = ScenarioContext::new();
        assert_eq!(ctx.alert_lowercase(), "");

        ctx.record_alert("Wrong password.");
        ctx.record_alert("Product added.");

        assert_eq!(ctx.alert_message.as_deref(), Some("Product added."));
        assert_eq!(ctx.alert_lowercase(), "product added.");
    }
}
