//! Storefront domain types and test-data helpers.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use rand::distributions::Alphanumeric;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Products
// ============================================================================

/// Product as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name.
    pub name: String,
    /// Price in whole dollars.
    pub price: f64,
    /// Description paragraph.
    pub description: String,
}

/// Storefront category.
///
/// The sidebar label and the API key differ: laptops are `notebook` on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    /// Phones
    Phone,
    /// Laptops
    Laptop,
    /// Monitors
    Monitor,
}

impl ProductCategory {
    /// All categories in sidebar order.
    pub const ALL: [Self; 3] = [Self::Phone, Self::Laptop, Self::Monitor];

    /// Sidebar link text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phones",
            Self::Laptop => "Laptops",
            Self::Monitor => "Monitors",
        }
    }

    /// Category key used by `/bycat`.
    #[must_use]
    pub fn api_key(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Laptop => "notebook",
            Self::Monitor => "monitor",
        }
    }

    /// Looks a category up by its sidebar label.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for an unknown label.
    pub fn from_label(label: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| Error::config(format!("Unknown category label: {label}")))
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Cart & Orders
// ============================================================================

/// One row scraped from the cart table.
///
/// Rows have no stable id; identity is the row index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product title cell.
    pub name: String,
    /// Price cell, never negative.
    pub price: f64,
}

/// Checkout form contents.
///
/// Free-form; the suite does not validate these.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderInfo {
    /// Customer name.
    pub name: String,
    /// Country.
    pub country: String,
    /// City.
    pub city: String,
    /// Card number.
    pub credit_card: String,
    /// Expiry month.
    pub month: String,
    /// Expiry year.
    pub year: String,
}

impl OrderInfo {
    /// A complete order used by the checkout scenarios.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            name: "John Doe".to_string(),
            country: "United States".to_string(),
            city: "New York".to_string(),
            credit_card: "4111111111111111".to_string(),
            month: "12".to_string(),
            year: "2027".to_string(),
        }
    }

    /// Only the fields the storefront insists on.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            name: "Jane".to_string(),
            credit_card: "5555555555554444".to_string(),
            ..Self::default()
        }
    }
}

/// Parsed purchase confirmation.
///
/// The confirmation body is a block of `Key: value` lines:
///
/// ```text
/// Id: 7214402
/// Amount: 790 USD
/// Card Number: 4111111111111111
/// Name: John Doe
/// Date: 17/9/2026
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderConfirmation {
    /// Order id.
    pub id: Option<String>,
    /// Charged amount.
    pub amount: f64,
    /// Card number as echoed back.
    pub card_number: String,
    /// Customer name.
    pub name: String,
    /// Order date as shown.
    pub date: String,
}

impl OrderConfirmation {
    /// Parses the confirmation text. Missing keys leave defaults.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut confirmation = Self::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "id" => confirmation.id = Some(value.to_string()),
                "amount" => confirmation.amount = parse_price(value),
                "card number" => confirmation.card_number = value.to_string(),
                "name" => confirmation.name = value.to_string(),
                "date" => confirmation.date = value.to_string(),
                _ => {}
            }
        }

        confirmation
    }
}

// ============================================================================
// Users
// ============================================================================

/// Login or signup credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    /// Username.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl UserCredentials {
    /// Creates credentials.
    #[inline]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Fresh random credentials for signup flows.
    #[must_use]
    pub fn random() -> Self {
        Self::new(random_username(), "Test@12345")
    }
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helpers
// ============================================================================

static NON_PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9.]").expect("valid regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static SQL_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|UNION|ALTER)\b").expect("valid regex"),
        Regex::new(r#"'|"|;|--"#).expect("valid regex"),
        Regex::new(r"(?i)\bOR\b.*=").expect("valid regex"),
        Regex::new(r"(?i)\bAND\b.*=").expect("valid regex"),
    ]
});

static XSS_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)<script\b").expect("valid regex"),
        Regex::new(r"(?i)javascript:").expect("valid regex"),
        Regex::new(r"(?i)\bon\w+\s*=").expect("valid regex"),
        Regex::new(r"<[^>]+>").expect("valid regex"),
    ]
});

/// Extracts a price from display text like `"$360 *includes tax"`.
///
/// Everything but digits and `.` is dropped; unparsable text gives `0`.
#[must_use]
pub fn parse_price(text: &str) -> f64 {
    let cleaned = NON_PRICE.replace_all(text, "");
    // "360." or "1.2.3" style leftovers parse by prefix
    leading_number(&cleaned).unwrap_or(0.0)
}

fn leading_number(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    s[..end].parse().ok()
}

/// Formats a whole-dollar amount, `150.0` → `"$150"`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.0}")
}

/// Random lowercase alphanumeric string.
#[must_use]
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// `user_` plus eight random characters.
#[must_use]
pub fn random_username() -> String {
    format!("user_{}", random_string(8))
}

/// `test_<8 chars>@test.com`.
#[must_use]
pub fn random_email() -> String {
    format!("test_{}@test.com", random_string(8))
}

/// Loose `local@domain.tld` check.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Returns `true` if `input` looks like an SQL injection attempt.
#[must_use]
pub fn contains_sql_injection(input: &str) -> bool {
    SQL_PATTERNS.iter().any(|p| p.is_match(input))
}

/// Returns `true` if `input` contains markup or script handlers.
#[must_use]
pub fn contains_xss(input: &str) -> bool {
    XSS_PATTERNS.iter().any(|p| p.is_match(input))
}

// ============================================================================
// Tests
// ============================================================================
