//! Lazy element locators.
//!
//! A [`Locator`] is a description, not a handle: the driver resolves it on
//! every use, so it never goes stale when the page re-renders.
//!
//! Resolution works segment by segment. Each segment runs a CSS query under
//! every element matched so far, optionally keeps only elements whose text
//! contains a substring, and optionally picks one element by index.
//!
//! # Example
//!
//! ```ignore
//! use storefront_e2e::Locator;
//!
//! // Delete link inside the cart row for one product
//! let delete = Locator::css("#tbodyid tr")
//!     .has_text("Samsung galaxy s6")
//!     .locator("a")
//!     .has_text("Delete");
//!
//! // Second product title on the grid
//! let title = Locator::css(".card-title a").nth(1);
//! ```

use std::fmt;

use serde::Serialize;

// ============================================================================
// Segment
// ============================================================================

/// One step of a locator chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// CSS selector evaluated under each current match.
    pub css: String,
    /// Keep only elements whose text content contains this.
    #[serde(rename = "hasText", skip_serializing_if = "Option::is_none")]
    pub has_text: Option<String>,
    /// Keep only the element at this index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth: Option<usize>,
}

// ============================================================================
// Locator
// ============================================================================

/// A lazily resolved reference to DOM elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Locator {
    segments: Vec<Segment>,
}

impl Locator {
    /// Creates a locator from a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                css: selector.into(),
                has_text: None,
                nth: None,
            }],
        }
    }

    /// Creates a locator for `#id`.
    #[inline]
    pub fn id(id: impl AsRef<str>) -> Self {
        Self::css(format!("#{}", id.as_ref()))
    }

    /// Narrows the last segment to elements containing `text`.
    #[must_use]
    pub fn has_text(mut self, text: impl Into<String>) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.has_text = Some(text.into());
        }
        self
    }

    /// Narrows the last segment to the element at `index`.
    #[must_use]
    pub fn nth(mut self, index: usize) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.nth = Some(index);
        }
        self
    }

    /// Narrows the last segment to its first element.
    #[inline]
    #[must_use]
    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Chains a CSS query evaluated under the current matches.
    #[must_use]
    pub fn locator(mut self, selector: impl Into<String>) -> Self {
        self.segments.push(Segment {
            css: selector.into(),
            has_text: None,
            nth: None,
        });
        self
    }

    /// Returns the segments in evaluation order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            f.write_str(&segment.css)?;
            if let Some(text) = &segment.has_text {
                write!(f, " >> has_text=\"{text}\"")?;
            }
            if let Some(nth) = segment.nth {
                write!(f, " >> nth={nth}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for Locator {
    fn from(s: &str) -> Self {
        Self::css(s)
    }
}

impl From<String> for Locator {
    fn from(s: String) -> Self {
        Self::css(s)
    }
}

// ============================================================================
// Tests
// ============================================================================
