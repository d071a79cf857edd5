//! Named DOM references for the storefront.
//!
//! Everything the page objects touch is listed here so a markup change is a
//! one-line fix. These functions only build [`Locator`]s.

use crate::browser::Locator;

// ============================================================================
// Header
// ============================================================================

/// Navigation bar.
pub mod header {
    use super::Locator;

    /// Brand logo.
    pub fn logo() -> Locator {
        Locator::id("nava")
    }

    /// "Home" link.
    pub fn home() -> Locator {
        Locator::css(".nav-link").has_text("Home")
    }

    /// "Contact" link.
    pub fn contact() -> Locator {
        Locator::css(r##"a[data-target="#exampleModal"]"##)
    }

    /// "About us" link.
    pub fn about() -> Locator {
        Locator::css(r##"a[data-target="#videoModal"]"##)
    }

    /// "Cart" link.
    pub fn cart() -> Locator {
        Locator::id("cartur")
    }

    /// "Log in" link.
    pub fn login() -> Locator {
        Locator::id("login2")
    }

    /// "Sign up" link.
    pub fn signup() -> Locator {
        Locator::id("signin2")
    }

    /// "Log out" link.
    pub fn logout() -> Locator {
        Locator::id("logout2")
    }

    /// "Welcome <user>" label.
    pub fn welcome() -> Locator {
        Locator::id("nameofuser")
    }
}

// ============================================================================
// Modals
// ============================================================================

/// Bootstrap modal parts, keyed by the modal's element id.
pub mod modal {
    use super::Locator;

    /// Modal root.
    pub fn root(id: &str) -> Locator {
        Locator::id(id)
    }

    /// Title inside the modal.
    pub fn title(id: &str) -> Locator {
        Locator::css(format!("#{id} .modal-title"))
    }

    /// Close cross in the modal header.
    pub fn close(id: &str) -> Locator {
        Locator::css(format!("#{id} button.close"))
    }

    /// Footer "Close" button.
    pub fn secondary(id: &str) -> Locator {
        Locator::css(format!("#{id} .btn-secondary"))
    }
}

/// Login modal id.
pub const LOGIN_MODAL: &str = "logInModal";

/// Signup modal id.
pub const SIGNUP_MODAL: &str = "signInModal";

/// Order modal id.
pub const ORDER_MODAL: &str = "orderModal";

// ============================================================================
// Account
// ============================================================================

/// Login and signup forms.
pub mod account {
    use super::Locator;

    pub fn login_username() -> Locator {
        Locator::id("loginusername")
    }

    pub fn login_password() -> Locator {
        Locator::id("loginpassword")
    }

    pub fn login_button() -> Locator {
        Locator::css("button").has_text("Log in")
    }

    pub fn signup_username() -> Locator {
        Locator::id("sign-username")
    }

    pub fn signup_password() -> Locator {
        Locator::id("sign-password")
    }

    pub fn signup_button() -> Locator {
        Locator::css("button").has_text("Sign up")
    }
}

// ============================================================================
// Home
// ============================================================================

/// Product grid.
pub mod home {
    use super::Locator;

    /// Every product card.
    pub fn cards() -> Locator {
        Locator::css(".card")
    }

    /// Title links of the cards.
    pub fn card_titles() -> Locator {
        Locator::css(".card-title a")
    }

    /// Price headings of the cards.
    pub fn card_prices() -> Locator {
        Locator::css(".card h5")
    }

    /// Sidebar category link with `label`.
    pub fn category(label: &str) -> Locator {
        Locator::css("a").has_text(label)
    }

    pub fn next() -> Locator {
        Locator::id("next2")
    }

    pub fn previous() -> Locator {
        Locator::id("prev2")
    }
}

// ============================================================================
// Product
// ============================================================================

/// Product detail page.
pub mod product {
    use super::Locator;

    pub fn name() -> Locator {
        Locator::css(".name")
    }

    pub fn price() -> Locator {
        Locator::css(".price-container")
    }

    pub fn description() -> Locator {
        Locator::css("#more-information p")
    }

    pub fn image() -> Locator {
        Locator::css(".product-image img")
    }

    pub fn add_to_cart() -> Locator {
        Locator::css("a").has_text("Add to cart")
    }
}

// ============================================================================
// Cart
// ============================================================================

/// Cart table and checkout.
pub mod cart {
    use super::Locator;

    /// Row container; absent until the cart has loaded.
    pub fn table() -> Locator {
        Locator::id("tbodyid")
    }

    pub fn rows() -> Locator {
        Locator::css("#tbodyid tr")
    }

    pub fn row_names() -> Locator {
        Locator::css("#tbodyid tr td:nth-child(2)")
    }

    pub fn row_prices() -> Locator {
        Locator::css("#tbodyid tr td:nth-child(3)")
    }

    pub fn delete_buttons() -> Locator {
        Locator::css("#tbodyid tr td:nth-child(4) a")
    }

    /// Delete link in the row showing `name`.
    pub fn delete_for(name: &str) -> Locator {
        rows().has_text(name).locator("a").has_text("Delete")
    }

    pub fn total() -> Locator {
        Locator::id("totalp")
    }

    pub fn place_order() -> Locator {
        Locator::css("button").has_text("Place Order")
    }

    pub fn purchase() -> Locator {
        Locator::css("button").has_text("Purchase")
    }

    pub fn order_name() -> Locator {
        Locator::id("name")
    }

    pub fn order_country() -> Locator {
        Locator::id("country")
    }

    pub fn order_city() -> Locator {
        Locator::id("city")
    }

    pub fn order_card() -> Locator {
        Locator::id("card")
    }

    pub fn order_month() -> Locator {
        Locator::id("month")
    }

    pub fn order_year() -> Locator {
        Locator::id("year")
    }

    /// Purchase confirmation popup.
    pub fn confirmation() -> Locator {
        Locator::css(".sweet-alert")
    }

    pub fn confirmation_text() -> Locator {
        Locator::css(".sweet-alert p")
    }

    pub fn confirmation_ok() -> Locator {
        Locator::css(".sweet-alert .confirm")
    }
}

// ============================================================================
// Tests
// ============================================================================
