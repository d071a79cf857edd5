//! Storefront state and page rendering.
//!
//! Holds what the real site keeps server-side (catalog, accounts, carts)
//! next to what it keeps in the page (current route, open modal, input
//! values). Every DOM read renders a fresh tree from this state.

// ============================================================================
// Imports
// ============================================================================

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rustc_hash::FxHashMap;
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Product, ProductCategory, format_currency};

use super::dom::Node;

// ============================================================================
// Constants
// ============================================================================

/// Cards per home page.
pub(crate) const PAGE_SIZE: usize = 9;

pub(crate) const MSG_PRODUCT_ADDED: &str = "Product added.";
pub(crate) const MSG_FILL_CREDENTIALS: &str = "Please fill out Username and Password.";
pub(crate) const MSG_SIGNUP_OK: &str = "Sign up successful.";
pub(crate) const MSG_USER_EXISTS: &str = "This user already exist.";
pub(crate) const MSG_WRONG_PASSWORD: &str = "Wrong password.";
pub(crate) const MSG_NO_USER: &str = "User does not exist.";
pub(crate) const MSG_FILL_ORDER: &str = "Please fill out Name and Creditcard.";
pub(crate) const MSG_THANK_YOU: &str = "Thank you for your purchase!";

// ============================================================================
// Catalog
// ============================================================================

/// A product the simulated store sells.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Product id (`idp_` on the detail page).
    pub id: u32,
    /// Sidebar category.
    pub category: ProductCategory,
    /// Name, price and description.
    pub product: Product,
}

impl CatalogItem {
    /// Creates a catalog entry.
    pub fn new(
        id: u32,
        category: ProductCategory,
        name: impl Into<String>,
        price: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category,
            product: Product {
                name: name.into(),
                price,
                description: description.into(),
            },
        }
    }
}

/// The fifteen products of the public demo store.
#[must_use]
pub fn demo_catalog() -> Vec<CatalogItem> {
    use ProductCategory::{Laptop, Monitor, Phone};

    [
        (1, Phone, "Samsung galaxy s6", 360.0, "The Samsung Galaxy S6 is powered by 1.5GHz octa-core Samsung Exynos 7420 processor and it comes with 3GB of RAM."),
        (2, Phone, "Nokia lumia 1520", 820.0, "The Nokia Lumia 1520 is powered by 2.2GHz quad-core Qualcomm Snapdragon 800 processor and it comes with 2GB of RAM."),
        (3, Phone, "Nexus 6", 650.0, "The Motorola Google Nexus 6 is powered by 2.7GHz quad-core Qualcomm Snapdragon 805 processor and it comes with 3GB of RAM."),
        (4, Phone, "Samsung galaxy s7", 800.0, "The Samsung Galaxy S7 is powered by 1.6GHz octa-core it comes with 4GB of RAM."),
        (5, Phone, "Iphone 6 32gb", 790.0, "It comes with 1GB of RAM. The phone packs 16GB of internal storage cannot be expanded."),
        (6, Phone, "Sony xperia z5", 320.0, "Sony Xperia Z5 Dual smartphone was launched in September 2015."),
        (7, Phone, "HTC One M9", 700.0, "The HTC One M9 is powered by 1.5GHz octa-core Qualcomm Snapdragon 810 processor and it comes with 3GB of RAM."),
        (8, Laptop, "Sony vaio i5", 790.0, "Sony is so confident that the VAIO S is a superior ultraportable laptop that the company proudly compares the notebook to Apple's 13-inch MacBook Pro."),
        (9, Laptop, "Sony vaio i7", 790.0, "REVIEW Sony is so confident that the VAIO S is a superior ultraportable laptop."),
        (10, Monitor, "Apple monitor 24", 400.0, "LED Cinema Display features a 27-inch glossy LED-backlit TFT active-matrix LCD display."),
        (11, Laptop, "MacBook air", 700.0, "1.6GHz dual-core Intel Core i5 (Turbo Boost up to 2.7GHz) with 3MB shared L3 cache."),
        (12, Laptop, "Dell i7 8gb", 700.0, "6th Generation Intel Core i7 processor with 8GB of memory."),
        (13, Laptop, "2017 Dell 15.6 Inch", 700.0, "7th Gen Intel Core i7-7500U mobile processor 2.70 GHz with Turbo Boost Technology."),
        (14, Monitor, "ASUS Full HD", 230.0, "ASUS VS247H-P 23.6- Inch Full HD"),
        (15, Laptop, "MacBook Pro", 1100.0, "Apple has introduced three new versions of its MacBook Pro line."),
    ]
    .into_iter()
    .map(|(id, category, name, price, description)| {
        CatalogItem::new(id, category, name, price, description)
    })
    .collect()
}

// ============================================================================
// Page State
// ============================================================================

/// Modal dialogs of the site (not native dialogs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Modal {
    Login,
    Signup,
    Order,
}

/// Click handlers attached to rendered elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Navigate to the element's `href`.
    Follow,
    OpenModal(Modal),
    CloseModal(Modal),
    Logout,
    Category(ProductCategory),
    NextPage,
    PreviousPage,
    AddToCart(u32),
    Delete(Uuid),
    LogIn,
    SignUp,
    Purchase,
    ConfirmPurchase,
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CartEntry {
    pub id: Uuid,
    pub prod_id: u32,
}

/// What the current document shows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Page {
    Blank,
    Home {
        category: Option<ProductCategory>,
        offset: usize,
        /// `None` until the product list arrives.
        cards: Option<Vec<u32>>,
    },
    Product {
        id: u32,
        loaded: bool,
    },
    Cart {
        /// `None` until the cart list arrives; then filled row by row. The
        /// table body renders empty in both cases.
        rows: Option<Vec<CartEntry>>,
        /// Set once every row is in.
        total: Option<f64>,
    },
}

/// Loader to run after a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Blank,
    Home,
    Product,
    Cart,
}

// ============================================================================
// Storefront
// ============================================================================

/// Server and page state of the simulated store.
#[derive(Debug)]
pub(crate) struct Storefront {
    base: Url,
    catalog: Vec<CatalogItem>,
    users: FxHashMap<String, String>,
    carts: FxHashMap<String, Vec<CartEntry>>,
    guest: String,
    pub user: Option<String>,
    pub url: String,
    pub page: Page,
    /// Bumped on every navigation; stale loaders compare against it.
    pub generation: u64,
    /// Ticket of the newest grid listing request.
    listing: u64,
    pub modal: Option<Modal>,
    pub inputs: FxHashMap<String, String>,
    pub confirmation: Option<String>,
}

impl Storefront {
    pub fn new(base: Url, catalog: Vec<CatalogItem>, users: FxHashMap<String, String>) -> Self {
        Self {
            base,
            catalog,
            users,
            carts: FxHashMap::default(),
            guest: format!("guest_{}", Uuid::new_v4().simple()),
            user: None,
            url: "about:blank".to_string(),
            page: Page::Blank,
            generation: 0,
            listing: 0,
            modal: None,
            inputs: FxHashMap::default(),
            confirmation: None,
        }
    }

    #[inline]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Cart owner for the current session.
    fn owner(&self) -> String {
        self.user.clone().unwrap_or_else(|| self.guest.clone())
    }

    fn item(&self, id: u32) -> Option<&CatalogItem> {
        self.catalog.iter().find(|item| item.id == id)
    }

    fn price_of(&self, entries: &[CartEntry]) -> f64 {
        entries
            .iter()
            .filter_map(|entry| self.item(entry.prod_id))
            .map(|item| item.product.price)
            .sum()
    }

    fn card_ids(&self, category: Option<ProductCategory>) -> Vec<u32> {
        self.catalog
            .iter()
            .filter(|item| category.is_none_or(|c| c == item.category))
            .map(|item| item.id)
            .collect()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Replaces the document. Returns the loader to schedule.
    pub fn navigate(&mut self, target: &Url) -> Result<Route> {
        if target.host_str() != self.base.host_str() {
            return Err(Error::protocol(format!(
                "Navigation to {target} failed: net::ERR_NAME_NOT_RESOLVED"
            )));
        }

        let path = target.path().trim_start_matches('/');
        let (page, route) = match path {
            "" | "index.html" => (
                Page::Home {
                    category: None,
                    offset: 0,
                    cards: None,
                },
                Route::Home,
            ),
            "prod.html" => {
                let id = target
                    .query_pairs()
                    .find(|(key, _)| key == "idp_")
                    .and_then(|(_, value)| value.parse().ok())
                    .unwrap_or_default();
                (Page::Product { id, loaded: false }, Route::Product)
            }
            "cart.html" => (
                Page::Cart {
                    rows: None,
                    total: None,
                },
                Route::Cart,
            ),
            _ => (Page::Blank, Route::Blank),
        };

        self.page = page;
        self.url = target.to_string();
        self.generation += 1;
        self.modal = None;
        self.inputs.clear();
        self.confirmation = None;
        Ok(route)
    }

    /// Issues a ticket for a grid listing request (`/entries`, `/bycat`,
    /// `/pagination`). Issuing one supersedes every earlier ticket.
    pub fn issue_listing(&mut self) -> u64 {
        self.listing += 1;
        self.listing
    }

    /// Whether a listing answered under `ticket` may still render.
    fn listing_current(&self, generation: u64, ticket: u64) -> bool {
        self.generation == generation && self.listing == ticket
    }

    pub fn load_home(&mut self, generation: u64, ticket: u64) -> bool {
        if !self.listing_current(generation, ticket) {
            return false;
        }
        let ids = self.card_ids(None);
        match &mut self.page {
            Page::Home { cards, .. } => {
                *cards = Some(ids);
                true
            }
            _ => false,
        }
    }

    pub fn load_category(&mut self, generation: u64, ticket: u64, category: ProductCategory) -> bool {
        if !self.listing_current(generation, ticket) {
            return false;
        }
        let ids = self.card_ids(Some(category));
        match &mut self.page {
            Page::Home {
                category: current,
                offset,
                cards,
            } => {
                *current = Some(category);
                *offset = 0;
                *cards = Some(ids);
                true
            }
            _ => false,
        }
    }

    pub fn turn_page(&mut self, generation: u64, ticket: u64, forward: bool) -> bool {
        if !self.listing_current(generation, ticket) {
            return false;
        }
        match &mut self.page {
            Page::Home {
                offset,
                cards: Some(cards),
                ..
            } => {
                if forward && *offset + PAGE_SIZE < cards.len() {
                    *offset += PAGE_SIZE;
                } else if !forward {
                    *offset = offset.saturating_sub(PAGE_SIZE);
                }
                true
            }
            _ => false,
        }
    }

    pub fn load_product(&mut self, generation: u64) -> bool {
        if self.generation != generation {
            return false;
        }
        match &mut self.page {
            Page::Product { loaded, .. } => {
                *loaded = true;
                true
            }
            _ => false,
        }
    }

    /// Marks the cart list as arrived and returns the entries to render.
    ///
    /// The table body is on the page from the start either way, so an empty
    /// cart looks the same before and after this call.
    pub fn begin_cart(&mut self, generation: u64) -> Option<Vec<CartEntry>> {
        if self.generation != generation {
            return None;
        }
        let entries = self.carts.get(&self.owner()).cloned().unwrap_or_default();
        match &mut self.page {
            Page::Cart { rows, .. } => {
                *rows = Some(Vec::new());
                Some(entries)
            }
            _ => None,
        }
    }

    pub fn push_cart_row(&mut self, generation: u64, entry: CartEntry) -> bool {
        if self.generation != generation {
            return false;
        }
        match &mut self.page {
            Page::Cart { rows, .. } => {
                rows.get_or_insert_with(Vec::new).push(entry);
                true
            }
            _ => false,
        }
    }

    pub fn finish_cart(&mut self, generation: u64) {
        if self.generation != generation {
            return;
        }
        let sum = match &self.page {
            Page::Cart {
                rows: Some(rows), ..
            } if !rows.is_empty() => Some(self.price_of(rows)),
            _ => None,
        };
        if let Page::Cart { total, .. } = &mut self.page {
            *total = sum;
        }
    }

    // ========================================================================
    // Cart
    // ========================================================================

    pub fn add_to_cart(&mut self, prod_id: u32) {
        let owner = self.owner();
        self.carts.entry(owner).or_default().push(CartEntry {
            id: Uuid::new_v4(),
            prod_id,
        });
    }

    /// Removes a cart line server-side and from the rendered table.
    pub fn delete_item(&mut self, id: Uuid) {
        let owner = self.owner();
        if let Some(entries) = self.carts.get_mut(&owner) {
            entries.retain(|entry| entry.id != id);
        }

        let sum = match &mut self.page {
            Page::Cart {
                rows: Some(rows), ..
            } => {
                rows.retain(|entry| entry.id != id);
                let rows = rows.clone();
                (!rows.is_empty()).then(|| self.price_of(&rows))
            }
            _ => return,
        };
        if let Page::Cart { total, .. } = &mut self.page {
            *total = sum;
        }
    }

    /// Cart total of the current session.
    pub fn cart_total(&self) -> f64 {
        self.carts
            .get(&self.owner())
            .map_or(0.0, |entries| self.price_of(entries))
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Reads two inputs, `None` if either is empty.
    pub fn credentials(&self, user_field: &str, pass_field: &str) -> Option<(String, String)> {
        let value = |id: &str| self.inputs.get(id).cloned().unwrap_or_default();
        let (username, password) = (value(user_field), value(pass_field));
        (!username.is_empty() && !password.is_empty()).then_some((username, password))
    }

    pub fn authenticate(&mut self, username: &str, password: &str) -> std::result::Result<(), &'static str> {
        match self.users.get(username) {
            None => Err(MSG_NO_USER),
            Some(stored) if stored != password => Err(MSG_WRONG_PASSWORD),
            Some(_) => {
                self.user = Some(username.to_string());
                Ok(())
            }
        }
    }

    pub fn register(&mut self, username: &str, password: &str) -> std::result::Result<(), &'static str> {
        if self.users.contains_key(username) {
            return Err(MSG_USER_EXISTS);
        }
        self.users.insert(username.to_string(), password.to_string());
        Ok(())
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Places the order from the order form and empties the cart.
    pub fn purchase(&mut self) -> std::result::Result<(), &'static str> {
        let value = |id: &str| self.inputs.get(id).cloned().unwrap_or_default();
        let (name, card) = (value("name"), value("card"));
        if name.is_empty() || card.is_empty() {
            return Err(MSG_FILL_ORDER);
        }

        let order_id: u32 = rand::thread_rng().gen_range(1_000_000..10_000_000);
        let amount = self.cart_total();
        self.confirmation = Some(format!(
            "Id: {order_id}\nAmount: {amount:.0} USD\nCard Number: {card}\nName: {name}\nDate: {}",
            today()
        ));
        self.carts.remove(&self.owner());
        self.modal = None;
        Ok(())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Renders the current document.
    pub fn render(&self) -> Node {
        let content = match &self.page {
            Page::Blank => Node::new("div"),
            Page::Home {
                offset, cards, ..
            } => self.render_home(*offset, cards.as_deref()),
            Page::Product { id, loaded } => self.render_product(*id, *loaded),
            Page::Cart { rows, total } => self.render_cart(rows.as_deref(), *total),
        };

        let body = Node::new("body").child(content);
        if matches!(self.page, Page::Blank) {
            return body;
        }

        body.child(self.render_header())
            .child(self.render_account_modal(Modal::Signup))
            .child(self.render_account_modal(Modal::Login))
    }

    fn input(&self, id: &str, kind: &str) -> Node {
        Node::new("input")
            .id(id)
            .class("form-control")
            .attr("type", kind)
            .attr("value", self.inputs.get(id).cloned().unwrap_or_default())
    }

    fn render_header(&self) -> Node {
        let logged_in = self.user.is_some();
        let welcome = self
            .user
            .as_deref()
            .map(|user| format!("Welcome {user}"))
            .unwrap_or_default();
        let link = |id: &str, text: &str| Node::new("a").id(id).class("nav-link").attr("href", "#").text(text);

        Node::new("nav").id("narvbarx").class("navbar").children([
            Node::new("a")
                .id("nava")
                .class("navbar-brand")
                .attr("href", "index.html")
                .text("PRODUCT STORE")
                .on_click(Action::Follow),
            Node::new("ul").class("navbar-nav").children([
                Node::new("li").child(
                    Node::new("a")
                        .class("nav-link")
                        .attr("href", "index.html")
                        .text("Home (current)")
                        .on_click(Action::Follow),
                ),
                Node::new("li").child(
                    Node::new("a")
                        .class("nav-link")
                        .attr("data-target", "#exampleModal")
                        .text("Contact"),
                ),
                Node::new("li").child(
                    Node::new("a")
                        .class("nav-link")
                        .attr("data-target", "#videoModal")
                        .text("About us"),
                ),
                Node::new("li").child(
                    Node::new("a")
                        .id("cartur")
                        .class("nav-link")
                        .attr("href", "cart.html")
                        .text("Cart")
                        .on_click(Action::Follow),
                ),
                Node::new("li").child(
                    link("login2", "Log in")
                        .hidden(logged_in)
                        .on_click(Action::OpenModal(Modal::Login)),
                ),
                Node::new("li").child(
                    link("logout2", "Log out")
                        .hidden(!logged_in)
                        .on_click(Action::Logout),
                ),
                Node::new("li").child(link("nameofuser", welcome.as_str()).hidden(!logged_in)),
                Node::new("li").child(
                    link("signin2", "Sign up")
                        .hidden(logged_in)
                        .on_click(Action::OpenModal(Modal::Signup)),
                ),
            ]),
        ])
    }

    fn render_account_modal(&self, modal: Modal) -> Node {
        let (id, title, user_field, pass_field, submit, action) = match modal {
            Modal::Login => ("logInModal", "Log in", "loginusername", "loginpassword", "Log in", Action::LogIn),
            _ => ("signInModal", "Sign up", "sign-username", "sign-password", "Sign up", Action::SignUp),
        };

        modal_frame(id, title, self.modal != Some(modal), modal)
            .child(
                Node::new("div").class("modal-body").children([
                    Node::new("label").text("Username:"),
                    self.input(user_field, "text"),
                    Node::new("label").text("Password:"),
                    self.input(pass_field, "password"),
                ]),
            )
            .child(modal_footer(modal, submit, action))
    }

    fn render_home(&self, offset: usize, cards: Option<&[u32]>) -> Node {
        let categories = Node::new("div").class("list-group").child(
            Node::new("a").id("cat").class("list-group-item").text("CATEGORIES"),
        );
        let categories = ProductCategory::ALL.into_iter().fold(categories, |group, category| {
            group.child(
                Node::new("a")
                    .id("itemc")
                    .class("list-group-item")
                    .attr("href", "#")
                    .text(category.label())
                    .on_click(Action::Category(category)),
            )
        });

        let ids = cards.unwrap_or_default();
        let grid = Node::new("div").id("tbodyid").children(
            ids.iter()
                .skip(offset)
                .take(PAGE_SIZE)
                .filter_map(|&id| self.item(id))
                .map(render_card),
        );

        let loaded = cards.is_some();
        let pagination = Node::new("ul").class("pagination").children([
            Node::new("li").child(
                Node::new("button")
                    .id("prev2")
                    .class("page-link")
                    .text("Previous")
                    .hidden(!loaded || offset == 0)
                    .on_click(Action::PreviousPage),
            ),
            Node::new("li").child(
                Node::new("button")
                    .id("next2")
                    .class("page-link")
                    .text("Next")
                    .hidden(!loaded || offset + PAGE_SIZE >= ids.len())
                    .on_click(Action::NextPage),
            ),
        ]);

        Node::new("div")
            .id("contcont")
            .children([categories, grid, pagination])
    }

    fn render_product(&self, id: u32, loaded: bool) -> Node {
        let container = Node::new("div").id("tbodyid");
        let Some(item) = self.item(id).filter(|_| loaded) else {
            return container;
        };

        container.children([
            Node::new("div").class("product-image").child(
                Node::new("div")
                    .class("item active")
                    .child(Node::new("img").attr("src", format!("imgs/{id}.jpg"))),
            ),
            Node::new("h2").class("name").text(item.product.name.clone()),
            Node::new("h3")
                .class("price-container")
                .text(format_currency(item.product.price))
                .child(Node::new("small").text(" *includes tax")),
            Node::new("div").id("more-information").children([
                Node::new("strong").text("Product description"),
                Node::new("p").text(item.product.description.clone()),
            ]),
            Node::new("div").class("row").child(
                Node::new("a")
                    .class("btn btn-success btn-lg")
                    .attr("href", "#")
                    .text("Add to cart")
                    .on_click(Action::AddToCart(id)),
            ),
        ])
    }

    fn render_cart(&self, rows: Option<&[CartEntry]>, total: Option<f64>) -> Node {
        // The body is static markup; rows are appended once the list arrives
        let table = Node::new("table").class("table").children([
            Node::new("thead").child(Node::new("tr").children(
                ["Pic", "Title", "Price", "x"].map(|h| Node::new("th").text(h)),
            )),
            Node::new("tbody").id("tbodyid").children(
                rows.unwrap_or_default()
                    .iter()
                    .filter_map(|entry| self.item(entry.prod_id).map(|item| (entry, item)))
                    .map(|(entry, item)| render_cart_row(entry, item)),
            ),
        ]);

        let summary = Node::new("div").class("col-lg-1").children([
            Node::new("h2").text("Total"),
            Node::new("div").class("panel panel-info").child(
                Node::new("h3")
                    .id("totalp")
                    .class("panel-title")
                    .text(total.map(|t| format!("{t:.0}")).unwrap_or_default()),
            ),
            Node::new("button")
                .class("btn btn-success")
                .text("Place Order")
                .on_click(Action::OpenModal(Modal::Order)),
        ]);

        let order = modal_frame("orderModal", "Place order", self.modal != Some(Modal::Order), Modal::Order)
            .child(
                Node::new("div").class("modal-body").children([
                    Node::new("label")
                        .id("totalm")
                        .text(format!("Total: {:.0}", self.cart_total())),
                    self.input("name", "text"),
                    self.input("country", "text"),
                    self.input("city", "text"),
                    self.input("card", "text"),
                    self.input("month", "text"),
                    self.input("year", "text"),
                ]),
            )
            .child(modal_footer(Modal::Order, "Purchase", Action::Purchase));

        let mut page = Node::new("div").id("page-wrapper").children([
            Node::new("div").class("col-lg-8").children([
                Node::new("h2").text("Products"),
                Node::new("div").class("table-responsive").child(table),
            ]),
            summary,
            order,
        ]);

        if let Some(text) = &self.confirmation {
            page = page.child(
                Node::new("div").class("sweet-alert showSweetAlert visible").children([
                    Node::new("h2").text(MSG_THANK_YOU),
                    Node::new("p").class("lead text-muted").text(text.clone()),
                    Node::new("div").class("sa-button-container").child(
                        Node::new("button")
                            .class("confirm btn btn-lg btn-primary")
                            .text("OK")
                            .on_click(Action::ConfirmPurchase),
                    ),
                ]),
            );
        }

        page
    }
}

// ============================================================================
// Rendering Helpers
// ============================================================================

fn render_card(item: &CatalogItem) -> Node {
    let href = format!("prod.html?idp_={}", item.id);
    Node::new("div").class("col-lg-4 col-md-6 mb-4").child(
        Node::new("div").class("card h-100").children([
            Node::new("a")
                .attr("href", href.clone())
                .on_click(Action::Follow)
                .child(Node::new("img").class("card-img-top img-fluid")),
            Node::new("div").class("card-block").children([
                Node::new("h4").class("card-title").child(
                    Node::new("a")
                        .class("hrefch")
                        .attr("href", href)
                        .text(item.product.name.clone())
                        .on_click(Action::Follow),
                ),
                Node::new("h5").text(format_currency(item.product.price)),
                Node::new("p").id("article").text(item.product.description.clone()),
            ]),
        ]),
    )
}

fn render_cart_row(entry: &CartEntry, item: &CatalogItem) -> Node {
    Node::new("tr").class("success").children([
        Node::new("td").child(Node::new("img").attr("width", "100")),
        Node::new("td").text(item.product.name.clone()),
        Node::new("td").text(format!("{:.0}", item.product.price)),
        Node::new("td").child(
            Node::new("a")
                .attr("href", "#")
                .text("Delete")
                .on_click(Action::Delete(entry.id)),
        ),
    ])
}

/// Outer modal with title and close cross.
fn modal_frame(id: &str, title: &str, hidden: bool, modal: Modal) -> Node {
    Node::new("div")
        .id(id)
        .class("modal fade")
        .hidden(hidden)
        .child(Node::new("div").class("modal-header").children([
            Node::new("h5").class("modal-title").text(title),
            Node::new("button")
                .class("close")
                .text("×")
                .on_click(Action::CloseModal(modal)),
        ]))
}

fn modal_footer(modal: Modal, submit: &str, action: Action) -> Node {
    Node::new("div").class("modal-footer").children([
        Node::new("button")
            .class("btn btn-secondary")
            .text("Close")
            .on_click(Action::CloseModal(modal)),
        Node::new("button")
            .class("btn btn-primary")
            .text(submit)
            .on_click(action),
    ])
}

/// Today as `d/m/yyyy` (UTC).
fn today() -> String {
    let days = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() / 86_400)
        .unwrap_or_default();
    let (year, month, day) = civil_from_days(days as i64);
    format!("{day}/{month}/{year}")
}

/// Days since 1970-01-01 to a proleptic Gregorian date.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

// ============================================================================
// Tests
// ============================================================================
