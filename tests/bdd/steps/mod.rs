//! Step definitions, grouped by area.

mod cart;
mod common;
mod login;
mod order;
mod product;
