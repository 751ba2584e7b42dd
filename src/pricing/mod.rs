//! Quotation pricing module.
//!
//! Derives the financial figures of a school-trip quotation from its cost
//! items, group size and markup. The engine in [`calculators`] is pure and
//! synchronous; [`services`] and [`routes`] wrap it with persistence and the
//! HTTP/JSON command surface.

pub mod calculators;
pub mod cost_items;
pub mod errors;
pub mod export;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use calculators::{compute_totals, format_gbp, round_money};
pub use errors::PricingError;
pub use routes::router;
