//! Customer support chat API for the storefront.
//!
//! JSON endpoints for the customer-side chat widget and the staff inbox,
//! plus the phone+password account endpoints both sides log in through.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
