//! Common types used across the application.

pub mod amount;
pub mod id;

pub use amount::{AMOUNT_SCALE, format_amount, percentage_of, round_amount};
pub use id::*;
