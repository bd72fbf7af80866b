//! Core domain types for the NSE fundamentals screener.
//!
//! This crate provides the types shared by every stage of an ingest run:
//! - `Listing`: one row of the listing file (primary code + symbol)
//! - `MetricsSnapshot`: market cap and ROE for a listing
//! - `ResultRecord`: a screened listing with its profit figure
//! - `Lookup`: explicit outcome of an external lookup
//! - `Crores`, `Percent`: precision-safe numeric types

pub mod decimal;
pub mod error;
pub mod lookup;
pub mod types;

pub use decimal::{Crores, Percent, RUPEES_PER_CRORE};
pub use error::{CoreError, Result};
pub use lookup::Lookup;
pub use types::{Listing, MetricsSnapshot, ResultRecord};
