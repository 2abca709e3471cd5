//! Synthetic fundraising dataset generator.
//!
//! Turns a channel/campaign configuration into two tables: donor
//! transactions and donor contact profiles. See `engine::generate`.

pub mod amounts;
pub mod campaign;
pub mod clock;
pub mod config;
pub mod contact_pool;
pub mod dates;
pub mod engine;
pub mod error;
pub mod export;
pub mod identity;
pub mod picker;
pub mod profile;
pub mod rng;
pub mod types;

pub use engine::{generate, Dataset};
pub use error::{GenError, GenResult};
