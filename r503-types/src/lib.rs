//! # r503-types
//!
//! Decoded response payloads for the R503 fingerprint sensor:
//! - System parameters (status register, library size, comm settings)
//! - Product information page
//! - Index table bitmap of occupied library slots
//! - Search / identify hits

pub mod error;
pub mod index;
pub mod product;
pub mod search;
pub mod system;

pub use error::{Error, Result};
pub use index::IndexTable;
pub use product::ProductInfo;
pub use search::SearchHit;
pub use system::{SystemParameters, SystemStatus};
