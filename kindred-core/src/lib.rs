//! Ancestry export engine for FamilySearch trees.
//!
//! This crate provides:
//! - Ahnentafel relationship derivation from ascendancy numbers
//! - Location and country derivation from free-text fact places
//! - A sequential tree traversal over a pluggable [`TreeSource`]
//! - Flat-row assembly and .xlsx output
//!
//! # Quick Start
//!
//! ```ignore
//! use familysearch::{Client, Config};
//! use kindred_core::{format_rows, write_spreadsheet, TreeFetcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(Config::new(client_id, redirect_uri));
//!     let session = client.exchange_code(&code).await?;
//!
//!     let fetched = TreeFetcher::new(session)
//!         .fetch_all(|processed, total| println!("Processed {processed} / {total}"))
//!         .await?;
//!
//!     let rows = format_rows(&fetched)?;
//!     write_spreadsheet(&rows, "ancestry.xlsx")?;
//!     Ok(())
//! }
//! ```

pub mod export;
pub mod fetch;
pub mod location;
pub mod relationship;
pub mod sheet;
pub mod testing;

// Primary public API
pub use export::{format_rows, ExportRow, COLUMNS, NO_LOCATIONS};
pub use fetch::{FetchError, FetchedPerson, TreeFetcher, TreeSource, DEFAULT_GENERATIONS};
pub use location::{extract_locations, infer_country, DerivedLocation};
pub use relationship::{AscendancyError, AscendancyNumber, Relationship, Side};
pub use sheet::write_spreadsheet;
