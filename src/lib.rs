//! # bleau
//!
//! Client library for the Tableau Server REST and Metadata APIs, with
//! Tableau-styled charts.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bleau::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> bleau::Result<()> {
//!     let config = SessionConfig::new("https://tableau.example.com", "ci-token", "secret")
//!         .with_site("marketing");
//!     let mut session = Session::new(config)?;
//!
//!     if session.authenticate().await? {
//!         let workbooks = WorkbookService::new(&session)?
//!             .list_workbooks(&ListParams::new().page_size(10))
//!             .await?;
//!         println!("{} workbooks", workbooks.len());
//!         session.sign_out().await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  Session, request/response models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Workbook, view, metadata, config services
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Profiles, token secret lookup
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, error mapping, text helpers
//! └─────────────────────────────────────┘
//! ```
//!
//! [`viz`] sits beside these layers and only depends on the API layer to
//! fetch view data.

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use bleau::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::AppError;

    pub use crate::api::models::{Pagination, View, Workbook};
    pub use crate::api::session::{Session, SessionConfig};

    pub use crate::core::services::metadata_service::MetadataService;
    pub use crate::core::services::types::ListParams;
    pub use crate::core::services::view_service::ViewService;
    pub use crate::core::services::workbook_service::WorkbookService;

    pub use crate::storage::config::{Config, Profile};
    pub use crate::storage::credentials::get_token_secret;

    pub use crate::viz::{DataTable, TableauViz, Theme};
}

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Services
pub mod storage; // Configuration and secrets

/// Support modules (used across layers)
pub mod api; // Tableau REST session and models
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers
pub mod viz; // Charts

pub type Result<T> = std::result::Result<T, AppError>;
