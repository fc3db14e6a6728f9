pub mod config_service;
pub mod metadata_service;
pub mod traits;
pub mod types;
pub mod view_service;
pub mod workbook_service;
