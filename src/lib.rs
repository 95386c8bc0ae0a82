// Product Shop - Core Library
// XML import/export of users, products and categories over SQLite

pub mod config;
pub mod dataset;
pub mod db;
pub mod dto;
pub mod error;
pub mod export;
pub mod import;
pub mod logger;
pub mod models;
pub mod xml;

// Re-export commonly used types
pub use config::AppConfig;
pub use dataset::{read_dataset, write_result, ExportKind, ImportKind};
pub use db::{open, open_in_memory, reset_database, setup_database, Table};
pub use error::{Result, ShopError};
pub use export::{
    get_categories_by_products_count, get_products_in_range, get_sold_products,
    get_users_with_products,
};
pub use import::{import_categories, import_category_products, import_products, import_users};
pub use models::{Category, CategoryProduct, Product, User};
pub use xml::XmlDocument;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
