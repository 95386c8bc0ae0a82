// Catalogue of the eight operations and the files they read or write

use crate::error::Result;
use crate::{export, import};
use clap::ValueEnum;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

// ============================================================================
// IMPORTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportKind {
    Users,
    Products,
    Categories,
    CategoryProducts,
}

impl ImportKind {
    /// Dependency order: links need categories and products, products need users
    pub const ALL: [ImportKind; 4] = [
        ImportKind::Users,
        ImportKind::Products,
        ImportKind::Categories,
        ImportKind::CategoryProducts,
    ];

    pub fn dataset_file(&self) -> &'static str {
        match self {
            ImportKind::Users => "users.xml",
            ImportKind::Products => "products.xml",
            ImportKind::Categories => "categories.xml",
            ImportKind::CategoryProducts => "categories-products.xml",
        }
    }

    pub fn run(&self, conn: &Connection, input_xml: &str) -> Result<String> {
        match self {
            ImportKind::Users => import::import_users(conn, input_xml),
            ImportKind::Products => import::import_products(conn, input_xml),
            ImportKind::Categories => import::import_categories(conn, input_xml),
            ImportKind::CategoryProducts => import::import_category_products(conn, input_xml),
        }
    }
}

// ============================================================================
// EXPORTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    ProductsInRange,
    SoldProducts,
    CategoriesByProducts,
    UsersAndProducts,
}

impl ExportKind {
    pub const ALL: [ExportKind; 4] = [
        ExportKind::ProductsInRange,
        ExportKind::SoldProducts,
        ExportKind::CategoriesByProducts,
        ExportKind::UsersAndProducts,
    ];

    pub fn result_file(&self) -> &'static str {
        match self {
            ExportKind::ProductsInRange => "products-in-range.xml",
            ExportKind::SoldProducts => "users-sold-products.xml",
            ExportKind::CategoriesByProducts => "categories-by-products.xml",
            ExportKind::UsersAndProducts => "users-and-products.xml",
        }
    }

    pub fn run(&self, conn: &Connection) -> Result<String> {
        match self {
            ExportKind::ProductsInRange => export::get_products_in_range(conn),
            ExportKind::SoldProducts => export::get_sold_products(conn),
            ExportKind::CategoriesByProducts => export::get_categories_by_products_count(conn),
            ExportKind::UsersAndProducts => export::get_users_with_products(conn),
        }
    }
}

// ============================================================================
// FILES
// ============================================================================

/// Read a dataset as text, dropping a UTF-8 byte order mark if present
pub fn read_dataset(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

pub fn write_result(path: &Path, xml: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, xml)?;
    Ok(())
}
