// Import pipelines: decode → map → filter → persist
//
// Every operation takes the XML payload as text and returns the summary line
// printed by the CLI. Users report how many records were mapped, the other
// imports report how many rows the store confirmed.

use crate::db;
use crate::dto::{
    CategoriesImport, CategoryImport, CategoryProductImport, CategoryProductsImport,
    ProductImport, ProductsImport, UserImport, UsersImport,
};
use crate::error::Result;
use crate::models::{Category, CategoryProduct, Product, User};
use crate::xml;
use rusqlite::Connection;
use tracing::{debug, info};

pub fn summary(count: usize) -> String {
    format!("Successfully imported {}", count)
}

// ============================================================================
// MAPPING
// ============================================================================

impl From<UserImport> for User {
    fn from(dto: UserImport) -> Self {
        User::new(dto.first_name, dto.last_name, dto.age)
    }
}

impl From<ProductImport> for Product {
    fn from(dto: ProductImport) -> Self {
        Product::new(dto.name, dto.price, dto.seller_id, dto.buyer_id)
    }
}

impl From<CategoryProductImport> for CategoryProduct {
    fn from(dto: CategoryProductImport) -> Self {
        CategoryProduct::new(dto.category_id, dto.product_id)
    }
}

/// Categories without a usable name never reach the store
fn named_category(dto: CategoryImport) -> Option<Category> {
    dto.name.filter(|name| !name.is_empty()).map(Category::new)
}

// ============================================================================
// OPERATIONS
// ============================================================================

pub fn import_users(conn: &Connection, input_xml: &str) -> Result<String> {
    let document: UsersImport = xml::decode(input_xml)?;
    debug!(decoded = document.users.len(), "decoded users");

    let mut users: Vec<User> = document.users.into_iter().map(User::from).collect();

    let written = db::insert_users(conn, &mut users)?;
    info!(mapped = users.len(), written, "imported users");

    Ok(summary(users.len()))
}

pub fn import_products(conn: &Connection, input_xml: &str) -> Result<String> {
    let document: ProductsImport = xml::decode(input_xml)?;
    debug!(decoded = document.products.len(), "decoded products");

    let mut products: Vec<Product> = document.products.into_iter().map(Product::from).collect();

    let written = db::insert_products(conn, &mut products)?;
    info!(written, "imported products");

    Ok(summary(written))
}

pub fn import_categories(conn: &Connection, input_xml: &str) -> Result<String> {
    let document: CategoriesImport = xml::decode(input_xml)?;
    let decoded = document.categories.len();
    debug!(decoded, "decoded categories");

    let mut categories: Vec<Category> = document
        .categories
        .into_iter()
        .filter_map(named_category)
        .collect();

    let written = db::insert_categories(conn, &mut categories)?;
    info!(dropped = decoded - categories.len(), written, "imported categories");

    Ok(summary(written))
}

pub fn import_category_products(conn: &Connection, input_xml: &str) -> Result<String> {
    let document: CategoryProductsImport = xml::decode(input_xml)?;
    let decoded = document.links.len();
    debug!(decoded, "decoded category products");

    let mut links = Vec::with_capacity(decoded);
    for link in document.links.into_iter().map(CategoryProduct::from) {
        if db::category_exists(conn, link.category_id)? && db::product_exists(conn, link.product_id)? {
            links.push(link);
        }
    }

    let written = db::insert_category_products(conn, &links)?;
    info!(dropped = decoded - links.len(), written, "imported category products");

    Ok(summary(written))
}
