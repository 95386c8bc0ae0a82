use crate::xml::XmlDocument;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// USERS
// ============================================================================

/// `<User>` inside `<Users>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserImport {
    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    #[serde(rename = "age", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersImport {
    #[serde(rename = "User", default)]
    pub users: Vec<UserImport>,
}

impl XmlDocument for UsersImport {
    const ROOT: &'static str = "Users";
}

// ============================================================================
// PRODUCTS
// ============================================================================

/// `<Product>` inside `<Products>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImport {
    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "price", with = "rust_decimal::serde::str")]
    pub price: Decimal,

    #[serde(rename = "sellerId", default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<i64>,

    #[serde(rename = "buyerId", default, skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsImport {
    #[serde(rename = "Product", default)]
    pub products: Vec<ProductImport>,
}

impl XmlDocument for ProductsImport {
    const ROOT: &'static str = "Products";
}

// ============================================================================
// CATEGORIES
// ============================================================================

/// `<Category>` inside `<Categories>`; a missing name is allowed here and
/// filtered out before persisting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImport {
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoriesImport {
    #[serde(rename = "Category", default)]
    pub categories: Vec<CategoryImport>,
}

impl XmlDocument for CategoriesImport {
    const ROOT: &'static str = "Categories";
}

// ============================================================================
// CATEGORY <-> PRODUCT LINKS
// ============================================================================

/// `<CategoryProduct>` inside `<CategoryProducts>`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryProductImport {
    #[serde(rename = "CategoryId")]
    pub category_id: i64,

    #[serde(rename = "ProductId")]
    pub product_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryProductsImport {
    #[serde(rename = "CategoryProduct", default)]
    pub links: Vec<CategoryProductImport>,
}

impl XmlDocument for CategoryProductsImport {
    const ROOT: &'static str = "CategoryProducts";
}
