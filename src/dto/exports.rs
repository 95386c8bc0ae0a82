use crate::xml::XmlDocument;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// SHARED
// ============================================================================

/// `<Product>` with only name and price, nested under a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldProduct {
    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "price", with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoldProductList {
    #[serde(rename = "Product", default)]
    pub products: Vec<SoldProduct>,
}

// ============================================================================
// PRODUCTS IN RANGE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInRange {
    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "price", with = "rust_decimal::serde::str")]
    pub price: Decimal,

    /// Buyer's "First Last"
    #[serde(rename = "buyer")]
    pub buyer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsInRangeDocument {
    #[serde(rename = "Product", default)]
    pub products: Vec<ProductInRange>,
}

impl XmlDocument for ProductsInRangeDocument {
    const ROOT: &'static str = "Products";
}

// ============================================================================
// SOLD PRODUCTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSoldProducts {
    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    #[serde(rename = "soldProducts", default)]
    pub sold_products: SoldProductList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersSoldProductsDocument {
    #[serde(rename = "User", default)]
    pub users: Vec<UserSoldProducts>,
}

impl XmlDocument for UsersSoldProductsDocument {
    const ROOT: &'static str = "Users";
}

// ============================================================================
// CATEGORIES BY PRODUCTS COUNT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryByProducts {
    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "count")]
    pub count: usize,

    #[serde(rename = "averagePrice", with = "rust_decimal::serde::str")]
    pub average_price: Decimal,

    #[serde(rename = "totalRevenue", with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoriesByProductsDocument {
    #[serde(rename = "Category", default)]
    pub categories: Vec<CategoryByProducts>,
}

impl XmlDocument for CategoriesByProductsDocument {
    const ROOT: &'static str = "Categories";
}

// ============================================================================
// USERS WITH PRODUCTS (envelope)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoldProductsSummary {
    #[serde(rename = "count")]
    pub count: usize,

    #[serde(rename = "products", default)]
    pub products: SoldProductList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithProducts {
    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    #[serde(rename = "age", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,

    #[serde(rename = "SoldProducts")]
    pub sold_products: SoldProductsSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserWithProductsList {
    #[serde(rename = "User", default)]
    pub users: Vec<UserWithProducts>,
}

/// `count` is every user with a sale, `users` only the first page of them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersWithProductsDocument {
    #[serde(rename = "count")]
    pub count: usize,

    #[serde(rename = "users", default)]
    pub users: UserWithProductsList,
}

impl XmlDocument for UsersWithProductsDocument {
    const ROOT: &'static str = "Users";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{decode, encode};

    #[test]
    fn test_envelope_layout() {
        let doc = UsersWithProductsDocument {
            count: 54,
            users: UserWithProductsList {
                users: vec![UserWithProducts {
                    first_name: "Cathee".to_string(),
                    last_name: "Rallings".to_string(),
                    age: Some(33),
                    sold_products: SoldProductsSummary {
                        count: 1,
                        products: SoldProductList {
                            products: vec![SoldProduct {
                                name: "Fair Foundation SPF 15".to_string(),
                                price: "1394.24".parse().unwrap(),
                            }],
                        },
                    },
                }],
            },
        };

        let xml = encode(&doc).unwrap();

        assert!(xml.contains("<Users>"));
        assert!(xml.contains("<count>54</count>"));
        assert!(xml.contains("<users>"));
        assert!(xml.contains("<SoldProducts>"));
        assert!(xml.contains("<products>"));
        assert!(xml.contains("<price>1394.24</price>"));

        let decoded: UsersWithProductsDocument = decode(&xml).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_user_without_age_omits_element() {
        let doc = UsersWithProductsDocument {
            count: 1,
            users: UserWithProductsList {
                users: vec![UserWithProducts {
                    first_name: "No".to_string(),
                    last_name: "Age".to_string(),
                    age: None,
                    sold_products: SoldProductsSummary::default(),
                }],
            },
        };

        let xml = encode(&doc).unwrap();

        assert!(!xml.contains("<age"));
        let decoded: UsersWithProductsDocument = decode(&xml).unwrap();
        assert_eq!(decoded.users.users[0].age, None);
    }
}
