// Domain records persisted by the import pipelines
//
// Ids are assigned by the store. A record built from an import payload
// carries id 0 until `db::insert_*` writes the assigned id back.

use rust_decimal::Decimal;

/// Id of a record the store has not seen yet
pub const UNASSIGNED_ID: i64 = 0;

// ============================================================================
// USER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
}

impl User {
    pub fn new(first_name: String, last_name: String, age: Option<i32>) -> Self {
        User {
            id: UNASSIGNED_ID,
            first_name,
            last_name,
            age,
        }
    }

    /// "First Last", used for buyer names in exports
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ============================================================================
// PRODUCT
// ============================================================================

/// Product offered by a seller and optionally bought by a buyer.
/// Price is not validated: zero and negative prices are stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub seller_id: Option<i64>,
    pub buyer_id: Option<i64>,
}

impl Product {
    pub fn new(name: String, price: Decimal, seller_id: Option<i64>, buyer_id: Option<i64>) -> Self {
        Product {
            id: UNASSIGNED_ID,
            name,
            price,
            seller_id,
            buyer_id,
        }
    }
}

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(name: String) -> Self {
        Category {
            id: UNASSIGNED_ID,
            name,
        }
    }
}

// ============================================================================
// CATEGORY <-> PRODUCT LINK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryProduct {
    pub category_id: i64,
    pub product_id: i64,
}

impl CategoryProduct {
    pub fn new(category_id: i64, product_id: i64) -> Self {
        CategoryProduct {
            category_id,
            product_id,
        }
    }
}
