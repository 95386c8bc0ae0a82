// Export pipelines: query → project → order → limit → encode
//
// Sorts are stable and the scans come back in id order, so records with
// equal sort keys keep their insertion order.

use crate::db;
use crate::dto::{
    CategoriesByProductsDocument, CategoryByProducts, ProductInRange, ProductsInRangeDocument,
    SoldProduct, SoldProductList, SoldProductsSummary, UserSoldProducts, UserWithProducts,
    UserWithProductsList, UsersSoldProductsDocument, UsersWithProductsDocument,
};
use crate::error::{Result, ShopError};
use crate::models::Product;
use crate::xml;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::info;

pub const PRICE_RANGE_MIN: i64 = 500;
pub const PRICE_RANGE_MAX: i64 = 1000;
pub const PRODUCTS_IN_RANGE_LIMIT: usize = 10;
pub const SOLD_PRODUCTS_LIMIT: usize = 5;
pub const USERS_WITH_PRODUCTS_LIMIT: usize = 10;

/// Products grouped by seller id, each group in id order
fn sold_by_seller(products: Vec<Product>) -> HashMap<i64, Vec<Product>> {
    let mut sold: HashMap<i64, Vec<Product>> = HashMap::new();
    for product in products {
        if let Some(seller_id) = product.seller_id {
            sold.entry(seller_id).or_default().push(product);
        }
    }
    sold
}

fn revenue_overflow(category_id: i64) -> ShopError {
    ShopError::Overflow {
        context: format!("revenue of category {}", category_id),
    }
}

fn sold_product(product: Product) -> SoldProduct {
    SoldProduct {
        name: product.name,
        price: product.price,
    }
}

// ============================================================================
// PRODUCTS IN RANGE
// ============================================================================

/// Bought products priced 500..=1000, cheapest first, at most 10
pub fn get_products_in_range(conn: &Connection) -> Result<String> {
    let range = Decimal::from(PRICE_RANGE_MIN)..=Decimal::from(PRICE_RANGE_MAX);

    let mut products: Vec<ProductInRange> = db::get_bought_products(conn)?
        .into_iter()
        .filter(|(product, _)| range.contains(&product.price))
        .map(|(product, buyer)| ProductInRange {
            buyer: buyer.full_name(),
            name: product.name,
            price: product.price,
        })
        .collect();

    products.sort_by(|a, b| a.price.cmp(&b.price));
    products.truncate(PRODUCTS_IN_RANGE_LIMIT);
    info!(exported = products.len(), "exported products in range");

    xml::encode(&ProductsInRangeDocument { products })
}

// ============================================================================
// SOLD PRODUCTS
// ============================================================================

/// Sellers ordered by last name then first name, at most 5
pub fn get_sold_products(conn: &Connection) -> Result<String> {
    let mut sold = sold_by_seller(db::get_all_products(conn)?);

    let mut users: Vec<UserSoldProducts> = db::get_all_users(conn)?
        .into_iter()
        .filter_map(|user| {
            let products = sold.remove(&user.id)?;
            Some(UserSoldProducts {
                first_name: user.first_name,
                last_name: user.last_name,
                sold_products: SoldProductList {
                    products: products.into_iter().map(sold_product).collect(),
                },
            })
        })
        .collect();

    users.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
    users.truncate(SOLD_PRODUCTS_LIMIT);
    info!(exported = users.len(), "exported sold products");

    xml::encode(&UsersSoldProductsDocument { users })
}

// ============================================================================
// CATEGORIES BY PRODUCTS COUNT
// ============================================================================

/// Every category with its product count, average price and revenue.
/// Ordered by count (desc), revenue (asc), name (asc). A category without
/// products reports zero for all three figures.
pub fn get_categories_by_products_count(conn: &Connection) -> Result<String> {
    let mut totals: HashMap<i64, (usize, Decimal)> = HashMap::new();
    for (category_id, price) in db::get_category_prices(conn)? {
        let entry = totals.entry(category_id).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = entry
            .1
            .checked_add(price)
            .ok_or_else(|| revenue_overflow(category_id))?;
    }

    let mut categories = Vec::new();
    for category in db::get_all_categories(conn)? {
        let (count, total_revenue) = totals
            .get(&category.id)
            .copied()
            .unwrap_or((0, Decimal::ZERO));
        let average_price = if count == 0 {
            Decimal::ZERO
        } else {
            total_revenue
                .checked_div(Decimal::from(count))
                .ok_or_else(|| revenue_overflow(category.id))?
        };

        categories.push(CategoryByProducts {
            name: category.name,
            count,
            average_price,
            total_revenue,
        });
    }

    categories.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.total_revenue.cmp(&b.total_revenue))
            .then_with(|| a.name.cmp(&b.name))
    });
    info!(exported = categories.len(), "exported categories by products count");

    xml::encode(&CategoriesByProductsDocument { categories })
}

// ============================================================================
// USERS WITH PRODUCTS
// ============================================================================

/// Envelope with the number of sellers and the 10 busiest of them, each
/// with their products most expensive first
pub fn get_users_with_products(conn: &Connection) -> Result<String> {
    let mut sold = sold_by_seller(db::get_all_products(conn)?);

    let mut users: Vec<UserWithProducts> = db::get_all_users(conn)?
        .into_iter()
        .filter_map(|user| {
            let mut products = sold.remove(&user.id)?;
            products.sort_by(|a, b| b.price.cmp(&a.price));

            Some(UserWithProducts {
                first_name: user.first_name,
                last_name: user.last_name,
                age: user.age,
                sold_products: SoldProductsSummary {
                    count: products.len(),
                    products: SoldProductList {
                        products: products.into_iter().map(sold_product).collect(),
                    },
                },
            })
        })
        .collect();

    let count = users.len();
    users.sort_by(|a, b| b.sold_products.count.cmp(&a.sold_products.count));
    users.truncate(USERS_WITH_PRODUCTS_LIMIT);
    info!(sellers = count, exported = users.len(), "exported users with products");

    xml::encode(&UsersWithProductsDocument {
        count,
        users: UserWithProductsList { users },
    })
}
