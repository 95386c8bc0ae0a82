use crate::error::Result;
use crate::models::{Category, CategoryProduct, Product, User};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::debug;

// ============================================================================
// TABLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Products,
    Categories,
    CategoryProducts,
}

impl Table {
    /// Children before parents, the order tables must be dropped in
    pub const ALL: [Table; 4] = [
        Table::CategoryProducts,
        Table::Products,
        Table::Categories,
        Table::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Products => "products",
            Table::Categories => "categories",
            Table::CategoryProducts => "category_products",
        }
    }
}

// ============================================================================
// CONNECTION + SCHEMA
// ============================================================================

/// Open (or create) the database file and make sure the schema exists
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    // Enable WAL mode for crash recovery
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    debug!(path = %path.display(), journal_mode = %mode, "opened database");

    configure(&conn)?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    setup_database(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    // SQLite leaves foreign keys off unless asked, per connection
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            age INTEGER
        )",
        [],
    )?;

    // Price is kept as decimal text, REAL would round it
    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price TEXT NOT NULL,
            seller_id INTEGER REFERENCES users(id),
            buyer_id INTEGER REFERENCES users(id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS category_products (
            category_id INTEGER NOT NULL REFERENCES categories(id),
            product_id INTEGER NOT NULL REFERENCES products(id),
            PRIMARY KEY (category_id, product_id)
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_seller ON products(seller_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_buyer ON products(buyer_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_category_products_product ON category_products(product_id)",
        [],
    )?;

    Ok(())
}

/// Drop every table and recreate an empty schema
pub fn reset_database(conn: &Connection) -> Result<()> {
    for table in Table::ALL {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", table.as_str()), [])?;
    }
    setup_database(conn)
}

// ============================================================================
// BULK INSERTS
// ============================================================================
//
// Each batch runs in one transaction: either every row is written or none.
// Returned counts are the rows SQLite reports as written.

pub fn insert_users(conn: &Connection, users: &mut [User]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut written = 0;
    let mut ids = Vec::with_capacity(users.len());

    {
        let mut stmt =
            tx.prepare("INSERT INTO users (first_name, last_name, age) VALUES (?1, ?2, ?3)")?;
        for user in users.iter() {
            written += stmt.execute(params![user.first_name, user.last_name, user.age])?;
            ids.push(tx.last_insert_rowid());
        }
    }

    tx.commit()?;

    for (user, id) in users.iter_mut().zip(ids) {
        user.id = id;
    }
    Ok(written)
}

pub fn insert_products(conn: &Connection, products: &mut [Product]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut written = 0;
    let mut ids = Vec::with_capacity(products.len());

    {
        let mut stmt = tx.prepare(
            "INSERT INTO products (name, price, seller_id, buyer_id) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for product in products.iter() {
            written += stmt.execute(params![
                product.name,
                product.price.to_string(),
                product.seller_id,
                product.buyer_id,
            ])?;
            ids.push(tx.last_insert_rowid());
        }
    }

    tx.commit()?;

    for (product, id) in products.iter_mut().zip(ids) {
        product.id = id;
    }
    Ok(written)
}

pub fn insert_categories(conn: &Connection, categories: &mut [Category]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut written = 0;
    let mut ids = Vec::with_capacity(categories.len());

    {
        let mut stmt = tx.prepare("INSERT INTO categories (name) VALUES (?1)")?;
        for category in categories.iter() {
            written += stmt.execute(params![category.name])?;
            ids.push(tx.last_insert_rowid());
        }
    }

    tx.commit()?;

    for (category, id) in categories.iter_mut().zip(ids) {
        category.id = id;
    }
    Ok(written)
}

pub fn insert_category_products(conn: &Connection, links: &[CategoryProduct]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut written = 0;

    {
        let mut stmt = tx
            .prepare("INSERT INTO category_products (category_id, product_id) VALUES (?1, ?2)")?;
        for link in links {
            written += stmt.execute(params![link.category_id, link.product_id])?;
        }
    }

    tx.commit()?;
    Ok(written)
}

// ============================================================================
// LOOKUPS
// ============================================================================

pub fn category_exists(conn: &Connection, id: i64) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn product_exists(conn: &Connection, id: i64) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn count_rows(conn: &Connection, table: Table) -> Result<i64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table.as_str()),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ============================================================================
// SCANS
// ============================================================================

fn price_at(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    text.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn user_from_row(row: &Row, offset: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(offset)?,
        first_name: row.get(offset + 1)?,
        last_name: row.get(offset + 2)?,
        age: row.get(offset + 3)?,
    })
}

fn product_from_row(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: price_at(row, 2)?,
        seller_id: row.get(3)?,
        buyer_id: row.get(4)?,
    })
}

pub fn get_all_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt =
        conn.prepare("SELECT id, first_name, last_name, age FROM users ORDER BY id")?;

    let users = stmt
        .query_map([], |row| user_from_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(users)
}

pub fn get_all_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, price, seller_id, buyer_id FROM products ORDER BY id",
    )?;

    let products = stmt
        .query_map([], product_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(products)
}

pub fn get_all_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;

    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(categories)
}

pub fn get_all_category_products(conn: &Connection) -> Result<Vec<CategoryProduct>> {
    let mut stmt = conn.prepare(
        "SELECT category_id, product_id FROM category_products ORDER BY category_id, product_id",
    )?;

    let links = stmt
        .query_map([], |row| Ok(CategoryProduct::new(row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(links)
}

/// Products that have a buyer, joined with that buyer
pub fn get_bought_products(conn: &Connection) -> Result<Vec<(Product, User)>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, p.price, p.seller_id, p.buyer_id,
                b.id, b.first_name, b.last_name, b.age
         FROM products p
         JOIN users b ON b.id = p.buyer_id
         ORDER BY p.id",
    )?;

    let rows = stmt
        .query_map([], |row| Ok((product_from_row(row)?, user_from_row(row, 5)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// (category id, product price) for every category/product link
pub fn get_category_prices(conn: &Connection) -> Result<Vec<(i64, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT cp.category_id, p.price
         FROM category_products cp
         JOIN products p ON p.id = cp.product_id
         ORDER BY cp.category_id, cp.product_id",
    )?;

    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, price_at(row, 1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
