use anyhow::Result;
use product_shop::dto::{
    CategoriesByProductsDocument, ProductsInRangeDocument, UsersSoldProductsDocument,
    UsersWithProductsDocument,
};
use product_shop::xml::decode;
use product_shop::{
    db, read_dataset, write_result, AppConfig, ExportKind, ImportKind, Table,
};
use rust_decimal::Decimal;
use std::fs;
use tempfile::TempDir;

const USERS_XML: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<Users>
    <User><firstName>Chrissy</firstName><lastName>Falconbridge</lastName><age>50</age></User>
    <User><firstName>Wallas</firstName><lastName>Duffyn</lastName></User>
    <User><firstName>Cathee</firstName><lastName>Rallings</lastName><age>33</age></User>
</Users>"#;

const PRODUCTS_XML: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<Products>
    <Product><name>Eliquis</name><price>1038.99</price><sellerId>1</sellerId><buyerId>2</buyerId></Product>
    <Product><name>TRAMADOL</name><price>516.48</price><sellerId>3</sellerId><buyerId>2</buyerId></Product>
    <Product><name>Mouthwash</name><price>206.06</price><sellerId>3</sellerId></Product>
    <Product><name>Foundation</name><price>999.99</price><sellerId>3</sellerId><buyerId>1</buyerId></Product>
</Products>"#;

const CATEGORIES_XML: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<Categories>
    <Category><name>Drugs</name></Category>
    <Category><name>Adult</name></Category>
    <Category><name></name></Category>
</Categories>"#;

const CATEGORY_PRODUCTS_XML: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<CategoryProducts>
    <CategoryProduct><CategoryId>1</CategoryId><ProductId>1</ProductId></CategoryProduct>
    <CategoryProduct><CategoryId>1</CategoryId><ProductId>2</ProductId></CategoryProduct>
    <CategoryProduct><CategoryId>2</CategoryId><ProductId>4</ProductId></CategoryProduct>
    <CategoryProduct><CategoryId>2</CategoryId><ProductId>40</ProductId></CategoryProduct>
    <CategoryProduct><CategoryId>9</CategoryId><ProductId>1</ProductId></CategoryProduct>
</CategoryProducts>"#;

fn write_datasets(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(&config.datasets_dir)?;
    fs::write(config.dataset_path(ImportKind::Users), USERS_XML)?;
    fs::write(config.dataset_path(ImportKind::Products), PRODUCTS_XML)?;
    fs::write(config.dataset_path(ImportKind::Categories), CATEGORIES_XML)?;
    fs::write(
        config.dataset_path(ImportKind::CategoryProducts),
        CATEGORY_PRODUCTS_XML,
    )?;
    Ok(())
}

fn temp_config(dir: &TempDir) -> Result<AppConfig> {
    let config = AppConfig::default().with_overrides(
        Some(dir.path().join("shop.db")),
        Some(dir.path().join("Datasets")),
        Some(dir.path().join("Results")),
    )?;
    Ok(config)
}

/// Import every dataset from disk in dependency order, then export everything
#[test]
fn test_full_dataset_pipeline() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = temp_config(&temp_dir)?;
    write_datasets(&config)?;

    let conn = db::open(&config.database_path)?;

    let summaries: Vec<String> = ImportKind::ALL
        .iter()
        .map(|kind| {
            let xml = read_dataset(&config.dataset_path(*kind))?;
            kind.run(&conn, &xml)
        })
        .collect::<product_shop::Result<_>>()?;

    assert_eq!(
        summaries,
        vec![
            "Successfully imported 3",
            "Successfully imported 4",
            "Successfully imported 2",
            "Successfully imported 3",
        ]
    );
    assert_eq!(db::count_rows(&conn, Table::CategoryProducts)?, 3);

    for kind in ExportKind::ALL {
        write_result(&config.result_path(kind), &kind.run(&conn)?)?;
    }

    let in_range: ProductsInRangeDocument = decode(&fs::read_to_string(
        config.result_path(ExportKind::ProductsInRange),
    )?)?;
    let names: Vec<&str> = in_range.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["TRAMADOL", "Foundation"]);
    assert_eq!(in_range.products[0].buyer, "Wallas Duffyn");
    assert_eq!(in_range.products[1].buyer, "Chrissy Falconbridge");

    let sold: UsersSoldProductsDocument =
        decode(&fs::read_to_string(config.result_path(ExportKind::SoldProducts))?)?;
    let sellers: Vec<&str> = sold.users.iter().map(|u| u.last_name.as_str()).collect();
    assert_eq!(sellers, vec!["Falconbridge", "Rallings"]);
    assert_eq!(sold.users[1].sold_products.products.len(), 3);

    let categories: CategoriesByProductsDocument = decode(&fs::read_to_string(
        config.result_path(ExportKind::CategoriesByProducts),
    )?)?;
    assert_eq!(categories.categories[0].name, "Drugs");
    assert_eq!(categories.categories[0].count, 2);
    assert_eq!(
        categories.categories[0].total_revenue,
        "1555.47".parse::<Decimal>()?
    );
    assert_eq!(categories.categories[1].name, "Adult");
    assert_eq!(categories.categories[1].average_price, "999.99".parse::<Decimal>()?);

    let envelope: UsersWithProductsDocument = decode(&fs::read_to_string(
        config.result_path(ExportKind::UsersAndProducts),
    )?)?;
    assert_eq!(envelope.count, 2);
    let top = &envelope.users.users[0];
    assert_eq!(top.first_name, "Cathee");
    assert_eq!(top.age, Some(33));
    let prices: Vec<String> = top
        .sold_products
        .products
        .products
        .iter()
        .map(|p| p.price.to_string())
        .collect();
    assert_eq!(prices, vec!["999.99", "516.48", "206.06"]);

    Ok(())
}

#[test]
fn test_reset_then_reimport() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = temp_config(&temp_dir)?;
    write_datasets(&config)?;
    let conn = db::open(&config.database_path)?;

    let users = read_dataset(&config.dataset_path(ImportKind::Users))?;
    ImportKind::Users.run(&conn, &users)?;
    ImportKind::Users.run(&conn, &users)?;
    assert_eq!(db::count_rows(&conn, Table::Users)?, 6);

    db::reset_database(&conn)?;
    assert_eq!(db::count_rows(&conn, Table::Users)?, 0);

    ImportKind::Users.run(&conn, &users)?;
    assert_eq!(db::get_all_users(&conn)?[0].id, 1);

    Ok(())
}

#[test]
fn test_bad_dataset_aborts_without_writes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = temp_config(&temp_dir)?;
    let conn = db::open(&config.database_path)?;

    let err = ImportKind::Products
        .run(&conn, "<Products><Product><name>Broken</name></Products>")
        .unwrap_err();

    assert!(err.is_decode());
    assert_eq!(db::count_rows(&conn, Table::Products)?, 0);

    Ok(())
}
