// XML shapes of the import payloads and export results
//
// Field renames are the element names on the wire, `XmlDocument::ROOT` is
// the root element. Nothing here touches the store.

pub mod exports;
pub mod imports;

pub use exports::{
    CategoriesByProductsDocument, CategoryByProducts, ProductInRange, ProductsInRangeDocument,
    SoldProduct, SoldProductList, SoldProductsSummary, UserSoldProducts,
    UserWithProducts, UserWithProductsList, UsersSoldProductsDocument, UsersWithProductsDocument,
};
pub use imports::{
    CategoriesImport, CategoryImport, CategoryProductImport, CategoryProductsImport,
    ProductImport, ProductsImport, UserImport, UsersImport,
};
