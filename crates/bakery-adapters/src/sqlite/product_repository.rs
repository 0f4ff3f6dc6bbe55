use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use bakery_core::{Money, Product, ProductId, ProductRepository, ProductRepositoryError};

const PRODUCT_COLUMNS: &str = "id, name, description, image, category, price_minor, in_stock, stock, is_popular, created_at, updated_at";

pub struct SqliteProductRepository {
    connection: Mutex<Connection>,
}

impl SqliteProductRepository {
    pub fn new(path: &Path) -> Result<Self, ProductRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    pub fn in_memory() -> Result<Self, ProductRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), ProductRepositoryError> {
        let connection = self.connection.lock().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS products (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    image TEXT NOT NULL DEFAULT '',
                    category TEXT NOT NULL,
                    price_minor INTEGER NOT NULL CHECK (price_minor >= 0),
                    in_stock INTEGER NOT NULL DEFAULT 0,
                    stock INTEGER NOT NULL DEFAULT 0,
                    is_popular INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_products_category ON products (category);",
            )
            .map_err(storage_error)
    }

    fn query_products(
        &self,
        filter: &str,
        parameters: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let sql = format!(
            "SELECT {} FROM products {} ORDER BY created_at DESC, id DESC",
            PRODUCT_COLUMNS, filter
        );
        let mut statement = connection.prepare(&sql).map_err(storage_error)?;

        let products = statement
            .query_map(parameters, row_to_product)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(products)
    }
}

impl ProductRepository for SqliteProductRepository {
    fn create(&self, product: &mut Product) -> Result<ProductId, ProductRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO products (name, description, image, category, price_minor, in_stock, stock, is_popular, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    product.name,
                    product.description,
                    product.image,
                    product.category,
                    product.price.minor_units(),
                    product.in_stock,
                    product.stock,
                    product.is_popular,
                    product.created_at.to_rfc3339(),
                    product.updated_at.to_rfc3339(),
                ],
            )
            .map_err(storage_error)?;

        let id = connection.last_insert_rowid();
        product.id = Some(id);

        Ok(id)
    }

    fn update(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let id = product.id.ok_or_else(|| ProductRepositoryError::Storage {
            message: "cannot update product without id".to_string(),
        })?;

        let connection = self.connection.lock().unwrap();

        let rows_affected = connection
            .execute(
                "UPDATE products SET name = ?1, description = ?2, image = ?3, category = ?4,
                    price_minor = ?5, in_stock = ?6, stock = ?7, is_popular = ?8, updated_at = ?9
                 WHERE id = ?10",
                params![
                    product.name,
                    product.description,
                    product.image,
                    product.category,
                    product.price.minor_units(),
                    product.in_stock,
                    product.stock,
                    product.is_popular,
                    Utc::now().to_rfc3339(),
                    id,
                ],
            )
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(ProductRepositoryError::NotFound { id });
        }

        Ok(())
    }

    fn delete(&self, id: ProductId) -> Result<(), ProductRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let rows_affected = connection
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(ProductRepositoryError::NotFound { id });
        }

        Ok(())
    }

    fn find_by_id(&self, id: ProductId) -> Result<Product, ProductRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
                params![id],
                row_to_product,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => ProductRepositoryError::NotFound { id },
                _ => storage_error(error),
            })
    }

    fn find_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        self.query_products("", &[])
    }

    fn find_by_category(&self, category: &str) -> Result<Vec<Product>, ProductRepositoryError> {
        let category = category.to_lowercase();
        self.query_products("WHERE category = ?1", &[&category])
    }

    fn find_popular(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        self.query_products("WHERE is_popular = 1", &[])
    }

    fn search(&self, term: &str) -> Result<Vec<Product>, ProductRepositoryError> {
        let products = self.find_all()?;
        Ok(products
            .into_iter()
            .filter(|product| product.matches(term))
            .collect())
    }

    fn categories(&self) -> Result<Vec<String>, ProductRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let mut statement = connection
            .prepare("SELECT DISTINCT category FROM products ORDER BY category")
            .map_err(storage_error)?;

        let categories = statement
            .query_map([], |row| row.get(0))
            .map_err(storage_error)?
            .collect::<Result<Vec<String>, _>>()
            .map_err(storage_error)?;

        Ok(categories)
    }

    fn update_stock(&self, id: ProductId, stock: u32) -> Result<(), ProductRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let rows_affected = connection
            .execute(
                "UPDATE products SET stock = ?1, in_stock = ?2, updated_at = ?3 WHERE id = ?4",
                params![stock, stock > 0, Utc::now().to_rfc3339(), id],
            )
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(ProductRepositoryError::NotFound { id });
        }

        Ok(())
    }
}

fn storage_error(error: rusqlite::Error) -> ProductRepositoryError {
    ProductRepositoryError::Storage {
        message: error.to_string(),
    }
}

fn row_to_product(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        image: row.get(3)?,
        category: row.get(4)?,
        price: Money::from_minor(row.get(5)?),
        in_stock: row.get(6)?,
        stock: row.get(7)?,
        is_popular: row.get(8)?,
        created_at: parse_timestamp(row, 9)?,
        updated_at: parse_timestamp(row, 10)?,
    })
}

pub(crate) fn parse_timestamp(row: &Row, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cake(name: &str, category: &str, price: i64) -> Product {
        Product::new(name, category, Money::from_major(price))
    }

    #[test]
    fn create_and_retrieve_product() {
        let repository = SqliteProductRepository::in_memory().unwrap();

        let mut product = cake("Tort Ciocolată", "cakes", 120)
            .with_description("Belgian chocolate with vanilla cream")
            .with_stock(5)
            .popular();
        let id = repository.create(&mut product).unwrap();

        assert!(id > 0);
        assert_eq!(product.id, Some(id));

        let retrieved = repository.find_by_id(id).unwrap();
        assert_eq!(retrieved.name, "Tort Ciocolată");
        assert_eq!(retrieved.price, Money::from_major(120));
        assert_eq!(retrieved.stock, 5);
        assert!(retrieved.in_stock);
        assert!(retrieved.is_popular);
    }

    #[test]
    fn missing_product_is_not_found() {
        let repository = SqliteProductRepository::in_memory().unwrap();

        assert!(matches!(
            repository.find_by_id(42),
            Err(ProductRepositoryError::NotFound { id: 42 })
        ));
        assert!(matches!(
            repository.delete(42),
            Err(ProductRepositoryError::NotFound { id: 42 })
        ));
    }

    #[test]
    fn update_changes_fields() {
        let repository = SqliteProductRepository::in_memory().unwrap();
        let mut product = cake("Eclair", "pastry", 12);
        repository.create(&mut product).unwrap();

        product.price = Money::from_minor(1350);
        product.description = "Coffee eclair".to_string();
        repository.update(&product).unwrap();

        let retrieved = repository.find_by_id(product.id.unwrap()).unwrap();
        assert_eq!(retrieved.price, Money::from_minor(1350));
        assert_eq!(retrieved.description, "Coffee eclair");
    }

    #[test]
    fn update_without_id_fails() {
        let repository = SqliteProductRepository::in_memory().unwrap();

        let result = repository.update(&cake("Draft", "cakes", 1));

        assert!(matches!(result, Err(ProductRepositoryError::Storage { .. })));
    }

    #[test]
    fn filters_by_category_and_popularity() {
        let repository = SqliteProductRepository::in_memory().unwrap();
        repository.create(&mut cake("Tort", "cakes", 120).popular()).unwrap();
        repository.create(&mut cake("Cheesecake", "cakes", 90)).unwrap();
        repository.create(&mut cake("Croissant", "pastry", 8)).unwrap();

        assert_eq!(repository.find_all().unwrap().len(), 3);
        assert_eq!(repository.find_by_category("Cakes").unwrap().len(), 2);
        let popular = repository.find_popular().unwrap();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].name, "Tort");
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let repository = SqliteProductRepository::in_memory().unwrap();
        repository.create(&mut cake("Tort", "cakes", 120)).unwrap();
        repository.create(&mut cake("Croissant", "pastry", 8)).unwrap();
        repository.create(&mut cake("Cheesecake", "cakes", 90)).unwrap();

        assert_eq!(repository.categories().unwrap(), vec!["cakes", "pastry"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let repository = SqliteProductRepository::in_memory().unwrap();
        repository
            .create(&mut cake("Cozonac", "bread", 45).with_description("Walnuts and cocoa"))
            .unwrap();
        repository.create(&mut cake("Baguette", "bread", 6)).unwrap();

        let results = repository.search("WALNUT").unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Cozonac");
    }

    #[test]
    fn update_stock_toggles_availability() {
        let repository = SqliteProductRepository::in_memory().unwrap();
        let mut product = cake("Savarină", "pastry", 14).with_stock(3);
        let id = repository.create(&mut product).unwrap();

        repository.update_stock(id, 0).unwrap();
        let sold_out = repository.find_by_id(id).unwrap();
        assert_eq!(sold_out.stock, 0);
        assert!(!sold_out.in_stock);

        repository.update_stock(id, 7).unwrap();
        assert!(repository.find_by_id(id).unwrap().in_stock);
    }

    #[test]
    fn delete_removes_product() {
        let repository = SqliteProductRepository::in_memory().unwrap();
        let id = repository.create(&mut cake("Tort", "cakes", 120)).unwrap();

        repository.delete(id).unwrap();

        assert!(repository.find_all().unwrap().is_empty());
    }
}
