use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use bakery_core::{
    Customer, Delivery, Money, Order, OrderId, OrderItem, OrderRepository, OrderRepositoryError,
    OrderStatus,
};

use super::product_repository::parse_timestamp;

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, items, total_minor, status, delivery_address, delivery_date, notes, payment_intent_id, created_at, updated_at";

pub struct SqliteOrderRepository {
    connection: Mutex<Connection>,
}

impl SqliteOrderRepository {
    pub fn new(path: &Path) -> Result<Self, OrderRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    pub fn in_memory() -> Result<Self, OrderRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), OrderRepositoryError> {
        let connection = self.connection.lock().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS orders (
                    id INTEGER PRIMARY KEY,
                    customer_name TEXT NOT NULL,
                    customer_email TEXT NOT NULL,
                    customer_phone TEXT,
                    items TEXT NOT NULL,
                    total_minor INTEGER NOT NULL,
                    status TEXT NOT NULL DEFAULT 'pending',
                    delivery_address TEXT,
                    delivery_date TEXT,
                    notes TEXT,
                    payment_intent_id TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_orders_email ON orders (customer_email);
                CREATE INDEX IF NOT EXISTS idx_orders_status ON orders (status);",
            )
            .map_err(storage_error)
    }

    fn query_orders(
        &self,
        filter: &str,
        parameters: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let sql = format!(
            "SELECT {} FROM orders {} ORDER BY created_at DESC, id DESC",
            ORDER_COLUMNS, filter
        );
        let mut statement = connection.prepare(&sql).map_err(storage_error)?;

        let orders = statement
            .query_map(parameters, row_to_order)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(orders)
    }

    fn execute_for(
        &self,
        id: OrderId,
        sql: &str,
        parameters: &[&dyn rusqlite::ToSql],
    ) -> Result<(), OrderRepositoryError> {
        let connection = self.connection.lock().unwrap();

        let rows_affected = connection.execute(sql, parameters).map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(OrderRepositoryError::NotFound { id });
        }

        Ok(())
    }
}

impl OrderRepository for SqliteOrderRepository {
    fn create(&self, order: &mut Order) -> Result<OrderId, OrderRepositoryError> {
        let items = serde_json::to_string(&order.items).map_err(|error| {
            OrderRepositoryError::Storage {
                message: format!("failed to encode order items: {}", error),
            }
        })?;

        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO orders (customer_name, customer_email, customer_phone, items, total_minor, status,
                    delivery_address, delivery_date, notes, payment_intent_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    order.customer.name,
                    order.customer.email,
                    order.customer.phone,
                    items,
                    order.total.minor_units(),
                    order.status.as_str(),
                    order.delivery.address,
                    order.delivery.date,
                    order.delivery.notes,
                    order.payment_intent_id,
                    order.created_at.to_rfc3339(),
                    order.updated_at.to_rfc3339(),
                ],
            )
            .map_err(storage_error)?;

        let id = connection.last_insert_rowid();
        order.id = Some(id);

        Ok(id)
    }

    fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), OrderRepositoryError> {
        self.execute_for(
            id,
            "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3",
            &[&status.as_str(), &Utc::now().to_rfc3339(), &id],
        )
    }

    fn attach_payment(
        &self,
        id: OrderId,
        payment_intent_id: &str,
    ) -> Result<(), OrderRepositoryError> {
        self.execute_for(
            id,
            "UPDATE orders SET payment_intent_id = ?1, updated_at = ?2 WHERE id = ?3",
            &[&payment_intent_id, &Utc::now().to_rfc3339(), &id],
        )
    }

    fn delete(&self, id: OrderId) -> Result<(), OrderRepositoryError> {
        self.execute_for(id, "DELETE FROM orders WHERE id = ?1", &[&id])
    }

    fn find_by_id(&self, id: OrderId) -> Result<Order, OrderRepositoryError> {
        let connection = self.connection.lock().unwrap();

        connection
            .query_row(
                &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS),
                params![id],
                row_to_order,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => OrderRepositoryError::NotFound { id },
                _ => storage_error(error),
            })
    }

    fn find_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        self.query_orders("", &[])
    }

    fn find_by_customer(&self, email: &str) -> Result<Vec<Order>, OrderRepositoryError> {
        self.query_orders("WHERE customer_email = ?1 COLLATE NOCASE", &[&email])
    }

    fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderRepositoryError> {
        self.query_orders("WHERE status = ?1", &[&status.as_str()])
    }
}

fn storage_error(error: rusqlite::Error) -> OrderRepositoryError {
    OrderRepositoryError::Storage {
        message: error.to_string(),
    }
}

fn row_to_order(row: &Row) -> rusqlite::Result<Order> {
    let raw_items: String = row.get(4)?;
    let items: Vec<OrderItem> = serde_json::from_str(&raw_items).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(error))
    })?;

    let raw_status: String = row.get(6)?;
    let status = OrderStatus::from_stored(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown order status '{}'", raw_status).into(),
        )
    })?;

    Ok(Order {
        id: Some(row.get(0)?),
        customer: Customer {
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
        },
        items,
        total: Money::from_minor(row.get(5)?),
        status,
        delivery: Delivery {
            address: row.get(7)?,
            date: row.get(8)?,
            notes: row.get(9)?,
        },
        payment_intent_id: row.get(10)?,
        created_at: parse_timestamp(row, 11)?,
        updated_at: parse_timestamp(row, 12)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(email: &str) -> Customer {
        Customer {
            name: "Ana Popescu".to_string(),
            email: email.to_string(),
            phone: Some("0722000000".to_string()),
        }
    }

    fn order(email: &str) -> Order {
        Order::new(
            customer(email),
            vec![
                OrderItem {
                    product_id: 1,
                    product_name: "Tort Ciocolată".to_string(),
                    quantity: 1,
                    unit_price: Money::from_major(120),
                },
                OrderItem {
                    product_id: 2,
                    product_name: "Cozonac".to_string(),
                    quantity: 2,
                    unit_price: Money::from_major(45),
                },
            ],
            Delivery {
                address: Some("Strada Florilor 3".to_string()),
                date: Some("2026-12-24".to_string()),
                notes: None,
            },
        )
    }

    #[test]
    fn create_and_retrieve_order() {
        let repository = SqliteOrderRepository::in_memory().unwrap();
        let mut created = order("ana@example.com");

        let id = repository.create(&mut created).unwrap();

        assert_eq!(created.id, Some(id));
        let retrieved = repository.find_by_id(id).unwrap();
        assert_eq!(retrieved.customer, created.customer);
        assert_eq!(retrieved.items, created.items);
        assert_eq!(retrieved.total, Money::from_major(210));
        assert_eq!(retrieved.status, OrderStatus::Pending);
        assert_eq!(retrieved.delivery, created.delivery);
        assert!(retrieved.payment_intent_id.is_none());
    }

    #[test]
    fn update_status_and_attach_payment() {
        let repository = SqliteOrderRepository::in_memory().unwrap();
        let id = repository.create(&mut order("ana@example.com")).unwrap();

        repository.attach_payment(id, "pi_123").unwrap();
        repository.update_status(id, OrderStatus::Confirmed).unwrap();

        let retrieved = repository.find_by_id(id).unwrap();
        assert_eq!(retrieved.status, OrderStatus::Confirmed);
        assert_eq!(retrieved.payment_intent_id.as_deref(), Some("pi_123"));
    }

    #[test]
    fn operations_on_missing_order_are_not_found() {
        let repository = SqliteOrderRepository::in_memory().unwrap();

        assert!(matches!(
            repository.find_by_id(9),
            Err(OrderRepositoryError::NotFound { id: 9 })
        ));
        assert!(matches!(
            repository.update_status(9, OrderStatus::Ready),
            Err(OrderRepositoryError::NotFound { id: 9 })
        ));
        assert!(matches!(
            repository.attach_payment(9, "pi_1"),
            Err(OrderRepositoryError::NotFound { id: 9 })
        ));
        assert!(matches!(
            repository.delete(9),
            Err(OrderRepositoryError::NotFound { id: 9 })
        ));
    }

    #[test]
    fn find_by_customer_ignores_email_case() {
        let repository = SqliteOrderRepository::in_memory().unwrap();
        repository.create(&mut order("ana@example.com")).unwrap();
        repository.create(&mut order("ion@example.com")).unwrap();

        let orders = repository.find_by_customer("ANA@example.com").unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].customer.email, "ana@example.com");
    }

    #[test]
    fn find_by_status_filters_orders() {
        let repository = SqliteOrderRepository::in_memory().unwrap();
        let first = repository.create(&mut order("ana@example.com")).unwrap();
        repository.create(&mut order("ion@example.com")).unwrap();
        repository.update_status(first, OrderStatus::Cancelled).unwrap();

        let cancelled = repository.find_by_status(OrderStatus::Cancelled).unwrap();
        let pending = repository.find_by_status(OrderStatus::Pending).unwrap();

        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, Some(first));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn find_all_returns_newest_first() {
        let repository = SqliteOrderRepository::in_memory().unwrap();
        let older = repository.create(&mut order("ana@example.com")).unwrap();
        let newer = repository.create(&mut order("ion@example.com")).unwrap();

        let orders = repository.find_all().unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, Some(newer));
        assert_eq!(orders[1].id, Some(older));
    }

    #[test]
    fn unknown_stored_status_is_a_storage_error() {
        let repository = SqliteOrderRepository::in_memory().unwrap();
        let id = repository.create(&mut order("ana@example.com")).unwrap();
        repository
            .connection
            .lock()
            .unwrap()
            .execute("UPDATE orders SET status = 'shipped' WHERE id = ?1", params![id])
            .unwrap();

        assert!(matches!(
            repository.find_by_id(id),
            Err(OrderRepositoryError::Storage { .. })
        ));
    }

    #[test]
    fn delete_removes_order() {
        let repository = SqliteOrderRepository::in_memory().unwrap();
        let id = repository.create(&mut order("ana@example.com")).unwrap();

        repository.delete(id).unwrap();

        assert!(repository.find_all().unwrap().is_empty());
    }
}
