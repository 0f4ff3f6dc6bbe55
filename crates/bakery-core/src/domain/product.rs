use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Money;

pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub price: Money,
    pub in_stock: bool,
    pub stock: u32,
    pub is_popular: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: &str, category: &str, price: Money) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.to_string(),
            description: String::new(),
            image: String::new(),
            category: category.to_lowercase(),
            price,
            in_stock: false,
            stock: 0,
            is_popular: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = image.to_string();
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.set_stock(stock);
        self
    }

    pub fn popular(mut self) -> Self {
        self.is_popular = true;
        self
    }

    pub fn set_stock(&mut self, stock: u32) {
        self.stock = stock;
        self.in_stock = stock > 0;
        self.updated_at = Utc::now();
    }

    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}
