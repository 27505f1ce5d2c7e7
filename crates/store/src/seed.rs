use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use shelf_core::domain::product::{Product, ProductId};

/// The fixed demo dataset the catalog starts with. Creation timestamps are
/// relative to `now` so the listing always shows a plausible recent history.
pub fn demo_products(now: DateTime<Utc>) -> Vec<Product> {
    vec![
        Product {
            id: ProductId(1),
            name: "Laptop".to_string(),
            description: "High-performance laptop".to_string(),
            price: Decimal::new(129_999, 2),
            created_at: now - Duration::days(10),
        },
        Product {
            id: ProductId(2),
            name: "Mouse".to_string(),
            description: "Wireless mouse".to_string(),
            price: Decimal::new(2999, 2),
            created_at: now - Duration::days(5),
        },
        Product {
            id: ProductId(3),
            name: "Keyboard".to_string(),
            description: "Mechanical keyboard".to_string(),
            price: Decimal::new(8999, 2),
            created_at: now - Duration::days(3),
        },
        Product {
            id: ProductId(4),
            name: "Monitor".to_string(),
            description: "4K Monitor 27 inch".to_string(),
            price: Decimal::new(39_999, 2),
            created_at: now - Duration::days(1),
        },
    ]
}
