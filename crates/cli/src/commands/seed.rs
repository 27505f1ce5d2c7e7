use chrono::Utc;

use crate::commands::CommandResult;
use shelf_store::demo_products;

pub fn run() -> CommandResult {
    let products = demo_products(Utc::now());

    let product_lines: Vec<String> = products
        .iter()
        .map(|product| {
            format!("  - {}: {} / {} (${})", product.id, product.name, product.description, product.price)
        })
        .collect();

    let message = format!(
        "demo seed dataset ({} products):\n{}",
        products.len(),
        product_lines.join("\n")
    );

    CommandResult::success("seed", message)
}
