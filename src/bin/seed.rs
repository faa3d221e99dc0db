use axum_storefront_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let seeded = seed_products(&pool).await?;

    println!("Seed completed. {seeded} new products");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    // (name, description, sku, price in cents, stock, active)
    let products = [
        ("Ferris Mug", "Coffee tastes better with Ferris", "MUG-001", 1250, 100, true),
        ("Axum Hoodie", "Warm hoodie for Rustaceans", "HOOD-001", 5500, 20, true),
        ("Sticker Pack", "Decorate your laptop", "STK-010", 499, 200, true),
        ("Gift Card", "Redeemable at the counter", "GIFT-25", 2550, 5, true),
        ("Tasting Menu Voucher", "Retired seasonal voucher", "VCH-OLD", 8900, 0, false),
    ];

    let mut inserted = 0;
    for (name, desc, sku, cents, stock, active) in products {
        let result = sqlx::query(
            r#"
            INSERT INTO products (id, name, description, sku, price, stock, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(sku)
        .bind(Decimal::new(cents, 2))
        .bind(stock)
        .bind(active)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    println!("Seeded products");
    Ok(inserted)
}
