use chrono::{Duration, Local};
use taller_core::{
    Money, NewProduct, NewTransaction, NewTransactionItem, PaymentStatus, ProductUpdate,
    StockPolicy, TransactionType,
};
use taller_db::repository::stats::day_bounds;
use taller_db::repository::to_db_timestamp;
use taller_db::{Database, DbConfig, TransactionEngine};

async fn setup() -> (TransactionEngine, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    (TransactionEngine::new(db.clone(), StockPolicy::AllowNegative), db)
}

fn request(kind: TransactionType, total: &str, status: PaymentStatus) -> NewTransaction {
    NewTransaction {
        customer_name: None,
        kind,
        payment_status: Some(status),
        notes: None,
        items: vec![NewTransactionItem {
            product_id: None,
            description: "Servicio".to_string(),
            quantity: 1,
            unit_price: Money::parse(total).unwrap(),
            is_service: true,
        }],
    }
}

#[tokio::test]
async fn empty_store_reports_zeroes() {
    let (_engine, db) = setup().await;

    let stats = db.stats().get_stats(&Local::now()).await.unwrap();
    assert_eq!(stats.daily_sales, Money::zero());
    assert_eq!(stats.low_stock_count, 0);
    assert_eq!(stats.pending_services, 0);
}

#[tokio::test]
async fn daily_sales_excludes_purchases_and_prior_days() {
    let (engine, db) = setup().await;

    engine
        .create_transaction(&request(TransactionType::Sale, "45.00", PaymentStatus::Paid))
        .await
        .unwrap();
    engine
        .create_transaction(&request(TransactionType::Purchase, "100.00", PaymentStatus::Paid))
        .await
        .unwrap();
    let yesterday = engine
        .create_transaction(&request(TransactionType::Sale, "20.00", PaymentStatus::Pending))
        .await
        .unwrap();

    // Move the last sale to just before today's local midnight
    let (today_start, _) = day_bounds(&Local::now());
    sqlx::query("UPDATE transactions SET date = ?1 WHERE id = ?2")
        .bind(to_db_timestamp(today_start - Duration::hours(1)))
        .bind(yesterday.transaction.id)
        .execute(db.pool())
        .await
        .unwrap();

    let stats = db.stats().get_stats(&Local::now()).await.unwrap();
    assert_eq!(stats.daily_sales, Money::parse("45.00").unwrap());

    // Pending is counted regardless of day
    assert_eq!(stats.pending_services, 1);
}

#[tokio::test]
async fn low_stock_count_tracks_updates_immediately() {
    let (_engine, db) = setup().await;

    let product = db
        .products()
        .insert(&NewProduct {
            name: "Filtro".to_string(),
            category: "Filtros".to_string(),
            description: None,
            sku: None,
            stock: 11,
            min_stock: 10,
            price_buy: Money::from_cents(350),
            price_sell: Money::from_cents(800),
        })
        .await
        .unwrap();

    assert_eq!(db.stats().low_stock_count().await.unwrap(), 0);

    let at_threshold = ProductUpdate {
        stock: Some(10),
        ..Default::default()
    };
    db.products().update(product.id, &at_threshold).await.unwrap();
    assert_eq!(db.stats().low_stock_count().await.unwrap(), 1);

    let raised = ProductUpdate {
        min_stock: Some(2),
        ..Default::default()
    };
    db.products().update(product.id, &raised).await.unwrap();
    assert_eq!(db.stats().low_stock_count().await.unwrap(), 0);
}
