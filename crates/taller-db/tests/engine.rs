use taller_core::{
    Money, NewProduct, NewTransaction, NewTransactionItem, PaymentStatus, StockPolicy,
    TransactionType, ValidationError,
};
use taller_db::{Database, DbConfig, EngineError, TransactionEngine};

async fn engine_with_db(policy: StockPolicy) -> (TransactionEngine, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    (TransactionEngine::new(db.clone(), policy), db)
}

async fn insert_product(db: &Database, name: &str, stock: i64, min_stock: i64, sell: &str) -> i64 {
    db.products()
        .insert(&NewProduct {
            name: name.to_string(),
            category: "Filtros".to_string(),
            description: None,
            sku: None,
            stock,
            min_stock,
            price_buy: Money::parse("1.00").unwrap(),
            price_sell: Money::parse(sell).unwrap(),
        })
        .await
        .unwrap()
        .id
}

async fn stock_of(db: &Database, id: i64) -> i64 {
    db.products().get_by_id(id).await.unwrap().unwrap().stock
}

fn item(product_id: Option<i64>, description: &str, quantity: i64, price: &str) -> NewTransactionItem {
    NewTransactionItem {
        product_id,
        description: description.to_string(),
        quantity,
        unit_price: Money::parse(price).unwrap(),
        is_service: false,
    }
}

fn sale(items: Vec<NewTransactionItem>) -> NewTransaction {
    NewTransaction {
        customer_name: None,
        kind: TransactionType::Sale,
        payment_status: None,
        notes: None,
        items,
    }
}

#[tokio::test]
async fn filter_sale_scenario() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;
    let filtro = insert_product(&db, "Filtro", 3, 10, "8.00").await;

    assert_eq!(db.stats().low_stock_count().await.unwrap(), 1);

    let created = engine
        .create_transaction(&sale(vec![item(Some(filtro), "Filtro", 2, "8.00")]))
        .await
        .unwrap();

    assert_eq!(created.transaction.total_amount.to_string(), "16.00");
    assert_eq!(created.items[0].subtotal.to_string(), "16.00");
    assert_eq!(stock_of(&db, filtro).await, 1);
    assert_eq!(db.stats().low_stock_count().await.unwrap(), 1);
}

#[tokio::test]
async fn total_is_exact_sum_of_lines() {
    let (engine, _db) = engine_with_db(StockPolicy::AllowNegative).await;

    let created = engine
        .create_transaction(&sale(vec![
            item(None, "Tornillos", 7, "0.10"),
            item(None, "Grasa", 3, "0.35"),
            item(None, "Cable", 1, "19.99"),
        ]))
        .await
        .unwrap();

    // 0.70 + 1.05 + 19.99
    assert_eq!(created.transaction.total_amount, Money::from_cents(2174));
    let sum: Money = created.items.iter().map(|i| i.subtotal).sum();
    assert_eq!(sum, created.transaction.total_amount);
    for item in &created.items {
        assert_eq!(item.unit_price.checked_times(item.quantity), Some(item.subtotal));
    }
}

#[tokio::test]
async fn purchase_increases_and_sale_decreases_only_referenced_products() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;
    let aceite = insert_product(&db, "Aceite", 12, 5, "45.00").await;
    let filtro = insert_product(&db, "Filtro", 3, 10, "8.00").await;
    let frenos = insert_product(&db, "Pastillas", 8, 4, "35.00").await;

    let mut purchase = sale(vec![item(Some(filtro), "Filtro", 10, "3.50")]);
    purchase.kind = TransactionType::Purchase;
    engine.create_transaction(&purchase).await.unwrap();

    engine
        .create_transaction(&sale(vec![
            item(Some(aceite), "Aceite", 1, "45.00"),
            item(Some(aceite), "Aceite", 2, "45.00"),
        ]))
        .await
        .unwrap();

    assert_eq!(stock_of(&db, filtro).await, 13);
    assert_eq!(stock_of(&db, aceite).await, 9);
    assert_eq!(stock_of(&db, frenos).await, 8);
}

#[tokio::test]
async fn service_lines_never_move_stock() {
    let (engine, db) = engine_with_db(StockPolicy::RejectNegative).await;
    let filtro = insert_product(&db, "Filtro", 0, 10, "8.00").await;

    let mut labour = item(Some(filtro), "Instalación de filtro", 1, "15.00");
    labour.is_service = true;

    let created = engine.create_transaction(&sale(vec![labour])).await.unwrap();
    assert!(created.items[0].is_service);
    assert_eq!(stock_of(&db, filtro).await, 0);
}

#[tokio::test]
async fn empty_items_persist_nothing() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;

    let err = engine.create_transaction(&sale(vec![])).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(ValidationError::Empty { .. })));
    assert_eq!(db.transactions().count().await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_line_persists_nothing() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;
    let filtro = insert_product(&db, "Filtro", 3, 10, "8.00").await;

    let err = engine
        .create_transaction(&sale(vec![
            item(Some(filtro), "Filtro", 1, "8.00"),
            item(Some(filtro), "Filtro", 0, "8.00"),
        ]))
        .await
        .unwrap_err();

    match err {
        EngineError::Validation(v) => assert_eq!(v.field(), "items[1].quantity"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(db.transactions().count().await.unwrap(), 0);
    assert_eq!(stock_of(&db, filtro).await, 3);
}

#[tokio::test]
async fn unknown_product_still_records_item_and_other_adjustments() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;
    let filtro = insert_product(&db, "Filtro", 3, 10, "8.00").await;
    let deleted = insert_product(&db, "Descontinuado", 5, 1, "2.00").await;
    assert!(db.products().delete(deleted).await.unwrap());

    let created = engine
        .create_transaction(&sale(vec![
            item(Some(deleted), "Descontinuado", 1, "2.00"),
            item(Some(filtro), "Filtro", 1, "8.00"),
        ]))
        .await
        .unwrap();

    let items = db.transactions().items_for(created.transaction.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product_id, Some(deleted));
    assert_eq!(items[0].description, "Descontinuado");
    assert_eq!(stock_of(&db, filtro).await, 2);
}

#[tokio::test]
async fn oversell_allowed_goes_negative() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;
    let filtro = insert_product(&db, "Filtro", 1, 10, "8.00").await;

    engine
        .create_transaction(&sale(vec![item(Some(filtro), "Filtro", 3, "8.00")]))
        .await
        .unwrap();

    assert_eq!(stock_of(&db, filtro).await, -2);
}

#[tokio::test]
async fn oversell_rejected_rolls_back_whole_transaction() {
    let (engine, db) = engine_with_db(StockPolicy::RejectNegative).await;
    let aceite = insert_product(&db, "Aceite", 12, 5, "45.00").await;
    let filtro = insert_product(&db, "Filtro", 1, 10, "8.00").await;

    let err = engine
        .create_transaction(&sale(vec![
            item(Some(aceite), "Aceite", 2, "45.00"),
            item(None, "Mano de Obra", 1, "20.00"),
            item(Some(filtro), "Filtro", 2, "8.00"),
        ]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::InsufficientStock { available: 1, requested: 2, .. }
    ));
    assert_eq!(stock_of(&db, aceite).await, 12);
    assert_eq!(stock_of(&db, filtro).await, 1);
    assert_eq!(db.transactions().count().await.unwrap(), 0);
}

#[tokio::test]
async fn purchase_past_stock_range_is_rejected_without_writes() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;
    let filtro = insert_product(&db, "Filtro", 0, 10, "8.00").await;
    let aceite = insert_product(&db, "Aceite", 12, 5, "45.00").await;

    sqlx::query("UPDATE products SET stock = ?1 WHERE id = ?2")
        .bind(i64::MAX - 1)
        .bind(filtro)
        .execute(db.pool())
        .await
        .unwrap();

    let mut purchase = sale(vec![
        item(Some(aceite), "Aceite", 4, "25.00"),
        item(Some(filtro), "Filtro", 5, "3.50"),
    ]);
    purchase.kind = TransactionType::Purchase;

    let err = engine.create_transaction(&purchase).await.unwrap_err();
    match err {
        EngineError::Validation(v) => assert_eq!(v.field(), "items[1].quantity"),
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(stock_of(&db, filtro).await, i64::MAX - 1);
    assert_eq!(stock_of(&db, aceite).await, 12);
    assert_eq!(db.transactions().count().await.unwrap(), 0);
}

#[tokio::test]
async fn blank_item_description_is_recorded() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;

    let created = engine
        .create_transaction(&sale(vec![item(None, "", 1, "5.00")]))
        .await
        .unwrap();

    let items = db.transactions().items_for(created.transaction.id).await.unwrap();
    assert_eq!(items[0].description, "");
}

#[tokio::test]
async fn defaults_and_explicit_fields_round_trip_through_history() {
    let (engine, db) = engine_with_db(StockPolicy::AllowNegative).await;

    let mut pending = sale(vec![item(None, "Diagnóstico", 1, "10")]);
    pending.customer_name = Some("Taller Ruiz".to_string());
    pending.payment_status = Some(PaymentStatus::Pending);
    pending.notes = Some("Pagará el viernes".to_string());

    engine
        .create_transaction(&sale(vec![item(None, "Lavado", 1, "5")]))
        .await
        .unwrap();
    engine.create_transaction(&pending).await.unwrap();

    let history = db.transactions().list_with_items().await.unwrap();
    assert_eq!(history.len(), 2);

    let newest = &history[0].transaction;
    assert_eq!(newest.customer_name, "Taller Ruiz");
    assert_eq!(newest.payment_status, PaymentStatus::Pending);
    assert_eq!(newest.notes.as_deref(), Some("Pagará el viernes"));

    let oldest = &history[1].transaction;
    assert_eq!(oldest.customer_name, "Cliente General");
    assert_eq!(oldest.payment_status, PaymentStatus::Paid);
    assert!(newest.date >= oldest.date);
}
