// Sale checkout against a real MySQL database
//
// Run with: TEST_DATABASE_URL=mysql://... cargo test --test sale_flow_test -- --ignored

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use vitrine::modules::{
    self,
    backlog::{BacklogService, BacklogStatus},
    catalog::CatalogService,
    clients::{models::CreateClientRequest, ClientService},
    receivables::{models::ReceivableFilter, ReceivableService, ReceivableStatus},
    sales::{
        models::{CreateSaleRequest, ItemFulfillmentStatus, PaymentIntentRequest, SaleItemRequest},
        SaleFulfillmentStatus, SaleService,
    },
};

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_credit_sale_creates_receivables() {
    let pool = helpers::create_test_pool().await;
    let catalog = CatalogService::new(pool.clone());
    let clients = ClientService::new(pool.clone());
    let sales = SaleService::new(pool.clone());
    let receivables = ReceivableService::new(pool.clone());

    let variant = helpers::stocked_variant(&catalog, dec!(300.00), 5).await;
    let client = clients
        .create_client(CreateClientRequest {
            name: "Marina Costa".to_string(),
            phone_number: helpers::unique_phone(),
            address: None,
        })
        .await
        .unwrap();

    let sale = sales
        .create_sale(CreateSaleRequest {
            items: vec![SaleItemRequest {
                variant_id: variant.id.clone(),
                quantity: 1,
            }],
            payments: vec![PaymentIntentRequest {
                method: "credit".to_string(),
                amount: None,
                installments: Some(3),
            }],
            customer_id: Some(client.id.clone()),
            discount_percentage: None,
            due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(sale.fulfillment_status, SaleFulfillmentStatus::ReadyToShip);
    assert!(sale.interest_amount > Decimal::ZERO);
    assert!(sale.due_date.is_some());

    let rows = receivables
        .list(ReceivableFilter {
            sale_id: Some(sale.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.status == ReceivableStatus::Pending));
    assert!(rows.iter().all(|r| r.customer_id == client.id));
    let total: Decimal = rows.iter().map(|r| r.amount).sum();
    assert_eq!(total, sale.total_amount);

    let mut due_dates: Vec<_> = rows.iter().map(|r| r.due_date).collect();
    due_dates.dedup();
    assert_eq!(due_dates.len(), 3, "each installment falls due in its own month");

    let variant = catalog.get_variant(&variant.id).await.unwrap();
    assert_eq!(variant.quantity, 4);
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_backorder_goes_to_purchase_backlog() {
    let pool = helpers::create_test_pool().await;
    let catalog = CatalogService::new(pool.clone());
    let sales = SaleService::new(pool.clone());
    let backlog = BacklogService::new(pool.clone());

    let in_stock = helpers::stocked_variant(&catalog, dec!(89.90), 10).await;
    let short = helpers::stocked_variant(&catalog, dec!(179.90), 1).await;

    let sale = sales
        .create_sale(CreateSaleRequest {
            items: vec![
                SaleItemRequest {
                    variant_id: in_stock.id.clone(),
                    quantity: 2,
                },
                SaleItemRequest {
                    variant_id: short.id.clone(),
                    quantity: 3,
                },
            ],
            payments: vec![PaymentIntentRequest {
                method: "pix".to_string(),
                amount: None,
                installments: None,
            }],
            customer_id: None,
            discount_percentage: Some(dec!(10)),
            due_date: None,
        })
        .await
        .unwrap();

    assert_eq!(sale.fulfillment_status, SaleFulfillmentStatus::AwaitingStock);
    assert_eq!(sale.subtotal_amount, dec!(719.50));
    assert_eq!(sale.discount_amount, dec!(71.95));
    assert_eq!(sale.total_amount, dec!(647.55));
    assert_eq!(sale.interest_amount, Decimal::ZERO);

    let pending: Vec<_> = sale
        .items
        .iter()
        .filter(|i| i.fulfillment_status == ItemFulfillmentStatus::PendingStock)
        .collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].variant_id, short.id);

    let items = backlog.list_for_sale(&sale.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].variant_id, short.id);
    assert_eq!(items[0].quantity_needed, 2);
    assert_eq!(items[0].status, BacklogStatus::AwaitingPurchase);

    assert_eq!(catalog.get_variant(&in_stock.id).await.unwrap().quantity, 8);
    assert_eq!(catalog.get_variant(&short.id).await.unwrap().quantity, -2);
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_sale_over_http_and_unknown_variant() {
    let pool = helpers::create_test_pool().await;
    let catalog = CatalogService::new(pool.clone());
    let variant = helpers::stocked_variant(&catalog, dec!(59.90), 3).await;

    let app =
        test::init_service(App::new().configure(|cfg| modules::configure(cfg, &pool))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/sales")
        .set_json(helpers::pix_sale_payload(&variant.id, 1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["fulfillment_status"], "ready_to_ship");
    assert_eq!(created["payment_status"], "paid");
    let sale_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/sales/{}", sale_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/sales")
        .set_json(json!({
            "items": [{ "variant_id": "missing-variant", "quantity": 1 }],
            "payments": [{ "method": "cash" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["rule"], "unknown_variant");
}
