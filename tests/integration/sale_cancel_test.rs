// Sale cancellation against a real MySQL database
//
// Run with: TEST_DATABASE_URL=mysql://... cargo test --test sale_cancel_test -- --ignored

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, App};
use rust_decimal_macros::dec;
use serde_json::Value;
use vitrine::modules::{
    self,
    backlog::BacklogService,
    catalog::CatalogService,
    clients::{models::CreateClientRequest, ClientService},
    receivables::{models::ReceivableFilter, ReceivableService},
    sales::{
        models::{CreateSaleRequest, PaymentIntentRequest, PaymentStatus, SaleItemRequest},
        SaleFulfillmentStatus, SaleService,
    },
};

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_cancel_restores_stock_and_clears_followups() {
    let pool = helpers::create_test_pool().await;
    let catalog = CatalogService::new(pool.clone());
    let clients = ClientService::new(pool.clone());
    let sales = SaleService::new(pool.clone());
    let receivables = ReceivableService::new(pool.clone());
    let backlog = BacklogService::new(pool.clone());

    let in_stock = helpers::stocked_variant(&catalog, dec!(120.00), 4).await;
    let short = helpers::stocked_variant(&catalog, dec!(80.00), 0).await;
    let client = clients
        .create_client(CreateClientRequest {
            name: "Helena Prado".to_string(),
            phone_number: helpers::unique_phone(),
            address: Some("Rua das Flores, 12".to_string()),
        })
        .await
        .unwrap();

    let sale = sales
        .create_sale(CreateSaleRequest {
            items: vec![
                SaleItemRequest {
                    variant_id: in_stock.id.clone(),
                    quantity: 2,
                },
                SaleItemRequest {
                    variant_id: short.id.clone(),
                    quantity: 1,
                },
            ],
            payments: vec![PaymentIntentRequest {
                method: "credit".to_string(),
                amount: None,
                installments: Some(2),
            }],
            customer_id: Some(client.id.clone()),
            discount_percentage: None,
            due_date: None,
        })
        .await
        .unwrap();

    let filter = ReceivableFilter {
        sale_id: Some(sale.id.clone()),
        ..Default::default()
    };
    assert_eq!(receivables.list(filter.clone()).await.unwrap().len(), 2);
    assert_eq!(backlog.list_for_sale(&sale.id).await.unwrap().len(), 1);
    assert_eq!(catalog.get_variant(&in_stock.id).await.unwrap().quantity, 2);
    assert_eq!(catalog.get_variant(&short.id).await.unwrap().quantity, -1);

    let canceled = sales.cancel_sale(&sale.id).await.unwrap();
    assert_eq!(canceled.fulfillment_status, SaleFulfillmentStatus::Canceled);
    assert_eq!(canceled.payment_status, PaymentStatus::Refunded);
    assert!(canceled.canceled_at.is_some());

    assert!(receivables.list(filter).await.unwrap().is_empty());
    assert!(backlog.list_for_sale(&sale.id).await.unwrap().is_empty());

    // Only fulfilled lines go back on the shelf
    assert_eq!(catalog.get_variant(&in_stock.id).await.unwrap().quantity, 4);
    assert_eq!(catalog.get_variant(&short.id).await.unwrap().quantity, -1);

    let stored = sales.get_sale(&sale.id).await.unwrap();
    assert_eq!(stored.fulfillment_status, SaleFulfillmentStatus::Canceled);
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_cancel_is_idempotent() {
    let pool = helpers::create_test_pool().await;
    let catalog = CatalogService::new(pool.clone());
    let variant = helpers::stocked_variant(&catalog, dec!(45.00), 5).await;

    let app =
        test::init_service(App::new().configure(|cfg| modules::configure(cfg, &pool))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/sales")
        .set_json(helpers::pix_sale_payload(&variant.id, 2))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let sale_id = created["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/sales/{}/cancel", sale_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["fulfillment_status"], "canceled");
    }

    // Restocked once, not twice
    assert_eq!(catalog.get_variant(&variant.id).await.unwrap().quantity, 5);
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_cancel_unknown_sale_is_not_found() {
    let pool = helpers::create_test_pool().await;
    let app =
        test::init_service(App::new().configure(|cfg| modules::configure(cfg, &pool))).await;

    let req = test::TestRequest::patch()
        .uri("/api/v1/sales/00000000-0000-4000-8000-00000000dead/cancel")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[ignore = "Requires test database configuration"]
async fn test_shipped_sale_cannot_be_canceled() {
    let pool = helpers::create_test_pool().await;
    let catalog = CatalogService::new(pool.clone());
    let clients = ClientService::new(pool.clone());
    let sales = SaleService::new(pool.clone());
    let receivables = ReceivableService::new(pool.clone());
    let backlog = BacklogService::new(pool.clone());

    let in_stock = helpers::stocked_variant(&catalog, dec!(150.00), 3).await;
    let short = helpers::stocked_variant(&catalog, dec!(60.00), 0).await;
    let client = clients
        .create_client(CreateClientRequest {
            name: "Marina Lopes".to_string(),
            phone_number: helpers::unique_phone(),
            address: None,
        })
        .await
        .unwrap();

    let sale = sales
        .create_sale(CreateSaleRequest {
            items: vec![
                SaleItemRequest {
                    variant_id: in_stock.id.clone(),
                    quantity: 1,
                },
                SaleItemRequest {
                    variant_id: short.id.clone(),
                    quantity: 2,
                },
            ],
            payments: vec![PaymentIntentRequest {
                method: "credit".to_string(),
                amount: None,
                installments: Some(2),
            }],
            customer_id: Some(client.id.clone()),
            discount_percentage: None,
            due_date: None,
        })
        .await
        .unwrap();

    let app =
        test::init_service(App::new().configure(|cfg| modules::configure(cfg, &pool))).await;
    let filter = ReceivableFilter {
        sale_id: Some(sale.id.clone()),
        ..Default::default()
    };

    for shipped in ["fulfilled", "partial"] {
        sqlx::query("UPDATE sales SET fulfillment_status = ? WHERE id = ?")
            .bind(shipped)
            .bind(&sale.id)
            .execute(&pool)
            .await
            .unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/sales/{}/cancel", sale.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "status {}", shipped);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["kind"], "business_rule");
        assert_eq!(body["error"]["rule"], "sale_not_cancelable");

        let stored = sales.get_sale(&sale.id).await.unwrap();
        assert_eq!(stored.fulfillment_status.as_str(), shipped);
        assert!(stored.canceled_at.is_none());

        assert_eq!(receivables.list(filter.clone()).await.unwrap().len(), 2);
        assert_eq!(backlog.list_for_sale(&sale.id).await.unwrap().len(), 1);
        assert_eq!(catalog.get_variant(&in_stock.id).await.unwrap().quantity, 2);
        assert_eq!(catalog.get_variant(&short.id).await.unwrap().quantity, -2);
    }
}
