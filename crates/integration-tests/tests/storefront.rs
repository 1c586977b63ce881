//! Integration tests for the public storefront.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`saree-cli migrate`)
//! - The storefront server running (cargo run -p silk-saree-storefront)
//! - For the signed payment tests, `RAZORPAY_KEY_SECRET` set to the
//!   storefront's key secret
//!
//! Run with: cargo test -p silk-saree-integration-tests -- --ignored

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use sqlx::PgPool;

use silk_saree_admin::db::{SareeInput, SareeRepository};
use silk_saree_core::{Saree, SareeId};
use silk_saree_integration_tests::{
    assert_redirect, client, get_text, pool, razorpay_key_secret, storefront_base_url,
    unique_name,
};
use silk_saree_storefront::db::{CheckoutRepository, NewCheckout};
use silk_saree_storefront::services::razorpay::payment_signature;

async fn create_saree(pool: &PgPool) -> Saree {
    SareeRepository::new(pool)
        .create(&SareeInput {
            category_id: None,
            name: unique_name("Test Saree"),
            price: Decimal::new(499_900, 2),
            description: "Integration test saree".to_owned(),
            image_filename: "it_placeholder.svg".to_owned(),
        })
        .await
        .expect("Failed to create saree")
}

async fn delete_saree(pool: &PgPool, id: SareeId) {
    SareeRepository::new(pool)
        .delete(id)
        .await
        .expect("Failed to delete saree");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to get health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to get readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_new_saree_appears_on_home_and_details() {
    let pool = pool().await;
    let saree = create_saree(&pool).await;
    let client = client();
    let base_url = storefront_base_url();

    let home = get_text(&client, &format!("{base_url}/")).await;
    assert!(home.contains(&saree.name));

    let details = get_text(&client, &format!("{base_url}/saree/{}", saree.id)).await;
    assert!(details.contains(&saree.name));
    assert!(details.contains("₹4,999.00"));

    delete_saree(&pool, saree.id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_missing_saree_is_404() {
    let resp = client()
        .get(format!("{}/saree/2147483647", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get saree");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_enquiry_is_stored() {
    let pool = pool().await;
    let saree = create_saree(&pool).await;
    let client = client();
    let base_url = storefront_base_url();
    let message = unique_name("Is this available in blue");

    let resp = client
        .post(format!("{base_url}/saree/{}/enquiry", saree.id))
        .form(&[
            ("name", "Meera"),
            ("email", "meera@example.in"),
            ("phone", ""),
            ("message", message.as_str()),
        ])
        .send()
        .await
        .expect("Failed to post enquiry");
    assert_redirect(&resp, &format!("/saree/{}#enquiry", saree.id));

    let page = get_text(&client, &format!("{base_url}/saree/{}", saree.id)).await;
    assert!(page.contains("Thank you! We will get back to you soon."));

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shop.enquiry WHERE message = $1")
        .bind(&message)
        .fetch_one(&pool)
        .await
        .expect("Failed to count enquiries");
    assert_eq!(stored, 1);

    sqlx::query("DELETE FROM shop.enquiry WHERE message = $1")
        .bind(&message)
        .execute(&pool)
        .await
        .expect("Failed to delete enquiry");
    delete_saree(&pool, saree.id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_enquiry_without_contact_is_rejected() {
    let pool = pool().await;
    let saree = create_saree(&pool).await;
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/saree/{}/enquiry", saree.id))
        .form(&[("name", "Meera"), ("message", "Hello")])
        .send()
        .await
        .expect("Failed to post enquiry");
    assert_redirect(&resp, &format!("/saree/{}#enquiry", saree.id));

    let page = get_text(&client, &format!("{base_url}/saree/{}", saree.id)).await;
    assert!(page.contains("Please give an email address or phone number"));

    delete_saree(&pool, saree.id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_forged_payment_is_rejected() {
    let resp = client()
        .post(format!("{}/payment/success", storefront_base_url()))
        .json(&json!({
            "razorpay_order_id": "order_forged",
            "razorpay_payment_id": "pay_forged",
            "razorpay_signature": "00",
            "saree_name": "Anything",
            "price": "1.00",
        }))
        .send()
        .await
        .expect("Failed to post payment");

    // 400 when Razorpay is configured, 500 when it is not; never recorded.
    assert!(!resp.status().is_success());
    let body: Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "error");
}

/// Store the checkout row the storefront writes when it creates a gateway order.
async fn create_checkout(pool: &PgPool, saree: &Saree) -> String {
    let order_id = unique_name("order_it");
    CheckoutRepository::new(pool)
        .create(&NewCheckout {
            razorpay_order_id: &order_id,
            saree_id: saree.id,
            saree_name: &saree.name,
            price: saree.price,
            amount_minor: 499_900,
            currency: "INR",
        })
        .await
        .expect("Failed to create checkout");
    order_id
}

async fn post_payment(body: &Value) -> (StatusCode, Value) {
    let resp = client()
        .post(format!("{}/payment/success", storefront_base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to post payment");
    let status = resp.status();
    (status, resp.json().await.expect("Failed to parse JSON"))
}

#[tokio::test]
#[ignore = "Requires running storefront server with Razorpay keys and database"]
async fn test_signed_payment_is_recorded_once_at_stored_price() {
    let secret = razorpay_key_secret().expect("RAZORPAY_KEY_SECRET must be set");
    let pool = pool().await;
    let saree = create_saree(&pool).await;
    let order_id = create_checkout(&pool, &saree).await;
    let payment_id = unique_name("pay_it");
    let signature = payment_signature(&secret, &order_id, &payment_id).expect("valid key");

    // Client-sent name and price differ from the checkout and are ignored.
    let body = json!({
        "razorpay_order_id": order_id,
        "razorpay_payment_id": payment_id,
        "razorpay_signature": signature,
        "saree_name": "Tampered Saree",
        "price": "1.00",
    });

    let (status, reply) = post_payment(&body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["status"], "ok");
    assert_eq!(reply["message"], "Payment verified and order placed.");

    let (status, reply) = post_payment(&body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["status"], "ok");
    assert_eq!(reply["message"], "Payment already recorded.");

    let orders: Vec<(String, Decimal)> = sqlx::query_as(
        r#"SELECT saree_name, price FROM shop."order" WHERE razorpay_payment_id = $1"#,
    )
    .bind(&payment_id)
    .fetch_all(&pool)
    .await
    .expect("Failed to load orders");
    assert_eq!(orders, vec![(saree.name.clone(), Decimal::new(499_900, 2))]);

    sqlx::query(r#"DELETE FROM shop."order" WHERE razorpay_payment_id = $1"#)
        .bind(&payment_id)
        .execute(&pool)
        .await
        .expect("Failed to delete order");
    sqlx::query("DELETE FROM shop.checkout WHERE razorpay_order_id = $1")
        .bind(&order_id)
        .execute(&pool)
        .await
        .expect("Failed to delete checkout");
    delete_saree(&pool, saree.id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server with Razorpay keys"]
async fn test_signed_payment_for_unknown_order_is_rejected() {
    let secret = razorpay_key_secret().expect("RAZORPAY_KEY_SECRET must be set");
    let order_id = unique_name("order_missing");
    let payment_id = unique_name("pay_missing");
    let signature = payment_signature(&secret, &order_id, &payment_id).expect("valid key");

    let (status, reply) = post_payment(&json!({
        "razorpay_order_id": order_id,
        "razorpay_payment_id": payment_id,
        "razorpay_signature": signature,
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["status"], "error");
    assert_eq!(reply["message"], "Unknown order.");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_create_order_for_saree() {
    let pool = pool().await;
    let saree = create_saree(&pool).await;

    let resp = client()
        .post(format!(
            "{}/create-razorpay-order/{}",
            storefront_base_url(),
            saree.id
        ))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to post order");
    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to parse JSON");

    if razorpay_key_secret().is_some() {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"], 499_900);
        assert_eq!(body["currency"], "INR");
        assert_eq!(body["name"], saree.name.as_str());

        let order_id = body["order_id"].as_str().expect("order id");
        let amount: i64 = sqlx::query_scalar(
            "SELECT amount_minor FROM shop.checkout WHERE razorpay_order_id = $1",
        )
        .bind(order_id)
        .fetch_one(&pool)
        .await
        .expect("Checkout row should be stored");
        assert_eq!(amount, 499_900);

        sqlx::query("DELETE FROM shop.checkout WHERE razorpay_order_id = $1")
            .bind(order_id)
            .execute(&pool)
            .await
            .expect("Failed to delete checkout");
    } else {
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Razorpay keys are not configured on server.");
    }

    delete_saree(&pool, saree.id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_create_order_for_missing_saree_is_json_404() {
    let resp = client()
        .post(format!(
            "{}/create-razorpay-order/2147483647",
            storefront_base_url()
        ))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to post order");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
}
