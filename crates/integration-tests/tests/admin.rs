//! Integration tests for the admin panel.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`saree-cli migrate`)
//! - The admin server running (cargo run -p silk-saree-admin)
//! - The storefront server running, for the enquiry round trip
//!
//! Run with: cargo test -p silk-saree-integration-tests -- --ignored --test-threads=1

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use rust_decimal::Decimal;
use sqlx::PgPool;

use silk_saree_admin::db::{
    CategoryInput, CategoryRepository, SareeInput, SareeRepository, SettingsRepository,
};
use silk_saree_core::Slug;
use silk_saree_integration_tests::{
    TestAdmin, admin_base_url, assert_redirect, client, get_text, pool, storefront_base_url,
    unique_name,
};

/// A 1x1 transparent PNG.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

async fn saree_id_by_name(pool: &PgPool, name: &str) -> Option<i32> {
    sqlx::query_scalar("SELECT id FROM shop.saree WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .expect("Failed to look up saree")
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_pages_require_login() {
    let client = client();
    let base_url = admin_base_url();

    for path in ["/", "/sarees", "/categories", "/orders", "/enquiries", "/settings"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("request failed");
        assert_redirect(&resp, "/auth/login?notice=login_required");
    }

    let page = get_text(&client, &format!("{base_url}/auth/login?notice=login_required")).await;
    assert!(page.contains("Please login to continue."));
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_login_and_logout() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("username", admin.username.as_str()), ("password", "wrong password")])
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Invalid username or password."));

    admin.login(&client).await;
    let dashboard = get_text(&client, &format!("{base_url}/")).await;
    assert!(dashboard.contains("Welcome back!"));
    assert!(dashboard.contains(&admin.username));

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to post logout");
    assert_redirect(&resp, "/auth/login");

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("request failed");
    assert_redirect(&resp, "/auth/login?notice=login_required");

    admin.cleanup(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_category_crud() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    admin.login(&client).await;
    let base_url = admin_base_url();
    let name = unique_name("Paithani");

    let resp = client
        .post(format!("{base_url}/categories/new"))
        .form(&[("name", name.as_str()), ("description", "Maharashtrian silk")])
        .send()
        .await
        .expect("Failed to create category");
    assert_redirect(&resp, "/categories");
    let list = get_text(&client, &format!("{base_url}/categories")).await;
    assert!(list.contains(&name));
    assert!(list.contains("Category added."));

    // Same name again
    let resp = client
        .post(format!("{base_url}/categories/new"))
        .form(&[("name", name.as_str()), ("description", "")])
        .send()
        .await
        .expect("Failed to post duplicate category");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let form = get_text(&client, &format!("{base_url}/categories/new")).await;
    assert!(form.contains("A category with that name already exists."));

    let id: i32 = sqlx::query_scalar("SELECT id FROM shop.category WHERE name = $1")
        .bind(&name)
        .fetch_one(&pool)
        .await
        .expect("Failed to look up category");
    let resp = client
        .post(format!("{base_url}/categories/{id}/delete"))
        .send()
        .await
        .expect("Failed to delete category");
    assert_redirect(&resp, "/categories");
    let list = get_text(&client, &format!("{base_url}/categories")).await;
    assert!(!list.contains(&name));

    admin.cleanup(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_category_with_sarees_is_not_deleted() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    admin.login(&client).await;
    let base_url = admin_base_url();

    let name = unique_name("Chanderi");
    let category = CategoryRepository::new(&pool)
        .create(&CategoryInput {
            slug: Slug::from_name(&name).expect("valid slug"),
            name,
            description: String::new(),
        })
        .await
        .expect("Failed to create category");
    let saree = SareeRepository::new(&pool)
        .create(&SareeInput {
            category_id: Some(category.id),
            name: unique_name("Chanderi Saree"),
            price: Decimal::new(3_200, 0),
            description: "Still listed in its category".to_owned(),
            image_filename: "it_placeholder.svg".to_owned(),
        })
        .await
        .expect("Failed to create saree");

    let resp = client
        .post(format!("{base_url}/categories/{}/delete", category.id))
        .send()
        .await
        .expect("Failed to post delete");
    assert_redirect(&resp, "/categories");
    let list = get_text(&client, &format!("{base_url}/categories")).await;
    assert!(list.contains("Category still has sarees. Move or delete them first."));
    assert!(list.contains(&category.name));

    SareeRepository::new(&pool)
        .delete(saree.id)
        .await
        .expect("Failed to delete saree");
    CategoryRepository::new(&pool)
        .delete(category.id)
        .await
        .expect("Category should delete once empty");
    admin.cleanup(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_add_saree_requires_every_field() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    admin.login(&client).await;
    let base_url = admin_base_url();

    let form = Form::new()
        .text("name", "No Image Saree")
        .text("price", "1000")
        .text("description", "Missing its image");
    let resp = client
        .post(format!("{base_url}/sarees/new"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to post saree");
    assert_redirect(&resp, "/sarees/new");

    let page = get_text(&client, &format!("{base_url}/sarees/new")).await;
    assert!(page.contains("Please fill all fields and upload an image."));

    admin.cleanup(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin server and database"]
async fn test_saree_upload_edit_delete() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    admin.login(&client).await;
    let base_url = admin_base_url();
    let name = unique_name("Mysore Crepe");

    let image = Part::bytes(PIXEL_PNG.to_vec())
        .file_name("my photo.png")
        .mime_str("image/png")
        .expect("valid mime");
    let form = Form::new()
        .text("name", name.clone())
        .text("price", "5,250.50")
        .text("description", "Soft crepe silk")
        .text("category_id", "")
        .part("image", image);
    let resp = client
        .post(format!("{base_url}/sarees/new"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to post saree");
    assert_redirect(&resp, "/sarees");

    let list = get_text(&client, &format!("{base_url}/sarees")).await;
    assert!(list.contains(&name));
    assert!(list.contains("₹5,250.50"));

    let id = saree_id_by_name(&pool, &name).await.expect("saree stored");
    let image_filename: String =
        sqlx::query_scalar("SELECT image_filename FROM shop.saree WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .expect("Failed to read image name");
    assert!(image_filename.ends_with("_my_photo.png"));

    let resp = client
        .get(format!("{base_url}/uploads/{image_filename}"))
        .send()
        .await
        .expect("Failed to fetch upload");
    assert_eq!(resp.status(), StatusCode::OK);

    // Blank fields keep their current values
    let renamed = format!("{name} Deluxe");
    let form = Form::new()
        .text("name", renamed.clone())
        .text("price", "")
        .text("description", "");
    let resp = client
        .post(format!("{base_url}/sarees/{id}/edit"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to update saree");
    assert_redirect(&resp, "/sarees");
    let list = get_text(&client, &format!("{base_url}/sarees")).await;
    assert!(list.contains(&renamed));
    assert!(list.contains("₹5,250.50"));

    let resp = client
        .post(format!("{base_url}/sarees/{id}/delete"))
        .send()
        .await
        .expect("Failed to delete saree");
    assert_redirect(&resp, "/sarees");
    assert!(saree_id_by_name(&pool, &renamed).await.is_none());

    let resp = client
        .get(format!("{base_url}/uploads/{image_filename}"))
        .send()
        .await
        .expect("Failed to fetch upload");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    admin.cleanup(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin and storefront servers and database"]
async fn test_enquiry_status_round_trip() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    admin.login(&client).await;
    let base_url = admin_base_url();
    let message = unique_name("Do you ship to Pune");

    let saree_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO shop.saree (name, price, description, image_filename)
        VALUES ($1, 2500, 'Enquiry fixture', 'it_placeholder.svg')
        RETURNING id
        ",
    )
    .bind(unique_name("Enquiry Saree"))
    .fetch_one(&pool)
    .await
    .expect("Failed to create saree");

    let resp = silk_saree_integration_tests::client()
        .post(format!("{}/saree/{saree_id}/enquiry", storefront_base_url()))
        .form(&[
            ("name", "Anjali"),
            ("phone", "+91 98765 43210"),
            ("message", message.as_str()),
        ])
        .send()
        .await
        .expect("Failed to post enquiry");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let page = get_text(&client, &format!("{base_url}/enquiries")).await;
    assert!(page.contains(&message));

    let enquiry_id: i32 = sqlx::query_scalar("SELECT id FROM shop.enquiry WHERE message = $1")
        .bind(&message)
        .fetch_one(&pool)
        .await
        .expect("Failed to look up enquiry");

    let resp = client
        .post(format!("{base_url}/enquiries/{enquiry_id}/status"))
        .form(&[("status", "contacted")])
        .send()
        .await
        .expect("Failed to update status");
    assert_redirect(&resp, "/enquiries");
    let page = get_text(&client, &format!("{base_url}/enquiries")).await;
    assert!(page.contains("Enquiry marked as Contacted."));

    let resp = client
        .post(format!("{base_url}/enquiries/{enquiry_id}/delete"))
        .send()
        .await
        .expect("Failed to delete enquiry");
    assert_redirect(&resp, "/enquiries");

    sqlx::query("DELETE FROM shop.saree WHERE id = $1")
        .bind(saree_id)
        .execute(&pool)
        .await
        .expect("Failed to delete saree");
    admin.cleanup(&pool).await;
}

#[tokio::test]
#[ignore = "Requires running admin and storefront servers and database"]
async fn test_settings_show_on_storefront() {
    let pool = pool().await;
    let admin = TestAdmin::create(&pool).await;
    let client = client();
    admin.login(&client).await;
    let base_url = admin_base_url();

    let settings_repo = SettingsRepository::new(&pool);
    let original = settings_repo.get().await.expect("Failed to read settings");
    let tagline = unique_name("Woven with care");

    let resp = client
        .post(format!("{base_url}/settings"))
        .form(&[
            ("store_name", original.store_name.as_str()),
            ("tagline", tagline.as_str()),
            ("contact_email", "hello@silksarees.in"),
            ("contact_phone", ""),
            ("whatsapp_number", "+91 98765-43210"),
            ("address", ""),
        ])
        .send()
        .await
        .expect("Failed to save settings");
    assert_redirect(&resp, "/settings");

    let saved = settings_repo.get().await.expect("Failed to read settings");
    assert_eq!(saved.tagline, tagline);
    assert_eq!(saved.whatsapp_number.as_deref(), Some("919876543210"));

    settings_repo
        .upsert(&original)
        .await
        .expect("Failed to restore settings");
    admin.cleanup(&pool).await;
}
