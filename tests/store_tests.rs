//! End-to-end tests against PostgreSQL. Run with `DATABASE_URL` set and `--ignored`.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};
use sideboard::apply_migrations;
use sqlx::PgPool;

async fn setup(pool: PgPool) -> axum::Router {
    apply_migrations(&pool).await.expect("migrations");
    app_with_pool(pool)
}

async fn create(app: &axum::Router, uri: &str, key: &str, body: Value) -> Value {
    let (status, resp) = send_json(app, "POST", uri, &admin_token(), &body).await;
    assert_eq!(status, StatusCode::OK, "POST {}: {}", uri, resp);
    assert_eq!(resp["success"], json!(true));
    resp[key].clone()
}

async fn merchant(app: &axum::Router, name: &str) -> i64 {
    create(app, "/merchants", "merchant", json!({"name": name})).await["id"]
        .as_i64()
        .expect("merchant id")
}

async fn item(app: &axum::Router, merchant_id: i64, name: &str) -> i64 {
    create(
        app,
        "/items",
        "item",
        json!({"name": name, "price": 12.5, "merchant_id": merchant_id}),
    )
    .await["id"]
        .as_i64()
        .expect("item id")
}

async fn customer(app: &axum::Router, name: &str) -> i64 {
    create(
        app,
        "/customers",
        "customer",
        json!({"name": name, "email": format!("{}@example.com", name.to_lowercase())}),
    )
    .await["id"]
        .as_i64()
        .expect("customer id")
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn migrations_are_idempotent(pool: PgPool) {
    apply_migrations(&pool).await.expect("first run");
    apply_migrations(&pool).await.expect("second run");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn create_merchant_returns_full_record(pool: PgPool) {
    let app = setup(pool).await;
    let body = json!({
        "name": "Dum Dicaprio",
        "city": "Los Angeles",
        "email": "dum@gumshoe.com",
        "phone": 1234567890,
        "state": "California",
    });
    let (status, resp) = send_json(&app, "POST", "/merchants", &admin_token(), &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["success"], json!(true));
    let m = resp["merchant"].as_object().expect("merchant object");
    assert_eq!(m.len(), 11);
    assert_eq!(m["name"], "Dum Dicaprio");
    assert_eq!(m["phone"], "1234567890");
    assert_eq!(m["fb_link"], Value::Null);
    assert_eq!(m["items"], json!([]));

    let (status, resp) = send_json(&app, "POST", "/merchants", &admin_token(), &body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message = assert_failure(&resp, StatusCode::CONFLICT);
    assert_eq!(message, "Request conflicts with database constraints.");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn item_for_unknown_merchant_is_409(pool: PgPool) {
    let app = setup(pool).await;
    let (status, resp) = send_json(
        &app,
        "POST",
        "/items",
        &admin_token(),
        &json!({"name": "Lamp", "price": 3.0, "merchant_id": 9999}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_failure(&resp, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn item_wire_format_omits_description(pool: PgPool) {
    let app = setup(pool).await;
    let m = merchant(&app, "Lamps Inc").await;
    let created = create(
        &app,
        "/items",
        "item",
        json!({"name": "Lamp", "price": 3.5, "merchant_id": m, "description": "bright"}),
    )
    .await;
    let keys: Vec<&str> = created
        .as_object()
        .expect("item object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 5);
    assert!(!keys.contains(&"description"));
    assert_eq!(created["merchant_id"], json!(m));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn listings_are_ordered_arrays(pool: PgPool) {
    let app = setup(pool).await;
    let a = merchant(&app, "Alpha").await;
    let b = merchant(&app, "Beta").await;
    item(&app, b, "Brush").await;

    let (status, resp) = send(&app, "GET", "/merchants", Some(&token(&["get:merchants"])), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = resp["merchants"].as_array().expect("array");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], json!(a));
    assert_eq!(list[0]["items"], json!([]));
    assert_eq!(list[1]["items"][0]["name"], "Brush");

    let (status, resp) = send(&app, "GET", "/items", Some(&token(&["get:items"])), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["items"].as_array().map(Vec::len), Some(1));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn missing_records_are_404(pool: PgPool) {
    let app = setup(pool).await;
    let t = admin_token();
    for (method, uri) in [
        ("GET", "/merchants/41"),
        ("PATCH", "/merchants/41"),
        ("DELETE", "/merchants/41"),
        ("GET", "/items/41"),
        ("PATCH", "/items/41"),
        ("DELETE", "/items/41"),
        ("GET", "/customers/41"),
        ("PATCH", "/customers/41"),
        ("DELETE", "/customers/41"),
    ] {
        let body = (method == "PATCH").then(|| r#"{"name": "Renamed"}"#);
        let (status, resp) = send(&app, method, uri, Some(&t), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_failure(&resp, StatusCode::NOT_FOUND);
    }
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn patch_changes_only_supplied_fields(pool: PgPool) {
    let app = setup(pool).await;
    let created = create(
        &app,
        "/merchants",
        "merchant",
        json!({"name": "Corner Shop", "city": "Austin", "state": "Texas"}),
    )
    .await;
    let id = created["id"].as_i64().expect("id");
    let uri = format!("/merchants/{}", id);

    let (status, resp) = send_json(&app, "PATCH", &uri, &admin_token(), &json!({"city": "Dallas", "state": null})).await;
    assert_eq!(status, StatusCode::OK);
    let m = &resp["merchant"];
    assert_eq!(m["name"], "Corner Shop");
    assert_eq!(m["city"], "Dallas");
    assert_eq!(m["state"], Value::Null);

    let (status, resp) = send_json(&app, "PATCH", &uri, &admin_token(), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["merchant"]["city"], "Dallas");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn patch_to_duplicate_name_is_409(pool: PgPool) {
    let app = setup(pool).await;
    merchant(&app, "First").await;
    let second = merchant(&app, "Second").await;
    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/merchants/{}", second),
        &admin_token(),
        &json!({"name": "First"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn deleting_merchant_removes_items_and_associations(pool: PgPool) {
    let app = setup(pool.clone()).await;
    let m = merchant(&app, "Closing Down").await;
    let i = item(&app, m, "Last Chair").await;
    let c = customer(&app, "Ann").await;
    let t = admin_token();
    let (status, _) = send_json(&app, "POST", &format!("/customers/{}/favorites", c), &t, &json!({"item_id": i})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = send(&app, "DELETE", &format!("/merchants/{}", m), Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["merchant"]["items"][0]["id"], json!(i));

    let (status, _) = send(&app, "GET", &format!("/items/{}", i), Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, resp) = send(&app, "GET", &format!("/customers/{}", c), Some(&t), None).await;
    assert_eq!(resp["customer"]["favorites"], json!([]));

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn favorites_and_purchases_round_trip(pool: PgPool) {
    let app = setup(pool).await;
    let m = merchant(&app, "Goods").await;
    let i = item(&app, m, "Mug").await;
    let c = customer(&app, "Bea").await;
    let t = admin_token();

    let fav = format!("/customers/{}/favorites", c);
    let (status, resp) = send_json(&app, "POST", &fav, &t, &json!({"item_id": i})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["customer"]["favorites"][0]["id"], json!(i));
    assert_eq!(resp["customer"]["purchases"], json!([]));

    let (status, _) = send_json(&app, "POST", &fav, &t, &json!({"item_id": i})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send_json(&app, "POST", &fav, &t, &json!({"item_id": 9999})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let purchases = format!("/customers/{}/purchases", c);
    let (status, resp) = send_json(&app, "POST", &purchases, &t, &json!({"item_id": i})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["customer"]["purchases"][0]["name"], "Mug");

    let (status, resp) = send(&app, "DELETE", &format!("{}/{}", fav, i), Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["customer"]["favorites"], json!([]));
    assert_eq!(resp["customer"]["purchases"].as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, "DELETE", &format!("{}/{}", fav, i), Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "POST", "/customers/9999/favorites", &t, &json!({"item_id": i})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn deleting_item_clears_customer_links(pool: PgPool) {
    let app = setup(pool).await;
    let m = merchant(&app, "Shelf").await;
    let i = item(&app, m, "Book").await;
    let c = customer(&app, "Cal").await;
    let t = admin_token();
    send_json(&app, "POST", &format!("/customers/{}/purchases", c), &t, &json!({"item_id": i})).await;

    let (status, resp) = send(&app, "DELETE", &format!("/items/{}", i), Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["item"]["name"], "Book");

    let (_, resp) = send(&app, "GET", &format!("/customers/{}", c), Some(&t), None).await;
    assert_eq!(resp["customer"]["purchases"], json!([]));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn deleting_customer_returns_snapshot(pool: PgPool) {
    let app = setup(pool).await;
    let m = merchant(&app, "Kiosk").await;
    let i = item(&app, m, "Pen").await;
    let c = customer(&app, "Dee").await;
    let t = admin_token();
    send_json(&app, "POST", &format!("/customers/{}/favorites", c), &t, &json!({"item_id": i})).await;

    let (status, resp) = send(&app, "DELETE", &format!("/customers/{}", c), Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["customer"]["favorites"][0]["id"], json!(i));

    let (status, _) = send(&app, "GET", &format!("/items/{}", i), Some(&t), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn merchant_delete_waits_for_pending_favorite(pool: PgPool) {
    let app = setup(pool.clone()).await;
    let m = merchant(&app, "Busy Stall").await;
    let i = item(&app, m, "Vase").await;
    let c = customer(&app, "Eve").await;

    let mut pending = pool.begin().await.expect("begin");
    sqlx::query("INSERT INTO favorites (customer_id, item_id) VALUES ($1, $2)")
        .bind(c as i32)
        .bind(i as i32)
        .execute(&mut *pending)
        .await
        .expect("insert favorite");

    let delete = {
        let app = app.clone();
        let uri = format!("/merchants/{}", m);
        tokio::spawn(async move { send(&app, "DELETE", &uri, Some(&admin_token()), None).await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    pending.commit().await.expect("commit");

    let (status, resp) = delete.await.expect("delete task");
    assert_eq!(status, StatusCode::OK, "body: {}", resp);

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(remaining, 0);
    let (status, _) = send(&app, "GET", &format!("/items/{}", i), Some(&admin_token()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn item_patch_changes_only_price(pool: PgPool) {
    let app = setup(pool).await;
    let m = merchant(&app, "Chairs").await;
    let created = create(
        &app,
        "/items",
        "item",
        json!({"name": "old chair", "price": 10.0, "merchant_id": m, "image_link": "https://img/chair.png"}),
    )
    .await;
    let uri = format!("/items/{}", created["id"]);

    let (status, resp) = send_json(&app, "PATCH", &uri, &admin_token(), &json!({"price": 7.25})).await;
    assert_eq!(status, StatusCode::OK, "body: {}", resp);
    let patched = &resp["item"];
    assert_eq!(patched["price"], json!(7.25));
    assert_eq!(patched["name"], "old chair");
    assert_eq!(patched["image_link"], "https://img/chair.png");
    assert_eq!(patched["merchant_id"], json!(m));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn item_patch_to_unknown_merchant_is_409(pool: PgPool) {
    let app = setup(pool).await;
    let m = merchant(&app, "Tables").await;
    let i = item(&app, m, "Desk").await;
    let (status, resp) = send_json(
        &app,
        "PATCH",
        &format!("/items/{}", i),
        &admin_token(),
        &json!({"merchant_id": 9999}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_failure(&resp, StatusCode::CONFLICT);

    let (_, resp) = send(&app, "GET", &format!("/items/{}", i), Some(&admin_token()), None).await;
    assert_eq!(resp["item"]["merchant_id"], json!(m));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn customer_patch_changes_only_supplied_fields(pool: PgPool) {
    let app = setup(pool).await;
    let c = customer(&app, "Fay").await;
    let uri = format!("/customers/{}", c);

    let (status, resp) = send_json(&app, "PATCH", &uri, &admin_token(), &json!({"name": "Faye"})).await;
    assert_eq!(status, StatusCode::OK, "body: {}", resp);
    assert_eq!(resp["customer"]["name"], "Faye");
    assert_eq!(resp["customer"]["email"], "fay@example.com");
    assert_eq!(resp["customer"]["favorites"], json!([]));

    let (status, _) = send_json(&app, "PATCH", &uri, &admin_token(), &json!({"email": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
