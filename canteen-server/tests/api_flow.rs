//! End-to-end API tests
//!
//! Drives the full router in-process against a temp-dir SQLite database:
//! registration, login, menu management, order placement, admin status
//! transitions, role management and the sales report.

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use canteen_server::auth::JwtConfig;
use canteen_server::core::app;
use canteen_server::{Config, ServerState};
use http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@canteen.test";
const ADMIN_PASSWORD: &str = "admin-password";

fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-key-32-chars!!".to_string(),
            expiration_minutes: 60,
            issuer: "canteen-server".to_string(),
            audience: "canteen-clients".to_string(),
        },
        environment: "test".to_string(),
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    }
}

/// Fresh app over a fresh database; the TempDir must stay alive for the test
async fn setup() -> Result<(Router, TempDir)> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("canteen.db");
    let config = test_config(format!("sqlite:{}", db_path.display()));
    let state = ServerState::initialize(&config)
        .await
        .map_err(|e| anyhow::anyhow!("state init failed: {e}"))?;
    Ok((app(state), dir))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> StatusCode {
    let (status, _) = send(
        app,
        request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({"name": name, "email": email, "password": password})),
        ),
    )
    .await;
    status
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_menu_item(app: &Router, token: &str, name: &str, price: f64) -> i64 {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/menu",
            Some(token),
            Some(json!({"name": name, "price": price})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create item failed: {body}");
    body["id"].as_i64().unwrap()
}

// ============================================================================
// Public routes
// ============================================================================

#[tokio::test]
async fn health_and_menu_are_public() -> Result<()> {
    let (app, _dir) = setup().await?;

    let (status, body) = send(&app, request(Method::GET, "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // Menu listing needs no token and is idempotent with no writes between
    let (status, first) = send(&app, request(Method::GET, "/api/menu", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(&app, request(Method::GET, "/api/menu", None, None)).await;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn protected_routes_require_token() -> Result<()> {
    let (app, _dir) = setup().await?;

    let (status, _) = send(&app, request(Method::GET, "/api/orders", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request(Method::GET, "/api/profile", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/admin/orders", Some("not-a-jwt"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    Ok(())
}

// ============================================================================
// Registration & login
// ============================================================================

#[tokio::test]
async fn register_validates_and_rejects_duplicate_email() -> Result<()> {
    let (app, _dir) = setup().await?;

    // Missing fields
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({"name": "No Password", "email": "x@y.z"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");

    // First registration succeeds
    assert_eq!(
        register(&app, "Alice", "alice@example.com", "password-1").await,
        StatusCode::CREATED
    );

    // Same email is rejected regardless of password
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({"name": "Other", "email": "alice@example.com", "password": "different"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");

    Ok(())
}

#[tokio::test]
async fn login_and_profile_flow() -> Result<()> {
    let (app, _dir) = setup().await?;
    register(&app, "Alice", "alice@example.com", "password-1").await;

    // Wrong password and unknown email produce the same generic 401
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "alice@example.com", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong_password_message = body["message"].clone();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], wrong_password_message);

    // Valid login yields a working token
    let token = login(&app, "alice@example.com", "password-1").await;
    let (status, body) = send(&app, request(Method::GET, "/api/profile", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logged_in_as"], "Alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"], "customer");

    Ok(())
}

// ============================================================================
// Menu management
// ============================================================================

#[tokio::test]
async fn menu_management_requires_admin() -> Result<()> {
    let (app, _dir) = setup().await?;
    register(&app, "Alice", "alice@example.com", "password-1").await;
    let customer = login(&app, "alice@example.com", "password-1").await;

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/menu",
            Some(&customer),
            Some(json!({"name": "Noodles", "price": 30.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn menu_crud_and_soft_delete() -> Result<()> {
    let (app, _dir) = setup().await?;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // Missing price is a validation error
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/menu",
            Some(&admin),
            Some(json!({"name": "Free Lunch"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing name or price");

    let id = create_menu_item(&app, &admin, "Fried Rice", 80.0).await;

    // Partial update: only the name changes, price keeps its value
    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/menu/{id}"),
            Some(&admin),
            Some(json!({"name": "Egg Fried Rice"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Egg Fried Rice");
    assert_eq!(body["price"], 80.0);
    assert_eq!(body["is_available"], true);

    // Unknown id is a 404
    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/api/menu/99999",
            Some(&admin),
            Some(json!({"price": 1.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Soft delete flips availability, the row stays listed
    let (status, body) = send(
        &app,
        request(Method::DELETE, &format!("/api/menu/{id}"), Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Item with id {id} has been marked as unavailable.")
    );

    let (_, menu) = send(&app, request(Method::GET, "/api/menu", None, None)).await;
    let listed = menu
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["id"].as_i64() == Some(id))
        .cloned()
        .unwrap();
    assert_eq!(listed["is_available"], false);

    Ok(())
}

// ============================================================================
// Order placement
// ============================================================================

#[tokio::test]
async fn place_order_end_to_end() -> Result<()> {
    let (app, _dir) = setup().await?;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let rice = create_menu_item(&app, &admin, "Fried Rice", 80.0).await;
    let soup = create_menu_item(&app, &admin, "Hot Soup", 90.0).await;

    register(&app, "Alice", "alice@example.com", "password-1").await;
    let customer = login(&app, "alice@example.com", "password-1").await;

    // 2 x 80 + 1 x 90 = 250
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/orders",
            Some(&customer),
            Some(json!({"items": [
                {"menu_item_id": rice, "quantity": 2},
                {"menu_item_id": soup, "quantity": 1},
            ]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "order failed: {body}");
    assert_eq!(body["message"], "Order placed successfully");

    let order = &body["order"];
    assert_eq!(order["total_amount"], 250.0);
    assert_eq!(order["status"], "Awaiting Approval");
    assert_eq!(order["daily_order_id"], 1);
    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["menu_item_name"], "Fried Rice");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["price_per_item"], 80.0);

    // Same-day orders number sequentially
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/orders",
            Some(&customer),
            Some(json!({"items": [{"menu_item_id": soup, "quantity": 1}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["daily_order_id"], 2);

    // A later price change must not touch the frozen total, but the
    // serialized per-item price reads the live menu value
    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/menu/{rice}"),
            Some(&admin),
            Some(json!({"price": 100.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, orders) = send(&app, request(Method::GET, "/api/orders", Some(&customer), None)).await;
    assert_eq!(status, StatusCode::OK);
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    // Newest first
    assert_eq!(orders[0]["daily_order_id"], 2);
    assert_eq!(orders[1]["daily_order_id"], 1);
    assert_eq!(orders[1]["total_amount"], 250.0);
    assert_eq!(orders[1]["items"][0]["price_per_item"], 100.0);

    Ok(())
}

#[tokio::test]
async fn invalid_order_lines_leave_no_partial_state() -> Result<()> {
    let (app, _dir) = setup().await?;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let rice = create_menu_item(&app, &admin, "Fried Rice", 80.0).await;

    register(&app, "Alice", "alice@example.com", "password-1").await;
    let customer = login(&app, "alice@example.com", "password-1").await;

    // Missing / empty items
    for body in [json!({}), json!({"items": []})] {
        let (status, response) = send(
            &app,
            request(Method::POST, "/api/orders", Some(&customer), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Invalid or empty order data provided");
    }

    // Nonexistent item id
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/orders",
            Some(&customer),
            Some(json!({"items": [
                {"menu_item_id": rice, "quantity": 1},
                {"menu_item_id": 99999, "quantity": 1},
            ]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item with id 99999 is invalid or unavailable");

    // Zero quantity
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/orders",
            Some(&customer),
            Some(json!({"items": [{"menu_item_id": rice, "quantity": 0}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unavailable item
    let unavailable = create_menu_item(&app, &admin, "Sold Out", 10.0).await;
    send(
        &app,
        request(
            Method::DELETE,
            &format!("/api/menu/{unavailable}"),
            Some(&admin),
            None,
        ),
    )
    .await;
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/orders",
            Some(&customer),
            Some(json!({"items": [{"menu_item_id": unavailable, "quantity": 1}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // No partial writes: the user still has zero orders
    let (status, orders) = send(&app, request(Method::GET, "/api/orders", Some(&customer), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 0);

    Ok(())
}

// ============================================================================
// Admin: order status
// ============================================================================

#[tokio::test]
async fn admin_order_status_transitions() -> Result<()> {
    let (app, _dir) = setup().await?;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let rice = create_menu_item(&app, &admin, "Fried Rice", 80.0).await;

    register(&app, "Alice", "alice@example.com", "password-1").await;
    let customer = login(&app, "alice@example.com", "password-1").await;

    let (_, body) = send(
        &app,
        request(
            Method::POST,
            "/api/orders",
            Some(&customer),
            Some(json!({"items": [{"menu_item_id": rice, "quantity": 1}]})),
        ),
    )
    .await;
    let order_id = body["order"]["order_id"].as_i64().unwrap();

    // Customers may not touch admin routes
    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/orders/{order_id}"),
            Some(&customer),
            Some(json!({"status": "Completed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Missing / invalid status
    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/orders/{order_id}"),
            Some(&admin),
            Some(json!({})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing status field");

    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/orders/{order_id}"),
            Some(&admin),
            Some(json!({"status": "Shipped"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown order
    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/api/admin/orders/99999",
            Some(&admin),
            Some(json!({"status": "Completed"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Any valid status may follow any other
    for status_name in ["Confirmed", "Cancelled", "Completed"] {
        let (status, body) = send(
            &app,
            request(
                Method::PUT,
                &format!("/api/admin/orders/{order_id}"),
                Some(&admin),
                Some(json!({"status": status_name})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], status_name);
    }

    // Admin listing sees the order across users
    let (status, orders) = send(
        &app,
        request(Method::GET, "/api/admin/orders", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);

    Ok(())
}

// ============================================================================
// Admin: user roles
// ============================================================================

#[tokio::test]
async fn user_roles_and_last_admin_protection() -> Result<()> {
    let (app, _dir) = setup().await?;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    register(&app, "Alice", "alice@example.com", "password-1").await;

    let (status, users) = send(
        &app,
        request(Method::GET, "/api/admin/users", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap().clone();
    assert_eq!(users.len(), 2);
    // Password hashes never leave the service
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let admin_id = users
        .iter()
        .find(|u| u["role"] == "admin")
        .unwrap()["id"]
        .as_i64()
        .unwrap();
    let alice_id = users
        .iter()
        .find(|u| u["role"] == "customer")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    // Invalid role value
    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/users/{alice_id}"),
            Some(&admin),
            Some(json!({"role": "superuser"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid role specified");

    // Unknown user
    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/api/admin/users/99999",
            Some(&admin),
            Some(json!({"role": "admin"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Demoting the sole admin is forbidden
    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/users/{admin_id}"),
            Some(&admin),
            Some(json!({"role": "customer"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot demote the last admin.");

    // Promote Alice, then demoting the original admin succeeds
    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/users/{alice_id}"),
            Some(&admin),
            Some(json!({"role": "admin"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/users/{admin_id}"),
            Some(&admin),
            Some(json!({"role": "customer"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "customer");

    Ok(())
}

// ============================================================================
// Sales report
// ============================================================================

#[tokio::test]
async fn sales_report_flow() -> Result<()> {
    let (app, _dir) = setup().await?;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // Admin only
    register(&app, "Alice", "alice@example.com", "password-1").await;
    let customer = login(&app, "alice@example.com", "password-1").await;
    let (status, _) = send(
        &app,
        request(Method::GET, "/api/admin/reports/sales", Some(&customer), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Empty report defaults both bounds to today
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let (status, body) = send(
        &app,
        request(Method::GET, "/api/admin/reports/sales", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_revenue"], 0.0);
    assert_eq!(body["summary"]["total_orders"], 0);
    assert_eq!(body["summary"]["start_date"], today);
    assert_eq!(body["summary"]["end_date"], today);
    assert_eq!(body["item_breakdown"].as_array().unwrap().len(), 0);

    // Malformed dates
    let (status, body) = send(
        &app,
        request(
            Method::GET,
            "/api/admin/reports/sales?start_date=2025-13-01",
            Some(&admin),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid date format. Please use YYYY-MM-DD.");

    // Place and complete an order, then the report picks it up
    let rice = create_menu_item(&app, &admin, "Fried Rice", 80.0).await;
    let soup = create_menu_item(&app, &admin, "Hot Soup", 90.0).await;
    let (_, body) = send(
        &app,
        request(
            Method::POST,
            "/api/orders",
            Some(&customer),
            Some(json!({"items": [
                {"menu_item_id": rice, "quantity": 2},
                {"menu_item_id": soup, "quantity": 1},
            ]})),
        ),
    )
    .await;
    let order_id = body["order"]["order_id"].as_i64().unwrap();

    // Not completed yet: still invisible to the report
    let (_, body) = send(
        &app,
        request(Method::GET, "/api/admin/reports/sales", Some(&admin), None),
    )
    .await;
    assert_eq!(body["summary"]["total_orders"], 0);

    send(
        &app,
        request(
            Method::PUT,
            &format!("/api/admin/orders/{order_id}"),
            Some(&admin),
            Some(json!({"status": "Completed"})),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/admin/reports/sales", Some(&admin), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_revenue"], 250.0);
    assert_eq!(body["summary"]["total_orders"], 1);
    let breakdown = body["item_breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 2);
    // Sorted descending by quantity
    assert_eq!(breakdown[0]["name"], "Fried Rice");
    assert_eq!(breakdown[0]["quantity"], 2);
    assert_eq!(breakdown[1]["name"], "Hot Soup");
    assert_eq!(breakdown[1]["quantity"], 1);

    // A range spanning yesterday..today includes the whole end day
    let yesterday = (chrono::Utc::now().date_naive() - chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();
    let (status, body) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/admin/reports/sales?start_date={yesterday}&end_date={today}"),
            Some(&admin),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_orders"], 1);
    assert_eq!(body["summary"]["start_date"], yesterday);
    assert_eq!(body["summary"]["end_date"], today);

    Ok(())
}
