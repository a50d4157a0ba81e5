mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Log in with the configured admin credentials. None when the environment
/// does not provide them, so these tests skip instead of failing.
async fn admin_token(client: &reqwest::Client, base_url: &str) -> Result<Option<String>> {
    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return Ok(None);
    };

    let res = client
        .post(format!("{}/api/v1/admin/login", base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    Ok(Some(body["token"].as_str().expect("login returns a token").to_string()))
}

#[tokio::test]
async fn catalog_writes_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/arts", server.base_url))
        .json(&json!({ "title": "Untitled" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/reports/dashboard-stats", server.base_url))
        .header("Authorization", "Bearer not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_credentials_is_unauthorized() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/admin/login", server.base_url))
        .json(&json!({ "username": "admin", "password": "definitely-wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_then_read_reports() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let Some(token) = admin_token(&client, &server.base_url).await? else {
        eprintln!("skipping: admin credentials not set");
        return Ok(());
    };

    let stats = client
        .get(format!("{}/api/v1/reports/dashboard-stats", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(stats.status(), StatusCode::OK);

    let stats: Value = stats.json().await?;
    assert!(stats.get("total_revenue").is_some());
    assert!(stats.get("tickets_sold").is_some());

    let chart = client
        .get(format!("{}/api/v1/reports/revenue-chart", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(chart.status(), StatusCode::OK);

    // Today plus the 30 days before it, every day present even with no sales
    let chart: Vec<Value> = chart.json().await?;
    assert_eq!(chart.len(), 31);
    for point in &chart {
        assert!(point.get("date").is_some());
        assert!(point.get("revenue").is_some());
    }

    let top = client
        .get(format!("{}/api/v1/reports/top-exhibitions", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(top.status(), StatusCode::OK);
    assert!(top.json::<Value>().await?.is_array());
    Ok(())
}

#[tokio::test]
async fn capacity_one_exhibition_sells_exactly_one_ticket() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let Some(token) = admin_token(&client, &server.base_url).await? else {
        eprintln!("skipping: admin credentials not set");
        return Ok(());
    };

    let res = client
        .post(format!("{}/api/v1/exhibitions", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Single Seat Evening",
            "start_date": "2026-09-01T18:00:00Z",
            "end_date": "2026-09-01T22:00:00Z",
            "capacity": 1
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let exhibition: Value = res.json().await?;
    let id = exhibition["id"].as_str().unwrap();

    let buy = |email: &str| {
        client
            .post(format!("{}/api/v1/tickets/buy", server.base_url))
            .json(&json!({
                "exhibition_id": id,
                "email": email,
                "payment_method": "Card",
                "type": "Standard"
            }))
            .send()
    };

    let first = buy("first-seat@example.com").await?;
    assert_eq!(first.status(), StatusCode::OK);

    let second = buy("second-seat@example.com").await?;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await?;
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");

    // The rejected purchase created no ticket row
    let availability: Value = client
        .get(format!(
            "{}/api/v1/exhibitions/{}/availability",
            server.base_url, id
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(availability["capacity"], 1);
    assert_eq!(availability["sold"], 1);
    assert_eq!(availability["remaining"], 0);
    Ok(())
}

#[tokio::test]
async fn order_snapshots_survive_artwork_price_changes() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let Some(token) = admin_token(&client, &server.base_url).await? else {
        eprintln!("skipping: admin credentials not set");
        return Ok(());
    };
    let bearer = format!("Bearer {}", token);

    let artist = client
        .post(format!("{}/api/v1/artists", server.base_url))
        .header("Authorization", &bearer)
        .json(&json!({ "name": "Price", "surname": "Snapshot" }))
        .send()
        .await?;
    assert_eq!(artist.status(), StatusCode::CREATED);
    let artist: Value = artist.json().await?;

    let art = client
        .post(format!("{}/api/v1/arts", server.base_url))
        .header("Authorization", &bearer)
        .json(&json!({
            "title": "Fixed In Time",
            "description": "Sold once at the listed price",
            "price": "150.00",
            "type": "Painting",
            "artist_id": artist["id"]
        }))
        .send()
        .await?;
    assert_eq!(art.status(), StatusCode::CREATED);
    let art: Value = art.json().await?;
    let art_id = art["id"].as_str().unwrap();

    let order = client
        .post(format!("{}/api/v1/orders", server.base_url))
        .json(&json!({
            "email": "snapshot-buyer@example.com",
            "art_ids": [art_id]
        }))
        .send()
        .await?;
    assert_eq!(order.status(), StatusCode::CREATED);
    let order: Value = order.json().await?;
    let order_id = order["id"].as_str().unwrap();

    let find_order = |orders: &[Value]| -> Value {
        orders
            .iter()
            .find(|o| o["id"].as_str() == Some(order_id))
            .expect("placed order appears in the admin listing")
            .clone()
    };

    let before: Vec<Value> = client
        .get(format!("{}/api/v1/orders", server.base_url))
        .header("Authorization", &bearer)
        .send()
        .await?
        .json()
        .await?;
    let before = find_order(&before);

    let patched = client
        .patch(format!("{}/api/v1/arts/{}", server.base_url, art_id))
        .header("Authorization", &bearer)
        .json(&json!({ "price": "999.99" }))
        .send()
        .await?;
    assert_eq!(patched.status(), StatusCode::OK);

    let after: Vec<Value> = client
        .get(format!("{}/api/v1/orders", server.base_url))
        .header("Authorization", &bearer)
        .send()
        .await?
        .json()
        .await?;
    let after = find_order(&after);

    assert_eq!(after["total_amount"], before["total_amount"]);
    assert_eq!(
        after["items"][0]["unit_price_snapshot"],
        before["items"][0]["unit_price_snapshot"]
    );
    Ok(())
}
