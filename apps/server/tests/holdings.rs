mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, TestApp, PASSWORD};

fn pct(value: &Value) -> f64 {
    value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"))
}

async fn add(app: &TestApp, token: &str, body: Value) -> (StatusCode, Value) {
    app.send(Method::POST, "/api/holdings", Some(token), Some(body))
        .await
}

#[tokio::test]
async fn writes_require_a_token() {
    let app = spawn_app().await;

    let body = json!({ "ticker": "AAPL", "type": "stock", "position": "long", "purchase_price": 100 });
    let (status, body) = app
        .send(Method::POST, "/api/holdings", None, Some(body))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "code": 401, "error": "Unauthorized" }));

    let (status, _) = app.send(Method::DELETE, "/api/holdings/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::PATCH,
            "/api/holdings/1/close",
            None,
            Some(json!({ "close_price": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn open_holdings_carry_live_returns() {
    let app = spawn_app().await;
    let member = app.seed_member("Avery Quinn", "avery@example.com").await;
    let token = app.login("avery@example.com", PASSWORD).await;

    let (status, aapl) = add(
        &app,
        &token,
        json!({ "ticker": " aapl ", "type": "stock", "position": "long", "purchase_price": 100 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(aapl["ticker"], "AAPL");
    assert_eq!(aapl["name"], "Apple Inc.");
    assert_eq!(aapl["type"], "stock");
    assert_eq!(aapl["user_id"], member.id);
    assert!(aapl["closed_at"].is_null());

    let (status, _) = add(
        &app,
        &token,
        json!({ "ticker": "SPY", "type": "etf", "position": "short", "purchase_price": "550" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(Method::GET, &format!("/api/holdings/{}", member.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let holdings = body.as_array().unwrap();
    assert_eq!(holdings.len(), 2);

    // newest first
    assert_eq!(holdings[0]["ticker"], "SPY");
    assert_eq!(pct(&holdings[0]["current_price"]), 500.0);
    assert_eq!(pct(&holdings[0]["total_pct"]), 9.09);
    assert_eq!(pct(&holdings[0]["daily_pct"]), 0.99);

    assert_eq!(holdings[1]["ticker"], "AAPL");
    assert_eq!(pct(&holdings[1]["total_pct"]), 10.0);
    assert_eq!(pct(&holdings[1]["daily_pct"]), 10.0);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/holdings/{}/performance?months=3", member.id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 1);
    // AAPL long 100 -> 120 (+20), SPY short 550 -> 510 (+7.27)
    assert_eq!(pct(&points[0]["portfolio_return"]), 13.64);
    assert!(points[0]["month"].is_string());
}

#[tokio::test]
async fn add_holding_validation() {
    let app = spawn_app().await;
    app.seed_member("Avery Quinn", "avery@example.com").await;
    let token = app.login("avery@example.com", PASSWORD).await;

    let cases = [
        (
            json!({ "ticker": "AAPL", "type": "stock", "position": "long" }),
            "ticker, type, position, and purchase_price are required",
        ),
        (
            json!({ "ticker": "AAPL", "type": "bond", "position": "long", "purchase_price": 1 }),
            r#"type must be "stock" or "etf""#,
        ),
        (
            json!({ "ticker": "AAPL", "type": "stock", "position": "sideways", "purchase_price": 1 }),
            r#"position must be "long" or "short""#,
        ),
        (
            json!({ "ticker": "AAPL", "type": "stock", "position": "long", "purchase_price": -5 }),
            "purchase_price must be a positive number",
        ),
        (
            json!({ "ticker": "TOOLONGTICKER", "type": "stock", "position": "long", "purchase_price": 5 }),
            "ticker must be at most 10 characters",
        ),
        (
            json!({ "ticker": "ZZZZ", "type": "stock", "position": "long", "purchase_price": 5 }),
            "Ticker not found or has no price data",
        ),
    ];

    for (body, message) in cases {
        let (status, response) = add(&app, &token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(response["error"], message);
    }
}

#[tokio::test]
async fn only_the_owner_may_delete_or_close() {
    let app = spawn_app().await;
    app.seed_member("Avery Quinn", "avery@example.com").await;
    app.seed_member("Jordan Blake", "jordan@example.com").await;
    let owner = app.login("avery@example.com", PASSWORD).await;
    let intruder = app.login("jordan@example.com", PASSWORD).await;

    let (_, holding) = add(
        &app,
        &owner,
        json!({ "ticker": "AAPL", "type": "stock", "position": "long", "purchase_price": 100 }),
    )
    .await;
    let id = holding["id"].as_i64().unwrap();

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/holdings/{id}"), Some(&intruder), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "code": 403, "error": "Forbidden: not your holding" }));

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/holdings/{id}/close"),
            Some(&intruder),
            Some(json!({ "close_price": 120 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for bad_price in [json!({}), json!({ "close_price": "abc" }), json!({ "close_price": -5 })] {
        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/api/holdings/{id}/close"),
                Some(&intruder),
                Some(bad_price),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden: not your holding");
    }

    let (status, body) = app
        .send(Method::DELETE, "/api/holdings/abc", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid holding ID");

    let (status, body) = app
        .send(Method::DELETE, "/api/holdings/9999", Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Holding not found");

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/holdings/{id}"), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Holding deleted successfully" }));
}

#[tokio::test]
async fn closing_moves_a_holding_to_the_closed_list() {
    let app = spawn_app().await;
    let member = app.seed_member("Avery Quinn", "avery@example.com").await;
    let token = app.login("avery@example.com", PASSWORD).await;

    let (_, holding) = add(
        &app,
        &token,
        json!({ "ticker": "AAPL", "type": "stock", "position": "short", "purchase_price": 100 }),
    )
    .await;
    let id = holding["id"].as_i64().unwrap();
    let close_uri = format!("/api/holdings/{id}/close");

    let (status, body) = app
        .send(Method::PATCH, &close_uri, Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "close_price must be a positive number");

    let (status, closed) = app
        .send(
            Method::PATCH,
            &close_uri,
            Some(&token),
            Some(json!({ "close_price": "80" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pct(&closed["realized_pct"]), 20.0);
    assert!(closed["closed_at"].is_string());

    let (status, body) = app
        .send(
            Method::PATCH,
            &close_uri,
            Some(&token),
            Some(json!({ "close_price": 90 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Holding is already closed");

    let (_, open) = app
        .send(Method::GET, &format!("/api/holdings/{}", member.id), None, None)
        .await;
    assert_eq!(open, json!([]));

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/holdings/closed/{}", member.id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], id);
    assert_eq!(pct(&body[0]["close_price"]), 80.0);
}

#[tokio::test]
async fn public_reads_validate_their_input() {
    let app = spawn_app().await;

    let (status, body) = app.send(Method::GET, "/api/holdings/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");

    let (status, body) = app
        .send(Method::GET, "/api/holdings/search", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search query is required");

    let (status, body) = app
        .send(Method::GET, "/api/holdings/history", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "tickers query parameter is required");

    for months in ["0", "61", "soon"] {
        let (status, body) = app
            .send(
                Method::GET,
                &format!("/api/holdings/history?tickers=AAPL&months={months}"),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "months must be between 1 and 60");
    }
}

#[tokio::test]
async fn search_and_history() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(Method::GET, "/api/holdings/search?q=aapl", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "symbol": "AAPL", "name": "Apple Inc.", "exchange": "NMS", "type": "stock" },
            { "symbol": "SPY", "name": "SPDR S&P 500 ETF", "exchange": "PCX", "type": "etf" }
        ])
    );

    let (status, body) = app
        .send(
            Method::GET,
            "/api/holdings/history?tickers=spy,aapl,SPY&months=6",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let series = body.as_object().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(pct(&body["AAPL"][0]["close"]), 120.0);
    assert_eq!(pct(&body["SPY"][0]["close"]), 510.0);
    assert!(body["SPY"][0]["month"].is_string());
}

#[tokio::test]
async fn leaderboard_ranks_by_average_return() {
    let app = spawn_app().await;
    let steady = app.seed_member("Avery Quinn", "avery@example.com").await;
    let star = app.seed_member("Jordan Blake", "jordan@example.com").await;
    let idle = app.seed_member("Riley Morgan", "riley@example.com").await;

    let token = app.login("avery@example.com", PASSWORD).await;
    add(
        &app,
        &token,
        json!({ "ticker": "AAPL", "type": "stock", "position": "long", "purchase_price": 100 }),
    )
    .await;

    let token = app.login("jordan@example.com", PASSWORD).await;
    add(
        &app,
        &token,
        json!({ "ticker": "SPY", "type": "etf", "position": "long", "purchase_price": 400 }),
    )
    .await;

    let (status, body) = app.send(Method::GET, "/api/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["member"]["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![star.id as i64, steady.id as i64, idle.id as i64]);
    assert_eq!(body[0]["member"]["name"], "Jordan Blake");
    assert_eq!(pct(&body[0]["avgReturn"]), 25.0);
    assert_eq!(body[0]["count"], 1);
    assert!(body[2]["avgReturn"].is_null());
    assert_eq!(body[2]["count"], 0);
}

#[tokio::test]
async fn extreme_purchase_prices_do_not_break_reads() {
    let app = spawn_app().await;
    let member = app.seed_member("Avery Quinn", "avery@example.com").await;
    let token = app.login("avery@example.com", PASSWORD).await;

    let (status, _) = add(
        &app,
        &token,
        json!({
            "ticker": "AAPL",
            "type": "stock",
            "position": "long",
            "purchase_price": "0.000000000000000000000000001"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(Method::GET, &format!("/api/holdings/{}", member.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body[0]["total_pct"].is_null());
    assert_eq!(pct(&body[0]["daily_pct"]), 10.0);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/holdings/{}/performance", member.id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.send(Method::GET, "/api/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["member"]["id"], member.id);
    assert!(body[0]["avgReturn"].is_null());
    assert_eq!(body[0]["count"], 1);
}
