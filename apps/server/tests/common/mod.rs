#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alphasigma_core::members::{MemberAccount, NewMember};
use alphasigma_market_data::{
    HistoricalClose, LatestQuote, MarketDataError, MarketDataProvider, SearchResult,
};
use alphasigma_server::{
    api::app_router, auth::hash_password, build_state_with_provider, config::Config, AppState,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "TempPass123!";

/// Fixed prices: AAPL 110 (prev 100), SPY 500 (prev 505). Everything else is unknown.
pub struct StubProvider {
    quotes: HashMap<&'static str, LatestQuote>,
}

impl StubProvider {
    pub fn new() -> Self {
        let mut quotes = HashMap::new();
        quotes.insert(
            "AAPL",
            LatestQuote::new("AAPL", Some(dec!(110)))
                .with_previous_close(dec!(100))
                .with_short_name("Apple Inc."),
        );
        quotes.insert(
            "SPY",
            LatestQuote::new("SPY", Some(dec!(500)))
                .with_previous_close(dec!(505))
                .with_short_name("SPDR S&P 500 ETF"),
        );
        Self { quotes }
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<LatestQuote, MarketDataError> {
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn get_monthly_closes(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoricalClose>, MarketDataError> {
        let quote = self.get_latest_quote(symbol).await?;
        let close: Decimal = quote.current_price.unwrap_or_default() + dec!(10);
        Ok(vec![HistoricalClose {
            timestamp: end,
            close,
        }])
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let _ = query;
        Ok(vec![
            SearchResult::new("AAPL", "Apple Inc.", "NMS", "EQUITY"),
            SearchResult::new("SPY", "SPDR S&P 500 ETF", "PCX", "ETF"),
            SearchResult::new("AAPL240621C00150000", "AAPL option", "OPR", "OPTION"),
        ])
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    _db_dir: TempDir,
}

pub fn test_config(db_dir: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: db_dir.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        jwt_secret: vec![42u8; 32],
        token_ttl: Duration::from_secs(3600),
        quote_cache_ttl: Duration::from_secs(60),
        static_dir: None,
        log_format: "text".to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    let db_dir = tempfile::tempdir().unwrap();
    let config = test_config(&db_dir);
    let state = build_state_with_provider(&config, Arc::new(StubProvider::new()))
        .await
        .unwrap();
    TestApp {
        router: app_router(state.clone(), &config),
        state,
        _db_dir: db_dir,
    }
}

impl TestApp {
    pub async fn seed_member(&self, name: &str, email: &str) -> MemberAccount {
        self.state
            .member_service
            .upsert_member(NewMember {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
            })
            .await
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}
