use std::sync::Arc;

use crate::{auth::AuthManager, config::Config};
use alphasigma_core::{
    members::{MemberService, MemberServiceTrait},
    portfolio::{
        holdings::{HoldingsService, HoldingsServiceTrait},
        leaderboard::{LeaderboardService, LeaderboardServiceTrait},
    },
    quotes::{QuoteService, QuoteServiceTrait},
};
use alphasigma_market_data::{MarketDataProvider, YahooProvider};
use alphasigma_storage_sqlite::{db, HoldingRepository, MemberRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub member_service: Arc<dyn MemberServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
    pub leaderboard_service: Arc<dyn LeaderboardServiceTrait>,
    pub auth: Arc<AuthManager>,
}

/// Installs the global subscriber. `log_format` is `json` or `text`.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);
    build_state_with_provider(config, provider).await
}

/// Wires storage and services around the given market data provider.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let member_repo = Arc::new(MemberRepository::new(pool.clone(), writer.clone()));
    let member_service: Arc<dyn MemberServiceTrait> = Arc::new(MemberService::new(member_repo));

    let quote_service: Arc<dyn QuoteServiceTrait> =
        Arc::new(QuoteService::new(provider, config.quote_cache_ttl));

    let holding_repo = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let holdings_service: Arc<dyn HoldingsServiceTrait> =
        Arc::new(HoldingsService::new(holding_repo, quote_service));

    let leaderboard_service: Arc<dyn LeaderboardServiceTrait> = Arc::new(
        LeaderboardService::new(member_service.clone(), holdings_service.clone()),
    );

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl));

    Ok(Arc::new(AppState {
        member_service,
        holdings_service,
        leaderboard_service,
        auth,
    }))
}
