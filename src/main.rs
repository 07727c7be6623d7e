use axum::{ extract::State, routing::{ get, post, put }, Json, Router };
use migration::MigratorTrait;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };
use wallet_desk::{ api, Config, Result };
use wallet_desk::clock::{ BusinessCalendar, SystemClock };
use wallet_desk::scheduler::{ WindowMonitor, WindowMonitorHandle };
use wallet_desk::services::{ DepositService, ProfileService, RateService, WithdrawalService };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "wallet_desk=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| wallet_desk::AppError::Config(e.to_string()))?;

    tracing::info!(
        "Starting wallet-desk, business offset {}, fallback rate {}",
        config.business_utc_offset,
        config.default_exchange_rate
    );

    // Initialize database connection
    let db = sea_orm::Database::connect(&config.database_url).await?;

    tracing::info!("Database connected successfully");

    // Run migrations
    migration::Migrator::up(&db, None).await?;

    tracing::info!("Migrations completed successfully");

    // Initialize store and services
    let store: Arc<dyn wallet_desk::db::WalletStore> = Arc::new(wallet_desk::db::LedgerRepository::new(db));
    let calendar = BusinessCalendar::new(Arc::new(SystemClock), config.business_utc_offset);
    let rates = Arc::new(RateService::new(store.clone(), config.default_exchange_rate));

    let profile_service = Arc::new(ProfileService::new(store.clone(), calendar.clone(), rates.clone()));
    let withdrawal_service = Arc::new(
        WithdrawalService::new(store.clone(), calendar.clone(), rates.clone())
    );
    let deposit_service = Arc::new(DepositService::new(store.clone(), calendar, rates));

    // Keep the window status fresh in the background
    let monitor = Arc::new(
        WindowMonitor::new(withdrawal_service.clone(), config.window_check_interval).spawn()
    );

    // Create app state
    let app_state = api::AppState::new(profile_service, withdrawal_service, deposit_service);

    // Build application router
    let app = Router::new()
        .route("/health", get(health_check))
        .with_state(monitor)
        .route("/api/withdrawals/window", get(api::withdrawal::get_window))
        .route("/api/withdrawals/quote", post(api::withdrawal::quote_withdrawal))
        .route("/api/deposit-networks", get(api::deposit::list_networks))
        .route("/api/deposit-networks/{id}/qr", get(api::deposit::network_qr))
        .route("/api/users/{user_id}/account", post(api::account::ensure_account))
        .route("/api/users/{user_id}/profile", get(api::account::get_profile))
        .route("/api/users/{user_id}/payout/nequi", put(api::account::update_nequi))
        .route("/api/users/{user_id}/payout/usdt", put(api::account::update_usdt))
        .route("/api/users/{user_id}/balance", get(api::balance::get_balance))
        .route("/api/users/{user_id}/transactions", get(api::transaction::get_transactions))
        .route(
            "/api/users/{user_id}/withdrawals",
            post(api::withdrawal::submit_withdrawal).get(api::withdrawal::list_withdrawals)
        )
        .route(
            "/api/users/{user_id}/deposits",
            post(api::deposit::submit_deposit).get(api::deposit::list_deposits)
        )
        .with_state(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| wallet_desk::AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| wallet_desk::AppError::Internal(e.to_string()))?;

    Ok(())
}

async fn health_check(State(monitor): State<Arc<WindowMonitorHandle>>) -> Json<serde_json::Value> {
    let window = monitor.current().map(|status| status.describe());

    Json(serde_json::json!({ "status": "ok", "withdrawal_window": window }))
}
