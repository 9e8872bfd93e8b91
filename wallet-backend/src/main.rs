use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod config;
mod controllers;
mod db;
mod gas;
mod gateway;
mod keyring;
mod lock;
mod notifications;
mod pending;
mod rpc;
mod send;
mod util;

use config::Config;
use db::Database;
use gas::GasFeeEstimator;
use gateway::EventBroadcaster;
use keyring::RemoteSigner;
use notifications::NotificationService;
use pending::{PendingNonceOracle, PendingTxTracker};
use rpc::{PendingNonceMiddleware, PendingTxMiddleware, RpcClient, RpcPipeline};
use send::SendFlowManager;

pub struct AppState {
    pub config: Config,
    pub db: Arc<Database>,
    pub pipeline: Arc<RpcPipeline>,
    pub tracker: Arc<PendingTxTracker>,
    pub estimator: Arc<GasFeeEstimator>,
    pub send_flow: Arc<SendFlowManager>,
    pub notifications: Arc<NotificationService>,
    pub broadcaster: Arc<EventBroadcaster>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Arc::new(Database::new(&config.database_url).expect("Failed to initialize database"));

    // One token tears down the gateway and both workers on exit.
    let shutdown = CancellationToken::new();
    let broadcaster = Arc::new(EventBroadcaster::new(shutdown.clone()));

    let estimator = Arc::new(GasFeeEstimator::new());
    let tracker = Arc::new(PendingTxTracker::new());

    log::info!("Using upstream node at {}", config.rpc_url);
    let rpc_client = Arc::new(RpcClient::new(&config.rpc_url));
    let nonce_oracle = Arc::new(PendingNonceOracle::new(tracker.clone(), rpc_client.clone()));

    let pipeline = Arc::new(
        RpcPipeline::new(rpc_client.clone())
            .with_middleware(Arc::new(PendingNonceMiddleware::new(nonce_oracle.clone())))
            .with_middleware(Arc::new(PendingTxMiddleware::new(tracker.clone()))),
    );

    let signer = Arc::new(RemoteSigner::new(&config.keyring_url));
    let send_flow = Arc::new(
        SendFlowManager::new(
            estimator.clone(),
            nonce_oracle,
            signer,
            tracker.clone(),
            broadcaster.clone(),
            config.chain_id,
        )
        .with_db(db.clone())
        .with_known_token_contracts(config.known_token_contracts.clone()),
    );

    let notification_service = Arc::new(NotificationService::new(
        config.feature_announcements_url.clone(),
        config.onchain_notifications_url.clone(),
        config.notifications_auth_token.clone(),
        db.clone(),
        broadcaster.clone(),
    ));

    log::info!("Starting background workers");
    tokio::spawn(notifications::worker::run_worker(
        notification_service.clone(),
        config.notification_poll_secs,
        shutdown.clone(),
    ));
    tokio::spawn(pending::worker::run_worker(
        tracker.clone(),
        rpc_client,
        estimator.clone(),
        Some(db.clone()),
        broadcaster.clone(),
        config.tx_poll_secs,
        shutdown.clone(),
    ));

    log::info!("Starting wallet backend on port {}", port);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                db: Arc::clone(&db),
                pipeline: Arc::clone(&pipeline),
                tracker: Arc::clone(&tracker),
                estimator: Arc::clone(&estimator),
                send_flow: Arc::clone(&send_flow),
                notifications: Arc::clone(&notification_service),
                broadcaster: Arc::clone(&broadcaster),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::rpc::config)
            .configure(controllers::send::config)
            .configure(controllers::transactions::config)
            .configure(controllers::notifications::config)
            .route("/ws", web::get().to(gateway::actix_ws::ws_handler))
    })
    .bind(("0.0.0.0", port))?
    .run();

    let result = server.await;
    shutdown.cancel();
    result
}
