use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLearningRepository};
use crate::relay::RelayState;
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use skillpath::config::AppConfig;
use skillpath::error::AppError;
use skillpath::learning::{LearningDataset, LearningService};
use skillpath::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dataset) = args.dataset.take() {
        config.data.dataset = Some(dataset);
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = match &config.data.dataset {
        Some(path) => {
            let dataset = LearningDataset::from_path(path)?;
            info!(
                path = %path.display(),
                profiles = dataset.profiles.len(),
                quizzes = dataset.quizzes.len(),
                results = dataset.results.len(),
                "seeded gateway from dataset"
            );
            InMemoryLearningRepository::from_dataset(dataset)
        }
        None => {
            warn!("no dataset configured, starting with an empty gateway");
            InMemoryLearningRepository::default()
        }
    };
    let learning_service = Arc::new(LearningService::new(Arc::new(repository)));

    let relay = RelayState::from_config(&config.relay)?;
    if !config.relay.is_configured() {
        info!("AI_RELAY_URL not set, ai relay answers 503");
    }

    let app = with_platform_routes(learning_service, relay)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "learning platform api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
