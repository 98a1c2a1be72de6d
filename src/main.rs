use std::{io::Write, process, sync::Arc};

use onair::{
    application::{
        admin::AdminLiveShowService,
        clock::SystemClock,
        error::AppError,
        live_show::{DocumentLocation, LiveShowCache, LiveShowStore},
        telemetry::Telemetry,
    },
    cache::{CacheConfig, MemoryCache, NoopCache},
    config::{self, ShowArgs},
    infra::{
        error::InfraError,
        http::{self, AdminState, PublicState},
        storage,
        telemetry::{self, TracingTelemetry},
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Show(args) => run_show(settings, args).await,
    }
}

fn build_store(
    settings: &config::Settings,
    telemetry: Arc<dyn Telemetry>,
) -> Result<LiveShowStore, AppError> {
    let object_store = storage::connect(
        &settings.storage.connection,
        settings.storage.request_timeout,
    )?;

    let cache_config = CacheConfig::from(&settings.cache);
    let cache: Arc<LiveShowCache> = if cache_config.enabled {
        Arc::new(MemoryCache::new(&cache_config))
    } else {
        Arc::new(NoopCache)
    };

    info!(
        target = "onair::bootstrap",
        backend = settings.storage.connection.kind(),
        target_host = %object_store.target(),
        container = %settings.storage.container,
        object = %settings.storage.object,
        cache_enabled = cache_config.enabled,
        telemetry_enabled = telemetry.is_enabled(),
        "Live show store configured"
    );

    Ok(LiveShowStore::new(
        object_store,
        cache,
        telemetry,
        DocumentLocation::new(&settings.storage.container, &settings.storage.object),
    ))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let telemetry: Arc<dyn Telemetry> =
        Arc::new(TracingTelemetry::new(settings.telemetry.enabled));
    let store = build_store(&settings, telemetry.clone())?;

    let admin_service = AdminLiveShowService::new(
        store.clone(),
        telemetry,
        Arc::new(SystemClock),
        settings.display.timezone,
        settings.display.environment.clone(),
    );

    let admin_router = http::build_admin_router(AdminState {
        live_show: Arc::new(admin_service),
    });
    let public_router = http::build_public_router(PublicState { live_show: store });

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "onair::bootstrap",
        public_addr = %settings.server.public_addr,
        admin_addr = %settings.server.admin_addr,
        environment = %settings.display.environment,
        "Listening"
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_show(settings: config::Settings, args: ShowArgs) -> Result<(), AppError> {
    let telemetry: Arc<dyn Telemetry> =
        Arc::new(TracingTelemetry::new(settings.telemetry.enabled));
    let store = build_store(&settings, telemetry)?;
    let details = store.load().await?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&details)
    } else {
        serde_json::to_string(&details)
    }
    .map_err(|err| AppError::unexpected(format!("failed to encode live show details: {err}")))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").map_err(|err| AppError::from(InfraError::from(err)))?;
    Ok(())
}
