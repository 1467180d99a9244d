use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry).context("failed to initialize logging")?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.name,
        collection = %settings.database.collection,
        "shelf bootstrap starting"
    );

    let store = shelf_db::open_store(&settings.database).await;

    let mut registry = ModuleRegistry::new();
    shelf_app::register_all(&mut registry, store);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    tracing::info!("shelf bootstrap complete");

    let served = shelf_http::start_server(&registry, &settings).await;
    let stopped = registry.stop_all().await;

    served?;
    stopped
}
