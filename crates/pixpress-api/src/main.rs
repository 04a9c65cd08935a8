use pixpress_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Workspace, registry, routes and the expiry sweeper
    let app = pixpress_api::setup::initialize_app(config.clone()).await?;

    let result = pixpress_api::setup::server::start_server(&config, app.router.clone()).await;

    app.shutdown().await;

    result
}
