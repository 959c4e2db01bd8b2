use anyhow::Context;
use todo_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config).context("failed to initialize tracing")?;

    // One store for the life of the process
    let state = AppState::in_memory(config.clone());
    let app = router(state);

    Server::new(config).serve(app).await.context("server error")
}
