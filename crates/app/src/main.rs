mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "todo_server={level},server={level}",
            level = settings.log_level
        ))
        .init();

    tracing::info!(bind = %settings.bind, port = settings.port, "starting reference server");
    server::run(&settings.bind, settings.port).await;

    Ok(())
}
