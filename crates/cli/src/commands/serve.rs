//! `archivist serve` — start the HTTP chat gateway.

pub async fn run(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;
    if let Some(port) = port {
        config.gateway.port = port;
    }

    let controller = super::build_controller(&config).await?;

    println!(
        "Starting gateway on {}:{}",
        config.gateway.host, config.gateway.port
    );
    archivist_gateway::start(&config.gateway, controller).await
}
