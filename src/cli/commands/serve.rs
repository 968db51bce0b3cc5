use crate::config;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config::config().server.port);
    crate::server::serve(port).await
}
