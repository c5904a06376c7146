use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    let config = media_server::media_config();
    let ax = media_server::build(&config).await?;

    let addr = media_server::http_addr(&config.snapshot());

    println!("[media] listening on http://{addr}");

    ax.listen(addr).await?;

    Ok(())
}
