use clap::Parser;
use log::info;
use resume_screener::{init_logger, SmokeClient};

#[derive(Parser)]
#[command(author, version, about = "Smoke test a running ATS scoring API", long_about = None)]
struct Args {
    /// Service root [default: $RESUME_SCREENER_API_URL or http://localhost:5000]
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();

    let base_url = args.base_url.unwrap_or_else(SmokeClient::get_default_base_url);
    let client = SmokeClient::new(&base_url)?;
    info!("Smoke testing {}", client.base_url());

    // Check outcomes are reported on stdout, the exit code stays 0
    let report = client.run().await;
    info!("Smoke test finished: {:?}", report);
    Ok(())
}
