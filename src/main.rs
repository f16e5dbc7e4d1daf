#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the configuration is first read
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }

    leapp_reporting::bootstrapper::run().await
}
