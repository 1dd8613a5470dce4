use anyhow::Result;
use nimbot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
