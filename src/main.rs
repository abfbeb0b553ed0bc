use anyhow::Result;
use webmail::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
