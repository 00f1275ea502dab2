#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lookout_cli::run().await
}
