#[tokio::main]
async fn main() -> anyhow::Result<()> {
    signal_labeler::run().await
}
