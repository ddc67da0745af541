#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campus_backend::run().await
}
