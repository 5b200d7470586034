#[tokio::main]
async fn main() -> anyhow::Result<()> {
  cadenza_lib::run().await
}
