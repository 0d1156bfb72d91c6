#[tokio::main]
async fn main() -> anyhow::Result<()> {
    auto_router_lib::run().await
}
