#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = item_cart::run().await {
        eprintln!("item-cart fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
