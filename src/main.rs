#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = mindagrow_api::run().await {
        eprintln!("mindagrow-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
