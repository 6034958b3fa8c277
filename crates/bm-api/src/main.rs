#[tokio::main]
async fn main() {
    if let Err(err) = bm_api::run().await {
        tracing::error!(error = %err, "bm-api failed");
        eprintln!("bm-api failed: {err}");
        std::process::exit(1);
    }
}
