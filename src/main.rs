#[tokio::main]
async fn main() {
    if let Err(e) = newscheck_lib::run().await {
        tracing::error!("{e}");
        eprintln!("newscheck: {e}");
        std::process::exit(1);
    }
}
