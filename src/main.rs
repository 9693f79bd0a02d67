#[tokio::main]
async fn main() {
    if let Err(e) = funnel_watch::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
