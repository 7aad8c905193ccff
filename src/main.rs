#[tokio::main]
async fn main() {
    if let Err(e) = ratings_be::start_server().await {
        tracing::error!("Server failed to start: {}", e);
        eprintln!("Server failed to start: {}", e);
        std::process::exit(1);
    }
}
