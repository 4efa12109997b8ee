#[tokio::main]
async fn main() {
    if let Err(e) = medicloud::run().await {
        eprintln!("medicloud: {e}");
        std::process::exit(1);
    }
}
