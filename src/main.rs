#[tokio::main]
async fn main() {
    if let Err(e) = vitalwatch_lib::run().await {
        tracing::error!("{e}");
        eprintln!("vitalwatch: {e}");
        std::process::exit(1);
    }
}
