#[tokio::main]
async fn main() {
    if let Err(err) = relief_triage_api::run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
