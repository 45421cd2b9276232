#[tokio::main]
async fn main() {
    malvern_store::start_server().await;
}
