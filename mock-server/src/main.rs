use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "7700".to_string());
    let api_key = std::env::var("MEILI_MASTER_KEY").ok();
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run_with_key(listener, api_key.as_deref()).await
}
