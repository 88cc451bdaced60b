use obra_plan::TaskCatalog;
use obra_plan::http_api;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:3000".to_string())
        .parse()
        .expect("invalid listen address");

    let catalog = TaskCatalog::standard();
    println!("obra-plan http api listening on {addr}");
    http_api::serve(addr, catalog).await
}
