//! docket — in-memory document registry over HTTP.
//!
//! Run with:
//!   cargo run -- --addr 127.0.0.1:8000
//!
//! Try:
//!   curl -X POST http://localhost:8000/documents/ \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"Test Document","owner":"Tester","type":"PDF"}'
//!   curl http://localhost:8000/documents/1
//!   curl -X DELETE http://localhost:8000/documents/1

use clap::Parser;
use docket::{Config, Error, Registry, Server, routes};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .init();

    let app = routes::router(Registry::in_memory());

    Server::bind(&config.addr)?.serve(app).await
}
