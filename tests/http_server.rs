use std::net::SocketAddr;
use std::time::Duration;

use docket::{Registry, Server, routes};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    server: JoinHandle<Result<(), docket::Error>>,
}

async fn start() -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let app = routes::router(Registry::in_memory());
    let server = tokio::spawn(Server::serve_on(listener, app, async move {
        stopped.await.ok();
    }));
    Running { addr, stop, server }
}

impl Running {
    async fn shutdown(self) {
        self.stop.send(()).unwrap();
        timeout(Duration::from_secs(5), self.server)
            .await
            .expect("server did not drain in time")
            .unwrap()
            .unwrap();
    }
}

struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn parse(raw: &[u8]) -> Self {
        let split = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = std::str::from_utf8(&raw[..split]).unwrap();
        let mut lines = head.split("\r\n");
        let status = lines.next().unwrap().split(' ').nth(1).unwrap().parse().unwrap();
        let headers = lines
            .map(|line| {
                let (k, v) = line.split_once(':').unwrap();
                (k.trim().to_ascii_lowercase(), v.trim().to_owned())
            })
            .collect();
        Self { status, headers, body: raw[split + 4..].to_vec() }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

fn request(method: &str, path: &str, body: Option<&Value>, close: bool) -> String {
    let body = body.map(Value::to_string).unwrap_or_default();
    let connection = if close { "close" } else { "keep-alive" };
    format!(
        "{method} {path} HTTP/1.1\r\n\
         host: localhost\r\n\
         content-type: application/json\r\n\
         content-length: {}\r\n\
         connection: {connection}\r\n\
         \r\n\
         {body}",
        body.len()
    )
}

/// One request on a fresh connection that the server closes afterwards.
async fn exchange(addr: SocketAddr, raw: String) -> Reply {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    Reply::parse(&buf)
}

#[tokio::test]
async fn create_and_fetch_over_tcp() {
    let running = start().await;
    let payload = json!({"name": "Test Document", "owner": "Tester", "type": "PDF"});

    let created = exchange(running.addr, request("POST", "/documents/", Some(&payload), true)).await;
    assert_eq!(created.status, 201);
    assert_eq!(created.header("location"), Some("/documents/1"));
    assert_eq!(created.header("content-type"), Some("application/json"));
    assert_eq!(
        created.json(),
        json!({"id": 1, "name": "Test Document", "owner": "Tester", "type": "PDF"})
    );

    let fetched = exchange(running.addr, request("GET", "/documents/%31", None, true)).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.json(), created.json());

    let rejected = exchange(
        running.addr,
        request("POST", "/documents/", Some(&json!({"name": "x"})), true),
    )
    .await;
    assert_eq!(rejected.status, 422);
    assert_eq!(rejected.json()["detail"][0]["type"], "too-short");

    let deleted = exchange(running.addr, request("DELETE", "/documents/1", None, true)).await;
    assert_eq!(deleted.status, 204);
    assert!(deleted.body.is_empty());

    running.shutdown().await;
}

#[tokio::test]
async fn in_flight_connection_is_served_after_shutdown_signal() {
    let running = start().await;
    let mut stream = TcpStream::connect(running.addr).await.unwrap();

    // A completed keep-alive exchange proves the connection was accepted.
    stream
        .write_all(request("GET", "/healthz", None, false).as_bytes())
        .await
        .unwrap();
    let mut buf = Vec::new();
    while !buf.ends_with(b"\r\n\r\nok") {
        let mut chunk = [0u8; 256];
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed early");
        buf.extend_from_slice(&chunk[..n]);
    }
    assert_eq!(Reply::parse(&buf).status, 200);

    let Running { stop, server, .. } = running;
    stop.send(()).unwrap();

    let payload = json!({"name": "Late Arrival", "owner": "Tester", "type": "Word"});
    stream
        .write_all(request("POST", "/documents/", Some(&payload), true).as_bytes())
        .await
        .unwrap();
    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).await.unwrap();
    let reply = Reply::parse(&rest);
    assert_eq!(reply.status, 201);
    assert_eq!(reply.json()["name"], "Late Arrival");

    timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not drain in time")
        .unwrap()
        .unwrap();
}
