//! In-process mock of the upstream feed API for tests.
//!
//! Raw sockets rather than an HTTP framework so tests control transfer
//! framing exactly: the stream endpoint emits one HTTP chunk per configured
//! payload, which is the chunk-boundary assumption under test.

use crate::types::FilterRule;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
struct Behavior {
    stream_chunks: Vec<String>,
    fail_stream_open: bool,
    fail_rule_creation: bool,
}

pub(crate) struct MockUpstream {
    port: u16,
    rules: Arc<Mutex<Vec<FilterRule>>>,
}

impl MockUpstream {
    pub(crate) async fn spawn(
        initial_rules: Vec<FilterRule>,
        stream_chunks: Vec<String>,
    ) -> Self {
        Self::spawn_with(
            initial_rules,
            Behavior {
                stream_chunks,
                fail_stream_open: false,
                fail_rule_creation: false,
            },
        )
        .await
    }

    /// Upstream whose stream endpoint answers 500.
    pub(crate) async fn spawn_with_broken_stream(initial_rules: Vec<FilterRule>) -> Self {
        Self::spawn_with(
            initial_rules,
            Behavior {
                stream_chunks: Vec::new(),
                fail_stream_open: true,
                fail_rule_creation: false,
            },
        )
        .await
    }

    /// Upstream that lists rules fine but rejects rule creation.
    pub(crate) async fn spawn_with_broken_rule_creation(initial_rules: Vec<FilterRule>) -> Self {
        Self::spawn_with(
            initial_rules,
            Behavior {
                stream_chunks: Vec::new(),
                fail_stream_open: false,
                fail_rule_creation: true,
            },
        )
        .await
    }

    async fn spawn_with(initial_rules: Vec<FilterRule>, behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let port = listener.local_addr().unwrap().port();
        let rules = Arc::new(Mutex::new(initial_rules));

        let state = rules.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let state = state.clone();
                let behavior = behavior.clone();
                tokio::spawn(async move {
                    serve(socket, state, behavior).await;
                });
            }
        });

        MockUpstream { port, rules }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Current upstream rule state, creations included.
    pub(crate) fn rules(&self) -> Vec<FilterRule> {
        self.rules.lock().unwrap().clone()
    }
}

async fn serve(mut socket: TcpStream, rules: Arc<Mutex<Vec<FilterRule>>>, behavior: Behavior) {
    let Some((request_line, body)) = read_request(&mut socket).await else {
        return;
    };

    if request_line.starts_with("POST /stream/rules") {
        if behavior.fail_rule_creation {
            write_status(&mut socket, "500 Internal Server Error").await;
            return;
        }
        apply_rule_additions(&rules, &body);
        write_json(&mut socket, "{}").await;
    } else if request_line.starts_with("GET /stream/rules") {
        let listing = serde_json::json!({ "data": *rules.lock().unwrap() });
        write_json(&mut socket, &listing.to_string()).await;
    } else if request_line.starts_with("GET /stream") {
        if behavior.fail_stream_open {
            write_status(&mut socket, "500 Internal Server Error").await;
            return;
        }
        write_chunked(&mut socket, &behavior.stream_chunks).await;
    } else {
        write_status(&mut socket, "404 Not Found").await;
    }
}

fn apply_rule_additions(rules: &Arc<Mutex<Vec<FilterRule>>>, body: &str) {
    let request: serde_json::Value = serde_json::from_str(body).expect("rule creation body");
    let additions = request["add"].as_array().expect("add array");

    let mut rules = rules.lock().unwrap();
    for addition in additions {
        let id = format!("rule-{}", rules.len() + 1);
        rules.push(FilterRule {
            id,
            value: addition["value"].as_str().map(String::from),
            tag: addition["tag"].as_str().map(String::from),
        });
    }
}

/// Reads one request, returning the request line and the body.
async fn read_request(socket: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];

    loop {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);

        let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };

        let header = String::from_utf8_lossy(&buf[..pos]).to_string();
        let content_length = header
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buf[pos + 4..].to_vec();
        while body.len() < content_length {
            let n = socket.read(&mut tmp).await.ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&tmp[..n]);
        }

        let request_line = header.lines().next().unwrap_or_default().to_string();
        return Some((request_line, String::from_utf8_lossy(&body).to_string()));
    }
}

async fn write_status(socket: &mut TcpStream, status: &str) {
    let response =
        format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
    let _ = socket.write_all(response.as_bytes()).await;
}

async fn write_json(socket: &mut TcpStream, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
}

/// Chunked transfer encoding with one HTTP chunk per payload. The short
/// pause after each chunk lets the client observe the boundaries instead of
/// coalescing reads.
async fn write_chunked(socket: &mut TcpStream, chunks: &[String]) {
    let header = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ntransfer-encoding: chunked\r\nconnection: close\r\n\r\n";
    if socket.write_all(header.as_bytes()).await.is_err() {
        return;
    }

    for chunk in chunks {
        let framed = format!("{:x}\r\n{chunk}\r\n", chunk.len());
        if socket.write_all(framed.as_bytes()).await.is_err() {
            return;
        }
        let _ = socket.flush().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let _ = socket.write_all(b"0\r\n\r\n").await;
}
