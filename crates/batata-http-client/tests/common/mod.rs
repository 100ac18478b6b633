//! Shared helpers for mock-server based tests

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use batata_http_client::ServerEndpoint;
use wiremock::MockServer;

pub const CONTEXT_PATH: &str = "/nacos";

/// Endpoint pointing at a running mock server
pub fn endpoint_of(server: &MockServer) -> ServerEndpoint {
    let addr = server.address();
    ServerEndpoint::new("http", &addr.ip().to_string(), addr.port(), CONTEXT_PATH)
}

/// Endpoint that refuses connections
pub fn unreachable_endpoint() -> ServerEndpoint {
    ServerEndpoint::new("http", "127.0.0.1", 1, CONTEXT_PATH)
}

/// Full mock path for an API path under the context path
pub fn api_path(path: &str) -> String {
    format!("{}{}", CONTEXT_PATH, path)
}

/// Endpoint that answers every request with `200 OK` and a body cut short
///
/// The response announces 1000 bytes, sends 7 and closes the connection, so
/// the status is fine but reading the body fails.
pub fn truncated_body_endpoint() -> ServerEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    let port = listener.local_addr().expect("Failed to read local address").port();

    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\npartial");
            let _ = stream.flush();
        }
    });

    ServerEndpoint::new("http", "127.0.0.1", port, CONTEXT_PATH)
}
