//! Shared helpers for the data crate's behavioural tests.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Canned HTTP reply served by [`StubServer`].
pub struct CannedReply {
    pub status: u16,
    pub body: String,
    /// When set, the server reads the request, waits this long and hangs up
    /// without answering.
    pub stall: Option<Duration>,
}

impl CannedReply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_owned(),
            stall: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            stall: None,
        }
    }

    pub fn stall(delay: Duration) -> Self {
        Self {
            status: 200,
            body: String::new(),
            stall: Some(delay),
        }
    }
}

/// Minimal HTTP server answering one connection per canned reply.
///
/// Request lines are recorded so steps can assert on the path and query.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn serve(replies: Vec<CannedReply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&requests);
        thread::spawn(move || {
            for reply in replies {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                respond(stream, &reply, &captured);
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

fn respond(mut stream: TcpStream, reply: &CannedReply, captured: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    captured
        .lock()
        .expect("requests lock")
        .push(request_line.trim_end().to_owned());
    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).expect("read header");
        if read == 0 || header == "\r\n" {
            break;
        }
    }
    if let Some(delay) = reply.stall {
        thread::sleep(delay);
        return;
    }
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    );
    stream
        .write_all(response.as_bytes())
        .expect("write response");
}
