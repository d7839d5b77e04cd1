//! In-process HTTP stub of the `/v0/servers` registry API.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

pub struct StubRegistry {
    pub url: String,
    /// Request targets (path + query) in arrival order
    pub hits: Arc<Mutex<Vec<String>>>,
}

impl StubRegistry {
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Serve `(path, status, body)` routes until the test process exits.
/// Unknown paths get `404 {}`.
pub fn serve(routes: Vec<(&str, u16, String)>) -> StubRegistry {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(Mutex::new(Vec::new()));

    let routes: Vec<(String, u16, String)> = routes
        .into_iter()
        .map(|(p, s, b)| (p.to_string(), s, b))
        .collect();
    let thread_hits = Arc::clone(&hits);
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => handle(stream, &routes, &thread_hits),
                Err(_) => break,
            }
        }
    });

    StubRegistry { url, hits }
}

fn handle(mut stream: TcpStream, routes: &[(String, u16, String)], hits: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => continue,
            Err(_) => return,
        }
    }

    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(target.clone());
    let path = target.split('?').next().unwrap_or("");

    let (status, body) = routes
        .iter()
        .find(|(p, _, _)| p == path)
        .map(|(_, s, b)| (*s, b.clone()))
        .unwrap_or((404, "{}".to_string()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };

    let _ = write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.flush();
}

/// A minimal server record.
pub fn server_json(id: &str, name: &str, extra: serde_json::Value) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": id,
        "name": name,
        "description": format!("{} server", name),
    });
    if let (Some(obj), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            obj.insert(k.clone(), v.clone());
        }
    }
    value
}
