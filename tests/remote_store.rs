use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use lesson_planner::schedule::{import_csv, Subject};
use lesson_planner::store::{Backend, Gateway, LocalStore, RemoteApi, StoreError};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorded {
    posted: Vec<String>,
    stored: Vec<serde_json::Value>,
}

/// Minimal subjects API on a loopback port. The `fail_on`-th POST
/// (counting from 1) is answered with a 500 and not stored.
struct FakeApi {
    addr: std::net::SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeApi {
    fn start(fail_on: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let shared = Arc::clone(&recorded);

        thread::spawn(move || {
            let mut posts = 0;
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &shared, &mut posts, fail_on);
            }
        });

        Self { addr, recorded }
    }

    fn remote(&self) -> RemoteApi {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        RemoteApi::with_client(client, format!("http://{}/api", self.addr))
    }

    fn posted(&self) -> Vec<String> {
        self.recorded.lock().unwrap().posted.clone()
    }

    fn stored_ids(&self) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .stored
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect()
    }
}

fn serve(stream: TcpStream, recorded: &Mutex<Recorded>, posts: &mut usize, fail_on: usize) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).unwrap();
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap();
            }
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).unwrap();

    let (status, reply) = match (method.as_str(), path.as_str()) {
        ("GET", "/api/health") => ("200 OK", r#"{"status":"ok"}"#.to_string()),
        ("GET", "/api/subjects") => {
            let recorded = recorded.lock().unwrap();
            ("200 OK", serde_json::to_string(&recorded.stored).unwrap())
        }
        ("POST", "/api/subjects") => {
            *posts += 1;
            let subject: serde_json::Value = serde_json::from_slice(&body).unwrap();
            let mut recorded = recorded.lock().unwrap();
            recorded.posted.push(subject["id"].as_str().unwrap().to_string());
            if *posts == fail_on {
                ("500 Internal Server Error", r#"{"error":"database busy"}"#.to_string())
            } else {
                recorded.stored.push(subject.clone());
                ("201 Created", subject.to_string())
            }
        }
        _ => ("404 Not Found", r#"{"error":"not found"}"#.to_string()),
    };

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    )
    .unwrap();
    stream.flush().unwrap();
}

fn connected(api: &FakeApi, dir: &tempfile::TempDir) -> Gateway {
    let local = LocalStore::new(dir.path().join("subjects.json"));
    let mut gateway = Gateway::new(Some(api.remote()), local).unwrap();
    gateway.connect().unwrap();
    assert_eq!(gateway.backend(), Backend::Remote);
    gateway
}

fn ids(subjects: &lesson_planner::schedule::SubjectCollection) -> Vec<String> {
    subjects.iter().map(|s| s.id().to_string()).collect()
}

#[test]
fn retrying_a_partly_failed_batch_sends_only_the_rest() {
    let api = FakeApi::start(2);
    let dir = tempfile::tempdir().unwrap();
    let gateway = connected(&api, &dir);
    let mut subjects = lesson_planner::schedule::SubjectCollection::new();

    let batch = vec![
        Subject::with_id("a", "Art"),
        Subject::with_id("b", "Bible & Pray"),
        Subject::with_id("c", "Science"),
    ];

    let err = gateway.create_many(&mut subjects, batch.clone()).unwrap_err();
    assert!(matches!(err, StoreError::Api { status: 500, .. }));
    assert_eq!(ids(&subjects), vec!["a"]);
    assert_eq!(api.stored_ids(), vec!["a"]);

    let added = gateway.create_many(&mut subjects, batch).unwrap();
    assert_eq!(added, 2);
    assert_eq!(ids(&subjects), vec!["a", "b", "c"]);
    assert_eq!(api.stored_ids(), vec!["a", "b", "c"]);
    // "b" was rejected the first time; "a" is never sent twice.
    assert_eq!(api.posted(), vec!["a", "b", "b", "c"]);
}

#[test]
fn retried_import_matches_what_the_api_holds() {
    let api = FakeApi::start(1);
    let dir = tempfile::tempdir().unwrap();
    let gateway = connected(&api, &dir);
    let mut subjects = lesson_planner::schedule::SubjectCollection::new();

    let preview = import_csv("Time,Monday\n8:30 - 8:50 AM,Reading\n9:00 - 9:40 AM,Spelling\n").unwrap();

    assert!(gateway.create_many(&mut subjects, preview.subjects.clone()).is_err());
    assert!(subjects.is_empty());

    assert_eq!(gateway.create_many(&mut subjects, preview.subjects.clone()).unwrap(), 2);
    assert_eq!(gateway.create_many(&mut subjects, preview.subjects).unwrap(), 0);
    assert_eq!(ids(&subjects), api.stored_ids());
    assert_eq!(api.posted().len(), 3);
    // The API owns the data while connected; nothing is written locally.
    assert!(!dir.path().join("subjects.json").exists());
}
