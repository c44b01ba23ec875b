//! End-to-end scenario against a real listener.
//!
//! Starts the server on a random port and drives it with ureq, so routing,
//! CORS and JSON encoding are checked over actual HTTP rather than through
//! `oneshot`.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use todo_core::SystemClock;
use todo_server::{AppState, Config};

struct Reply {
    status: u16,
    allow_origin: Option<String>,
    body: Value,
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn send(method: &str, url: &str, body: Option<Value>) -> Reply {
    let agent = agent();
    let origin = "http://localhost:3000";

    let result = match (method, body) {
        ("GET", _) => agent.get(url).header("Origin", origin).call(),
        ("DELETE", _) => agent.delete(url).header("Origin", origin).call(),
        ("POST", Some(body)) => agent
            .post(url)
            .header("Origin", origin)
            .content_type("application/json")
            .send(body.to_string().as_bytes()),
        ("PUT", Some(body)) => agent
            .put(url)
            .header("Origin", origin)
            .content_type("application/json")
            .send(body.to_string().as_bytes()),
        (other, _) => panic!("unsupported method {other}"),
    };
    let mut response = result.expect("HTTP transport error");

    let status = response.status().as_u16();
    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.body_mut().read_to_string().unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);

    Reply {
        status,
        allow_origin,
        body,
    }
}

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let state = AppState::new(Arc::new(SystemClock));
            todo_server::run(listener, state, &Config::default()).await
        })
    });

    addr
}

#[test]
fn buy_milk_scenario() {
    let base = format!("http://{}", start_server());
    let todos = format!("{base}/api/todos");

    // create
    let reply = send("POST", &todos, Some(json!({"text": "buy milk"})));
    assert_eq!(reply.status, 201);
    assert_eq!(reply.body["id"], 1);
    assert_eq!(reply.body["text"], "buy milk");
    assert_eq!(reply.body["completed"], false);
    assert!(reply.body["createdAt"].is_string());
    assert_eq!(reply.allow_origin.as_deref(), Some("http://localhost:3000"));

    // complete
    let reply = send("PUT", &format!("{todos}/1"), Some(json!({"completed": true})));
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["completed"], true);
    assert!(reply.body["updatedAt"].is_string());
    let completed = reply.body;

    // stats
    let reply = send("GET", &format!("{todos}/stats"), None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, json!({"total": 1, "completed": 1, "remaining": 0}));

    // delete returns the record
    let reply = send("DELETE", &format!("{todos}/1"), None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, completed);

    // gone
    let reply = send("GET", &todos, None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, json!([]));

    // deleting again is a 404
    let reply = send("DELETE", &format!("{todos}/1"), None);
    assert_eq!(reply.status, 404);
    assert_eq!(reply.body, json!({"error": "Todo not found"}));

    // the id is never handed out again
    let reply = send("POST", &todos, Some(json!({"text": "buy bread"})));
    assert_eq!(reply.status, 201);
    assert_eq!(reply.body["id"], 2);

    // health and unknown routes
    let reply = send("GET", &format!("{base}/health"), None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["status"], "OK");

    let reply = send("GET", &format!("{base}/api/nothing-here"), None);
    assert_eq!(reply.status, 404);
    assert_eq!(reply.body, json!({"error": "Route not found"}));
}
