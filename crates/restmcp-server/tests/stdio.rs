use std::time::Duration;

use restmcp_http::{CancellationToken, EngineConfig, HttpEngine};
use restmcp_tool::HttpRequestTool;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Client {
    input: DuplexStream,
    output: Lines<BufReader<DuplexStream>>,
    server: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl Client {
    async fn send(&mut self, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        self.input.write_all(line.as_bytes()).await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.output.next_line())
            .await
            .expect("timed out waiting for response")
            .unwrap()
            .expect("server closed output");
        serde_json::from_str(&line).unwrap()
    }

    async fn call(&mut self, id: Value, arguments: Value) {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": "http_request", "arguments": arguments}
        }))
        .await;
    }

    async fn close(self) {
        drop(self.input);
        tokio::time::timeout(Duration::from_secs(5), self.server)
            .await
            .expect("server did not stop on EOF")
            .unwrap();
    }
}

/// Start a server and complete the initialize handshake.
async fn start(mock: &MockServer) -> (Client, Value) {
    let engine = HttpEngine::with_config(EngineConfig {
        base_url: Some(mock.uri()),
        timeout: Duration::from_secs(10),
        ..Default::default()
    })
    .expect("Failed to create engine");
    let tool = HttpRequestTool::new(engine);

    let (client_in, server_in) = tokio::io::duplex(4096);
    let (server_out, client_out) = tokio::io::duplex(4096);
    let shutdown = CancellationToken::new();

    let token = shutdown.clone();
    let handle = tokio::spawn(async move {
        restmcp_server::serve(tool, server_in, server_out, token).await.unwrap();
    });

    let mut client = Client {
        input: client_in,
        output: BufReader::new(client_out).lines(),
        server: handle,
        shutdown,
    };

    client
        .send(json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "stdio-test", "version": "0.0.0"}
            }
        }))
        .await;
    let initialized = client.recv().await;
    client
        .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;

    (client, initialized)
}

#[tokio::test]
async fn test_initialize_reports_server() {
    let mock = MockServer::start().await;
    let (client, initialized) = start(&mock).await;

    assert_eq!(initialized["id"], 0);
    assert_eq!(initialized["result"]["serverInfo"]["name"], "rest-api-mcp");
    assert!(initialized["result"]["capabilities"]["tools"].is_object());

    client.close().await;
}

#[tokio::test]
async fn test_http_request_over_stdio() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock)
        .await;

    let (mut client, _) = start(&mock).await;

    client
        .send(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
        .await;
    let listed = client.recv().await;
    let tool = &listed["result"]["tools"][0];
    assert_eq!(tool["name"], "http_request");
    assert!(tool["description"].as_str().unwrap().contains("Base URL: "));
    assert!(tool["inputSchema"]["properties"]["followRedirects"].is_object());

    client.call(json!(2), json!({"method": "GET", "url": "/health"})).await;
    let called = client.recv().await;
    assert_eq!(called["id"], 2);
    assert_eq!(called["result"]["isError"], false);
    assert_eq!(called["result"]["content"][0]["text"], "200 OK\n\nok");

    client.close().await;
}

#[tokio::test]
async fn test_validation_error_is_tool_result() {
    let mock = MockServer::start().await;
    let (mut client, _) = start(&mock).await;

    client.call(json!("a"), json!({"method": "BREW", "url": "/pot"})).await;
    let response = client.recv().await;
    assert_eq!(response["id"], "a");
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(response["result"]["content"][0]["text"], "unsupported method: BREW");

    client.close().await;
}

#[tokio::test]
async fn test_malformed_arguments_are_protocol_errors() {
    let mock = MockServer::start().await;
    let (mut client, _) = start(&mock).await;

    client.call(json!(1), json!({"method": 5, "url": "/x"})).await;
    let response = client.recv().await;
    assert_eq!(response["id"], 1);
    assert!(response["error"].is_object(), "{response}");

    client
        .send(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "curl", "arguments": {}}
        }))
        .await;
    let response = client.recv().await;
    assert_eq!(response["id"], 2);
    assert!(response["error"].is_object(), "{response}");

    client.close().await;
}

#[tokio::test]
async fn test_cancelled_call_aborts_request() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&mock)
        .await;

    let (mut client, _) = start(&mock).await;

    client.call(json!(1), json!({"method": "GET", "url": "/slow"})).await;
    client
        .send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": {"requestId": 1, "reason": "user"}
        }))
        .await;
    client
        .send(json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}))
        .await;

    // The server keeps answering; whatever it sends for the cancelled call
    // arrives well before the upstream delay and is an error result.
    loop {
        let response = client.recv().await;
        if response["id"] == 2 {
            assert!(response["result"].is_object(), "{response}");
            break;
        }
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["isError"], true);
    }

    client.close().await;
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let mock = MockServer::start().await;
    let (client, _) = start(&mock).await;

    client.shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), client.server)
        .await
        .expect("server did not stop on shutdown")
        .unwrap();
}
