// WebSocket end to end: identity handshake, lobby flow and bad input.
//
// Run with:
//   cargo test --test websocket_test

mod support;

use std::time::Duration;

use backend_test_support::unique_helpers::{unique_str, unique_user_id};
use serde_json::json;
use shed_backend::build_state;
use support::websocket::{start_test_server, wait_for_connections};
use support::websocket_client::WebSocketClient;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn session_event_echoes_identity() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state().with_rng_seed(7).build().await?;
    let registry = state.registry();
    let (server_handle, addr, _join) = start_test_server(state).await?;
    let alice = unique_user_id("alice");

    let session_id = unique_str("tab");
    let url = format!("ws://{addr}/ws?user_id={alice}&session_id={session_id}");
    let mut client = WebSocketClient::connect_retry(&url, TIMEOUT).await?;

    let session = client.recv_type("session", TIMEOUT).await?;
    assert_eq!(session["user_id"], alice.as_str());
    assert_eq!(session["session_id"], session_id.as_str());

    let connections = client.recv_type("connections", TIMEOUT).await?;
    assert_eq!(connections["connections"][0]["user_id"], alice.as_str());

    let state = client.recv_type("game_state", TIMEOUT).await?;
    assert_eq!(state["state"]["status"], "waiting");
    wait_for_connections(&registry, 1, TIMEOUT).await?;

    client.close().await?;
    wait_for_connections(&registry, 0, TIMEOUT).await?;
    server_handle.stop(true).await;
    Ok(())
}

#[tokio::test]
async fn missing_identity_is_generated() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state().build().await?;
    let (server_handle, addr, _join) = start_test_server(state).await?;

    let mut client =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?user_id=%20"), TIMEOUT).await?;
    let session = client.recv_type("session", TIMEOUT).await?;
    let user_id = session["user_id"].as_str().unwrap_or_default();
    let session_id = session["session_id"].as_str().unwrap_or_default();
    assert!(uuid::Uuid::parse_str(user_id).is_ok());
    assert!(uuid::Uuid::parse_str(session_id).is_ok());

    client.close().await?;
    server_handle.stop(true).await;
    Ok(())
}

#[tokio::test]
async fn two_clients_start_a_round() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state().with_rng_seed(11).build().await?;
    let registry = state.registry();
    let (server_handle, addr, _join) = start_test_server(state).await?;
    let alice = unique_user_id("alice");
    let bob = unique_user_id("bob");

    let mut alice =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?user_id={alice}"), TIMEOUT).await?;
    alice.recv_type("session", TIMEOUT).await?;
    let mut bob =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?user_id={bob}"), TIMEOUT).await?;
    bob.recv_type("session", TIMEOUT).await?;
    wait_for_connections(&registry, 2, TIMEOUT).await?;

    alice.send_json(&json!({ "type": "join" })).await?;
    alice
        .recv_state_where(TIMEOUT, |s| s["players"].as_array().map(Vec::len) == Some(1))
        .await?;
    bob.send_json(&json!({ "type": "join" })).await?;
    bob.recv_state_where(TIMEOUT, |s| s["players"].as_array().map(Vec::len) == Some(2))
        .await?;

    alice.send_json(&json!({ "type": "toggle_ready" })).await?;
    alice
        .recv_state_where(TIMEOUT, |s| s["players"][0]["ready"] == true)
        .await?;
    bob.send_json(&json!({ "type": "toggle_ready" })).await?;

    let playing = bob
        .recv_state_where(TIMEOUT, |s| s["status"] == "playing")
        .await?;
    let state = &playing["state"];
    assert_eq!(state["current_position"], 0);
    assert_eq!(state["direction"], 1);
    assert!(state["active_card"].is_object());
    assert_eq!(state["players"][0]["hand_size"], 7);
    assert!(state["players"][0]["deadline"].is_i64());
    assert!(state["players"][1]["deadline"].is_null());

    // bob does not hold the turn
    bob.send_json(&json!({ "type": "draw_card" })).await?;
    let err = bob.recv_type("error", TIMEOUT).await?;
    assert_eq!(err["code"], "OUT_OF_TURN");

    alice.close().await?;
    bob.close().await?;
    server_handle.stop(true).await;
    Ok(())
}

#[tokio::test]
async fn malformed_messages_keep_the_socket_open() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state().build().await?;
    let (server_handle, addr, _join) = start_test_server(state).await?;
    let carol = unique_user_id("carol");

    let mut client =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?user_id={carol}"), TIMEOUT).await?;
    client.recv_type("game_state", TIMEOUT).await?;

    client.send("not json").await?;
    let err = client.recv_type("error", TIMEOUT).await?;
    assert_eq!(err["code"], "BAD_REQUEST");

    client
        .send_json(&json!({ "type": "play_card", "card_id": "nope" }))
        .await?;
    let err = client.recv_type("error", TIMEOUT).await?;
    assert_eq!(err["code"], "BAD_REQUEST");

    client.send_json(&json!({ "type": "join" })).await?;
    let joined = client
        .recv_state_where(TIMEOUT, |s| s["players"].as_array().map(Vec::len) == Some(1))
        .await?;
    assert_eq!(joined["state"]["players"][0]["user_id"], carol.as_str());

    client.close().await?;
    server_handle.stop(true).await;
    Ok(())
}

#[tokio::test]
async fn leaving_the_lobby_drops_the_seat() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state().build().await?;
    let registry = state.registry();
    let (server_handle, addr, _join) = start_test_server(state).await?;
    let alice = unique_user_id("alice");
    let bob = unique_user_id("bob");

    let mut alice =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?user_id={alice}"), TIMEOUT).await?;
    alice.recv_type("session", TIMEOUT).await?;
    let mut bob =
        WebSocketClient::connect_retry(&format!("ws://{addr}/ws?user_id={bob}"), TIMEOUT).await?;
    bob.recv_type("session", TIMEOUT).await?;
    wait_for_connections(&registry, 2, TIMEOUT).await?;

    bob.send_json(&json!({ "type": "join" })).await?;
    alice
        .recv_state_where(TIMEOUT, |s| s["players"].as_array().map(Vec::len) == Some(1))
        .await?;

    bob.close().await?;
    wait_for_connections(&registry, 1, TIMEOUT).await?;
    alice
        .recv_state_where(TIMEOUT, |s| s["players"].as_array().map(Vec::len) == Some(0))
        .await?;

    alice.close().await?;
    server_handle.stop(true).await;
    Ok(())
}
