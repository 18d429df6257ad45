use serde_json::json;

use huddle_core::ErrorKind;

use crate::integration::{create_test_dispatcher, init_tracing};
use crate::utils::{QUIET_PERIOD_MS, TestClient, assert_error_kind, create_open_room, join_room};

#[tokio::test]
async fn test_settings_change_ordered_with_chat() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut alice = TestClient::connect("alice", &dispatcher);
    let mut bob = TestClient::connect("bob", &dispatcher);
    let mut carol = TestClient::connect("carol", &dispatcher);

    create_open_room(&mut alice, "r1", "alice")
        .await
        .expect("Failed to create room");
    join_room(&mut alice, "r1", "alice", "pa", "").await.expect("alice failed to join");
    join_room(&mut bob, "r1", "bob", "pb", "").await.expect("bob failed to join");
    join_room(&mut carol, "r1", "carol", "pc", "").await.expect("carol failed to join");

    bob.request("sendMessage", json!({ "roomId": "r1", "text": "before" }))
        .await
        .expect("chat failed");
    alice
        .request("updateSettings", json!({ "roomId": "r1", "allowVideo": true, "allowAudio": false }))
        .await
        .expect("settings update failed");
    bob.request("sendMessage", json!({ "roomId": "r1", "message": "after" }))
        .await
        .expect("chat failed");

    // carol joined last, so she saw no joins; everything she gets is ordered room traffic.
    let first = carol.next_notification(1000).await.expect("missing frame");
    let second = carol.next_notification(1000).await.expect("missing frame");
    let third = carol.next_notification(1000).await.expect("missing frame");

    assert_eq!(first["method"], json!("chatMessage"));
    assert_eq!(first["params"]["text"], json!("before"));
    assert_eq!(second["method"], json!("settingsChanged"));
    assert_eq!(second["params"]["allowVideo"], json!(true));
    assert_eq!(second["params"]["allowAudio"], json!(false));
    assert_eq!(third["method"], json!("chatMessage"));
    assert_eq!(third["params"]["text"], json!("after"));
}

#[tokio::test]
async fn test_non_creator_cannot_update_settings() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut alice = TestClient::connect("alice", &dispatcher);
    let mut bob = TestClient::connect("bob", &dispatcher);

    create_open_room(&mut alice, "r1", "alice")
        .await
        .expect("Failed to create room");
    join_room(&mut alice, "r1", "alice", "pa", "").await.expect("alice failed to join");
    join_room(&mut bob, "r1", "bob", "pb", "").await.expect("bob failed to join");
    alice
        .expect_notification("participantJoined")
        .await
        .expect("alice missed bob's join");

    let error = bob
        .request_error("updateSettings", json!({ "roomId": "r1", "allowVideo": true, "allowAudio": true }))
        .await
        .expect("No reply to updateSettings");
    assert_error_kind(&error, ErrorKind::Unauthorized);

    let info = bob
        .request("roomInfo", json!({ "roomId": "r1" }))
        .await
        .expect("roomInfo failed");
    assert_eq!(info["settings"]["allowVideo"], json!(false));
    assert_eq!(info["settings"]["allowAudio"], json!(false));
    assert!(alice.no_notification_within(QUIET_PERIOD_MS).await);
}

#[tokio::test]
async fn test_outsider_cannot_update_settings() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut alice = TestClient::connect("alice", &dispatcher);
    create_open_room(&mut alice, "r1", "alice")
        .await
        .expect("Failed to create room");

    // Never joined, so holds no identity in the room even with the creator's nickname.
    let mut mallory = TestClient::connect("mallory", &dispatcher);
    let error = mallory
        .request_error("updateSettings", json!({ "roomId": "r1", "allowVideo": true, "allowAudio": true }))
        .await
        .expect("No reply to updateSettings");
    assert_error_kind(&error, ErrorKind::Unauthorized);
}
