use serde_json::json;

use huddle_core::ErrorKind;

use crate::integration::{create_test_dispatcher, init_tracing};
use crate::utils::{QUIET_PERIOD_MS, TestClient, assert_error_kind, create_open_room, join_room};

#[tokio::test]
async fn test_relay_reaches_only_its_target() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut alice = TestClient::connect("alice", &dispatcher);
    let mut bob = TestClient::connect("bob", &dispatcher);
    let mut carol = TestClient::connect("carol", &dispatcher);

    create_open_room(&mut alice, "r1", "alice")
        .await
        .expect("Failed to create room");
    join_room(&mut alice, "r1", "alice", "pa", "").await.expect("alice failed to join");
    join_room(&mut carol, "r1", "carol", "pc", "").await.expect("carol failed to join");
    join_room(&mut bob, "r1", "bob", "pb", "").await.expect("bob failed to join");
    carol
        .expect_notification("participantJoined")
        .await
        .expect("carol missed bob's join");

    let payload = json!({ "sdp": "v=0\r\no=- 1 2 IN IP4 127.0.0.1", "candidates": [1, 2, 3] });
    let ack = alice
        .request(
            "relay",
            json!({ "roomId": "r1", "from": "pa", "to": "pb", "kind": "offer", "payload": payload }),
        )
        .await
        .expect("relay failed");
    assert_eq!(ack, json!({ "delivered": true }));

    let relayed = bob.expect_notification("relay").await.expect("bob missed the relay");
    assert_eq!(relayed["from"], json!("pa"));
    assert_eq!(relayed["kind"], json!("offer"));
    assert_eq!(relayed["payload"], payload);

    assert!(carol.no_notification_within(QUIET_PERIOD_MS).await);
}

#[tokio::test]
async fn test_relay_to_peer_in_other_room_not_found() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut alice = TestClient::connect("alice", &dispatcher);
    let mut bob = TestClient::connect("bob", &dispatcher);

    // Ids share a prefix, the shape that breaks substring addressing.
    create_open_room(&mut alice, "room-1", "alice")
        .await
        .expect("Failed to create room");
    create_open_room(&mut bob, "room-12", "bob")
        .await
        .expect("Failed to create room");
    join_room(&mut alice, "room-1", "alice", "room-1-alice", "")
        .await
        .expect("alice failed to join");
    join_room(&mut bob, "room-12", "bob", "room-12-bob", "")
        .await
        .expect("bob failed to join");

    let error = alice
        .request_error(
            "signal",
            json!({ "roomId": "room-1", "from": "room-1-alice", "to": "room-12-bob", "type": "offer", "payload": "v=0" }),
        )
        .await
        .expect("No reply to signal");
    assert_error_kind(&error, ErrorKind::NotFound);
    assert!(bob.no_notification_within(QUIET_PERIOD_MS).await);

    // Naming bob's room is no way around it: alice is not a member there.
    let error = alice
        .request_error(
            "relay",
            json!({ "roomId": "room-12", "from": "room-1-alice", "to": "room-12-bob", "payload": {} }),
        )
        .await
        .expect("No reply to relay");
    assert_error_kind(&error, ErrorKind::Unauthorized);
    assert!(bob.no_notification_within(QUIET_PERIOD_MS).await);
}

#[tokio::test]
async fn test_relay_with_forged_sender_rejected() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut alice = TestClient::connect("alice", &dispatcher);
    let mut bob = TestClient::connect("bob", &dispatcher);

    create_open_room(&mut alice, "r1", "alice")
        .await
        .expect("Failed to create room");
    join_room(&mut alice, "r1", "alice", "pa", "").await.expect("alice failed to join");
    join_room(&mut bob, "r1", "bob", "pb", "").await.expect("bob failed to join");

    let error = bob
        .request_error(
            "relay",
            json!({ "roomId": "r1", "from": "pa", "to": "pa", "payload": "spoof" }),
        )
        .await
        .expect("No reply to relay");
    assert_error_kind(&error, ErrorKind::Unauthorized);
}
