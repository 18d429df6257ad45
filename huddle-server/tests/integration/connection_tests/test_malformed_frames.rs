use serde_json::json;

use huddle_core::ErrorKind;

use crate::integration::{create_test_dispatcher, init_tracing};
use crate::utils::{QUIET_PERIOD_MS, TestClient, assert_error_kind, create_open_room};

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut client = TestClient::connect("client", &dispatcher);

    client.send_raw("{not json").expect("Failed to send frame");
    let response = client
        .wait_for_response(|_| true)
        .await
        .expect("No reply to malformed frame");
    assert_eq!(response["id"], json!(null));
    assert_error_kind(&response["error"], ErrorKind::InvalidParams);

    client
        .send_raw(json!({ "jsonrpc": "1.0", "id": 7, "method": "listRooms" }).to_string())
        .expect("Failed to send frame");
    let response = client
        .wait_for_response(|_| true)
        .await
        .expect("No reply to wrong protocol version");
    assert_eq!(response["id"], json!(7));
    assert_error_kind(&response["error"], ErrorKind::InvalidParams);

    // Still serving requests afterwards.
    create_open_room(&mut client, "r1", "client")
        .await
        .expect("Connection should survive malformed frames");
}

#[tokio::test]
async fn test_unknown_method_and_bad_params() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut client = TestClient::connect("client", &dispatcher);

    let error = client
        .request_error("teleport", json!({}))
        .await
        .expect("No reply to unknown method");
    assert_error_kind(&error, ErrorKind::MethodNotFound);

    let error = client
        .request_error("createRoom", json!({ "roomId": "", "nickname": "a" }))
        .await
        .expect("No reply to createRoom");
    assert_error_kind(&error, ErrorKind::InvalidParams);

    let error = client
        .request_error(
            "toggleMedia",
            json!({ "roomId": "r1", "peerId": "p", "kind": "screen", "enabled": true }),
        )
        .await
        .expect("No reply to toggleMedia");
    assert_error_kind(&error, ErrorKind::InvalidParams);
}

#[tokio::test]
async fn test_request_without_id_gets_no_reply() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut client = TestClient::connect("client", &dispatcher);

    client
        .send_raw(json!({ "jsonrpc": "2.0", "method": "createRoom", "params": { "roomId": "quiet", "nickname": "c" } }).to_string())
        .expect("Failed to send frame");

    let rooms = client
        .request("listRooms", json!(null))
        .await
        .expect("listRooms failed");
    assert_eq!(rooms[0]["id"], json!("quiet"));
    assert!(client.no_notification_within(QUIET_PERIOD_MS).await);
}
