use serde_json::json;

use huddle_core::ErrorKind;

use crate::integration::{create_test_dispatcher, init_tracing};
use crate::utils::{TestClient, create_open_room, error_kind};

const CONTENDERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_with_same_nickname() {
    init_tracing();

    let dispatcher = create_test_dispatcher();
    let mut host = TestClient::connect("host", &dispatcher);
    create_open_room(&mut host, "race", "host")
        .await
        .expect("Failed to create room");

    let mut tasks = Vec::new();
    for i in 0..CONTENDERS {
        let mut client = TestClient::connect(&format!("contender-{i}"), &dispatcher);
        tasks.push(tokio::spawn(async move {
            let response = client
                .call(
                    "joinRoom",
                    json!({ "roomId": "race", "nickname": "dup", "peerId": format!("peer-{i}") }),
                )
                .await
                .expect("No reply to joinRoom");
            (client, response)
        }));
    }

    let mut winners = 0;
    let mut clients = Vec::new();
    for task in tasks {
        let (client, response) = task.await.expect("Join task panicked");
        if response.get("result").is_some() {
            winners += 1;
        } else {
            assert_eq!(
                error_kind(&response["error"]),
                Some(ErrorKind::NicknameTaken),
                "unexpected failure {response}"
            );
        }
        clients.push(client);
    }
    assert_eq!(winners, 1, "exactly one join with the shared nickname must win");

    let info = host
        .request("roomInfo", json!({ "roomId": "race" }))
        .await
        .expect("roomInfo failed");
    let nicknames: Vec<_> = info["participants"]
        .as_array()
        .expect("participants array")
        .iter()
        .map(|p| p["nickname"].clone())
        .collect();
    assert_eq!(nicknames, vec![json!("dup")]);

    for client in clients {
        client.disconnect().await.expect("Failed to disconnect");
    }
}
