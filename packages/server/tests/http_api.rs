//! HTTP API integration tests.
//!
//! Drives the room command surface over HTTP against an in-process server.

mod fixtures;

use std::time::Duration;

use fixtures::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_state_of_new_room_is_default() {
    // テスト項目: 未初期化のルームの state は初期値で返る
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(server.room_url("fresh", "/state"))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"movieId": null, "isPlaying": false, "serverTime": 0.0, "ownerId": null})
    );
}

#[tokio::test]
async fn test_playback_scenario_over_http() {
    // テスト項目: init → play → 待機 → pause → seek の一連の流れ
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let init = client
        .post(server.room_url("r1", "/init"))
        .json(&json!({"movieId": "m1", "ownerId": "u1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(init.status(), 200);
    assert_eq!(init.json::<serde_json::Value>().await.unwrap(), json!({"ok": true}));

    // when (操作): owner が再生し、少し待つ
    let play = client
        .post(server.room_url("r1", "/play"))
        .header("x-user-id", "u1")
        .json(&json!({"position": 0}))
        .send()
        .await
        .unwrap();
    assert_eq!(play.status(), 200);
    tokio::time::sleep(Duration::from_millis(300)).await;

    let state: serde_json::Value = client
        .get(server.room_url("r1", "/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(state["movieId"], "m1");
    assert_eq!(state["ownerId"], "u1");
    assert_eq!(state["isPlaying"], true);
    let playing_time = state["serverTime"].as_f64().unwrap();
    assert!(playing_time >= 0.25, "serverTime was {}", playing_time);

    // when (操作): pause
    let pause = client
        .post(server.room_url("r1", "/pause"))
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap();
    assert_eq!(pause.status(), 200);
    let paused1: serde_json::Value = client
        .get(server.room_url("r1", "/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let paused2: serde_json::Value = client
        .get(server.room_url("r1", "/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果): 停止位置は安定している
    assert_eq!(paused1["isPlaying"], false);
    assert_eq!(paused1["serverTime"], paused2["serverTime"]);
    assert!(paused1["serverTime"].as_f64().unwrap() >= playing_time);

    // when (操作): seek
    let seek = client
        .post(server.room_url("r1", "/seek"))
        .header("x-user-id", "u1")
        .json(&json!({"position": 50}))
        .send()
        .await
        .unwrap();
    assert_eq!(seek.status(), 200);

    // then (期待する結果):
    let state: serde_json::Value = client
        .get(server.room_url("r1", "/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["serverTime"].as_f64(), Some(50.0));
}

#[tokio::test]
async fn test_control_by_non_owner_is_forbidden() {
    // テスト項目: owner 以外の再生操作は 403 で拒否され、状態は変わらない
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    client
        .post(server.room_url("r2", "/init"))
        .json(&json!({"movieId": "m1", "ownerId": "u1"}))
        .send()
        .await
        .unwrap();

    // when (操作):
    let response = client
        .post(server.room_url("r2", "/play"))
        .header("x-user-id", "intruder")
        .json(&json!({"position": 10}))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NotOwner");
    let state: serde_json::Value = client
        .get(server.room_url("r2", "/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["isPlaying"], false);
}

#[tokio::test]
async fn test_play_without_position_is_bad_request() {
    // テスト項目: position のない play は 400 InvalidPosition になる
    // given (前提条件):
    let server = TestServer::start_open().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(server.room_url("r3", "/play"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "InvalidPosition");
}

#[tokio::test]
async fn test_chat_post_and_list() {
    // テスト項目: チャット投稿と取得、空メッセージの拒否
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let posted = client
        .post(server.room_url("r4", "/chat"))
        .json(&json!({"user": "alice", "text": "  hello  "}))
        .send()
        .await
        .unwrap();
    let anonymous = client
        .post(server.room_url("r4", "/chat"))
        .json(&json!({"text": "hi"}))
        .send()
        .await
        .unwrap();
    let empty = client
        .post(server.room_url("r4", "/chat"))
        .json(&json!({"user": "alice", "text": "   "}))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(posted.status(), 200);
    let posted: serde_json::Value = posted.json().await.unwrap();
    assert_eq!(posted["ok"], true);
    assert_eq!(posted["message"]["type"], "CHAT");
    assert_eq!(posted["message"]["text"], "hello");
    assert_eq!(anonymous.status(), 200);

    assert_eq!(empty.status(), 400);
    let empty: serde_json::Value = empty.json().await.unwrap();
    assert_eq!(empty["code"], "EmptyMessage");

    let list: serde_json::Value = client
        .get(server.room_url("r4", "/chat"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let messages = list["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["user"], "alice");
    assert_eq!(messages[1]["user"], "Anonymous");
}

#[tokio::test]
async fn test_chat_text_is_truncated() {
    // テスト項目: 500 文字を超えるチャットは切り詰められる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let long = "x".repeat(800);

    // when (操作):
    let posted: serde_json::Value = client
        .post(server.room_url("r5", "/chat"))
        .json(&json!({"user": "bob", "text": long}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(posted["message"]["text"].as_str().unwrap().len(), 500);
}

#[tokio::test]
async fn test_delete_room_resets_state() {
    // テスト項目: DELETE 後の state / chat は初期値に戻る
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    client
        .post(server.room_url("r6", "/init"))
        .json(&json!({"movieId": "m1", "ownerId": "u1"}))
        .send()
        .await
        .unwrap();
    client
        .post(server.room_url("r6", "/chat"))
        .json(&json!({"text": "bye"}))
        .send()
        .await
        .unwrap();

    // when (操作):
    let forbidden = client
        .delete(server.room_url("r6", ""))
        .header("x-user-id", "u2")
        .send()
        .await
        .unwrap();
    let deleted = client
        .delete(server.room_url("r6", ""))
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(forbidden.status(), 403);
    assert_eq!(deleted.status(), 200);
    let state: serde_json::Value = client
        .get(server.room_url("r6", "/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["movieId"], serde_json::Value::Null);
    assert_eq!(state["ownerId"], serde_json::Value::Null);
    let chat: serde_json::Value = client
        .get(server.room_url("r6", "/chat"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(chat["messages"], json!([]));
}

#[tokio::test]
async fn test_invalid_room_id_is_rejected() {
    // テスト項目: 不正な文字を含むルーム ID は 400 InvalidRoomId になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(server.room_url("bad.room", "/state"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "InvalidRoomId");
}
