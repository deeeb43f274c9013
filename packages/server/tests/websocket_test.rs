//! End-to-end tests of the chat protocol over a real WebSocket.
//!
//! The server runs in-process on an ephemeral port. Every test connection
//! performs a `join_chat` round trip before relying on broadcasts, so the
//! server has registered it by then.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use yoriai_server::{
    infrastructure::{
        dto::{
            http::ParticipantsDto,
            websocket::{ClientEvent, ServerEvent},
        },
        message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionRepository,
    },
    ui::Server,
    usecase::{
        DisconnectParticipantUseCase, GetParticipantsUseCase, JoinChatUseCase,
        OpenConnectionUseCase, SendMessageUseCase,
    },
};
use yoriai_shared::time::{Clock, SystemClock};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE: Duration = Duration::from_millis(200);

async fn start_server() -> SocketAddr {
    let repository = Arc::new(InMemorySessionRepository::default());
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let server = Server::new(
        Arc::new(OpenConnectionUseCase::new(message_pusher.clone())),
        Arc::new(JoinChatUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        Arc::new(SendMessageUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        Arc::new(DisconnectParticipantUseCase::new(
            repository.clone(),
            message_pusher,
            clock,
        )),
        Arc::new(GetParticipantsUseCase::new(repository)),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener));
    addr
}

/// Helper to speak the protocol from the test
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = connect_async(format!("ws://{}/ws", addr))
            .await
            .expect("Failed to connect");
        Self { stream }
    }

    async fn send(&mut self, event: ClientEvent) {
        let json = serde_json::to_string(&event).unwrap();
        self.stream.send(Message::Text(json.into())).await.unwrap();
    }

    async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> ServerEvent {
        timeout(RECV_TIMEOUT, async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return serde_json::from_str::<ServerEvent>(&text).unwrap();
                    }
                    Some(Ok(_)) => continue,
                    other => panic!("connection ended unexpectedly: {other:?}"),
                }
            }
        })
        .await
        .expect("Timed out waiting for a server event")
    }

    async fn expect_silence(&mut self) {
        let result = timeout(SILENCE, self.stream.next()).await;
        assert!(result.is_err(), "expected no frame, got {result:?}");
    }

    async fn join(&mut self, name: &str) -> ServerEvent {
        self.send(ClientEvent::join_chat(name)).await;
        self.recv().await
    }

    async fn close(mut self) {
        self.stream.close(None).await.ok();
    }
}

fn message_of(event: &ServerEvent) -> &str {
    match event {
        ServerEvent::JoinError(p) => &p.message,
        ServerEvent::NewMessage(p) => &p.message,
        ServerEvent::DisconnectNotice(p) => &p.message,
        ServerEvent::JoinSuccess(p) => &p.username,
    }
}

#[tokio::test]
async fn test_chat_scenario() {
    // テスト項目: 参加・名前の重複・送信・切断・名前の再利用の一連の流れ
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;

    // when (操作) / then (期待する結果):
    // Alice joins
    let reply = alice.join("Alice").await;
    assert!(matches!(reply, ServerEvent::JoinSuccess(_)), "{reply:?}");

    // Bob tries to take the same name
    let reply = bob.join("Alice").await;
    assert!(matches!(reply, ServerEvent::JoinError(_)), "{reply:?}");
    assert!(message_of(&reply).contains("already taken"));

    // Alice speaks; Bob hears it, Alice gets no echo
    alice.send(ClientEvent::send_message("hi")).await;
    let event = bob.recv().await;
    assert!(matches!(event, ServerEvent::NewMessage(_)), "{event:?}");
    assert_eq!(message_of(&event), "hi");
    alice.expect_silence().await;

    // Alice leaves; Bob is told
    alice.close().await;
    let event = bob.recv().await;
    assert!(matches!(event, ServerEvent::DisconnectNotice(_)), "{event:?}");
    assert_eq!(message_of(&event), "Alice left the chat");

    // The name is free again
    let reply = bob.join("Alice").await;
    assert!(matches!(reply, ServerEvent::JoinSuccess(_)), "{reply:?}");
}

#[tokio::test]
async fn test_join_rejects_blank_name() {
    // テスト項目: 空白のみの名前での参加は join_error になる
    // given (前提条件):
    let addr = start_server().await;
    let mut client = TestClient::connect(addr).await;

    // when (操作):
    let reply = client.join("   ").await;

    // then (期待する結果):
    assert!(matches!(reply, ServerEvent::JoinError(_)), "{reply:?}");
    assert_eq!(message_of(&reply), "Display name must not be empty");
}

#[tokio::test]
async fn test_second_join_on_same_connection_is_rejected() {
    // テスト項目: 参加済みの接続からの 2 回目の参加は拒否される
    // given (前提条件):
    let addr = start_server().await;
    let mut client = TestClient::connect(addr).await;
    client.join("Alice").await;

    // when (操作):
    let reply = client.join("Bob").await;

    // then (期待する結果):
    assert!(matches!(reply, ServerEvent::JoinError(_)), "{reply:?}");
    assert!(message_of(&reply).contains("already joined as 'Alice'"));
}

#[tokio::test]
async fn test_join_is_silent_to_the_room() {
    // テスト項目: 参加は他の参加者に通知されない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;
    alice.join("Alice").await;

    // when (操作):
    bob.join("Bob").await;

    // then (期待する結果):
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_messages_before_join_are_dropped() {
    // テスト項目: 参加前のメッセージ・空のメッセージ・不正なフレームは誰にも届かない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut carol = TestClient::connect(addr).await;
    alice.join("Alice").await;

    // when (操作):
    carol.send(ClientEvent::send_message("sneaky")).await;
    carol.send_raw("not json").await;
    carol.join("Carol").await;
    carol.send(ClientEvent::send_message("   ")).await;

    // then (期待する結果):
    alice.expect_silence().await;
    carol.expect_silence().await;
}

#[tokio::test]
async fn test_per_sender_order_is_preserved() {
    // テスト項目: 同じ送信者のメッセージは全ての受信者に送信順に届く
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;
    let mut carol = TestClient::connect(addr).await;
    alice.join("Alice").await;
    bob.join("Bob").await;
    carol.join("Carol").await;

    // when (操作):
    for i in 0..30 {
        alice.send(ClientEvent::send_message(format!("m{i}"))).await;
    }

    // then (期待する結果):
    for receiver in [&mut bob, &mut carol] {
        for i in 0..30 {
            let event = receiver.recv().await;
            assert_eq!(message_of(&event), format!("m{i}"));
        }
    }
}

#[tokio::test]
async fn test_disconnect_without_join_is_silent() {
    // テスト項目: 参加していない接続の切断は通知されない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut lurker = TestClient::connect(addr).await;
    alice.join("Alice").await;
    lurker.join("").await;

    // when (操作):
    lurker.close().await;

    // then (期待する結果):
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_http_endpoints() {
    // テスト項目: ヘルスチェックと参加者一覧の HTTP エンドポイント
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    alice.join(" Alice ").await;

    // when (操作):
    let health: serde_json::Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let participants: ParticipantsDto = reqwest::get(format!("http://{}/api/participants", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health, serde_json::json!({"status": "ok"}));
    assert_eq!(participants.count, 1);
    assert_eq!(participants.participants[0].username, "Alice");
}
