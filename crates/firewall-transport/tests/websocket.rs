//! Integration tests for the WebSocket client transport.
//!
//! Each test runs a throwaway `tokio-tungstenite` server on an OS-assigned
//! port and drives the client side through the [`Connection`] trait.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use firewall_transport::{Connection, TransportError, WebSocketConnection};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on a random port and returns it with its `ws://` URL.
    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}"))
    }

    async fn accept(listener: TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    }

    #[tokio::test]
    async fn test_websocket_send_and_receive_text() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnection::connect(&url)
            .await
            .expect("client should connect");
        let mut server_ws = server.await.expect("task should complete");

        assert!(conn.id().into_inner() > 0);

        // --- Client sends, server receives ---
        conn.send(r#"{"type":"link"}"#)
            .await
            .expect("send should succeed");
        let msg = server_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"link"}"#);

        // --- Server sends, client receives ---
        server_ws
            .send(Message::Text(r#"{"type":"info"}"#.to_string().into()))
            .await
            .unwrap();
        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, r#"{"type":"info"}"#);

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_binary_frames_are_read_as_text() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        let mut server_ws = server.await.unwrap();

        server_ws
            .send(Message::Binary(b"{\"type\":\"gameStart\"}".to_vec().into()))
            .await
            .unwrap();
        let received = conn.recv().await.unwrap().unwrap();
        assert_eq!(received, "{\"type\":\"gameStart\"}");
    }

    #[tokio::test]
    async fn test_websocket_skips_binary_frames_that_are_not_utf8() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        let mut server_ws = server.await.unwrap();

        server_ws
            .send(Message::Binary(vec![0xff, 0xfe, 0xfd].into()))
            .await
            .unwrap();
        server_ws
            .send(Message::Text(r#"{"type":"info"}"#.to_string().into()))
            .await
            .unwrap();

        let received = conn.recv().await.expect("bad frame should be skipped");
        assert_eq!(received.as_deref(), Some(r#"{"type":"info"}"#));
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_server_close() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        let mut server_ws = server.await.unwrap();

        server_ws.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on server close");
    }

    #[tokio::test]
    async fn test_websocket_connect_to_closed_port_fails() {
        // Bind then drop so the port is (almost certainly) closed.
        let (listener, url) = listen().await;
        drop(listener);

        let result = WebSocketConnection::connect(&url).await;
        assert!(matches!(
            result,
            Err(TransportError::ConnectFailed { .. })
        ));
    }
}
