//! Mock telemetry push server for integration tests.
//!
//! Every connected client receives each message passed to
//! [`MockPushServer::push`].

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[derive(Default)]
struct Stats {
    connections: AtomicU32,
    active: AtomicU32,
}

pub struct MockPushServer {
    addr: SocketAddr,
    outbound: broadcast::Sender<Message>,
    stats: Arc<Stats>,
    shutdown_tx: mpsc::Sender<()>,
}

impl MockPushServer {
    /// Start a server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (outbound, _) = broadcast::channel::<Message>(64);
        let stats = Arc::new(Stats::default());
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let outbound_clone = outbound.clone();
        let stats_clone = stats.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let rx = outbound_clone.subscribe();
                        tokio::spawn(handle_connection(stream, rx, stats_clone.clone()));
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        Self {
            addr,
            outbound,
            stats,
            shutdown_tx,
        }
    }

    /// Push channel URL.
    pub fn url(&self) -> String {
        format!("ws://{}/ws/telemetry", self.addr)
    }

    pub fn push(&self, message: Message) {
        let _ = self.outbound.send(message);
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Message::Text(text.into()));
    }

    /// Send a Close frame to every client.
    pub fn close_all(&self) {
        self.push(Message::Close(None));
    }

    /// Connections accepted so far.
    pub fn connection_count(&self) -> u32 {
        self.stats.connections.load(Ordering::SeqCst)
    }

    /// Connections currently open.
    pub fn active_count(&self) -> u32 {
        self.stats.active.load(Ordering::SeqCst)
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    mut outbound: broadcast::Receiver<Message>,
    stats: Arc<Stats>,
) {
    stats.connections.fetch_add(1, Ordering::SeqCst);

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };
    stats.active.fetch_add(1, Ordering::SeqCst);

    let (mut write, mut read) = ws_stream.split();
    loop {
        tokio::select! {
            msg = outbound.recv() => match msg {
                Ok(msg) => {
                    let is_close = matches!(msg, Message::Close(_));
                    if write.send(msg).await.is_err() || is_close {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Ping(data))) => {
                    let _ = write.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    stats.active.fetch_sub(1, Ordering::SeqCst);
}
