//! Signal feed client
//!
//! Subscribes to one hangout and forwards the server's signals over a
//! channel. The connection task pings on an interval so idle feeds are
//! not dropped by the server. Frames are decoded on a separate reader
//! task so a read is never dropped halfway through a frame.

use std::time::Duration;

use tokio::io::{ReadHalf, WriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::frame::{read_frame, write_frame};
use crate::protocol::{FeedMessage, Signal};

pub const PING_INTERVAL: Duration = Duration::from_secs(20);

/// Event delivered by the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Signal(Signal),
    /// The connection ended; no further events follow
    Disconnected,
}

enum FeedCommand {
    Close,
}

/// Handle to a subscribed signal feed
pub struct SignalFeed {
    hangout_id: String,
    event_rx: mpsc::Receiver<FeedEvent>,
    cmd_tx: mpsc::Sender<FeedCommand>,
}

impl SignalFeed {
    /// Connect and subscribe. Returns once the server accepts.
    pub async fn subscribe<A: ToSocketAddrs>(
        addr: A,
        hangout_id: &str,
        hangout_member_id: i64,
    ) -> Result<Self> {
        Self::subscribe_with_interval(addr, hangout_id, hangout_member_id, PING_INTERVAL).await
    }

    pub async fn subscribe_with_interval<A: ToSocketAddrs>(
        addr: A,
        hangout_id: &str,
        hangout_member_id: i64,
        ping_interval: Duration,
    ) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (mut reader, mut writer) = tokio::io::split(stream);

        write_frame(
            &mut writer,
            &FeedMessage::Subscribe {
                hangout_id: hangout_id.to_string(),
                hangout_member_id,
            },
        )
        .await?;

        match read_frame::<_, FeedMessage>(&mut reader).await? {
            FeedMessage::Subscribed { .. } => {
                info!(hangout_id, "Subscribed to signal feed");
            }
            FeedMessage::Rejected { reason } => {
                warn!(hangout_id, reason = %reason, "Signal feed subscription rejected");
                return Err(Error::Rejected(reason));
            }
            other => {
                return Err(Error::Protocol(format!(
                    "Expected subscription reply, got {:?}",
                    other
                )));
            }
        }

        let (event_tx, event_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);

        tokio::spawn(connection_task(
            reader,
            writer,
            hangout_id.to_string(),
            ping_interval,
            event_tx,
            cmd_rx,
        ));

        Ok(Self {
            hangout_id: hangout_id.to_string(),
            event_rx,
            cmd_tx,
        })
    }

    pub fn hangout_id(&self) -> &str {
        &self.hangout_id
    }

    /// Next event, or None once the connection task has finished
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.event_rx.recv().await
    }

    pub async fn close(&self) {
        let _ = self.cmd_tx.send(FeedCommand::Close).await;
    }
}

/// Decode frames until the stream fails, forwarding each result
async fn read_task(mut reader: ReadHalf<TcpStream>, frame_tx: mpsc::Sender<Result<FeedMessage>>) {
    loop {
        let result = read_frame::<_, FeedMessage>(&mut reader).await;
        let failed = result.is_err();
        if frame_tx.send(result).await.is_err() || failed {
            break;
        }
    }
}

async fn connection_task(
    reader: ReadHalf<TcpStream>,
    mut writer: WriteHalf<TcpStream>,
    hangout_id: String,
    ping_interval: Duration,
    event_tx: mpsc::Sender<FeedEvent>,
    mut cmd_rx: mpsc::Receiver<FeedCommand>,
) {
    let (frame_tx, mut frame_rx) = mpsc::channel(64);
    let reader_handle = tokio::spawn(read_task(reader, frame_tx));

    let mut ping = tokio::time::interval(ping_interval);
    ping.tick().await;

    loop {
        tokio::select! {
            frame = frame_rx.recv() => {
                match frame.unwrap_or(Err(Error::ConnectionClosed)) {
                    Ok(FeedMessage::Signal { hangout_id: signal_hangout, signal }) => {
                        if signal_hangout != hangout_id {
                            debug!(signal_hangout = %signal_hangout, "Ignoring signal for another hangout");
                            continue;
                        }
                        if event_tx.send(FeedEvent::Signal(signal)).await.is_err() {
                            break;
                        }
                    }
                    Ok(FeedMessage::Ping) => {
                        if let Err(e) = write_frame(&mut writer, &FeedMessage::Pong).await {
                            warn!(error = %e, "Write error");
                            break;
                        }
                    }
                    Ok(FeedMessage::Pong) => debug!("Received pong"),
                    Ok(other) => debug!(message = ?other, "Ignoring unexpected message"),
                    Err(Error::ConnectionClosed) => {
                        debug!("Server closed signal feed");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Signal feed read error");
                        break;
                    }
                }
            }

            _ = ping.tick() => {
                if let Err(e) = write_frame(&mut writer, &FeedMessage::Ping).await {
                    warn!(error = %e, "Failed to ping signal feed");
                    break;
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(FeedCommand::Close) | None => {
                        debug!("Signal feed closed by client");
                        break;
                    }
                }
            }
        }
    }

    reader_handle.abort();
    let _ = event_tx.send(FeedEvent::Disconnected).await;
    info!(hangout_id = %hangout_id, "Signal feed disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    async fn accept_subscriber(listener: &TcpListener) -> (TcpStream, FeedMessage) {
        let (mut stream, _) = listener.accept().await.unwrap();
        let hello: FeedMessage = read_frame(&mut stream).await.unwrap();
        (stream, hello)
    }

    #[tokio::test]
    async fn test_subscribe_and_receive_signals() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, hello) = accept_subscriber(&listener).await;
            assert_eq!(
                hello,
                FeedMessage::Subscribe {
                    hangout_id: "h1".to_string(),
                    hangout_member_id: 5,
                }
            );

            write_frame(&mut stream, &FeedMessage::Subscribed { hangout_id: "h1".into() })
                .await
                .unwrap();
            write_frame(
                &mut stream,
                &FeedMessage::Signal {
                    hangout_id: "other".into(),
                    signal: Signal::HangoutDeleted,
                },
            )
            .await
            .unwrap();
            write_frame(
                &mut stream,
                &FeedMessage::Signal {
                    hangout_id: "h1".into(),
                    signal: Signal::StageChanged { new_stage: 3 },
                },
            )
            .await
            .unwrap();
        });

        let mut feed = SignalFeed::subscribe(addr, "h1", 5).await.unwrap();
        assert_eq!(
            feed.next_event().await,
            Some(FeedEvent::Signal(Signal::StageChanged { new_stage: 3 }))
        );

        server.await.unwrap();
        assert_eq!(feed.next_event().await, Some(FeedEvent::Disconnected));
    }

    #[tokio::test]
    async fn test_rejected_subscription() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = accept_subscriber(&listener).await;
            write_frame(&mut stream, &FeedMessage::Rejected { reason: "notMember".into() })
                .await
                .unwrap();
        });

        let result = SignalFeed::subscribe(addr, "h1", 5).await;
        assert!(matches!(result, Err(Error::Rejected(reason)) if reason == "notMember"));
    }

    #[tokio::test]
    async fn test_pings_on_interval() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = accept_subscriber(&listener).await;
            write_frame(&mut stream, &FeedMessage::Subscribed { hangout_id: "h1".into() })
                .await
                .unwrap();
            read_frame::<_, FeedMessage>(&mut stream).await.unwrap()
        });

        let feed = SignalFeed::subscribe_with_interval(addr, "h1", 5, Duration::from_millis(20))
            .await
            .unwrap();

        assert_eq!(server.await.unwrap(), FeedMessage::Ping);
        feed.close().await;
    }

    #[tokio::test]
    async fn test_frame_split_across_pings() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = accept_subscriber(&listener).await;
            write_frame(&mut stream, &FeedMessage::Subscribed { hangout_id: "h1".into() })
                .await
                .unwrap();

            let payload = serde_json::to_vec(&FeedMessage::Signal {
                hangout_id: "h1".into(),
                signal: Signal::StageChanged { new_stage: 3 },
            })
            .unwrap();
            let mut frame = (payload.len() as u32).to_be_bytes().to_vec();
            frame.extend_from_slice(&payload);

            // Several pings fire while the frame is half written
            stream.write_all(&frame[..9]).await.unwrap();
            stream.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(150)).await;
            stream.write_all(&frame[9..]).await.unwrap();
            stream
        });

        let mut feed = SignalFeed::subscribe_with_interval(addr, "h1", 5, Duration::from_millis(20))
            .await
            .unwrap();

        assert_eq!(
            feed.next_event().await,
            Some(FeedEvent::Signal(Signal::StageChanged { new_stage: 3 }))
        );
        let _stream = server.await.unwrap();
        feed.close().await;
        assert_eq!(feed.next_event().await, Some(FeedEvent::Disconnected));
    }
}
