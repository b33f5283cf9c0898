//! Single-connection HTTP server with hand-written response bodies
//!
//! wiremock always sends complete bodies at once; these helpers cover slow and
//! truncated transfers.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the server answers the one request it accepts
#[derive(Clone, Copy, Debug)]
pub enum BodyPlan {
    /// Headers at once, then `chunks` chunks of `chunk_len` bytes, `delay` apart
    Slow {
        /// Number of chunks
        chunks: usize,
        /// Bytes per chunk
        chunk_len: usize,
        /// Pause before each chunk
        delay: Duration,
    },
    /// Declares `declared_len` bytes, sends `sent`, then closes the connection
    Truncated {
        /// Content-Length header value
        declared_len: usize,
        /// Bytes actually sent
        sent: usize,
    },
    /// Accepts the request and never answers
    Silent,
}

/// Start a server for one request and return the video URL it serves
pub async fn spawn_video_host(plan: BodyPlan) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind video host");
    let addr = listener.local_addr().expect("video host has no address");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        read_request_head(&mut socket).await;

        match plan {
            BodyPlan::Slow {
                chunks,
                chunk_len,
                delay,
            } => {
                let head = response_head(chunks * chunk_len);
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;
                for _ in 0..chunks {
                    tokio::time::sleep(delay).await;
                    if socket.write_all(&vec![b'x'; chunk_len]).await.is_err() {
                        return;
                    }
                    let _ = socket.flush().await;
                }
            }
            BodyPlan::Truncated { declared_len, sent } => {
                let head = response_head(declared_len);
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&vec![b'x'; sent]).await;
                let _ = socket.flush().await;
                let _ = socket.shutdown().await;
            }
            BodyPlan::Silent => {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
        }
    });

    format!("http://{addr}/video")
}

fn response_head(content_length: usize) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
    )
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            return;
        }
    }
}
