//! Framed transport
//!
//! Frames carry no length prefix, so the reader peels one off the byte stream by looking at the
//! tag and reading exactly the body [`FrameShape`] calls for.

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpStream;
use tracing::{info, trace, warn};

use crate::error::SessionError;
use crate::protocol::FrameShape;
use crate::types::TAG_LEN;

/// Something that moves whole frames to and from the server
#[async_trait]
pub trait Transport: Send {
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), SessionError>;

    /// Next complete frame; `None` once the stream ends cleanly between frames.
    async fn recv_frame(&mut self) -> Result<Option<Vec<u8>>, SessionError>;
}

/// Buffered connection over any byte stream
pub struct Connection<S> {
    stream: BufReader<S>,
}

impl Connection<TcpStream> {
    pub async fn connect(host: &str, port: u16) -> Result<Self, SessionError> {
        let addr = format!("{host}:{port}");
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| SessionError::Connect {
                addr: addr.clone(),
                source,
            })?;
        // Frames are small and latency matters more than batching
        if let Err(err) = stream.set_nodelay(true) {
            warn!(%addr, %err, "could not disable Nagle's algorithm");
        }
        info!(%addr, "connected");
        Ok(Self::new(stream))
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }
}

#[async_trait]
impl<S> Transport for Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), SessionError> {
        trace!(bytes = frame.len(), frame = %frame.escape_ascii(), "send");
        self.stream
            .write_all(frame)
            .await
            .map_err(SessionError::ConnectionLost)?;
        self.stream.flush().await.map_err(SessionError::ConnectionLost)
    }

    async fn recv_frame(&mut self) -> Result<Option<Vec<u8>>, SessionError> {
        let frame = read_frame(&mut self.stream).await?;
        if let Some(frame) = &frame {
            trace!(bytes = frame.len(), frame = %frame.escape_ascii(), "recv");
        }
        Ok(frame)
    }
}

/// Read one frame off `reader`.
///
/// End of stream before the first tag byte is a clean `None`; anywhere later it is
/// `ConnectionLost`.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, SessionError>
where
    R: AsyncBufRead + Unpin + Send,
{
    let buffered = reader.fill_buf().await.map_err(SessionError::ConnectionLost)?;
    if buffered.is_empty() {
        return Ok(None);
    }

    let mut frame = vec![0u8; TAG_LEN];
    reader
        .read_exact(&mut frame)
        .await
        .map_err(SessionError::ConnectionLost)?;

    let shape = FrameShape::for_tag(&frame)?;
    let body_len = match shape {
        FrameShape::Fixed(n) => n,
        FrameShape::Counted { .. } => {
            let count = reader.read_u8().await.map_err(SessionError::ConnectionLost)?;
            frame.push(count);
            shape.body_len(count) - 1
        }
    };

    let start = frame.len();
    frame.resize(start + body_len, 0);
    reader
        .read_exact(&mut frame[start..])
        .await
        .map_err(SessionError::ConnectionLost)?;
    Ok(Some(frame))
}
