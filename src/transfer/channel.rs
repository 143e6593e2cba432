//! Channel Sink Module
//!
//! Bridges the blocking transfer loop to an async response body.

use std::io::{self, Write};

use axum::body::Bytes;
use futures::stream::{self, Stream};
use tokio::sync::mpsc;

use super::CancelFlag;

// == Channel Writer ==
/// `Write` sink that forwards each chunk over a bounded channel.
///
/// `write` blocks while the channel is full, so a slow reader slows the
/// transfer down. Once the receiving side is dropped (client gone) writes fail
/// with `BrokenPipe`.
pub struct ChannelWriter {
    tx: mpsc::Sender<Bytes>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .blocking_send(Bytes::copy_from_slice(buf))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "download receiver closed"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Trips its flag when the response body is dropped.
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Creates a writer and the stream of chunks it produces.
///
/// Dropping the stream (the client went away) cancels `cancel`, so a transfer
/// watching it stops at its next chunk instead of pacing out the rest. The
/// writer must only be used from a blocking context such as
/// `tokio::task::spawn_blocking`.
pub fn body_channel(
    capacity: usize,
    cancel: CancelFlag,
) -> (ChannelWriter, impl Stream<Item = io::Result<Bytes>> + Send + 'static) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let body = stream::unfold((rx, CancelOnDrop(cancel)), |(mut rx, guard)| async move {
        rx.recv().await.map(|chunk| (Ok(chunk), (rx, guard)))
    });
    (ChannelWriter { tx }, body)
}
