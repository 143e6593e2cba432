//! Rate Limited Transfer Module
//!
//! Copies a byte stream while holding throughput at or under a fixed rate.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::clock::Clock;
use crate::error::{AppError, Result};

/// Default intermediate buffer size in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

// == Cancel Flag ==
/// Shared flag that stops a running transfer at its next chunk boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// == Rate Limited Transfer ==
/// Paced copy from a reader to a writer.
///
/// Before each chunk the transfer sleeps until `bytes_sent * 1000 / rate`
/// milliseconds have passed since the start. A chunk never spans two one-second
/// rate slots, so bursts cannot overshoot the rate. `copy` blocks the calling
/// thread for the whole transfer; run it on a blocking pool.
pub struct RateLimitedTransfer {
    /// Bytes per second, 0 disables pacing
    rate_per_second: u64,
    buffer_size: usize,
    clock: Arc<dyn Clock>,
    cancel: Option<CancelFlag>,
}

impl RateLimitedTransfer {
    // == Constructor ==
    pub fn new(rate_per_second: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            rate_per_second,
            buffer_size: DEFAULT_BUFFER_SIZE,
            clock,
            cancel: None,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    // == Copy ==
    /// Moves up to `total_size` bytes from `src` to `dst`.
    ///
    /// Returns the number of bytes delivered, which is less than `total_size`
    /// only if `src` ran dry first. A read or write failure ends the transfer
    /// with `TransferIo`, carrying the count delivered before the failure.
    pub fn copy<R, W>(&self, src: &mut R, dst: &mut W, total_size: u64) -> Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut buffer = vec![0u8; self.buffer_size];
        let start = self.clock.now_ms();
        let mut sent: u64 = 0;

        while sent < total_size {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                debug!(sent, total_size, "Transfer cancelled");
                return Err(AppError::TransferCancelled { delivered: sent });
            }

            let mut chunk = (self.buffer_size as u64).min(total_size - sent);
            if self.rate_per_second > 0 {
                self.pace(start, sent);
                chunk = chunk.min(self.slot_remaining(sent));
            }

            let n = match src.read(&mut buffer[..chunk as usize]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(AppError::TransferIo {
                        delivered: sent,
                        source,
                    })
                }
            };

            dst.write_all(&buffer[..n])
                .map_err(|source| AppError::TransferIo {
                    delivered: sent,
                    source,
                })?;
            sent += n as u64;
        }

        dst.flush().map_err(|source| AppError::TransferIo {
            delivered: sent,
            source,
        })?;

        debug!(sent, total_size, "Transfer finished");
        Ok(sent)
    }

    /// Sleeps until the schedule allows `sent` bytes to have gone out.
    fn pace(&self, start: u64, sent: u64) {
        let expected = (sent as u128 * 1000 / self.rate_per_second as u128) as u64;
        let elapsed = self.clock.now_ms().saturating_sub(start);
        if elapsed < expected {
            self.clock.sleep(Duration::from_millis(expected - elapsed));
        }
    }

    /// Bytes left in the current one-second slot.
    fn slot_remaining(&self, sent: u64) -> u64 {
        self.rate_per_second - (sent % self.rate_per_second)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};
    use std::io::Cursor;
    use std::time::Instant;

    /// Records the size of every write
    #[derive(Default)]
    struct ChunkRecorder {
        data: Vec<u8>,
        chunks: Vec<usize>,
    }

    impl Write for ChunkRecorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.chunks.push(buf.len());
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Yields `ok_bytes` bytes then fails
    struct FailingReader {
        ok_bytes: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.ok_bytes == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk went away"));
            }
            let n = buf.len().min(self.ok_bytes);
            self.ok_bytes -= n;
            Ok(n)
        }
    }

    /// Accepts `capacity` bytes then reports a broken pipe
    struct ClosingWriter {
        capacity: usize,
    }

    impl Write for ClosingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.capacity == 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            let n = buf.len().min(self.capacity);
            self.capacity -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_delivers_exact_bytes_and_paces() {
        let clock = Arc::new(ManualClock::new(0));
        let data = payload(10_000);
        let mut sink = ChunkRecorder::default();

        let sent = RateLimitedTransfer::new(1_000, clock.clone())
            .copy(&mut Cursor::new(&data), &mut sink, data.len() as u64)
            .unwrap();

        assert_eq!(sent, 10_000);
        assert_eq!(sink.data, data);
        // First slot goes out immediately, each later slot waits its second
        assert_eq!(clock.slept_ms(), 9_000);
    }

    #[test]
    fn test_chunks_never_cross_rate_slots() {
        let clock = Arc::new(ManualClock::new(0));
        let data = payload(5_000);
        let mut sink = ChunkRecorder::default();

        RateLimitedTransfer::new(700, clock)
            .with_buffer_size(512)
            .copy(&mut Cursor::new(&data), &mut sink, data.len() as u64)
            .unwrap();

        let mut offset = 0usize;
        for chunk in &sink.chunks {
            assert!(*chunk <= 512);
            let slot_start = offset / 700;
            let slot_end = (offset + chunk - 1) / 700;
            assert_eq!(slot_start, slot_end, "chunk at {offset} crosses a slot");
            offset += chunk;
        }
        assert_eq!(offset, 5_000);
    }

    #[test]
    fn test_stops_at_total_size_when_source_is_longer() {
        let clock = Arc::new(ManualClock::new(0));
        let data = payload(4_096);
        let mut sink = ChunkRecorder::default();

        let sent = RateLimitedTransfer::new(1_000_000, clock)
            .copy(&mut Cursor::new(&data), &mut sink, 1_000)
            .unwrap();

        assert_eq!(sent, 1_000);
        assert_eq!(sink.data, &data[..1_000]);
    }

    #[test]
    fn test_short_source_ends_early() {
        let clock = Arc::new(ManualClock::new(0));
        let data = payload(300);
        let mut sink = ChunkRecorder::default();

        let sent = RateLimitedTransfer::new(1_000, clock)
            .copy(&mut Cursor::new(&data), &mut sink, 1_000)
            .unwrap();

        assert_eq!(sent, 300);
    }

    #[test]
    fn test_zero_rate_is_unpaced() {
        let clock = Arc::new(ManualClock::new(0));
        let data = payload(200_000);
        let mut sink = ChunkRecorder::default();

        let sent = RateLimitedTransfer::new(0, clock.clone())
            .copy(&mut Cursor::new(&data), &mut sink, data.len() as u64)
            .unwrap();

        assert_eq!(sent, 200_000);
        assert_eq!(clock.slept_ms(), 0);
        assert!(sink.chunks.iter().all(|c| *c <= DEFAULT_BUFFER_SIZE));
    }

    #[test]
    fn test_read_error_reports_partial_delivery() {
        let clock = Arc::new(ManualClock::new(0));
        let mut sink = ChunkRecorder::default();

        let result = RateLimitedTransfer::new(1_000, clock).copy(
            &mut FailingReader { ok_bytes: 2_500 },
            &mut sink,
            10_000,
        );

        match result {
            Err(AppError::TransferIo { delivered, .. }) => assert_eq!(delivered, 2_500),
            other => panic!("expected TransferIo, got {other:?}"),
        }
        assert_eq!(sink.data.len(), 2_500);
    }

    #[test]
    fn test_write_error_stops_transfer() {
        let clock = Arc::new(ManualClock::new(0));
        let data = payload(3_000);

        let result = RateLimitedTransfer::new(1_000, clock).copy(
            &mut Cursor::new(&data),
            &mut ClosingWriter { capacity: 1_000 },
            3_000,
        );

        match result {
            Err(AppError::TransferIo { delivered, source }) => {
                assert_eq!(delivered, 1_000);
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("expected TransferIo, got {other:?}"),
        }
    }

    #[test]
    fn test_cancel_flag_stops_transfer() {
        let clock = Arc::new(ManualClock::new(0));
        let cancel = CancelFlag::new();
        cancel.cancel();
        let data = payload(1_000);
        let mut sink = ChunkRecorder::default();

        let result = RateLimitedTransfer::new(100, clock)
            .with_cancel(cancel)
            .copy(&mut Cursor::new(&data), &mut sink, 1_000);

        assert!(matches!(
            result,
            Err(AppError::TransferCancelled { delivered: 0 })
        ));
        assert!(sink.data.is_empty());
    }

    #[test]
    fn test_real_clock_takes_at_least_paced_time() {
        let data = payload(150_000);
        let mut sink = ChunkRecorder::default();
        let started = Instant::now();

        let sent = RateLimitedTransfer::new(100_000, Arc::new(SystemClock))
            .copy(&mut Cursor::new(&data), &mut sink, data.len() as u64)
            .unwrap();

        assert_eq!(sent, 150_000);
        assert_eq!(sink.data, data);
        // The third chunk may not start before the one-second mark
        assert!(started.elapsed() >= Duration::from_millis(950));
    }
}
