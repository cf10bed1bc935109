use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout_at;
use tracing::debug;

use crate::deadline::Deadline;
use crate::request::BuiltRequest;

/// Reply buffer size, matching the original tool.
const READ_BUF_SIZE: usize = 1500;

/// How one connect→write→read→close cycle ended.
///
/// Byte payloads carry what had been received before the cycle ended, so a
/// response cut short by an error still counts toward the byte total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success(u64),
    ConnectFailed,
    WriteFailed,
    ReadFailed(u64),
    CloseFailed(u64),
}

/// Counters owned exclusively by one worker for its whole lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerResult {
    pub successful_transactions: u64,
    pub failed_transactions: u64,
    pub bytes_received: u64,
}

impl WorkerResult {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success(bytes) => {
                self.successful_transactions += 1;
                self.bytes_received += bytes;
            }
            Outcome::ConnectFailed | Outcome::WriteFailed => {
                self.failed_transactions += 1;
            }
            Outcome::ReadFailed(bytes) | Outcome::CloseFailed(bytes) => {
                self.failed_transactions += 1;
                self.bytes_received += bytes;
            }
        }
    }

    /// Cancels the one spurious failure a deadline-interrupted blocking
    /// call just produced. Applied exactly once, when the loop observes
    /// expiry, and deliberately unconditional beyond the zero check.
    pub fn discount_interrupted(&mut self) {
        if self.failed_transactions > 0 {
            self.failed_transactions -= 1;
        }
    }
}

/// Runs one full transaction over a fresh connection.
///
/// Every step that can block is bounded by the worker's deadline; a step
/// cut off by it reports the same failure an interrupted syscall would, and
/// the loop-top expiry correction cancels that count.
pub async fn run_transaction(request: &BuiltRequest, force: bool, deadline: Deadline) -> Outcome {
    let addr = (request.connect_host.as_str(), request.connect_port);
    let mut stream = match timeout_at(deadline.instant(), TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(_)) | Err(_) => return Outcome::ConnectFailed,
    };

    match timeout_at(deadline.instant(), stream.write_all(&request.bytes)).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) | Err(_) => return Outcome::WriteFailed,
    }

    let mut received = 0u64;
    if !force {
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            if deadline.expired() {
                break;
            }
            match timeout_at(deadline.instant(), stream.read(&mut buf)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => received += n as u64,
                Ok(Err(_)) | Err(_) => return Outcome::ReadFailed(received),
            }
        }
    }

    if stream.shutdown().await.is_err() {
        return Outcome::CloseFailed(received);
    }
    Outcome::Success(received)
}

/// Issues transactions back to back until the deadline fires, then applies
/// the expiry correction and hands the finalized counters back.
pub async fn worker_loop(
    id: usize,
    request: &BuiltRequest,
    force: bool,
    deadline: Deadline,
) -> WorkerResult {
    let mut result = WorkerResult::default();
    loop {
        if deadline.expired() {
            result.discount_interrupted();
            debug!(
                "worker {} finished: {} ok, {} failed, {} bytes",
                id,
                result.successful_transactions,
                result.failed_transactions,
                result.bytes_received
            );
            return result;
        }
        let outcome = run_transaction(request, force, deadline).await;
        result.record(outcome);
    }
}
