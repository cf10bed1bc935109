use std::sync::Arc;

use tokio::net::TcpStream;
use tracing::debug;

use crate::config::BenchmarkConfig;
use crate::deadline::Deadline;
use crate::error::BenchError;
use crate::request::BuiltRequest;
use crate::runner::{worker_loop, WorkerResult};

/// One throwaway connection to check the target answers at all. Runs before
/// any worker spawns so an unreachable server aborts the whole run.
pub async fn probe(request: &BuiltRequest) -> Result<(), BenchError> {
    match TcpStream::connect((request.connect_host.as_str(), request.connect_port)).await {
        Ok(_) => Ok(()),
        Err(source) => Err(BenchError::ServerUnreachable {
            host: request.connect_host.clone(),
            port: request.connect_port,
            source,
        }),
    }
}

/// Spawns `config.clients` independent workers and waits for all of them.
///
/// Each worker arms its own deadline, owns its counters exclusively, and
/// delivers them exactly once through the task's join value. A worker that
/// cannot be collected poisons the whole run; partial sums would
/// misrepresent throughput.
pub async fn run_workers(
    config: &BenchmarkConfig,
    request: Arc<BuiltRequest>,
) -> Result<Vec<WorkerResult>, BenchError> {
    let mut tasks = Vec::with_capacity(config.clients);
    for id in 0..config.clients {
        let request = Arc::clone(&request);
        let force = config.force;
        let duration = config.duration;
        tasks.push(tokio::spawn(async move {
            let deadline = Deadline::arm(duration);
            worker_loop(id, &request, force, deadline).await
        }));
    }
    debug!("spawned {} workers", config.clients);

    let mut results = Vec::with_capacity(config.clients);
    for joined in futures_util::future::join_all(tasks).await {
        let result =
            joined.map_err(|err| BenchError::Internal(format!("worker task failed: {err}")))?;
        results.push(result);
    }
    Ok(results)
}
