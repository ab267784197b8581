use async_trait::async_trait;
use scatter_gather_core::collection::CollectionStrategy;
use scatter_gather_core::error::ProtocolError;
use scatter_gather_core::message::Msg;
use scatter_gather_core::transform::Transform;
use scatter_gather_core::transport::{MasterPort, WorkerPort};
use scatter_gather_core::types::WorkerId;
use scatter_gather_core::worker::run_worker;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// A worker only ever holds one header and one payload at a time.
const WORKER_CHANNEL_CAPACITY: usize = 2;

/// Master endpoint over tokio mpsc channels: one outbox per worker, one
/// shared inbox carrying `(WorkerId, Msg)` back. Messages pulled off the
/// inbox while waiting for a specific source are parked in per-source queues
/// so wildcard and directed receives can interleave.
pub struct ChannelMasterPort {
    roster: Vec<WorkerId>,
    outboxes: HashMap<WorkerId, mpsc::Sender<Msg>>,
    inbox: mpsc::Receiver<(WorkerId, Msg)>,
    pending: HashMap<WorkerId, VecDeque<Msg>>,
}

impl ChannelMasterPort {
    async fn pump(&mut self) -> Result<(WorkerId, Msg), ProtocolError> {
        self.inbox.recv().await.ok_or(ProtocolError::ChannelClosed)
    }
}

#[async_trait]
impl MasterPort for ChannelMasterPort {
    fn workers(&self) -> Vec<WorkerId> {
        self.roster.clone()
    }

    async fn send(&mut self, dest: WorkerId, msg: Msg) -> Result<(), ProtocolError> {
        let outbox = self
            .outboxes
            .get(&dest)
            .ok_or(ProtocolError::Disconnected(dest))?;
        outbox
            .send(msg)
            .await
            .map_err(|_| ProtocolError::Disconnected(dest))
    }

    async fn recv_from(&mut self, source: WorkerId) -> Result<Msg, ProtocolError> {
        loop {
            if let Some(queue) = self.pending.get_mut(&source) {
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            let (from, msg) = self.pump().await?;
            if from == source {
                return Ok(msg);
            }
            self.pending.entry(from).or_default().push_back(msg);
        }
    }

    async fn recv_any(&mut self) -> Result<(WorkerId, Msg), ProtocolError> {
        for (from, queue) in self.pending.iter_mut() {
            if let Some(msg) = queue.pop_front() {
                return Ok((*from, msg));
            }
        }
        self.pump().await
    }

    fn close(&mut self, dest: WorkerId) {
        self.outboxes.remove(&dest);
    }
}

/// Worker endpoint: a private receiver for work and a clone of the shared
/// inbox sender for results.
pub struct ChannelWorkerPort {
    id: WorkerId,
    rx: mpsc::Receiver<Msg>,
    tx: mpsc::Sender<(WorkerId, Msg)>,
}

#[async_trait]
impl WorkerPort for ChannelWorkerPort {
    fn id(&self) -> WorkerId {
        self.id
    }

    async fn recv(&mut self) -> Option<Msg> {
        self.rx.recv().await
    }

    async fn send(&mut self, msg: Msg) -> Result<(), ProtocolError> {
        self.tx
            .send((self.id, msg))
            .await
            .map_err(|_| ProtocolError::Disconnected(self.id))
    }
}

pub struct WorkerPool {
    pub port: ChannelMasterPort,
    pub handles: Vec<(WorkerId, JoinHandle<Result<(), ProtocolError>>)>,
}

/// Spawn `num_workers` worker tasks and wire up the master endpoint.
pub fn spawn_worker_pool<T>(
    num_workers: usize,
    transform: Arc<T>,
    strategy: CollectionStrategy,
) -> WorkerPool
where
    T: Transform,
{
    let (inbox_tx, inbox) = mpsc::channel((num_workers * WORKER_CHANNEL_CAPACITY).max(1));

    let mut roster = Vec::with_capacity(num_workers);
    let mut outboxes = HashMap::new();
    let mut handles = Vec::with_capacity(num_workers);

    for i in 0..num_workers {
        let id = WorkerId(i as u32);
        let (tx, rx) = mpsc::channel(WORKER_CHANNEL_CAPACITY);
        roster.push(id);
        outboxes.insert(id, tx);

        let mut port = ChannelWorkerPort {
            id,
            rx,
            tx: inbox_tx.clone(),
        };
        let transform = Arc::clone(&transform);
        handles.push((
            id,
            tokio::spawn(async move { run_worker(&mut port, transform.as_ref(), strategy).await }),
        ));
    }

    WorkerPool {
        port: ChannelMasterPort {
            roster,
            outboxes,
            inbox,
            pending: HashMap::new(),
        },
        handles,
    }
}

/// Wait for every worker task to shut down, reporting failures.
pub async fn join_workers(handles: Vec<(WorkerId, JoinHandle<Result<(), ProtocolError>>)>) {
    for (id, handle) in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => eprintln!("Worker {} failed: {}", id, e),
            Err(e) => eprintln!("Worker {} task panicked: {}", id, e),
        }
    }
}
