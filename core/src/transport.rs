use crate::error::ProtocolError;
use crate::message::Msg;
use crate::types::WorkerId;
use async_trait::async_trait;

/// Master side of the point-to-point substrate. The core does not manage
/// worker startup or transport selection; an implementation supplies an
/// addressable, fixed-size pool and reliable, per-channel-ordered delivery.
#[async_trait]
pub trait MasterPort: Send {
    /// Identities of every addressable worker in the pool.
    fn workers(&self) -> Vec<WorkerId>;

    /// Hand a message to the transport for one destination.
    async fn send(&mut self, dest: WorkerId, msg: Msg) -> Result<(), ProtocolError>;

    /// Blocking receive from one specific worker.
    async fn recv_from(&mut self, source: WorkerId) -> Result<Msg, ProtocolError>;

    /// Blocking receive from whichever worker has a message ready.
    async fn recv_any(&mut self) -> Result<(WorkerId, Msg), ProtocolError>;

    /// Close the channel to one worker. Its next `recv` observes shutdown.
    fn close(&mut self, dest: WorkerId);
}

/// Worker side of the substrate.
#[async_trait]
pub trait WorkerPort: Send {
    fn id(&self) -> WorkerId;

    /// `None` means the master closed the channel: terminate cleanly.
    async fn recv(&mut self) -> Option<Msg>;

    async fn send(&mut self, msg: Msg) -> Result<(), ProtocolError>;
}
