use crate::collection::CollectionStrategy;
use crate::error::ProtocolError;
use crate::message::Msg;
use crate::transform::Transform;
use crate::transport::WorkerPort;

/// One worker's cycle: receive header, receive payload, transform in place,
/// send the result, terminate. A worker whose channel closes before any work
/// arrives was simply not assigned a fragment and returns cleanly.
///
/// Under `Ordered` collection the result is the payload alone; under
/// `SizeMatched` the worker echoes the header first, mirroring the master's
/// own distribution handshake so the result can be matched at the far end.
pub async fn run_worker<P, T>(
    port: &mut P,
    transform: &T,
    strategy: CollectionStrategy,
) -> Result<(), ProtocolError>
where
    P: WorkerPort + ?Sized,
    T: Transform + ?Sized,
{
    let header = match port.recv().await {
        None => return Ok(()),
        Some(Msg::Header(header)) => header,
        Some(Msg::Payload(_)) => {
            return Err(ProtocolError::UnexpectedMessage {
                from: port.id(),
                expected: "header",
            })
        }
    };

    let mut payload = match port.recv().await {
        None => return Err(ProtocolError::Disconnected(port.id())),
        Some(Msg::Payload(payload)) => payload,
        Some(Msg::Header(_)) => {
            return Err(ProtocolError::UnexpectedMessage {
                from: port.id(),
                expected: "payload",
            })
        }
    };
    if payload.len() != header.len {
        return Err(ProtocolError::LengthMismatch {
            from: port.id(),
            expected: header.len,
            actual: payload.len(),
        });
    }

    transform.apply_in_place(&mut payload);

    if strategy == CollectionStrategy::SizeMatched {
        port.send(Msg::Header(header)).await?;
    }
    port.send(Msg::Payload(payload)).await?;

    Ok(())
}
