use crate::assignment::Assignment;
use crate::collection::{CollectionStrategy, PendingIndex};
use crate::error::ProtocolError;
use crate::fragmenter::{self, FragmentPolicy};
use crate::message::{FragmentHeader, Msg};
use crate::transform::Transform;
use crate::transport::MasterPort;
use crate::types::{Fragment, WorkerId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Knobs for one job run.
#[derive(Clone, Copy, Debug, Default)]
pub struct JobOptions {
    pub strategy: CollectionStrategy,
    pub policy: FragmentPolicy,
    /// Fixed shuffle seed for reproducible assignments; `None` draws from the
    /// thread rng.
    pub seed: Option<u64>,
}

/// What the master reports after the array is rebuilt.
#[derive(Clone, Debug)]
pub struct JobReport {
    /// Wall-clock time of distribute + fallback + collect.
    pub elapsed: Duration,
    /// Worker identities in the order fragments were sent to them.
    pub send_order: Vec<WorkerId>,
}

/// Run one job over `array`: fragment it, scatter the assigned fragments,
/// transform the uncovered suffix locally, then collect and splice results.
/// On return every element has been transformed exactly once.
pub async fn run_master<P, T>(
    port: &mut P,
    array: &mut [i64],
    transform: &T,
    options: JobOptions,
) -> Result<JobReport, ProtocolError>
where
    P: MasterPort + ?Sized,
    T: Transform + ?Sized,
{
    let fragments = fragmenter::fragments(array.len(), options.policy);
    let pool = port.workers();
    let plan = match options.seed {
        Some(seed) => Assignment::plan(&fragments, &pool, &mut StdRng::seed_from_u64(seed)),
        None => Assignment::plan(&fragments, &pool, &mut rand::rng()),
    };

    let started = Instant::now();

    // Two-part handshake per fragment, issued back to back. Handshakes to
    // different workers are independent; nothing is acknowledged here.
    for (fragment, worker) in plan.assigned() {
        let header = FragmentHeader {
            token: fragment.token,
            len: fragment.len,
        };
        port.send(*worker, Msg::Header(header)).await?;
        let payload = array[fragment.offset..fragment.end()].to_vec();
        port.send(*worker, Msg::Payload(payload)).await?;
    }

    // Workers outside the assigned set never enter their work loop; closing
    // their channels releases them before collection starts.
    let assigned: HashSet<WorkerId> = plan.send_order().into_iter().collect();
    for worker in &pool {
        if !assigned.contains(worker) {
            port.close(*worker);
        }
    }

    // The fallback suffix never leaves the master.
    transform.apply_in_place(&mut array[plan.suffix_start()..]);

    match options.strategy {
        CollectionStrategy::Ordered => collect_ordered(port, array, &plan).await?,
        CollectionStrategy::SizeMatched => {
            let pending = PendingIndex::new(&fragments);
            collect_size_matched(port, array, &plan, pending).await?;
        }
    }

    Ok(JobReport {
        elapsed: started.elapsed(),
        send_order: plan.send_order(),
    })
}

/// Strategy A: blocking receive from each assigned worker in assignment
/// order. The length is already known, so workers send the payload alone.
async fn collect_ordered<P>(
    port: &mut P,
    array: &mut [i64],
    plan: &Assignment,
) -> Result<(), ProtocolError>
where
    P: MasterPort + ?Sized,
{
    for (fragment, worker) in plan.assigned() {
        let payload = match port.recv_from(*worker).await? {
            Msg::Payload(payload) => payload,
            Msg::Header(_) => {
                return Err(ProtocolError::UnexpectedMessage {
                    from: *worker,
                    expected: "payload",
                })
            }
        };
        splice(array, fragment, *worker, payload)?;
    }
    Ok(())
}

/// Strategy B: reap whichever worker announces a result first. The header's
/// token selects the home fragment; the payload must then come from the same
/// worker that sent the header, never re-matched on content.
async fn collect_size_matched<P>(
    port: &mut P,
    array: &mut [i64],
    plan: &Assignment,
    mut pending: PendingIndex,
) -> Result<(), ProtocolError>
where
    P: MasterPort + ?Sized,
{
    for _ in 0..plan.assigned().len() {
        let (source, msg) = port.recv_any().await?;
        let header = match msg {
            Msg::Header(header) => header,
            Msg::Payload(_) => {
                return Err(ProtocolError::UnexpectedMessage {
                    from: source,
                    expected: "header",
                })
            }
        };
        let fragment = pending
            .take(header.token)
            .ok_or(ProtocolError::UnknownFragment {
                from: source,
                token: header.token,
            })?;
        if header.len != fragment.len {
            return Err(ProtocolError::LengthMismatch {
                from: source,
                expected: fragment.len,
                actual: header.len,
            });
        }

        let payload = match port.recv_from(source).await? {
            Msg::Payload(payload) => payload,
            Msg::Header(_) => {
                return Err(ProtocolError::UnexpectedMessage {
                    from: source,
                    expected: "payload",
                })
            }
        };
        splice(array, &fragment, source, payload)?;
    }
    Ok(())
}

fn splice(
    array: &mut [i64],
    fragment: &Fragment,
    from: WorkerId,
    payload: Vec<i64>,
) -> Result<(), ProtocolError> {
    if payload.len() != fragment.len {
        return Err(ProtocolError::LengthMismatch {
            from,
            expected: fragment.len,
            actual: payload.len(),
        });
    }
    array[fragment.offset..fragment.end()].copy_from_slice(&payload);
    Ok(())
}
