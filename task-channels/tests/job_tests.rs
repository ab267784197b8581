use scatter_gather_core::collection::CollectionStrategy;
use scatter_gather_core::error::ProtocolError;
use scatter_gather_core::fragmenter::FragmentPolicy;
use scatter_gather_core::master::{run_master, JobOptions, JobReport};
use scatter_gather_core::message::{FragmentHeader, Msg};
use scatter_gather_core::transform::{Increment, Transform};
use scatter_gather_core::transport::MasterPort;
use scatter_gather_core::types::WorkerId;
use scatter_gather_task_channels::channel_transport::{
    join_workers, spawn_worker_pool, WorkerPool,
};
use std::sync::Arc;

async fn run_job_on<T: Transform>(
    array: &mut [i64],
    num_workers: usize,
    transform: Arc<T>,
    strategy: CollectionStrategy,
    policy: FragmentPolicy,
) -> JobReport {
    let WorkerPool { mut port, handles } =
        spawn_worker_pool(num_workers, Arc::clone(&transform), strategy);

    let options = JobOptions {
        strategy,
        policy,
        seed: Some(7),
    };
    let report = run_master(&mut port, array, transform.as_ref(), options)
        .await
        .unwrap();

    drop(port);
    join_workers(handles).await;
    report
}

fn iota(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn incremented(n: usize) -> Vec<i64> {
    (1..=n as i64).collect()
}

#[tokio::test]
async fn test_n25_four_workers_ordered() {
    // Arrange
    let mut array = iota(25);

    // Act
    let report = run_job_on(
        &mut array,
        4,
        Arc::new(Increment),
        CollectionStrategy::Ordered,
        FragmentPolicy::Padded,
    )
    .await;

    // Assert: 4 fragments assigned (12, 6, 3, 1), suffix of 3 done locally.
    assert_eq!(array, incremented(25));
    assert_eq!(report.send_order.len(), 4);
}

#[tokio::test]
async fn test_n25_four_workers_size_matched() {
    // Arrange
    let mut array = iota(25);

    // Act
    let report = run_job_on(
        &mut array,
        4,
        Arc::new(Increment),
        CollectionStrategy::SizeMatched,
        FragmentPolicy::Unpadded,
    )
    .await;

    // Assert
    assert_eq!(array, incremented(25));
    assert_eq!(report.send_order.len(), 4);
}

#[tokio::test]
async fn test_single_element_array_is_processed_locally() {
    // Arrange
    let mut array = iota(1);

    // Act
    let report = run_job_on(
        &mut array,
        4,
        Arc::new(Increment),
        CollectionStrategy::Ordered,
        FragmentPolicy::Padded,
    )
    .await;

    // Assert: no fragments exist, so nothing was sent anywhere.
    assert_eq!(array, vec![1]);
    assert!(report.send_order.is_empty());
}

#[tokio::test]
async fn test_zero_workers_everything_via_fallback() {
    // Arrange
    let mut array = iota(8);

    // Act
    let report = run_job_on(
        &mut array,
        0,
        Arc::new(Increment),
        CollectionStrategy::SizeMatched,
        FragmentPolicy::Padded,
    )
    .await;

    // Assert
    assert_eq!(array, incremented(8));
    assert!(report.send_order.is_empty());
}

#[tokio::test]
async fn test_zero_length_suffix_splices_cleanly() {
    // Arrange: padded N=24 has 6 fragments; 8 workers cover all of them.
    let mut array = iota(24);

    // Act
    let report = run_job_on(
        &mut array,
        8,
        Arc::new(Increment),
        CollectionStrategy::Ordered,
        FragmentPolicy::Padded,
    )
    .await;

    // Assert
    assert_eq!(array, incremented(24));
    assert_eq!(report.send_order.len(), 6);
}

#[tokio::test]
async fn test_strategies_produce_identical_arrays() {
    // Arrange
    let mut ordered = iota(100);
    let mut size_matched = iota(100);

    // Act
    run_job_on(
        &mut ordered,
        6,
        Arc::new(Increment),
        CollectionStrategy::Ordered,
        FragmentPolicy::Padded,
    )
    .await;
    run_job_on(
        &mut size_matched,
        6,
        Arc::new(Increment),
        CollectionStrategy::SizeMatched,
        FragmentPolicy::Padded,
    )
    .await;

    // Assert
    assert_eq!(ordered, size_matched);
    assert_eq!(ordered, incremented(100));
}

#[tokio::test]
async fn test_transform_applied_exactly_once_per_run() {
    // Arrange
    let mut array = iota(25);

    // Act: run the pipeline twice over the same array.
    for _ in 0..2 {
        run_job_on(
            &mut array,
            4,
            Arc::new(Increment),
            CollectionStrategy::Ordered,
            FragmentPolicy::Padded,
        )
        .await;
    }

    // Assert: +2, not +1.
    let expected: Vec<i64> = (2..=26).collect();
    assert_eq!(array, expected);
}

#[tokio::test]
async fn test_duplicate_padded_fragments_route_home() {
    // Arrange: N=25 padded yields four size-1 fragments; with 7 workers every
    // fragment is assigned, so token-based routing has to disambiguate them.
    let mut array = iota(25);

    // Act
    let report = run_job_on(
        &mut array,
        7,
        Arc::new(Increment),
        CollectionStrategy::SizeMatched,
        FragmentPolicy::Padded,
    )
    .await;

    // Assert
    assert_eq!(array, incremented(25));
    assert_eq!(report.send_order.len(), 7);
}

/// Increment that stalls proportionally to the fragment size, so the largest
/// fragment (sent first) finishes last and results arrive out of send order.
struct SlowIncrement;

impl Transform for SlowIncrement {
    fn apply(&self, value: i64) -> i64 {
        value + 1
    }

    fn apply_in_place(&self, values: &mut [i64]) {
        std::thread::sleep(std::time::Duration::from_millis(values.len() as u64));
        for value in values.iter_mut() {
            *value = self.apply(*value);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_size_matched_collects_out_of_send_order() {
    // Arrange
    let mut array = iota(64);

    // Act
    run_job_on(
        &mut array,
        5,
        Arc::new(SlowIncrement),
        CollectionStrategy::SizeMatched,
        FragmentPolicy::Unpadded,
    )
    .await;

    // Assert
    assert_eq!(array, incremented(64));
}

#[tokio::test]
async fn test_worker_rejects_payload_before_header() {
    // Arrange
    let WorkerPool { mut port, handles } =
        spawn_worker_pool(1, Arc::new(Increment), CollectionStrategy::Ordered);

    // Act: violate the handshake order.
    port.send(WorkerId(0), Msg::Payload(vec![1, 2, 3]))
        .await
        .unwrap();
    drop(port);

    // Assert
    let (_, handle) = handles.into_iter().next().unwrap();
    let result = handle.await.unwrap();
    assert_eq!(
        result,
        Err(ProtocolError::UnexpectedMessage {
            from: WorkerId(0),
            expected: "header",
        })
    );
}

#[tokio::test]
async fn test_worker_reports_disconnect_after_header() {
    // Arrange
    let WorkerPool { mut port, handles } =
        spawn_worker_pool(1, Arc::new(Increment), CollectionStrategy::Ordered);

    // Act: header with no payload, then hang up.
    port.send(
        WorkerId(0),
        Msg::Header(FragmentHeader { token: 0, len: 3 }),
    )
    .await
    .unwrap();
    drop(port);

    // Assert
    let (_, handle) = handles.into_iter().next().unwrap();
    let result = handle.await.unwrap();
    assert_eq!(result, Err(ProtocolError::Disconnected(WorkerId(0))));
}

#[tokio::test]
async fn test_unassigned_workers_terminate_cleanly() {
    // Arrange: far more workers than fragments.
    let mut array = iota(4);

    // Act
    let WorkerPool { mut port, handles } =
        spawn_worker_pool(16, Arc::new(Increment), CollectionStrategy::Ordered);
    run_master(
        &mut port,
        &mut array,
        &Increment,
        JobOptions {
            strategy: CollectionStrategy::Ordered,
            policy: FragmentPolicy::Padded,
            seed: Some(3),
        },
    )
    .await
    .unwrap();
    drop(port);

    // Assert: every task joins with Ok, assigned or not.
    for (_, handle) in handles {
        assert_eq!(handle.await.unwrap(), Ok(()));
    }
    assert_eq!(array, incremented(4));
}
