use crate::types::{Fragment, WorkerId};
use rand::seq::SliceRandom;
use rand::Rng;

/// One job's fragment-to-worker mapping plus where the uncovered trailing
/// suffix begins. Fragments keep their production order (largest first);
/// worker identities come from a uniform shuffle of the pool, so no fixed
/// relationship exists between fragment size and worker.
#[derive(Clone, Debug)]
pub struct Assignment {
    assigned: Vec<(Fragment, WorkerId)>,
    suffix_start: usize,
}

impl Assignment {
    /// Assign the first `k = min(fragments, pool)` fragments to a randomly
    /// permuted subset of the pool. Fragments beyond `k` are folded into the
    /// fallback suffix along with whatever the fragmenter left uncovered.
    pub fn plan(fragments: &[Fragment], pool: &[WorkerId], rng: &mut impl Rng) -> Self {
        let k = fragments.len().min(pool.len());

        let mut order: Vec<WorkerId> = pool.to_vec();
        order.shuffle(rng);
        order.truncate(k);

        let assigned: Vec<(Fragment, WorkerId)> =
            fragments[..k].iter().copied().zip(order).collect();
        let suffix_start = assigned.iter().map(|(fragment, _)| fragment.len).sum();

        Assignment {
            assigned,
            suffix_start,
        }
    }

    /// Fragment/worker pairs in the order they will be distributed.
    pub fn assigned(&self) -> &[(Fragment, WorkerId)] {
        &self.assigned
    }

    /// First array index not covered by any assigned fragment.
    pub fn suffix_start(&self) -> usize {
        self.suffix_start
    }

    /// The realized worker permutation, in send order.
    pub fn send_order(&self) -> Vec<WorkerId> {
        self.assigned.iter().map(|(_, worker)| *worker).collect()
    }
}
