use crate::types::{Fragment, FragmentToken};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the master gathers transformed fragments back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionStrategy {
    /// Revisit workers in assignment order with a blocking receive from each.
    /// Simple, but a slow early worker delays everyone behind it.
    #[default]
    Ordered,
    /// Reap whichever worker finishes first and route the result home by the
    /// fragment token it announces.
    SizeMatched,
}

/// Pending-result index for size-matched collection: token to home fragment.
/// Built once before collecting; entries are taken as results arrive, so a
/// duplicate token surfaces as a lookup miss instead of a silent misroute.
pub struct PendingIndex {
    slots: HashMap<FragmentToken, Fragment>,
}

impl PendingIndex {
    pub fn new(fragments: &[Fragment]) -> Self {
        PendingIndex {
            slots: fragments.iter().map(|f| (f.token, *f)).collect(),
        }
    }

    pub fn take(&mut self, token: FragmentToken) -> Option<Fragment> {
        self.slots.remove(&token)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
