use serde::{Deserialize, Serialize};

/// Opaque worker identity handed out by the transport.
/// The core never assumes these are contiguous or small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub u32);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence number identifying one fragment within a single job.
pub type FragmentToken = u32;

/// Half-open range `[offset, offset + len)` into the job array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub token: FragmentToken,
    pub offset: usize,
    pub len: usize,
}

impl Fragment {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}
