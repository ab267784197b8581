use crate::types::Fragment;
use serde::{Deserialize, Serialize};

/// What to do with the part of the array the halving sequence does not reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentPolicy {
    /// Append length-1 fragments until every element is covered by some fragment.
    #[default]
    Padded,
    /// Leave the shortfall to the master's fallback suffix.
    Unpadded,
}

/// Decompose an array of `array_len` elements into a strictly decreasing
/// halving sequence of fragments: `len >> 1`, `len >> 2`, ... down to 1.
/// For `array_len = 1` the sequence is empty under both policies and the
/// whole array is left to the fallback suffix.
pub fn fragments(array_len: usize, policy: FragmentPolicy) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut offset = 0;
    let mut cur = array_len >> 1;

    while cur > 0 {
        out.push(Fragment {
            token: out.len() as u32,
            offset,
            len: cur,
        });
        offset += cur;
        cur >>= 1;
    }

    // A job too small to fragment is processed locally; padding must not
    // manufacture work the halving sequence never produced.
    if out.is_empty() {
        return out;
    }

    if policy == FragmentPolicy::Padded {
        while offset < array_len {
            out.push(Fragment {
                token: out.len() as u32,
                offset,
                len: 1,
            });
            offset += 1;
        }
    }

    out
}
