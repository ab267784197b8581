use crate::types::FragmentToken;
use serde::{Deserialize, Serialize};

/// First half of the fragment handshake. The length lets the receiver size
/// its buffer; the token lets the master route the result to its home offset
/// even when several fragments share a length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentHeader {
    pub token: FragmentToken,
    pub len: usize,
}

/// Point-to-point message. On any one channel a `Header` always precedes the
/// `Payload` it describes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    Header(FragmentHeader),
    Payload(Vec<i64>),
}
