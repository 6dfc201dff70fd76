use std::time::Duration;

use crate::icmp::v4::{SequenceNumber, Ttl};
use crate::PingError;

/// Fields of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyData {
    /// Number of echoed payload bytes.
    pub bytes: usize,
    pub ttl: Ttl,
    pub rtt: Duration,
}

/// What a single probe attempt produced. Built fresh each iteration, folded
/// into the session statistics and handed to the observer, then dropped.
#[derive(Debug)]
pub enum ProbeOutcome {
    Reply(ReplyData),
    Timeout,
    SendError(PingError),
    ReceiveError(PingError),
}

#[derive(Debug)]
pub struct ProbeReport {
    pub sequence: SequenceNumber,
    pub outcome: ProbeOutcome,
}
