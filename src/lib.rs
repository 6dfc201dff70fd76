#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub use error::{GenericError, PingError, PingResult};
pub use icmp::v4::{RawSocket, SequenceNumber, Socket, Ttl};
pub use probe::{ProbeOutcome, ProbeReport, ReplyData};
pub use resolve::lookup_host_v4;
pub use session::{Session, SessionConfig, State};
pub use stats::SessionStats;

mod error;
mod icmp;
mod probe;
mod resolve;
mod session;
mod stats;
