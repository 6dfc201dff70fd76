mod packet;
pub(crate) use packet::{EchoReply, EchoRequest};
pub use packet::{SequenceNumber, Ttl};

mod socket;
pub use socket::Socket;

mod raw_socket;
pub use raw_socket::RawSocket;

#[cfg(test)]
pub(crate) use socket::tests;
