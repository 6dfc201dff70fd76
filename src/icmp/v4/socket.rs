use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Transport seam for the probe loop: a connected ICMPv4 endpoint that can
/// send one datagram and receive one raw reply, bounded by a deadline.
pub trait Socket {
    /// Bounds the next send and receive by `timeout`.
    fn set_deadline(&self, timeout: Duration) -> io::Result<()>;
    fn send(&self, buf: &[u8]) -> io::Result<usize>;
    /// Reads one raw datagram, IPv4 header included, into `buf`.
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;
    fn peer(&self) -> Ipv4Addr;
}
