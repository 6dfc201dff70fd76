use socket2::{Domain, Protocol, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::socket::Socket;

/// Raw ICMPv4 socket connected to a single peer. Opening one requires
/// CAP_NET_RAW or root.
pub struct RawSocket {
    socket: socket2::Socket,
    peer: Ipv4Addr,
}

impl RawSocket {
    pub fn connect(peer: Ipv4Addr, timeout: Duration) -> io::Result<RawSocket> {
        tracing::trace!("opening raw ICMPv4 socket to {}", peer);
        let socket = socket2::Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        socket.connect(&SocketAddr::new(IpAddr::V4(peer), 0).into())?;
        socket.set_read_timeout(Some(timeout))?;
        socket.set_write_timeout(Some(timeout))?;
        Ok(RawSocket { socket, peer })
    }
}

impl Socket for RawSocket {
    fn set_deadline(&self, timeout: Duration) -> io::Result<()> {
        self.socket.set_read_timeout(Some(timeout))?;
        self.socket.set_write_timeout(Some(timeout))
    }

    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        // Socket2 gives a safety guaranty which allows us to do an unsafe cast
        // from `&mut [u8]` to `&mut [std::mem::MaybeUninit<u8>]`. In fact, even
        // if we used MaybeUninit here we would need unsafe somewhere to copy
        // the data back out of MaybeUninit.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        //
        // On a RAW socket we get the whole IP datagram, header included.
        self.socket.recv(unsafe {
            &mut *(std::ptr::addr_of_mut!(*buf) as *mut [u8] as *mut [std::mem::MaybeUninit<u8>])
        })
    }

    fn peer(&self) -> Ipv4Addr {
        self.peer
    }
}
