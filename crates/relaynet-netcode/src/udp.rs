//! UDP transport binding

use crate::transport::{Address, Transport};
use crate::codec::MAX_DATAGRAM_SIZE;
use crate::{Error, Result};
use std::io::{self, ErrorKind};
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};

/// Non-blocking UDP socket bound to a local receive port
///
/// The same socket sends and receives, so the source address other peers
/// observe is this peer's receive port.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind `0.0.0.0:<port>` in non-blocking mode
    pub fn bind(port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))?;
        socket.set_nonblocking(true)?;
        log::info!("udp transport bound on {}", socket.local_addr()?);
        Ok(Self { socket })
    }

    fn resolve(target: &Address) -> Result<SocketAddr> {
        match target {
            Address::Socket(addr) => Ok(*addr),
            Address::Custom(host) => host
                .to_socket_addrs()
                .ok()
                .and_then(|mut addrs| addrs.next())
                .ok_or_else(|| Error::UnresolvableAddress(host.clone())),
        }
    }
}

impl Transport for UdpTransport {
    type Error = Error;

    fn send(&self, data: &[u8], target: &Address) -> Result<()> {
        let addr = Self::resolve(target)?;
        self.socket.send_to(data, addr)?;
        Ok(())
    }

    fn recv(&self) -> Result<Option<(Vec<u8>, Address)>> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        match self.socket.recv_from(&mut buf) {
            Ok((len, source)) => {
                buf.truncate(len);
                Ok(Some((buf, Address::Socket(source))))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            // ICMP port-unreachable from an earlier send surfaces here on some
            // platforms; the datagram layer makes no promises, so skip it.
            Err(e) if e.kind() == ErrorKind::ConnectionReset => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn local_addr(&self) -> Option<Address> {
        self.socket.local_addr().ok().map(Address::Socket)
    }
}
