//! Owned socket addresses in the `struct sockaddr` layout UCX consumes.
use std::fmt;
use std::net::{
    IpAddr,
    Ipv4Addr,
    SocketAddr,
    SocketAddrV4,
    SocketAddrV6,
};
use log::trace;
use nix::libc::{sockaddr, socklen_t};
use nix::sys::socket::{
    AddressFamily,
    SockaddrLike,
    SockaddrStorage,
};
use crate::error::{Error, Result};

/// A socket address encoded as a C `sockaddr_in`/`sockaddr_in6`.
///
/// The encoded storage lives on the heap, so the pointer returned by
/// [`SockAddr::as_ptr`] stays valid when the `SockAddr` (or the params
/// object owning it) is moved. It is released when the `SockAddr` drops.
#[derive(Clone, PartialEq, Eq)]
pub struct SockAddr {
    inner: Box<SockaddrStorage>,
}

impl SockAddr {
    /// Address on every local IPv4 interface (`INADDR_ANY`).
    #[inline]
    pub fn any(port: u16) -> SockAddr {
        SockAddr::from(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
    }

    /// Encode a textual IPv4 or IPv6 literal and a port.
    pub fn parse(ip: &str, port: u16) -> Result<SockAddr> {
        let addr: IpAddr = ip.parse().map_err(|source| Error::AddressParse {
            input: ip.to_string(),
            source,
        })?;
        Ok(SockAddr::from(SocketAddr::new(addr, port)))
    }

    /// Decode a sockaddr written by C code (e.g. `ucp_listener_query`).
    ///
    /// Returns `None` for anything other than an IPv4 or IPv6 address.
    ///
    /// # Safety
    ///
    /// `addr` must point to at least `len` readable bytes holding a
    /// sockaddr.
    pub unsafe fn from_raw(addr: *const sockaddr, len: socklen_t) -> Option<SockAddr> {
        let storage = SockaddrStorage::from_raw(addr, Some(len))?;
        match storage.family() {
            Some(AddressFamily::Inet) | Some(AddressFamily::Inet6) => Some(SockAddr {
                inner: Box::new(storage),
            }),
            _ => None,
        }
    }

    /// Decode back into a std address.
    pub fn to_socket_addr(&self) -> SocketAddr {
        if let Some(sin) = self.inner.as_sockaddr_in() {
            SocketAddr::V4(SocketAddrV4::from(*sin))
        } else if let Some(sin6) = self.inner.as_sockaddr_in6() {
            SocketAddr::V6(SocketAddrV6::from(*sin6))
        } else {
            // Every constructor only admits Inet/Inet6 storage.
            unreachable!("SockAddr holds a non-IP address")
        }
    }

    #[inline]
    pub fn ip(&self) -> IpAddr {
        self.to_socket_addr().ip()
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.to_socket_addr().port()
    }

    #[inline]
    pub fn is_ipv6(&self) -> bool {
        self.inner.as_sockaddr_in6().is_some()
    }

    /// Pointer to the encoded `struct sockaddr`.
    #[inline]
    pub fn as_ptr(&self) -> *const sockaddr {
        self.inner.as_ptr()
    }

    /// Length in bytes of the encoded address (not of the storage).
    ///
    /// `SockaddrStorage::len` reports the whole storage for IP families,
    /// so this goes through the concrete address type instead.
    #[inline]
    pub fn len(&self) -> socklen_t {
        if let Some(sin) = self.inner.as_sockaddr_in() {
            sin.len()
        } else if let Some(sin6) = self.inner.as_sockaddr_in6() {
            sin6.len()
        } else {
            unreachable!("SockAddr holds a non-IP address")
        }
    }
}

impl From<SocketAddr> for SockAddr {
    fn from(addr: SocketAddr) -> SockAddr {
        trace!("encoding sockaddr for {}", addr);
        SockAddr {
            inner: Box::new(SockaddrStorage::from(addr)),
        }
    }
}

impl fmt::Debug for SockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SockAddr({})", self.to_socket_addr())
    }
}

impl fmt::Display for SockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_socket_addr(), f)
    }
}
