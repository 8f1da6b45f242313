use std::default::Default;
use std::net::SocketAddr;
use log::debug;
use crate::error::Result;
use crate::sockaddr::SockAddr;
use super::{
    EndpointField,
    EPParamsFlags,
    ErrHandlingMode,
};

/// Everything needed to actively connect to a remote peer through a
/// socket address. The nested address is released on drop.
#[derive(Debug, Clone, Default)]
pub struct EndpointParams {
    field_mask: u64,
    sockaddr: Option<SockAddr>,
    flags: u32,
    err_mode: Option<ErrHandlingMode>,
}

impl EndpointParams {
    /// Client-server endpoint to `ip:port`.
    ///
    /// `ip` must be an IPv4 or IPv6 literal; anything else is an
    /// [`Error::AddressParse`](crate::Error::AddressParse) and nothing is
    /// built.
    pub fn new(ip: &str, port: u16) -> Result<Self> {
        let addr = SockAddr::parse(ip, port)?;
        debug!("building endpoint params for {}", addr);
        Ok(EndpointParams::default()
            .sockaddr(addr)
            .flags(EPParamsFlags::CLIENT_SERVER))
    }

    #[inline]
    pub fn from_socket_addr(addr: SocketAddr) -> Self {
        EndpointParams::default()
            .sockaddr(addr)
            .flags(EPParamsFlags::CLIENT_SERVER)
    }

    #[inline]
    pub fn sockaddr<A>(mut self, addr: A) -> Self
    where
        A: Into<SockAddr>,
    {
        self.field_mask |= EndpointField::SOCK_ADDR;
        self.sockaddr = Some(addr.into());
        self
    }

    #[inline]
    pub fn flags(mut self, flags: u32) -> Self {
        self.field_mask |= EndpointField::FLAGS;
        self.flags = flags;
        self
    }

    #[inline]
    pub fn err_mode(mut self, err_mode: ErrHandlingMode) -> Self {
        self.field_mask |= EndpointField::ERR_HANDLING_MODE;
        self.err_mode = Some(err_mode);
        self
    }

    #[inline]
    pub fn field_mask(&self) -> u64 {
        self.field_mask
    }

    #[inline]
    pub fn get_sockaddr(&self) -> Option<&SockAddr> {
        self.sockaddr.as_ref()
    }

    #[inline]
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.sockaddr.as_ref().map(SockAddr::to_socket_addr)
    }

    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.sockaddr.as_ref().map(SockAddr::port)
    }

    #[inline]
    pub fn get_flags(&self) -> u32 {
        self.flags
    }

    #[inline]
    pub fn get_err_mode(&self) -> Option<ErrHandlingMode> {
        self.err_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn loopback_scenario() {
        let params = EndpointParams::new("127.0.0.1", 1234).unwrap();
        assert_eq!(params.socket_addr(), Some("127.0.0.1:1234".parse().unwrap()));
        assert_eq!(params.get_flags(), EPParamsFlags::CLIENT_SERVER);
        assert_eq!(
            params.field_mask(),
            EndpointField::FLAGS | EndpointField::SOCK_ADDR,
        );
        assert_eq!(params.get_err_mode(), None);
    }

    #[test]
    fn ipv6_literal() {
        let params = EndpointParams::new("fe80::1", 13337).unwrap();
        let addr = params.get_sockaddr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(params.socket_addr(), Some("[fe80::1]:13337".parse().unwrap()));
    }

    #[test]
    fn sockaddr_len_matches_family() {
        let v4 = EndpointParams::new("127.0.0.1", 1234).unwrap();
        assert_eq!(v4.get_sockaddr().unwrap().len(), 16);
        let v6 = EndpointParams::new("::1", 1234).unwrap();
        assert_eq!(v6.get_sockaddr().unwrap().len(), 28);
    }

    #[test]
    fn port_zero_is_not_rejected() {
        let params = EndpointParams::new("10.1.2.3", 0).unwrap();
        assert_eq!(params.port(), Some(0));
    }

    #[test]
    fn malformed_address_builds_nothing() {
        let err = EndpointParams::new("999.999.999.999", 1234).unwrap_err();
        assert!(matches!(err, Error::AddressParse { ref input, .. } if input == "999.999.999.999"));
        let err = EndpointParams::new("not-an-ip", 1234).unwrap_err();
        assert!(matches!(err, Error::AddressParse { .. }));
    }

    #[test]
    fn err_mode_sets_its_bit() {
        let params = EndpointParams::from_socket_addr("192.0.2.1:9".parse().unwrap())
            .err_mode(ErrHandlingMode::Peer);
        assert_eq!(params.get_err_mode(), Some(ErrHandlingMode::Peer));
        assert_eq!(
            params.field_mask(),
            EndpointField::SOCK_ADDR
                | EndpointField::FLAGS
                | EndpointField::ERR_HANDLING_MODE,
        );
        assert_eq!(ErrHandlingMode::Peer.as_raw(), 1);
    }
}
