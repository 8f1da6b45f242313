//! Local network interface addresses.
use std::net::{IpAddr, SocketAddr};
use log::debug;
use nix::ifaddrs::{getifaddrs, InterfaceAddress};
use nix::net::if_::InterfaceFlags;
use nix::sys::socket::SockaddrStorage;
use crate::error::{Error, Result};

fn ip_of(addr: &Option<SockaddrStorage>) -> Option<IpAddr> {
    let addr = addr.as_ref()?;
    if let Some(sin) = addr.as_sockaddr_in() {
        Some(SocketAddr::from(std::net::SocketAddrV4::from(*sin)).ip())
    } else {
        addr.as_sockaddr_in6()
            .map(|sin6| SocketAddr::from(std::net::SocketAddrV6::from(*sin6)).ip())
    }
}

/// IPv4 addresses first, then IPv6.
fn pick(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs.iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

fn named(ifaddrs: &[InterfaceAddress], ifname: &str) -> Result<IpAddr> {
    let mut found = false;
    let mut addrs = Vec::new();
    for ifaddr in ifaddrs.iter().filter(|i| i.interface_name == ifname) {
        found = true;
        if let Some(ip) = ip_of(&ifaddr.address) {
            addrs.push(ip);
        }
    }
    if !found {
        return Err(Error::InterfaceNotFound(ifname.to_string()));
    }
    pick(&addrs).ok_or_else(|| Error::NoInterfaceAddress(ifname.to_string()))
}

fn default_address(ifaddrs: &[InterfaceAddress]) -> Result<IpAddr> {
    let up_v4 = |loopback: bool| {
        ifaddrs.iter()
            .filter(|i| i.flags.contains(InterfaceFlags::IFF_UP))
            .filter(|i| i.flags.contains(InterfaceFlags::IFF_LOOPBACK) == loopback)
            .find_map(|i| ip_of(&i.address).filter(IpAddr::is_ipv4)
                          .map(|ip| (i.interface_name.clone(), ip)))
    };
    match up_v4(false).or_else(|| up_v4(true)) {
        Some((name, ip)) => {
            debug!("using interface {} ({})", name, ip);
            Ok(ip)
        }
        None => Err(Error::NoInterfaceAddress("<any>".to_string())),
    }
}

/// Address of the interface `ifname`, or of the first non-loopback
/// interface that is up when `ifname` is `None` (loopback if that is all
/// there is). IPv4 addresses are preferred.
pub fn get_address(ifname: Option<&str>) -> Result<IpAddr> {
    let ifaddrs: Vec<InterfaceAddress> = getifaddrs()?.collect();
    match ifname {
        Some(name) => named(&ifaddrs, name),
        None => default_address(&ifaddrs),
    }
}
