use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use proptest::prelude::*;
use ucxpy::ucp::{EndpointField, EPParamsFlags, ListenerField};
use ucxpy::{AcceptHandler, EndpointParams, Error, ListenerParams};

proptest! {
    #[test]
    fn listener_port_and_handler_round_trip(port in any::<u16>(), tag in any::<u32>()) {
        let seen = Arc::new(AtomicU32::new(0));
        let ctx = Arc::clone(&seen);
        let handler: AcceptHandler<u32> = Arc::new(move |v| ctx.store(v, Ordering::SeqCst));

        let params = ListenerParams::new(port, |_: u32| ())
            .shared_accept_handler(Arc::clone(&handler));
        prop_assert_eq!(params.port(), Some(port));
        prop_assert!(Arc::ptr_eq(params.get_accept_handler().unwrap(), &handler));
        prop_assert!(params.accept(tag));
        prop_assert_eq!(seen.load(Ordering::SeqCst), tag);
    }

    #[test]
    fn ipv4_endpoint_round_trip(octets in any::<[u8; 4]>(), port in any::<u16>()) {
        let ip = Ipv4Addr::from(octets);
        let params = EndpointParams::new(&ip.to_string(), port).unwrap();
        prop_assert_eq!(params.socket_addr(), Some(SocketAddr::new(IpAddr::V4(ip), port)));
    }

    #[test]
    fn ipv6_endpoint_round_trip(segments in any::<[u16; 8]>(), port in any::<u16>()) {
        let ip = Ipv6Addr::from(segments);
        let params = EndpointParams::new(&ip.to_string(), port).unwrap();
        prop_assert_eq!(params.socket_addr(), Some(SocketAddr::new(IpAddr::V6(ip), port)));
        prop_assert!(params.get_sockaddr().unwrap().is_ipv6());
    }

    #[test]
    fn garbage_never_builds(s in "[a-z\\-]{1,16}") {
        let is_addr_parse = matches!(EndpointParams::new(&s, 1), Err(Error::AddressParse { .. }));
        prop_assert!(is_addr_parse);
    }
}

#[test]
fn loopback_endpoint_scenario() {
    let params = EndpointParams::new("127.0.0.1", 1234).unwrap();
    let addr = params.socket_addr().unwrap();
    assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(addr.port(), 1234);
    assert_eq!(params.field_mask(), EndpointField::FLAGS | EndpointField::SOCK_ADDR);
    assert_eq!(params.get_flags(), EPParamsFlags::CLIENT_SERVER);
    drop(params);
}

#[test]
fn ephemeral_listener_scenario() {
    let params = ListenerParams::<()>::new(0, |_| ());
    assert_eq!(params.port(), Some(0));
    assert_eq!(
        params.field_mask(),
        ListenerField::SOCK_ADDR | ListenerField::ACCEPT_HANDLER,
    );
}

#[test]
fn malformed_addresses() {
    for input in ["999.999.999.999", "not-an-ip"] {
        let err = EndpointParams::new(input, 1234).unwrap_err();
        assert_eq!(err.to_string(), format!("invalid IP address {:?}", input));
    }
}

#[test]
fn params_can_cross_threads() {
    let hits = Arc::new(AtomicU32::new(0));
    let ctx = Arc::clone(&hits);
    let params = ListenerParams::new(4242, move |n: u32| {
        ctx.fetch_add(n, Ordering::SeqCst);
    });
    std::thread::spawn(move || {
        assert!(params.accept(5));
    })
    .join()
    .unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 5);
}
