use std::default::Default;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use log::debug;
use crate::sockaddr::SockAddr;
use super::ListenerField;

/// Closure run for every connection a listener accepts. The closure's
/// captures play the role of the C callback's `void *arg`.
pub type AcceptHandler<E> = Arc<dyn Fn(E) + Send + Sync>;

/// Everything needed to open a passive listener.
///
/// `E` is what the accept handler receives; the UCX layer uses
/// `ucp::Endpoint`. The bound address and this object's handler reference
/// are released on drop.
pub struct ListenerParams<E> {
    field_mask: u64,
    sockaddr: Option<SockAddr>,
    accept_handler: Option<AcceptHandler<E>>,
}

impl<E> Default for ListenerParams<E> {
    #[inline]
    fn default() -> Self {
        Self {
            field_mask: 0,
            sockaddr: None,
            accept_handler: None,
        }
    }
}

impl<E> ListenerParams<E> {
    /// Listen on `port` on every local IPv4 interface and hand accepted
    /// connections to `f`. Port 0 asks for an ephemeral port.
    pub fn new<F>(port: u16, f: F) -> Self
    where
        F: Fn(E) + Send + Sync + 'static,
    {
        debug!("building listener params for port {}", port);
        ListenerParams::default()
            .sockaddr(SockAddr::any(port))
            .accept_handler(f)
    }

    #[inline]
    pub fn sockaddr<A>(mut self, addr: A) -> Self
    where
        A: Into<SockAddr>,
    {
        self.field_mask |= ListenerField::SOCK_ADDR;
        self.sockaddr = Some(addr.into());
        self
    }

    #[inline]
    pub fn accept_handler<F>(self, f: F) -> Self
    where
        F: Fn(E) + Send + Sync + 'static,
    {
        self.shared_accept_handler(Arc::new(f))
    }

    /// Install a handler that is also held elsewhere.
    #[inline]
    pub fn shared_accept_handler(mut self, handler: AcceptHandler<E>) -> Self {
        self.field_mask |= ListenerField::ACCEPT_HANDLER;
        self.accept_handler = Some(handler);
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

    /// Port as encoded in the bound address.
    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.sockaddr.as_ref().map(SockAddr::port)
    }

    #[inline]
    pub fn get_accept_handler(&self) -> Option<&AcceptHandler<E>> {
        self.accept_handler.as_ref()
    }

    /// Run the accept handler on `conn`. Returns false if none is set.
    pub fn accept(&self, conn: E) -> bool {
        match &self.accept_handler {
            Some(handler) => {
                handler(conn);
                true
            }
            None => false,
        }
    }
}

impl<E> fmt::Debug for ListenerParams<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerParams")
            .field("field_mask", &format_args!("{:#x}", self.field_mask))
            .field("sockaddr", &self.sockaddr)
            .field("accept_handler", &self.accept_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn new_sets_port_handler_and_mask() {
        let params = ListenerParams::<u32>::new(1234, |_| ());
        assert_eq!(params.port(), Some(1234));
        assert_eq!(
            params.socket_addr().map(|a| a.ip()),
            Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        );
        assert_eq!(
            params.field_mask(),
            ListenerField::SOCK_ADDR | ListenerField::ACCEPT_HANDLER,
        );
        assert!(params.get_accept_handler().is_some());
    }

    #[test]
    fn bound_address_len_is_sockaddr_in() {
        let params = ListenerParams::<()>::new(1234, |_| ());
        assert_eq!(params.get_sockaddr().unwrap().len(), 16);
    }

    #[test]
    fn ephemeral_port_is_accepted() {
        let params = ListenerParams::<()>::new(0, |_| ());
        assert_eq!(params.port(), Some(0));
    }

    #[test]
    fn handler_identity_and_release() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler: AcceptHandler<usize> = Arc::new(move |n| {
            counter.fetch_add(n, Ordering::SeqCst);
        });

        let params = ListenerParams::default()
            .sockaddr(SockAddr::any(7000))
            .shared_accept_handler(Arc::clone(&handler));
        assert!(Arc::ptr_eq(params.get_accept_handler().unwrap(), &handler));
        assert_eq!(Arc::strong_count(&handler), 2);

        assert!(params.accept(3));
        assert!(params.accept(4));
        assert_eq!(calls.load(Ordering::SeqCst), 7);

        drop(params);
        assert_eq!(Arc::strong_count(&handler), 1);
    }

    #[test]
    fn closure_captures_stand_in_for_context() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let ctx = Arc::clone(&seen);
        let params = ListenerParams::new(5555, move |peer: &'static str| {
            ctx.lock().unwrap().push(peer);
        });
        params.accept("a");
        params.accept("b");
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn no_handler() {
        let params = ListenerParams::<u8>::default()
            .sockaddr(SocketAddr::from(([127, 0, 0, 1], 80)));
        assert_eq!(params.field_mask(), ListenerField::SOCK_ADDR);
        assert!(!params.accept(1));
    }

    #[test]
    fn empty_default() {
        let params = ListenerParams::<u8>::default();
        assert_eq!(params.field_mask(), 0);
        assert!(params.port().is_none());
        assert!(params.get_sockaddr().is_none());
    }
}
