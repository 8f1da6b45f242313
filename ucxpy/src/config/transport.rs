//! `UCX_TLS` transport selection.
use std::fmt;
use std::str::FromStr;
use serde::Serialize;
use crate::error::Error;

/// A transport (or transport alias) name accepted by `UCX_TLS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Transport {
    All,
    Tcp,
    /// Every InfiniBand transport.
    Ib,
    Rc,
    RcX,
    Ud,
    UdX,
    Dc,
    DcX,
    /// Every shared memory transport.
    Sm,
    Posix,
    Sysv,
    Cma,
    Knem,
    Xpmem,
    SelfLoop,
    /// Every CUDA transport.
    Cuda,
    CudaCopy,
    CudaIpc,
    GdrCopy,
    RdmaCm,
    SockCm,
    TcpSockCm,
    /// Anything else; UCX decides whether it exists.
    Other(String),
}

impl Transport {
    pub fn from_name(name: &str) -> Transport {
        match name.to_ascii_lowercase().as_str() {
            "all" => Transport::All,
            "tcp" => Transport::Tcp,
            "ib" => Transport::Ib,
            "rc" => Transport::Rc,
            "rc_x" | "rc_mlx5" => Transport::RcX,
            "ud" => Transport::Ud,
            "ud_x" | "ud_mlx5" => Transport::UdX,
            "dc" => Transport::Dc,
            "dc_x" | "dc_mlx5" => Transport::DcX,
            "sm" | "shm" => Transport::Sm,
            "posix" => Transport::Posix,
            "sysv" => Transport::Sysv,
            "cma" => Transport::Cma,
            "knem" => Transport::Knem,
            "xpmem" => Transport::Xpmem,
            "self" => Transport::SelfLoop,
            "cuda" => Transport::Cuda,
            "cuda_copy" => Transport::CudaCopy,
            "cuda_ipc" => Transport::CudaIpc,
            "gdr_copy" => Transport::GdrCopy,
            "rdmacm" => Transport::RdmaCm,
            "sockcm" => Transport::SockCm,
            "tcp_sockcm" => Transport::TcpSockCm,
            other => Transport::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Transport::All => "all",
            Transport::Tcp => "tcp",
            Transport::Ib => "ib",
            Transport::Rc => "rc",
            Transport::RcX => "rc_x",
            Transport::Ud => "ud",
            Transport::UdX => "ud_x",
            Transport::Dc => "dc",
            Transport::DcX => "dc_x",
            Transport::Sm => "sm",
            Transport::Posix => "posix",
            Transport::Sysv => "sysv",
            Transport::Cma => "cma",
            Transport::Knem => "knem",
            Transport::Xpmem => "xpmem",
            Transport::SelfLoop => "self",
            Transport::Cuda => "cuda",
            Transport::CudaCopy => "cuda_copy",
            Transport::CudaIpc => "cuda_ipc",
            Transport::GdrCopy => "gdr_copy",
            Transport::RdmaCm => "rdmacm",
            Transport::SockCm => "sockcm",
            Transport::TcpSockCm => "tcp_sockcm",
            Transport::Other(name) => name,
        }
    }

    /// Whether naming `self` in `UCX_TLS` names `other` too.
    pub fn covers(&self, other: &Transport) -> bool {
        use Transport::*;
        if self == other {
            return true;
        }
        match self {
            All => true,
            Ib => matches!(other, Rc | RcX | Ud | UdX | Dc | DcX),
            Rc => *other == RcX,
            Ud => *other == UdX,
            Dc => *other == DcX,
            Sm => matches!(other, Posix | Sysv | Cma | Knem | Xpmem),
            Cuda => matches!(other, CudaCopy | CudaIpc | GdrCopy),
            _ => false,
        }
    }
}

impl From<Transport> for String {
    fn from(transport: Transport) -> String {
        transport.name().to_string()
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed `UCX_TLS` value: a list of transports, or with a leading `^`,
/// every transport except the listed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportSelection {
    pub exclude: bool,
    pub transports: Vec<Transport>,
}

impl TransportSelection {
    pub fn allows(&self, transport: &Transport) -> bool {
        let listed = self.transports.iter().any(|t| t.covers(transport));
        listed != self.exclude
    }
}

impl FromStr for TransportSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (exclude, list) = match s.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if list.trim().is_empty() {
            return Err(Error::InvalidTransports(s.to_string()));
        }
        let transports = list
            .split(',')
            .map(|name| {
                let name = name.trim();
                if name.is_empty() {
                    Err(Error::InvalidTransports(s.to_string()))
                } else {
                    Ok(Transport::from_name(name))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TransportSelection { exclude, transports })
    }
}

impl fmt::Display for TransportSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclude {
            f.write_str("^")?;
        }
        for (i, transport) in self.transports.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", transport)?;
        }
        Ok(())
    }
}
