use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process;
use clap::Parser;
use log::{info, warn};
use serde::Serialize;
use ucxpy::{
    iface,
    Config,
    EndpointParams,
    ListenerParams,
    Result,
    TransportSelection,
};

/// Show the UCX configuration and connection parameters this host resolves to
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// YAML file with `options`, `ifname` and `env_takes_precedence`
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Network interface to take the local address from (overrides UCXPY_IFNAME)
    #[arg(short, long)]
    pub ifname: Option<String>,
    /// Let UCX_* environment variables win over options from the config file
    #[arg(long)]
    pub env_precedence: bool,
    /// Build listener parameters for this port (0 for an ephemeral port)
    #[arg(short, long)]
    pub listen: Option<u16>,
    /// Build endpoint parameters for this IPv4/IPv6 address
    #[arg(long)]
    pub connect_ip: Option<String>,
    /// Port used with --connect-ip
    #[arg(long, default_value_t = 0)]
    pub connect_port: u16,
}

#[derive(Serialize)]
struct ParamsReport {
    sockaddr: Option<SocketAddr>,
    field_mask: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    ucx_version: Option<String>,
    config: &'a Config,
    effective_options: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ucx_options: Option<BTreeMap<String, String>>,
    transports: Option<TransportSelection>,
    interface: Option<&'a str>,
    address: Option<IpAddr>,
    listener: Option<ParamsReport>,
    endpoint: Option<ParamsReport>,
}

#[cfg(feature = "ucx")]
fn ucx_version() -> Option<String> {
    let (major, minor, release) = ucxpy::ucp::version();
    Some(format!("{}.{}.{}", major, minor, release))
}

#[cfg(not(feature = "ucx"))]
fn ucx_version() -> Option<String> {
    None
}

#[cfg(feature = "ucx")]
fn ucx_options(config: &Config) -> Result<Option<BTreeMap<String, String>>> {
    ucxpy::ucp::config(config).map(Some)
}

#[cfg(not(feature = "ucx"))]
fn ucx_options(_config: &Config) -> Result<Option<BTreeMap<String, String>>> {
    Ok(None)
}

fn run(args: Args) -> Result<String> {
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::new(),
    };
    config = config.with_env(std::env::vars());
    if args.env_precedence {
        config = config.env_takes_precedence(true);
    }
    if let Some(ifname) = &args.ifname {
        config = config.ifname(ifname.clone());
    }

    let address = match config.interface() {
        Some(ifname) => Some(iface::get_address(Some(ifname))?),
        None => match iface::get_address(None) {
            Ok(ip) => Some(ip),
            Err(err) => {
                warn!("could not pick a local address: {}", err);
                None
            }
        },
    };

    let listener = args.listen.map(|port| {
        let params = ListenerParams::<()>::new(port, |_| ());
        ParamsReport {
            sockaddr: params.socket_addr(),
            field_mask: format!("{:#x}", params.field_mask()),
            flags: None,
        }
    });

    let endpoint = match &args.connect_ip {
        Some(ip) => {
            let params = EndpointParams::new(ip, args.connect_port)?;
            Some(ParamsReport {
                sockaddr: params.socket_addr(),
                field_mask: format!("{:#x}", params.field_mask()),
                flags: Some(format!("{:#x}", params.get_flags())),
            })
        }
        None => None,
    };

    let report = Report {
        ucx_version: ucx_version(),
        config: &config,
        effective_options: config.effective(),
        ucx_options: ucx_options(&config)?,
        transports: config.transports()?,
        interface: config.interface(),
        address,
        listener,
        endpoint,
    };
    info!("built report");
    Ok(serde_json::to_string_pretty(&report).expect("report is always serializable"))
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(out) => println!("{}", out),
        Err(err) => {
            eprintln!("ucx-info: {}", err);
            process::exit(1);
        }
    }
}
