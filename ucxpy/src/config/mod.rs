//! UCX options and the environment they are merged with.
//!
//! UCX reads `UCX_*` variables itself when a context is created. Options
//! given here are applied on top of that with `ucp_config_modify`, unless
//! `env_takes_precedence` is set, in which case any option that is also
//! present in the environment is dropped and the environment wins.
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use crate::error::Result;

mod transport;
pub use transport::{
    Transport,
    TransportSelection,
};

/// Environment variable naming the network interface to use.
pub const IFNAME_ENV: &str = "UCXPY_IFNAME";
const UCX_ENV_PREFIX: &str = "UCX_";

/// Option names are stored upper-case and without the `UCX_` prefix, the
/// form `ucp_config_modify` expects.
pub fn normalize_key(key: &str) -> String {
    let key = key.trim().to_ascii_uppercase();
    match key.strip_prefix(UCX_ENV_PREFIX) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => key,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    options: BTreeMap<String, String>,
    ifname: Option<String>,
    env_takes_precedence: bool,
    #[serde(skip)]
    env: BTreeMap<String, String>,
    #[serde(skip)]
    env_ifname: Option<String>,
}

/// On-disk form of a [`Config`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    options: BTreeMap<String, String>,
    ifname: Option<String>,
    env_takes_precedence: bool,
}

impl Config {
    #[inline]
    pub fn new() -> Config {
        Config::default()
    }

    /// Config seeded with a snapshot of the process environment.
    pub fn from_env() -> Config {
        Config::new().with_env(env::vars())
    }

    /// Parse a YAML document such as
    ///
    /// ```yaml
    /// options:
    ///   TLS: tcp,sockcm
    ///   SOCKADDR_TLS_PRIORITY: sockcm
    /// ifname: eth0
    /// env_takes_precedence: false
    /// ```
    pub fn from_yaml_str(s: &str) -> Result<Config> {
        let file: ConfigFile = serde_yaml::from_str(s)?;
        let mut config = Config::new().env_takes_precedence(file.env_takes_precedence);
        for (key, value) in file.options {
            config = config.option(key, value);
        }
        if let Some(ifname) = file.ifname {
            config = config.ifname(ifname);
        }
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        debug!("loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Config::from_yaml_str(&contents)
    }

    pub fn option<K, V>(mut self, key: K, value: V) -> Config
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let key = normalize_key(key.as_ref());
        let value = value.into();
        trace!("option {}={}", key, value);
        self.options.insert(key, value);
        self
    }

    pub fn ifname<S: Into<String>>(mut self, ifname: S) -> Config {
        self.ifname = Some(ifname.into());
        self
    }

    pub fn env_takes_precedence(mut self, yes: bool) -> Config {
        self.env_takes_precedence = yes;
        self
    }

    /// Replace the environment snapshot. Only `UCX_*` and
    /// [`IFNAME_ENV`] are kept.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Config
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.env.clear();
        self.env_ifname = None;
        for (key, value) in vars {
            let key = key.as_ref();
            if key == IFNAME_ENV {
                self.env_ifname = Some(value.into());
            } else if key.starts_with(UCX_ENV_PREFIX) && key.len() > UCX_ENV_PREFIX.len() {
                self.env.insert(normalize_key(key), value.into());
            }
        }
        self
    }

    fn shadowed(&self, key: &str) -> bool {
        self.env_takes_precedence && self.env.contains_key(key)
    }

    /// Options to apply on top of what UCX reads from the environment.
    pub fn explicit_options(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.options.iter().filter_map(move |(key, value)| {
            if self.shadowed(key) {
                debug!("UCX_{} is set in the environment, ignoring option {}={}",
                       key, key, value);
                None
            } else {
                Some((key.as_str(), value.as_str()))
            }
        })
    }

    /// The options UCX ends up with: environment overlaid by explicit
    /// options.
    pub fn effective(&self) -> BTreeMap<String, String> {
        let mut merged = self.env.clone();
        for (key, value) in self.explicit_options() {
            merged.insert(key.to_string(), value.to_string());
        }
        merged
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        match self.options.get(&key) {
            Some(value) if !self.shadowed(&key) => Some(value.as_str()),
            _ => self.env.get(&key).map(String::as_str),
        }
    }

    /// Parsed `TLS` option, if one is set.
    pub fn transports(&self) -> Result<Option<TransportSelection>> {
        self.get("TLS").map(str::parse::<TransportSelection>).transpose()
    }

    /// Interface to resolve the local address on: the explicit one, else
    /// `UCXPY_IFNAME`.
    pub fn interface(&self) -> Option<&str> {
        self.ifname.as_deref().or(self.env_ifname.as_deref())
    }
}

/// Parse the `UCX_NAME=value` listing `ucp_config_print` produces into
/// normalized option names. Comment and blank lines are skipped.
pub fn parse_option_listing(listing: &str) -> BTreeMap<String, String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (normalize_key(key), value.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(normalize_key("ucx_tls"), "TLS");
        assert_eq!(normalize_key("TLS"), "TLS");
        assert_eq!(normalize_key(" net_devices "), "NET_DEVICES");
        assert_eq!(normalize_key("UCX_"), "UCX_");

        let config = Config::new().option("ucx_tls", "tcp");
        assert_eq!(config.get("TLS"), Some("tcp"));
        assert_eq!(config.get("UCX_TLS"), Some("tcp"));
    }

    #[test]
    fn options_override_env_by_default() {
        let config = Config::new()
            .option("TLS", "tcp")
            .with_env(env(&[("UCX_TLS", "rc"), ("UCX_NET_DEVICES", "mlx5_0:1"), ("HOME", "/root")]));
        assert_eq!(config.get("TLS"), Some("tcp"));
        assert_eq!(config.explicit_options().collect::<Vec<_>>(), vec![("TLS", "tcp")]);
        let effective = config.effective();
        assert_eq!(effective.len(), 2);
        assert_eq!(effective["TLS"], "tcp");
        assert_eq!(effective["NET_DEVICES"], "mlx5_0:1");
    }

    #[test]
    fn env_takes_precedence_drops_options() {
        let config = Config::new()
            .option("TLS", "tcp")
            .option("MEMTYPE_CACHE", "n")
            .env_takes_precedence(true)
            .with_env(env(&[("UCX_TLS", "rc")]));
        assert_eq!(config.get("TLS"), Some("rc"));
        assert_eq!(
            config.explicit_options().collect::<Vec<_>>(),
            vec![("MEMTYPE_CACHE", "n")],
        );
        assert_eq!(config.effective()["TLS"], "rc");
    }

    #[test]
    fn transports_from_option() {
        let config = Config::new().option("TLS", "^cuda");
        let tls = config.transports().unwrap().unwrap();
        assert!(tls.exclude);
        assert!(!tls.allows(&Transport::CudaIpc));

        assert_eq!(Config::new().transports().unwrap(), None);
        assert!(matches!(
            Config::new().option("TLS", "tcp,,sm").transports(),
            Err(Error::InvalidTransports(_)),
        ));
    }

    #[test]
    fn interface_selection() {
        let config = Config::new().with_env(env(&[("UCXPY_IFNAME", "ib0")]));
        assert_eq!(config.interface(), Some("ib0"));
        let config = config.ifname("eth0");
        assert_eq!(config.interface(), Some("eth0"));
        assert_eq!(Config::new().interface(), None);
    }

    #[test]
    fn from_env_snapshots_ucx_variables() {
        env::set_var("UCX_UCXPY_FROM_ENV_CHECK", "yes");
        let config = Config::from_env();
        env::remove_var("UCX_UCXPY_FROM_ENV_CHECK");
        assert_eq!(config.get("UCXPY_FROM_ENV_CHECK"), Some("yes"));
        assert_eq!(config.effective()["UCXPY_FROM_ENV_CHECK"], "yes");
    }

    #[test]
    fn option_listing() {
        let listing = "#\n# UCX configuration\n#\nUCX_NET_DEVICES=all\nUCX_TLS=tcp,sm\n\nUCX_RNDV_THRESH=auto\n";
        let options = parse_option_listing(listing);
        assert_eq!(options.len(), 3);
        assert_eq!(options["NET_DEVICES"], "all");
        assert_eq!(options["TLS"], "tcp,sm");
        assert_eq!(options["RNDV_THRESH"], "auto");
    }

    #[test]
    fn yaml() {
        let config = Config::from_yaml_str(
            "options:\n  ucx_tls: tcp,sockcm\n  SOCKADDR_TLS_PRIORITY: sockcm\nifname: lo\nenv_takes_precedence: true\n",
        )
        .unwrap();
        assert_eq!(config.get("TLS"), Some("tcp,sockcm"));
        assert_eq!(config.get("SOCKADDR_TLS_PRIORITY"), Some("sockcm"));
        assert_eq!(config.interface(), Some("lo"));

        assert!(matches!(Config::from_yaml_str("bogus: 1"), Err(Error::Yaml(_))));
    }
}
