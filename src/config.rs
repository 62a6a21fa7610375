//! Server configuration
//!
//! Defaults, overridden by `SHOOTERS_*` environment variables, overridden in
//! turn by command-line flags.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

pub const ENV_BIND: &str = "SHOOTERS_BIND";
pub const ENV_PORT: &str = "SHOOTERS_PORT";
pub const ENV_DATA_FILE: &str = "SHOOTERS_DATA_FILE";
pub const ENV_LOG_DIR: &str = "SHOOTERS_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,
    /// Port to listen on; 0 picks a free one
    pub port: u16,
    /// JSON document holding every shooter and the vocabulary
    pub data_file: PathBuf,
    /// Write logs to a daily rolling file in this directory instead of stderr
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            data_file: PathBuf::from("./data.json"),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `SHOOTERS_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(bind) = lookup(ENV_BIND) {
            config.bind_address = bind;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_port(&port).with_context(|| format!("${ENV_PORT}"))?;
        }
        if let Some(path) = lookup(ENV_DATA_FILE) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }

    /// Apply `--bind`, `--port`, `--data-file` and `--log-dir` flags.
    pub fn apply_args<I>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| anyhow!("missing value for {arg}"))
            };
            match arg.as_str() {
                "--bind" => self.bind_address = value()?,
                "--port" => self.port = parse_port(&value()?)?,
                "--data-file" => self.data_file = PathBuf::from(value()?),
                "--log-dir" => self.log_dir = Some(PathBuf::from(value()?)),
                _ => bail!("unknown argument: {arg}"),
            }
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("invalid port {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_listen_on_port_5000() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.data_file, PathBuf::from("./data.json"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [(ENV_PORT, "8080"), (ENV_DATA_FILE, "/tmp/book.json")]
            .into_iter()
            .collect();
        let config =
            ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_file, PathBuf::from("/tmp/book.json"));
        assert_eq!(config.bind_address, "127.0.0.1");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = ServerConfig::from_lookup(|key| (key == ENV_PORT).then(|| "abc".to_string()));
        assert!(result.is_err());
        assert!(ServerConfig::default()
            .apply_args(args(&["--port", "70000"]))
            .is_err());
    }

    #[test]
    fn flags_override_and_reject_unknown() {
        let config = ServerConfig::default()
            .apply_args(args(&["--bind", "0.0.0.0", "--port", "0", "--log-dir", "logs"]))
            .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:0");
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));

        assert!(ServerConfig::default()
            .apply_args(args(&["--verbose"]))
            .is_err());
        assert!(ServerConfig::default()
            .apply_args(args(&["--data-file"]))
            .is_err());
    }

    #[test]
    #[serial]
    fn reads_process_environment() {
        std::env::set_var(ENV_BIND, "0.0.0.0");
        std::env::set_var(ENV_LOG_DIR, "/var/log/shooters");
        let config = ServerConfig::from_env();
        std::env::remove_var(ENV_BIND);
        std::env::remove_var(ENV_LOG_DIR);

        let config = config.unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/shooters")));
    }
}
