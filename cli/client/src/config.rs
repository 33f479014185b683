//! Deal with client connections via env vars or CLI parameters.

use anyhow::{bail, format_err, Error};
use serde::{Deserialize, Serialize};

use proxmox_router::cli::OutputFormat;
use proxmox_schema::api;

/// Port of the management server's integration API.
pub const DEFAULT_PORT: u16 = 8096;

#[api(
    properties: {
        "output-format": { optional: true },
    },
)]
/// Generic global CLI parameters affecting the output formatting.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FormatArgs {
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// If the host includes a port, return the host and port parts separately.
fn parse_host_port(host: &str) -> Result<Option<(&str, u16)>, Error> {
    if host.ends_with(']') {
        return Ok(None);
    }

    let Some((host, port)) = host.rsplit_once(':') else {
        return Ok(None);
    };

    let port: u16 = port
        .parse()
        .map_err(|_| format_err!("invalid port: {port:?}"))?;

    Ok(Some((host, port)))
}

fn optional_env(name: &str) -> Result<Option<String>, Error> {
    match std::env::var(name) {
        Ok(var) => Ok(Some(var)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => {
            bail!("invalid value in {name} variable");
        }
    }
}

#[api(
    properties: {
        host: { optional: true },
        port: {
            optional: true,
            default: 8096,
        },
        "api-path": { optional: true },
    }
)]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Global command line options regarding the management server to connect to.
pub struct ConnectArgs {
    /// Management server to connect to, optionally as `host:port`.
    pub host: Option<String>,

    /// Port to connect.
    pub port: Option<u16>,

    /// Path of the API on the management server.
    pub api_path: Option<String>,
}

impl ConnectArgs {
    /// Starting from the parsed CLI options, complete the connection parameters from the
    /// environment.
    pub fn finalize(&mut self) -> Result<(), Error> {
        self.fill_from_env()
    }

    /// If the host includes a port, move it to the port option.
    fn normalize(&mut self) -> Result<(), Error> {
        if let Some(host) = &self.host {
            if let Some((host, port)) = parse_host_port(host)? {
                if self.port.is_none() {
                    self.port = Some(port);
                }
                self.host = Some(host.to_string());
            }
        }

        Ok(())
    }

    /// Fill unset parts from the environment.
    fn fill_from_env(&mut self) -> Result<(), Error> {
        self.normalize()?;

        if self.port.is_none() {
            if let Some(port) = optional_env("DIAG_PORT")? {
                self.port = Some(
                    port.parse()
                        .map_err(|_| format_err!("invalid port in DIAG_PORT variable: {port:?}"))?,
                );
            }
        }

        if self.host.is_none() {
            self.host = optional_env("DIAG_HOST")?;
        }

        if self.api_path.is_none() {
            self.api_path = optional_env("DIAG_API_PATH")?;
        }

        self.normalize()
    }

    pub fn url(&self) -> Result<String, Error> {
        Ok(format!(
            "http://{}:{}",
            self.host
                .as_deref()
                .ok_or_else(|| format_err!("no host specified, use --host or DIAG_HOST"))?,
            self.port.unwrap_or(DEFAULT_PORT)
        ))
    }

    pub fn api_path(&self) -> &str {
        self.api_path
            .as_deref()
            .unwrap_or(diag_client::DEFAULT_API_PATH)
    }
}
