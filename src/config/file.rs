//! YAML file configuration.
//!
//! ```yaml
//! port: 8443
//! protocol: Http2
//! cert: /etc/torii/server.pem
//! key: /etc/torii/server.key.pem
//! ca: /etc/torii/ca.pem
//! development_messages: false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    config::{credential::CredentialFile, Protocol, ServerConfigurator},
    errors::{ConfigError, ToriiError},
};

pub const CONFIG: &str = "torii.yaml";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    port: Option<u16>,
    protocol: Protocol,
    cert: Option<PathBuf>,
    key: Option<PathBuf>,
    ca: Option<PathBuf>,
    development_messages: bool,
}

impl FileConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ToriiError> {
        serde_yaml_ng::from_str(content).map_err(|e| ConfigError::File(e.to_string()).into())
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ToriiError> {
        let content = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| ConfigError::File(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn cert(&self) -> Option<&Path> {
        self.cert.as_deref()
    }

    pub fn key(&self) -> Option<&Path> {
        self.key.as_deref()
    }

    pub fn ca(&self) -> Option<&Path> {
        self.ca.as_deref()
    }

    pub fn development_messages(&self) -> bool {
        self.development_messages
    }

    /// Opens every configured credential path and hands the open files to a
    /// new [`ServerConfigurator`]. Files are read and closed on resolve.
    pub async fn into_configurator(self) -> Result<ServerConfigurator, ToriiError> {
        let mut configurator = ServerConfigurator::new();

        if let Some(cert) = &self.cert {
            configurator = configurator.set_cert(CredentialFile::open(cert).await?);
        }
        if let Some(key) = &self.key {
            configurator = configurator.set_key(CredentialFile::open(key).await?);
        }
        if let Some(ca) = &self.ca {
            configurator = configurator.set_ca(CredentialFile::open(ca).await?);
        }
        if let Some(port) = self.port {
            configurator = configurator.set_port(port);
        }
        if self.protocol == Protocol::Http1 {
            configurator = configurator.use_http1();
        }
        if self.development_messages {
            configurator = configurator.enable_development_messages();
        }

        Ok(configurator)
    }
}
