use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CredentialError {
    #[error("Failed to open credential file: {0}")]
    Open(String),
    #[error("Failed to read credential: {0}")]
    Read(String),
    #[error("Failed to close credential file: {0}")]
    Close(String),
    #[error("Credential file handle is already closed")]
    Closed,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("No request handler registered")]
    NoHandler,
    #[error("Transport is already listening")]
    AlreadyListening,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    Port(String),
    #[error("Config file error: {0}")]
    File(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToriiError {
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Bind error: {0}")]
    Bind(String),
    #[error("Handler error: {0}")]
    Handler(String),
}
