use std::sync::Arc;

use rustls::{
    pki_types::{pem::PemObject, CertificateDer, PrivateKeyDer},
    server::WebPkiClientVerifier,
    RootCertStore, ServerConfig,
};

use crate::errors::{ToriiError, TransportError};

const PEM_PREFIX: &[u8] = b"-----BEGIN";

/// Materialized secrets used to build a TLS context.
#[derive(Clone)]
pub struct TlsMaterial {
    pub cert: Vec<u8>,
    pub key: Vec<u8>,
    pub ca: Option<Vec<u8>>,
}

pub struct TlsFactory;

impl TlsFactory {
    /// Builds a rustls server configuration from certificate, key and
    /// optional CA, each given as PEM or DER.
    ///
    /// When a CA is present, clients may present a certificate signed by it;
    /// clients without certificate are still accepted.
    pub fn create_tls_config(
        material: &TlsMaterial,
        alpn_protocols: Vec<Vec<u8>>,
    ) -> Result<ServerConfig, ToriiError> {
        let certs = parse_certs(&material.cert)?;
        if certs.is_empty() {
            return Err(tls_error("No certificate found"));
        }

        let key = parse_private_key(&material.key)?;

        let builder = ServerConfig::builder();
        let mut config = match &material.ca {
            Some(ca) => {
                let mut roots = RootCertStore::empty();
                for cert in parse_certs(ca)? {
                    roots
                        .add(cert)
                        .map_err(|e| tls_error(&format!("Failed to add CA certificate: {}", e)))?;
                }

                let verifier = WebPkiClientVerifier::builder(Arc::new(roots))
                    .allow_unauthenticated()
                    .build()
                    .map_err(|e| tls_error(&format!("Failed to create client verifier: {}", e)))?;

                builder
                    .with_client_cert_verifier(verifier)
                    .with_single_cert(certs, key)
            }
            None => builder
                .with_no_client_auth()
                .with_single_cert(certs, key),
        }
        .map_err(|e| tls_error(&format!("Failed to create TLS config: {}", e)))?;

        config.alpn_protocols = alpn_protocols;

        Ok(config)
    }
}

fn is_pem(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PEM_PREFIX)
}

fn parse_certs(bytes: &[u8]) -> Result<Vec<CertificateDer<'static>>, ToriiError> {
    if bytes.is_empty() {
        return Err(tls_error("Certificate is empty"));
    }

    if is_pem(bytes) {
        CertificateDer::pem_slice_iter(bytes)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| tls_error(&format!("Failed to parse certificate: {}", e)))
    } else {
        Ok(vec![CertificateDer::from(bytes.to_vec())])
    }
}

fn parse_private_key(bytes: &[u8]) -> Result<PrivateKeyDer<'static>, ToriiError> {
    if bytes.is_empty() {
        return Err(tls_error("Key is empty"));
    }

    if is_pem(bytes) {
        PrivateKeyDer::from_pem_slice(bytes)
            .map_err(|e| tls_error(&format!("Failed to parse private key: {}", e)))
    } else {
        PrivateKeyDer::try_from(bytes.to_vec())
            .map_err(|e| tls_error(&format!("Failed to parse private key: {}", e)))
    }
}

fn tls_error(message: &str) -> ToriiError {
    TransportError::Tls(message.to_string()).into()
}
