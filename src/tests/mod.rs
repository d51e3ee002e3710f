#[cfg(test)]
pub(crate) const CA_CERT: &str = include_str!("certs/ca.pem");

#[cfg(test)]
pub(crate) const SERVER_CERT: &str = include_str!("certs/server.pem");
#[cfg(test)]
pub(crate) const SERVER_KEY: &str = include_str!("certs/server.key.pem");

#[cfg(test)]
pub(crate) const SERVER_CERT_DER: &[u8] = include_bytes!("certs/server.der");
#[cfg(test)]
pub(crate) const SERVER_KEY_DER: &[u8] = include_bytes!("certs/server.key.der");

#[cfg(test)]
mod credential;
#[cfg(test)]
mod mock;
#[cfg(test)]
mod stub;
