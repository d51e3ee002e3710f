//! Certificate, key and CA inputs.
//!
//! A credential slot holds exactly one representation: text, raw bytes or an
//! open file handle. File handles are read once and closed afterwards.

use std::{fmt, future::Future, path::Path, pin::Pin, sync::Arc};

use log::debug;
use tokio::{fs::File, io::AsyncReadExt, sync::Mutex};

use crate::errors::{CredentialError, ToriiError};

pub type CredentialFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ToriiError>> + Send + 'a>>;

/// An open file that can be read in full and closed.
pub trait FileHandle: Send + Sync {
    /// Reads every remaining byte of the file.
    fn read_all(&self) -> CredentialFuture<'_, Vec<u8>>;

    /// Closes the file. Further reads or closes must fail.
    fn close(&self) -> CredentialFuture<'_, ()>;
}

/// Tokio backed [`FileHandle`].
///
/// # Examples
///
/// ```rust,ignore
/// use torii::config::{credential::CredentialFile, ServerConfigurator};
///
/// let cert = CredentialFile::open("/etc/torii/server.pem").await?;
/// let configurator = ServerConfigurator::new().set_cert(cert);
/// ```
pub struct CredentialFile {
    file: Mutex<Option<File>>,
}

impl CredentialFile {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, ToriiError> {
        let file = File::open(path.as_ref())
            .await
            .map_err(|e| {
                CredentialError::Open(format!("{}: {}", path.as_ref().display(), e))
            })?;
        Ok(Self::from_file(file))
    }

    pub fn from_file(file: File) -> Self {
        Self { file: Mutex::new(Some(file)) }
    }
}

impl FileHandle for CredentialFile {
    fn read_all(&self) -> CredentialFuture<'_, Vec<u8>> {
        Box::pin(async move {
            let mut guard = self.file.lock().await;
            let file = guard
                .as_mut()
                .ok_or(CredentialError::Closed)?;

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)
                .await
                .map_err(|e| CredentialError::Read(e.to_string()))?;
            Ok(contents)
        })
    }

    fn close(&self) -> CredentialFuture<'_, ()> {
        Box::pin(async move {
            let file = self
                .file
                .lock()
                .await
                .take()
                .ok_or(CredentialError::Closed)?;

            // Read-only handle, nothing to flush before dropping it.
            drop(file);
            Ok(())
        })
    }
}

/// A certificate, private key or CA input.
#[derive(Clone)]
pub enum Credential {
    Text(String),
    Binary(Vec<u8>),
    File(Arc<dyn FileHandle>),
}

impl Credential {
    pub fn file<H: FileHandle + 'static>(handle: H) -> Self {
        Credential::File(Arc::new(handle))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Credential::File(_))
    }
}

impl fmt::Debug for Credential {
    // Secrets never end up in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Text(text) => write!(f, "Credential::Text({} bytes)", text.len()),
            Credential::Binary(bytes) => write!(f, "Credential::Binary({} bytes)", bytes.len()),
            Credential::File(_) => write!(f, "Credential::File"),
        }
    }
}

impl From<&str> for Credential {
    fn from(text: &str) -> Self {
        Credential::Text(text.to_string())
    }
}

impl From<String> for Credential {
    fn from(text: String) -> Self {
        Credential::Text(text)
    }
}

impl From<Vec<u8>> for Credential {
    fn from(bytes: Vec<u8>) -> Self {
        Credential::Binary(bytes)
    }
}

impl From<&[u8]> for Credential {
    fn from(bytes: &[u8]) -> Self {
        Credential::Binary(bytes.to_vec())
    }
}

impl From<CredentialFile> for Credential {
    fn from(file: CredentialFile) -> Self {
        Credential::file(file)
    }
}

impl From<Arc<dyn FileHandle>> for Credential {
    fn from(handle: Arc<dyn FileHandle>) -> Self {
        Credential::File(handle)
    }
}

/// Turns a credential slot into its secret bytes.
///
/// File handles are read in full and closed only once the read succeeded.
/// An unset slot materializes to `None`.
pub async fn materialize(credential: Option<&Credential>) -> Result<Option<Vec<u8>>, ToriiError> {
    match credential {
        None => Ok(None),
        Some(Credential::Text(text)) => Ok(Some(
            text.as_bytes()
                .to_vec(),
        )),
        Some(Credential::Binary(bytes)) => Ok(Some(bytes.clone())),
        Some(Credential::File(handle)) => {
            let contents = handle
                .read_all()
                .await?;
            handle
                .close()
                .await?;
            debug!("Read {} bytes from credential file", contents.len());
            Ok(Some(contents))
        }
    }
}
