use std::{path::PathBuf, sync::Arc};

use crate::{
    config::credential::{materialize, Credential, CredentialFile, FileHandle},
    errors::{CredentialError, ToriiError},
    tests::{stub::StubFile, SERVER_CERT},
};

fn cert_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/tests/certs/server.pem")
}

#[tokio::test]
async fn test_materialize_unset_slot() -> Result<(), ToriiError> {
    assert_eq!(materialize(None).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_materialize_text_and_binary() -> Result<(), ToriiError> {
    let text = Credential::from("secret");
    assert_eq!(materialize(Some(&text)).await?, Some(b"secret".to_vec()));

    let binary = Credential::from(vec![0u8, 159, 146, 150]);
    assert_eq!(materialize(Some(&binary)).await?, Some(vec![0u8, 159, 146, 150]));
    Ok(())
}

#[tokio::test]
async fn test_materialize_file_reads_then_closes() -> Result<(), ToriiError> {
    let stub = Arc::new(StubFile::with_contents(b"pem bytes"));
    let credential = Credential::File(stub.clone());

    assert_eq!(materialize(Some(&credential)).await?, Some(b"pem bytes".to_vec()));
    assert_eq!(stub.reads(), 1);
    assert_eq!(stub.closes(), 1);

    assert_eq!(
        materialize(Some(&credential))
            .await
            .err(),
        Some(ToriiError::Credential(CredentialError::Closed))
    );
    assert_eq!(stub.reads(), 1);
    Ok(())
}

#[tokio::test]
async fn test_credential_file_reads_whole_file() -> Result<(), ToriiError> {
    let file = CredentialFile::open(cert_path()).await?;

    let contents = file
        .read_all()
        .await?;
    assert_eq!(contents, SERVER_CERT.as_bytes());

    file.close().await?;
    assert_eq!(
        file.read_all()
            .await
            .err(),
        Some(ToriiError::Credential(CredentialError::Closed))
    );
    assert_eq!(
        file.close()
            .await
            .err(),
        Some(ToriiError::Credential(CredentialError::Closed))
    );
    Ok(())
}

#[tokio::test]
async fn test_credential_file_open_missing() {
    let result = CredentialFile::open("/nonexistent/torii/server.pem").await;

    match result {
        Err(ToriiError::Credential(CredentialError::Open(message))) => {
            assert!(message.contains("/nonexistent/torii/server.pem"));
        }
        _ => panic!("Expected Open error"),
    }
}

#[test]
fn test_credential_debug_hides_secrets() {
    let credential = Credential::from("super secret key");
    assert_eq!(format!("{:?}", credential), "Credential::Text(16 bytes)");
    assert!(!Credential::from(vec![1u8]).is_file());
    assert!(Credential::file(StubFile::with_contents(b"")).is_file());
}
