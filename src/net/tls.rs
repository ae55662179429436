//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in '{0}'")]
    NoCertificates(PathBuf),

    #[error("no private key found in '{0}'")]
    NoPrivateKey(PathBuf),

    #[error("failed to build TLS configuration: {0}")]
    Config(#[source] std::io::Error),
}

fn open(path: &Path) -> Result<BufReader<File>, TlsError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| TlsError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Check that both files hold usable PEM material before binding.
pub fn validate_pem_files(cert_path: &Path, key_path: &Path) -> Result<(), TlsError> {
    let mut certs = open(cert_path)?;
    let mut count = 0;
    for cert in rustls_pemfile::certs(&mut certs) {
        cert.map_err(|source| TlsError::Read {
            path: cert_path.to_path_buf(),
            source,
        })?;
        count += 1;
    }
    if count == 0 {
        return Err(TlsError::NoCertificates(cert_path.to_path_buf()));
    }

    let mut key = open(key_path)?;
    match rustls_pemfile::private_key(&mut key) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(TlsError::NoPrivateKey(key_path.to_path_buf())),
        Err(source) => Err(TlsError::Read {
            path: key_path.to_path_buf(),
            source,
        }),
    }
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    validate_pem_files(cert_path, key_path)?;
    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(TlsError::Config)
}
