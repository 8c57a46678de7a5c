/*!
 * Byte Store
 *
 * Reads and writes uninterpreted byte payloads: ciphertexts, detached
 * signatures and raw key bytes all pass through here unchanged.
 */

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{CryptoError, CryptoResult};

/// Fail with `NotFound` unless `path` exists
///
/// Callers check existence before any decode attempt so that a wrong path is
/// never reported as a decoding problem.
pub(crate) fn ensure_exists(path: &Path) -> CryptoResult<()> {
    if !path.exists() {
        log::debug!("{} is missing", path.display());
        return Err(CryptoError::not_found(path));
    }
    Ok(())
}

/// Write `bytes` to `path`, replacing any previous content
///
/// The file is created if absent and truncated otherwise. All bytes are
/// flushed to the device before this returns.
pub fn store<P: AsRef<Path>>(path: P, bytes: &[u8]) -> CryptoResult<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| store_failure(path, e))?;

    file.write_all(bytes).map_err(|e| store_failure(path, e))?;
    file.sync_all().map_err(|e| store_failure(path, e))?;

    log::debug!("Stored {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

// A missing parent directory is an I/O fault for writes, not a NotFound
fn store_failure(path: &Path, err: std::io::Error) -> CryptoError {
    CryptoError::io_failure("store", &format!("{}: {}", path.display(), err))
}

/// Read the full content of an existing file
pub fn read<P: AsRef<Path>>(path: P) -> CryptoResult<Vec<u8>> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let mut file = File::open(path).map_err(|e| CryptoError::from_io("read", path, e))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| CryptoError::from_io("read", path, e))?;

    log::debug!("Read {} bytes from {}", contents.len(), path.display());
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");

        store(&path, b"first payload").unwrap();
        assert_eq!(read(&path).unwrap(), b"first payload");
    }

    #[test]
    fn test_store_overwrites_entire_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");

        store(&path, &[0xFF; 64]).unwrap();
        store(&path, &[0x01, 0x02]).unwrap();
        assert_eq!(read(&path).unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn test_empty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");

        store(&path, &[]).unwrap();
        assert!(read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, CryptoError::NotFound { .. }));
    }

    #[test]
    fn test_store_into_missing_directory_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("payload.bin");
        let err = store(&path, b"data").unwrap_err();
        assert!(matches!(err, CryptoError::IoFailure { .. }));
    }
}
