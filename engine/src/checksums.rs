//! Checksum computation for verify-after-copy.
//!
//! Disc images are large and a silent truncation or corruption during
//! copy renders them unbootable, so the engine can optionally compare
//! source and destination checksums after each file copy.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use crate::error::EngineError;

/// Supported checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// CRC32 (fast, 32-bit)
    Crc32,
    /// MD5 (deprecated, but included for compatibility)
    Md5,
    /// SHA-256 (cryptographic, 256-bit)
    Sha256,
    /// BLAKE3 (modern, fast, 256-bit)
    Blake3,
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crc32 => write!(f, "crc32"),
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

impl ChecksumAlgorithm {
    /// Parse algorithm from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "crc32" => Some(Self::Crc32),
            "md5" => Some(Self::Md5),
            "sha256" => Some(Self::Sha256),
            "blake3" => Some(Self::Blake3),
            _ => None,
        }
    }
}

/// A computed checksum value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumValue {
    algorithm: ChecksumAlgorithm,
    hex: String,
}

impl ChecksumValue {
    /// Get the algorithm
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Get the hex string representation
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ChecksumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}

enum Hasher {
    Crc32(u32),
    Md5(md5::Context),
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Crc32 => Hasher::Crc32(!0u32),
            ChecksumAlgorithm::Md5 => Hasher::Md5(md5::Context::new()),
            ChecksumAlgorithm::Sha256 => {
                use sha2::Digest;
                Hasher::Sha256(sha2::Sha256::new())
            }
            ChecksumAlgorithm::Blake3 => Hasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Crc32(crc) => {
                for &byte in data {
                    *crc ^= byte as u32;
                    for _ in 0..8 {
                        *crc = if *crc & 1 == 1 {
                            (*crc >> 1) ^ 0xedb8_8320
                        } else {
                            *crc >> 1
                        };
                    }
                }
            }
            Hasher::Md5(context) => context.consume(data),
            Hasher::Sha256(hasher) => {
                use sha2::Digest;
                hasher.update(data);
            }
            Hasher::Blake3(hasher) => {
                hasher.update(data);
            }
        }
    }

    fn finalize(self, algorithm: ChecksumAlgorithm) -> ChecksumValue {
        let hex = match self {
            Hasher::Crc32(crc) => format!("{:08x}", !crc),
            Hasher::Md5(context) => format!("{:x}", context.compute()),
            Hasher::Sha256(hasher) => {
                use sha2::Digest;
                hasher
                    .finalize()
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect()
            }
            Hasher::Blake3(hasher) => hasher.finalize().to_hex().to_string(),
        };
        ChecksumValue { algorithm, hex }
    }
}

/// Compute the checksum of a file by streaming its contents.
///
/// # Errors
/// Returns EngineError::ReadError if the file cannot be read
pub fn compute_file_checksum(
    path: &Path,
    algorithm: ChecksumAlgorithm,
) -> Result<ChecksumValue, EngineError> {
    let mut file = fs::File::open(path).map_err(|e| EngineError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Hasher::new(algorithm);
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer).map_err(|e| EngineError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hasher.finalize(algorithm))
}

/// Compare the checksums of a source file and its copy.
///
/// # Returns
/// true if the checksums match
///
/// # Errors
/// Returns EngineError if either file cannot be read
pub fn verify_copy(
    src: &Path,
    dst: &Path,
    algorithm: ChecksumAlgorithm,
) -> Result<bool, EngineError> {
    let src_checksum = compute_file_checksum(src, algorithm)?;
    let dst_checksum = compute_file_checksum(dst, algorithm)?;
    Ok(src_checksum == dst_checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("file.bin");
        fs::write(&path, content).expect("Failed to write file");
        (dir, path)
    }

    #[test]
    fn test_crc32_known_value() {
        let (_dir, path) = write_temp(b"123456789");
        let checksum = compute_file_checksum(&path, ChecksumAlgorithm::Crc32).unwrap();
        assert_eq!(checksum.hex(), "cbf43926");
    }

    #[test]
    fn test_md5_known_value() {
        let (_dir, path) = write_temp(b"abc");
        let checksum = compute_file_checksum(&path, ChecksumAlgorithm::Md5).unwrap();
        assert_eq!(checksum.hex(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha256_known_value() {
        let (_dir, path) = write_temp(b"abc");
        let checksum = compute_file_checksum(&path, ChecksumAlgorithm::Sha256).unwrap();
        assert_eq!(
            checksum.hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_copy_matches_identical_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let a = dir.path().join("a.iso");
        let b = dir.path().join("b.iso");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        for algorithm in [
            ChecksumAlgorithm::Crc32,
            ChecksumAlgorithm::Md5,
            ChecksumAlgorithm::Sha256,
            ChecksumAlgorithm::Blake3,
        ] {
            assert!(verify_copy(&a, &b, algorithm).unwrap(), "{} mismatch", algorithm);
        }
    }

    #[test]
    fn test_verify_copy_detects_corruption() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let a = dir.path().join("a.iso");
        let b = dir.path().join("b.iso");
        fs::write(&a, b"original").unwrap();
        fs::write(&b, b"originaX").unwrap();

        assert!(!verify_copy(&a, &b, ChecksumAlgorithm::Blake3).unwrap());
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(ChecksumAlgorithm::from_str("SHA256"), Some(ChecksumAlgorithm::Sha256));
        assert_eq!(ChecksumAlgorithm::from_str("blake3"), Some(ChecksumAlgorithm::Blake3));
        assert_eq!(ChecksumAlgorithm::from_str("sha1"), None);
    }
}
