//! Digest engine: file fingerprints for a selectable algorithm family.
//!
//! Standard digests (MD5 and the SHA-1/SHA-2 family) go through the
//! RustCrypto `DynDigest` interface. CRC32 is the odd one out: it is not a
//! cryptographic digest, so it is exposed behind the same `update` /
//! `digest` / `hexdigest` surface by [`ChecksumHasher`].
//!
//! # Examples
//!
//! ```
//! use hashtool::digest::{Algorithm, ChecksumHasher};
//!
//! let mut hasher = ChecksumHasher::new(Algorithm::Sha256);
//! hasher.update(b"abc");
//! assert_eq!(
//!     hasher.hexdigest(),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//! ```

use crate::error::HashtoolError;
use anyhow::{Context, Result};
use ::digest::DynDigest;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{Level, debug, span};

/// Read buffer placed under the block-wise reader so that small blocks do
/// not turn into one syscall each.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Supported hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// MD5 (128 bit)
    Md5,
    /// SHA-1 (160 bit)
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// CRC-32 (IEEE), non-cryptographic
    Crc32,
}

impl Algorithm {
    /// Every supported algorithm, in the order they are advertised.
    pub const ALL: [Self; 7] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Crc32,
    ];

    /// Lowercase name, also used as the manifest file extension.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Crc32 => "crc32",
        }
    }

    /// Size of the blocks fed into the hash state.
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Self::Sha384 | Self::Sha512 => 128,
            _ => 64,
        }
    }

    /// Length of the raw digest in bytes.
    #[must_use]
    pub const fn digest_size(self) -> usize {
        match self {
            Self::Crc32 => 4,
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Default manifest file name written by the generator, e.g. `checksums.sha256`.
    #[must_use]
    pub fn default_manifest_name(self) -> String {
        format!("{}.{}", crate::DEFAULT_MANIFEST_STEM, self.name())
    }

    /// Default glob used by the verifier to find manifests, e.g. `*.sha256`.
    #[must_use]
    pub fn default_checkfile_glob(self) -> String {
        format!("*.{}", self.name())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashtoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| HashtoolError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Incremental hash state over either a standard digest or CRC32.
pub enum ChecksumHasher {
    /// MD5 / SHA family through the `digest` crate
    Standard {
        /// Which algorithm the state belongs to
        algorithm: Algorithm,
        /// Boxed digest state
        state: Box<dyn DynDigest>,
    },
    /// Running CRC32 over everything fed so far
    Crc32(crc32fast::Hasher),
}

impl ChecksumHasher {
    /// Fresh hash state for `algorithm`.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        let state: Box<dyn DynDigest> = match algorithm {
            Algorithm::Crc32 => return Self::Crc32(crc32fast::Hasher::new()),
            Algorithm::Md5 => Box::new(md5::Md5::default()),
            Algorithm::Sha1 => Box::new(sha1::Sha1::default()),
            Algorithm::Sha224 => Box::new(sha2::Sha224::default()),
            Algorithm::Sha256 => Box::new(sha2::Sha256::default()),
            Algorithm::Sha384 => Box::new(sha2::Sha384::default()),
            Algorithm::Sha512 => Box::new(sha2::Sha512::default()),
        };
        Self::Standard { algorithm, state }
    }

    /// Algorithm this state computes.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Standard { algorithm, .. } => *algorithm,
            Self::Crc32(_) => Algorithm::Crc32,
        }
    }

    /// Feed more bytes into the state.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Standard { state, .. } => state.update(data),
            Self::Crc32(hasher) => hasher.update(data),
        }
    }

    /// Raw digest of everything fed so far. Does not consume the state.
    ///
    /// For CRC32 this is the big-endian encoding of the 32-bit checksum.
    #[must_use]
    pub fn digest(&self) -> Vec<u8> {
        let bytes = match self {
            Self::Standard { state, .. } => state.box_clone().finalize().into_vec(),
            Self::Crc32(hasher) => hasher.clone().finalize().to_be_bytes().to_vec(),
        };
        debug_assert_eq!(bytes.len(), self.algorithm().digest_size());
        bytes
    }

    /// Lowercase hexadecimal digest.
    ///
    /// CRC32 values are printed without zero padding, which is the form
    /// existing `.crc32` manifests carry.
    #[must_use]
    pub fn hexdigest(&self) -> String {
        match self {
            Self::Standard { .. } => hex::encode(self.digest()),
            Self::Crc32(hasher) => format!("{:x}", hasher.clone().finalize()),
        }
    }
}

impl fmt::Debug for ChecksumHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumHasher")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// Hash everything `reader` yields, one algorithm block at a time.
///
/// # Errors
///
/// Returns any read error other than `Interrupted`.
pub fn hash_reader<R: Read>(algorithm: Algorithm, mut reader: R) -> io::Result<String> {
    let mut hasher = ChecksumHasher::new(algorithm);
    let mut block = vec![0u8; algorithm.block_size()];

    loop {
        match reader.read(&mut block) {
            Ok(0) => break,
            Ok(n) => hasher.update(&block[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(hasher.hexdigest())
}

/// Hash the full contents of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn hash_file(algorithm: Algorithm, path: &Path) -> Result<String> {
    let span = span!(Level::DEBUG, "hash_file", path = %path.display(), %algorithm);
    let _guard = span.enter();

    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    let hex = hash_reader(algorithm, reader)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    debug!(digest = %hex, "File hashed");
    Ok(hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("md5".parse::<Algorithm>().unwrap(), Algorithm::Md5);
        assert_eq!("SHA256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!(" crc32 ".parse::<Algorithm>().unwrap(), Algorithm::Crc32);
    }

    #[test]
    fn test_parse_unknown_algorithm() {
        let err = "blake3".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, HashtoolError::UnsupportedAlgorithm(ref name) if name == "blake3"));
    }

    #[test]
    fn test_names_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
    }

    #[test]
    fn test_default_names() {
        assert_eq!(Algorithm::Sha1.default_manifest_name(), "checksums.sha1");
        assert_eq!(Algorithm::Crc32.default_checkfile_glob(), "*.crc32");
    }

    #[test]
    fn test_digest_sizes_match_output() {
        for algorithm in Algorithm::ALL {
            let hasher = ChecksumHasher::new(algorithm);
            assert_eq!(hasher.digest().len(), algorithm.digest_size(), "{algorithm}");
        }
    }

    #[test]
    fn test_incremental_equals_one_shot() {
        let data = b"The quick brown fox jumps over the lazy dog";
        for algorithm in Algorithm::ALL {
            let mut whole = ChecksumHasher::new(algorithm);
            whole.update(data);

            let mut pieces = ChecksumHasher::new(algorithm);
            for chunk in data.chunks(7) {
                pieces.update(chunk);
            }

            assert_eq!(whole.hexdigest(), pieces.hexdigest(), "{algorithm}");
        }
    }

    #[test]
    fn test_digest_does_not_consume_state() {
        let mut hasher = ChecksumHasher::new(Algorithm::Md5);
        hasher.update(b"abc");
        let first = hasher.hexdigest();
        assert_eq!(first, hasher.hexdigest());
        hasher.update(b"def");
        assert_ne!(first, hasher.hexdigest());
    }

    #[test]
    fn test_crc32_hex_is_unpadded() {
        // crc32("a") = 0xe8b7be43, crc32("") = 0
        let mut hasher = ChecksumHasher::new(Algorithm::Crc32);
        hasher.update(b"a");
        assert_eq!(hasher.hexdigest(), "e8b7be43");
        assert_eq!(hasher.digest(), vec![0xe8, 0xb7, 0xbe, 0x43]);

        let mut empty = ChecksumHasher::new(Algorithm::Crc32);
        empty.update(b"");
        assert_eq!(empty.hexdigest(), "0");
    }

    #[test]
    fn test_hash_file_matches_hash_reader() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.bin");
        let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content)?;

        for algorithm in Algorithm::ALL {
            let from_file = hash_file(algorithm, &path)?;
            let from_memory = hash_reader(algorithm, content.as_slice())?;
            assert_eq!(from_file, from_memory, "{algorithm}");
        }
        Ok(())
    }

    #[test]
    fn test_hash_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = hash_file(Algorithm::Sha1, &dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
