//! Content digests of source files.

use std::fmt;
use std::str::FromStr;

use crate::CacheError;

/// Hash algorithm used to fingerprint source files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-1, 160-bit. Fast and the default.
    #[default]
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [Self; 5] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Hash `data`.
    pub fn digest(self, data: &[u8]) -> Digest {
        match self {
            Self::Sha1 => Digest::from_output(<sha1::Sha1 as sha1::Digest>::digest(data)),
            Self::Sha224 => Digest::from_output(<sha2::Sha224 as sha2::Digest>::digest(data)),
            Self::Sha256 => Digest::from_output(<sha2::Sha256 as sha2::Digest>::digest(data)),
            Self::Sha384 => Digest::from_output(<sha2::Sha384 as sha2::Digest>::digest(data)),
            Self::Sha512 => Digest::from_output(<sha2::Sha512 as sha2::Digest>::digest(data)),
        }
    }

    /// Look up an algorithm by name, falling back to the default.
    ///
    /// An unsupported name is reported with a warning and replaced by
    /// [`HashAlgorithm::Sha1`]; it never fails.
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: CacheError| {
            let fallback = Self::default();
            tracing::warn!(
                requested = name,
                fallback = fallback.name(),
                "{err}, using fallback"
            );
            fallback
        })
    }
}

impl FromStr for HashAlgorithm {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|algorithm| {
                algorithm.name().eq_ignore_ascii_case(wanted)
                    || algorithm.name().replace("sha", "sha-").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CacheError::HashAlgorithmUnavailable(s.to_owned()))
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Digest of a source file's exact bytes.
///
/// Displays as lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    fn from_output(output: impl AsRef<[u8]>) -> Self {
        Self(output.as_ref().to_vec())
    }

    /// Wrap raw digest bytes read back from storage.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}
