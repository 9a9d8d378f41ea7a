//! bcrypt password hashing engine.
//!
//! Hash text layout: `$<version>$<cost:02>$<22-char salt><31-char digest>`,
//! with salt and digest in the bcrypt base64 alphabet (`./A-Za-z0-9`, no
//! padding). The key schedule is EksBlowfish repeated `2^cost` times.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use blowfish::Blowfish;
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

pub use licensehub_core::config::auth::{MAX_COST, MIN_COST};

use crate::error::CryptoError;

/// Cost used when none is configured.
pub const DEFAULT_COST: u32 = 12;

/// Raw salt length in bytes.
pub const SALT_LEN: usize = 16;
/// Raw digest length in bytes.
pub const DIGEST_LEN: usize = 23;

const ENCODED_SALT_LEN: usize = 22;
const ENCODED_DIGEST_LEN: usize = 31;
/// Only the first 72 key bytes (NUL included) feed the key schedule.
const MAX_KEY_LEN: usize = 72;

/// "OrpheanBeholderScryDoubt" as big-endian words.
const MAGIC: [u32; 6] = [
    0x4f72_7068,
    0x6561_6e42,
    0x6568_6f6c,
    0x6465_7253,
    0x6372_7944,
    0x6f75_6274,
];

const BCRYPT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// bcrypt version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// `$2$`, the original tag.
    Two,
    /// `$2a$`.
    #[default]
    TwoA,
    /// `$2b$`.
    TwoB,
    /// `$2x$`.
    TwoX,
    /// `$2y$`.
    TwoY,
}

impl Version {
    /// Tag text between the first two `$` separators.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::TwoA => "2a",
            Self::TwoB => "2b",
            Self::TwoX => "2x",
            Self::TwoY => "2y",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" => Ok(Self::Two),
            "2a" => Ok(Self::TwoA),
            "2b" => Ok(Self::TwoB),
            "2x" => Ok(Self::TwoX),
            "2y" => Ok(Self::TwoY),
            _ => Err(CryptoError::MalformedDigest),
        }
    }
}

/// Check a cost factor against the accepted range.
pub fn check_cost(cost: u32) -> Result<u32, CryptoError> {
    if (MIN_COST..=MAX_COST).contains(&cost) {
        Ok(cost)
    } else {
        Err(CryptoError::InvalidCost)
    }
}

/// The `$<version>$<cost>$<salt>` prefix of a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltField<'a> {
    /// Version tag.
    pub version: Version,
    /// Cost factor.
    pub cost: u32,
    /// Decoded salt.
    pub salt: [u8; SALT_LEN],
    /// Salt exactly as it appeared in the input.
    encoded_salt: &'a str,
    /// Whatever follows the salt.
    rest: &'a str,
}

impl<'a> SaltField<'a> {
    /// Parse the prefix of a hash or a bare salt field.
    pub fn parse(text: &'a str) -> Result<Self, CryptoError> {
        let body = text.strip_prefix('$').ok_or(CryptoError::MalformedDigest)?;
        let mut parts = body.splitn(3, '$');
        let version: Version = parts.next().ok_or(CryptoError::MalformedDigest)?.parse()?;
        let cost_text = parts.next().ok_or(CryptoError::MalformedDigest)?;
        let tail = parts.next().ok_or(CryptoError::SaltNotFound)?;

        if cost_text.len() != 2 || !cost_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CryptoError::InvalidCost);
        }
        let cost = cost_text
            .parse::<u32>()
            .map_err(|_| CryptoError::InvalidCost)
            .and_then(check_cost)?;

        if tail.is_empty() {
            return Err(CryptoError::SaltNotFound);
        }
        let encoded_salt = tail.get(..ENCODED_SALT_LEN).ok_or(CryptoError::InvalidSalt)?;
        let decoded = BCRYPT_B64
            .decode(encoded_salt)
            .map_err(|_| CryptoError::InvalidSalt)?;
        let salt: [u8; SALT_LEN] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidSalt)?;

        Ok(Self {
            version,
            cost,
            salt,
            encoded_salt,
            rest: &tail[ENCODED_SALT_LEN..],
        })
    }
}

/// A fully parsed bcrypt hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParts {
    /// Version tag.
    pub version: Version,
    /// Cost factor.
    pub cost: u32,
    /// Decoded salt.
    pub salt: [u8; SALT_LEN],
    /// Decoded digest.
    pub digest: [u8; DIGEST_LEN],
}

impl FromStr for HashParts {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = SaltField::parse(s)?;
        if field.rest.len() != ENCODED_DIGEST_LEN {
            return Err(CryptoError::MalformedDigest);
        }
        let decoded = BCRYPT_B64
            .decode(field.rest)
            .map_err(|_| CryptoError::MalformedDigest)?;
        let digest: [u8; DIGEST_LEN] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::MalformedDigest)?;
        Ok(Self {
            version: field.version,
            cost: field.cost,
            salt: field.salt,
            digest,
        })
    }
}

impl fmt::Display for HashParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${:02}${}{}",
            self.version,
            self.cost,
            BCRYPT_B64.encode(self.salt),
            BCRYPT_B64.encode(self.digest)
        )
    }
}

/// bcrypt encoder with a fixed version and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bcrypt {
    version: Version,
    cost: u32,
}

impl Bcrypt {
    /// Create an encoder; fails with `InvalidCost` outside 4..=31.
    pub fn new(version: Version, cost: u32) -> Result<Self, CryptoError> {
        Ok(Self {
            version,
            cost: check_cost(cost)?,
        })
    }

    /// `$2a$` encoder at the given cost.
    pub fn with_cost(cost: u32) -> Result<Self, CryptoError> {
        Self::new(Version::TwoA, cost)
    }

    /// Cost factor of hashes this encoder produces.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password under a fresh random salt.
    pub fn encode(&self, password: &[u8]) -> String {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        self.encode_with_salt(password, salt)
    }

    /// Hash a password under a caller-supplied salt.
    pub fn encode_with_salt(&self, password: &[u8], salt: [u8; SALT_LEN]) -> String {
        HashParts {
            version: self.version,
            cost: self.cost,
            salt,
            digest: digest(password, &salt, self.cost),
        }
        .to_string()
    }
}

impl Default for Bcrypt {
    fn default() -> Self {
        Self {
            version: Version::TwoA,
            cost: DEFAULT_COST,
        }
    }
}

/// Hash `password` as `$2a$` at `cost` with a fresh salt.
pub fn encode(password: &[u8], cost: u32) -> Result<String, CryptoError> {
    Ok(Bcrypt::with_cost(cost)?.encode(password))
}

/// Recompute a hash from a `$2a$NN$<22 chars>` salt field.
///
/// The salt text is reproduced verbatim, so reference vectors round-trip
/// byte for byte.
pub fn hash_with_salt(password: &[u8], salt_field: &str) -> Result<String, CryptoError> {
    let field = SaltField::parse(salt_field)?;
    let digest = digest(password, &field.salt, field.cost);
    Ok(format!(
        "${}${:02}${}{}",
        field.version,
        field.cost,
        field.encoded_salt,
        BCRYPT_B64.encode(digest)
    ))
}

/// Check a password against a stored hash.
///
/// `Ok(false)` means a wrong password; `Err` means the hash itself is
/// malformed. Digests are compared in constant time.
pub fn matches(password: &[u8], hash: &str) -> Result<bool, CryptoError> {
    let parts: HashParts = hash.parse()?;
    let computed = digest(password, &parts.salt, parts.cost);
    Ok(computed.ct_eq(&parts.digest).into())
}

/// EksBlowfish setup followed by 64 encryptions of the magic text.
fn digest(password: &[u8], salt: &[u8; SALT_LEN], cost: u32) -> [u8; DIGEST_LEN] {
    let mut key = Vec::with_capacity(password.len() + 1);
    key.extend_from_slice(password);
    key.push(0);
    key.truncate(MAX_KEY_LEN);

    let mut state: Blowfish = Blowfish::bc_init_state();
    state.salted_expand_key(salt, &key);
    for _ in 0..(1u64 << cost) {
        state.bc_expand_key(&key);
        state.bc_expand_key(salt);
    }

    let mut words = MAGIC;
    for pair in words.chunks_exact_mut(2) {
        let mut block = [pair[0], pair[1]];
        for _ in 0..64 {
            block = state.bc_encrypt(block);
        }
        pair.copy_from_slice(&block);
    }

    let mut raw = [0u8; 24];
    for (chunk, word) in raw.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }

    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&raw[..DIGEST_LEN]);
    out
}
