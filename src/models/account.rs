use blake2::{Blake2b512, Digest};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const ACCOUNT_ID_LEN: usize = 32;

const SS58_CHECKSUM_PREFIX: &[u8] = b"SS58PRE";
const SS58_CHECKSUM_LEN: usize = 2;

/// A 32-byte chain account identifier, compared by byte content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("invalid hex account id: {0}")]
    Hex(String),
    #[error("account id must be 32 bytes, got {0}")]
    Length(usize),
}

impl AccountId {
    pub const fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Renders the account in SS58 format for the given network prefix
    /// (0..=16383).
    pub fn to_ss58(&self, prefix: u16) -> String {
        let mut payload = Vec::with_capacity(2 + ACCOUNT_ID_LEN + SS58_CHECKSUM_LEN);
        if prefix < 64 {
            payload.push(prefix as u8);
        } else {
            payload.push((((prefix & 0b1111_1100) >> 2) as u8) | 0b0100_0000);
            payload.push(((prefix >> 8) as u8) | (((prefix & 0b11) as u8) << 6));
        }
        payload.extend_from_slice(&self.0);

        let mut hasher = Blake2b512::new();
        hasher.update(SS58_CHECKSUM_PREFIX);
        hasher.update(&payload);
        let checksum = hasher.finalize();
        payload.extend_from_slice(&checksum[..SS58_CHECKSUM_LEN]);

        bs58::encode(payload).into_string()
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| AccountIdError::Hex(e.to_string()))?;
        let array: [u8; ACCOUNT_ID_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AccountIdError::Length(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        AccountId::from_str(&raw).map_err(de::Error::custom)
    }
}
