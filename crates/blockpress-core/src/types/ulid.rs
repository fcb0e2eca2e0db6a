use derive_more::{Deref, Display, FromStr};
use serde::{Deserialize, Serialize, Serializer, de::Deserializer};
use std::{
    sync::{LazyLock, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error as ThisError;
use ulid::Ulid as WrappedUlid;

///
/// UlidError
///

#[derive(Debug, ThisError)]
pub enum UlidError {
    #[error("invalid ulid string")]
    InvalidString,

    #[error("monotonic error - overflow")]
    GeneratorOverflow,

    #[error("monotonic error - poisoned lock")]
    GeneratorPoisoned,
}

///
/// GENERATOR is lazily initiated with a Mutex.
/// It keeps state so that id order follows generation order; child rows
/// written later always sort after rows written earlier.
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::default()));

#[derive(Default)]
struct Generator {
    previous: Ulid,
}

impl Generator {
    /// Monotonic ULID generation; increments within the same millisecond.
    fn generate(&mut self) -> Result<Ulid, UlidError> {
        let last_ts = self.previous.timestamp_ms();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        // maybe time went backward, or it is the same ms.
        // increment instead of generating a new random so that it stays
        // monotonic
        if ts <= last_ts {
            if let Some(next) = self.previous.increment() {
                self.previous = Ulid(next);

                return Ok(self.previous);
            }

            return Err(UlidError::GeneratorOverflow);
        }

        let ulid = Ulid(WrappedUlid::new());
        self.previous = ulid;

        Ok(ulid)
    }
}

///
/// UlidDecodeError
///

#[derive(Debug, ThisError)]
pub enum UlidDecodeError {
    #[error("invalid ulid length: {len} bytes")]
    InvalidSize { len: usize },
}

///
/// Ulid
///
/// Row and aggregate identifier. String form on the wire, 16 bytes in
/// storage keys.
///

#[derive(Clone, Copy, Debug, Deref, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Ulid(WrappedUlid);

impl Default for Ulid {
    fn default() -> Self {
        Self::nil()
    }
}

impl Ulid {
    pub const STORED_SIZE: u32 = 16;

    pub const MIN: Self = Self::from_bytes([0x00; 16]);
    pub const MAX: Self = Self::from_bytes([0xFF; 16]);

    #[must_use]
    pub const fn nil() -> Self {
        Self(WrappedUlid::nil())
    }

    /// Generate a monotonic ULID. Ids minted later always compare greater,
    /// so key order in the stores follows generation order. Falls back to
    /// a plain random ULID if the generator is unavailable.
    #[must_use]
    pub fn generate() -> Self {
        Self::try_generate().unwrap_or_else(|_| Self(WrappedUlid::new()))
    }

    /// Fallible monotonic generation: fails on generator overflow or a
    /// poisoned lock instead of falling back.
    pub fn try_generate() -> Result<Self, UlidError> {
        GENERATOR
            .lock()
            .map_err(|_| UlidError::GeneratorPoisoned)?
            .generate()
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(WrappedUlid::from_bytes(bytes))
    }

    pub const fn try_from_bytes(bytes: &[u8]) -> Result<Self, UlidDecodeError> {
        if bytes.len() != Self::STORED_SIZE as usize {
            return Err(UlidDecodeError::InvalidSize { len: bytes.len() });
        }

        let mut array = [0u8; 16];
        let mut i = 0;
        while i < 16 {
            array[i] = bytes[i];
            i += 1;
        }

        Ok(Self::from_bytes(array))
    }

    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(WrappedUlid(n))
    }

    pub fn try_parse(s: &str) -> Result<Self, UlidError> {
        WrappedUlid::from_string(s)
            .map(Self)
            .map_err(|_| UlidError::InvalidString)
    }
}

impl From<WrappedUlid> for Ulid {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}

impl Serialize for Ulid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::try_parse(&s).map_err(serde::de::Error::custom)
    }
}

///
/// TESTS
///
