//! Pseudo-random identifiers in the version 4 UUID text layout
//!
//! Output always follows `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`: every `x` is a
//! lowercase hex digit, `y` is one of `8`, `9`, `a` or `b`, and the `4` and
//! hyphens are fixed.
//!
//! # Caveats
//!
//! The default generator reseeds from the clock on every call. Calls that land
//! in the same clock tick return the same identifier, and nothing here guards
//! against collisions. These are pseudo-guids for labelling, not a source of
//! uniqueness. Use [`SequenceSeed`] to seed once per process when successive
//! calls must differ.

pub mod seed;

use crate::errors::GuidError;
use fastrand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

pub use seed::{ClockSeed, FixedSeed, SeedSource, SequenceSeed};

/// Length of a guid in characters
pub const GUID_LEN: usize = 36;

/// Space needed by [`GuidGenerator::generate_into`]: the guid plus a NUL terminator
pub const GUID_BUFFER_LEN: usize = GUID_LEN + 1;

const TEMPLATE: &[u8; GUID_LEN] = b"xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";
const HEX: &[u8; 16] = b"0123456789abcdef";

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid([u8; GUID_LEN]);

impl Guid {
    pub fn parse(text: &str) -> Result<Self, GuidError> {
        let bytes = text.as_bytes();
        if bytes.len() != GUID_LEN {
            return Err(GuidError::InvalidFormat(format!(
                "expected {} characters, found {}",
                GUID_LEN,
                bytes.len()
            )));
        }

        for (position, (&byte, &template)) in bytes.iter().zip(TEMPLATE).enumerate() {
            let valid = match template {
                b'x' => matches!(byte, b'0'..=b'9' | b'a'..=b'f'),
                b'y' => matches!(byte, b'8' | b'9' | b'a' | b'b'),
                literal => byte == literal,
            };
            if !valid {
                return Err(GuidError::InvalidFormat(format!(
                    "unexpected character {:?} at position {}",
                    byte as char, position
                )));
            }
        }

        let mut guid = [0u8; GUID_LEN];
        guid.copy_from_slice(bytes);
        Ok(Self(guid))
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn to_uuid(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        let mut digits = self
            .0
            .iter()
            .filter(|&&b| b != b'-')
            .map(|&b| hex_value(b));
        for byte in bytes.iter_mut() {
            let high = digits.next().unwrap_or_default();
            let low = digits.next().unwrap_or_default();
            *byte = (high << 4) | low;
        }
        Uuid::from_bytes(bytes)
    }
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => 0,
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.as_str())
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Guid {
    type Err = GuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Guid> for Uuid {
    fn from(guid: Guid) -> Self {
        guid.to_uuid()
    }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Generates guids from a fresh generator seeded by `S` on every call
#[derive(Debug, Clone, Default)]
pub struct GuidGenerator<S = ClockSeed> {
    seed_source: S,
}

impl GuidGenerator<ClockSeed> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: SeedSource> GuidGenerator<S> {
    pub fn with_seed_source(seed_source: S) -> Self {
        Self { seed_source }
    }

    pub fn generate(&self) -> Guid {
        let mut guid = [0u8; GUID_LEN];
        self.fill(&mut guid);
        Guid(guid)
    }

    /// Writes a guid followed by a NUL terminator into the start of `buffer`.
    ///
    /// `buffer` must hold at least [`GUID_BUFFER_LEN`] bytes; bytes after the
    /// terminator are left untouched.
    pub fn generate_into(&self, buffer: &mut [u8]) -> Result<(), GuidError> {
        if buffer.len() < GUID_BUFFER_LEN {
            debug!(
                "Guid buffer holds {} bytes, {} required",
                buffer.len(),
                GUID_BUFFER_LEN
            );
            return Err(GuidError::BufferTooSmall {
                required: GUID_BUFFER_LEN,
                actual: buffer.len(),
            });
        }

        let (guid, rest) = buffer.split_at_mut(GUID_LEN);
        self.fill(guid);
        rest[0] = 0;
        Ok(())
    }

    fn fill(&self, out: &mut [u8]) {
        let mut rng = Rng::with_seed(self.seed_source.seed());

        for (slot, &template) in out.iter_mut().zip(TEMPLATE) {
            // one draw per position, literals included
            let nibble = rng.usize(..16);
            *slot = match template {
                b'x' => HEX[nibble],
                b'y' => HEX[(nibble & 0x3) | 0x8],
                literal => literal,
            };
        }
    }
}

/// Generates a guid seeded from the clock
pub fn generate() -> Guid {
    GuidGenerator::new().generate()
}
