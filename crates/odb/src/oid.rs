//! Fixed-width content addresses.

use std::fmt;

use crate::store::OdbError;

/// Width of a raw object id in bytes.
pub const RAW_OID_LEN: usize = 20;

/// Content address of an object: a 20-byte SHA-1 digest.
///
/// The all-zero id is not the hash of any object and acts as the
/// "unknown" sentinel throughout the diff engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Oid([u8; RAW_OID_LEN]);

impl Oid {
    /// The all-zero sentinel id.
    pub const ZERO: Self = Self([0; RAW_OID_LEN]);

    /// Wraps a raw digest.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; RAW_OID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses a 40-character lowercase or uppercase hex string.
    pub fn from_hex(hex: &str) -> Result<Self, OdbError> {
        let decoded = hex::decode(hex).map_err(|_| OdbError::InvalidOid {
            spec: hex.to_owned(),
        })?;
        let bytes: [u8; RAW_OID_LEN] =
            decoded.try_into().map_err(|_| OdbError::InvalidOid {
                spec: hex.to_owned(),
            })?;
        Ok(Self(bytes))
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; RAW_OID_LEN] {
        &self.0
    }

    /// Returns `true` for the all-zero sentinel.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; RAW_OID_LEN]
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({self})")
    }
}
