//! Ordered scalar values as they appear in index keys and predicates.

use derive_more::From;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

///
/// Value
///
/// One comparable scalar. Variants are declared in index-storage rank order,
/// so the derived `Ord` is the storage comparator used for interval bounds.
/// `MinKey` and `MaxKey` exist so the unrestricted interval is expressible;
/// they never appear inside documents.
///

#[derive(
    Clone, Debug, Eq, From, Ord, PartialEq, PartialOrd, Deserialize, Serialize,
)]
pub enum Value {
    MinKey,
    Null,
    #[from]
    Int(i64),
    #[from]
    Text(String),
    #[from]
    List(Vec<Value>),
    #[from]
    Bool(bool),
    /// Stored form of a value under a hashed index component.
    Hashed(u64),
    MaxKey,
}

impl Value {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The stored form of `self` under a hashed index component.
    ///
    /// Hashing is order-destroying by design; hashed components only ever
    /// carry point intervals.
    #[must_use]
    pub fn hashed(&self) -> Self {
        let mut buf = Vec::new();
        self.write_canonical(&mut buf);

        Self::Hashed(xxh3_64(&buf))
    }

    // Canonical byte rendering used only as hash input. Tag byte per variant,
    // then a self-delimiting payload.
    fn write_canonical(&self, buf: &mut Vec<u8>) {
        match self {
            Self::MinKey => buf.push(0x00),
            Self::Null => buf.push(0x01),
            Self::Int(v) => {
                buf.push(0x02);
                buf.extend_from_slice(&v.to_be_bytes());
            }
            Self::Text(v) => {
                buf.push(0x03);
                buf.extend_from_slice(&(v.len() as u64).to_be_bytes());
                buf.extend_from_slice(v.as_bytes());
            }
            Self::List(items) => {
                buf.push(0x04);
                buf.extend_from_slice(&(items.len() as u64).to_be_bytes());
                for item in items {
                    item.write_canonical(buf);
                }
            }
            Self::Bool(v) => buf.extend_from_slice(&[0x05, u8::from(*v)]),
            Self::Hashed(v) => {
                buf.push(0x06);
                buf.extend_from_slice(&v.to_be_bytes());
            }
            Self::MaxKey => buf.push(0x07),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
