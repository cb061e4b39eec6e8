mod cbor;

use crate::error::{Error, ErrorKind, ErrorOrigin};
use serde::{Serialize, de::DeserializeOwned};
use std::{cmp::Ordering, fmt, marker::PhantomData};
use thiserror::Error as ThisError;

/// Typed-to-bytes adapters for keys, column names, and values.
///
/// This module is format-level only:
/// - No executor constants or policy limits are defined here.
/// - Callers that need bounded decode must pass explicit limits.
/// - Decode policy for query results belongs to the executor layer.

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },
}

///
/// SerializeErrorKind
///
/// Stable error-kind taxonomy for serializer failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializeErrorKind {
    Serialize,
    Deserialize,
    DeserializeSizeLimitExceeded,
}

impl SerializeErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Deserialize => "deserialize",
            Self::DeserializeSizeLimitExceeded => "deserialize_size_limit_exceeded",
        }
    }
}

impl fmt::Display for SerializeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SerializeError {
    /// Return a stable error kind independent of backend error-message text.
    #[must_use]
    pub const fn kind(&self) -> SerializeErrorKind {
        match self {
            Self::Serialize(_) => SerializeErrorKind::Serialize,
            Self::Deserialize(_) => SerializeErrorKind::Deserialize,
            Self::DeserializeSizeLimitExceeded { .. } => {
                SerializeErrorKind::DeserializeSizeLimitExceeded
            }
        }
    }
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        Self::new(ErrorKind::Serialize, ErrorOrigin::Serialize, err.to_string())
    }
}

///
/// Serializer
///
/// Capability converting a typed slot (key, column name, or value) to and
/// from its wire byte representation. Pure; no state beyond configuration.
///

pub trait Serializer<T> {
    fn to_bytes(&self, value: &T) -> Result<Vec<u8>, SerializeError>;

    fn from_bytes(&self, bytes: &[u8]) -> Result<T, SerializeError>;
}

///
/// NameSerializer
///
/// Column-name serializer with a comparator consistent with the store's
/// column ordering. The default comparator is bytewise, which every
/// provided implementation encodes for (big-endian integers, UTF-8 text).
///

pub trait NameSerializer<N>: Serializer<N> {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

///
/// Utf8Serializer
/// Text column names and values; bytewise order equals code-point order.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8Serializer;

impl Serializer<String> for Utf8Serializer {
    fn to_bytes(&self, value: &String) -> Result<Vec<u8>, SerializeError> {
        Ok(value.as_bytes().to_vec())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<String, SerializeError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| SerializeError::Deserialize(e.to_string()))
    }
}

impl NameSerializer<String> for Utf8Serializer {}

///
/// BytesSerializer
/// Raw passthrough for callers that manage their own encoding.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct BytesSerializer;

impl Serializer<Vec<u8>> for BytesSerializer {
    fn to_bytes(&self, value: &Vec<u8>) -> Result<Vec<u8>, SerializeError> {
        Ok(value.clone())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, SerializeError> {
        Ok(bytes.to_vec())
    }
}

impl NameSerializer<Vec<u8>> for BytesSerializer {}

///
/// UintSerializer
/// Big-endian `u64` so that byte order matches numeric order.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct UintSerializer;

impl Serializer<u64> for UintSerializer {
    fn to_bytes(&self, value: &u64) -> Result<Vec<u8>, SerializeError> {
        Ok(value.to_be_bytes().to_vec())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<u64, SerializeError> {
        let arr: [u8; 8] = bytes.try_into().map_err(|_| {
            SerializeError::Deserialize(format!("expected 8 bytes, found {}", bytes.len()))
        })?;

        Ok(u64::from_be_bytes(arr))
    }
}

impl NameSerializer<u64> for UintSerializer {}

///
/// CborSerializer
///
/// Structured values via CBOR. Not suitable as a column-name serializer:
/// CBOR byte order does not track any useful value order.
///

#[derive(Debug, Default)]
pub struct CborSerializer<T> {
    max_bytes: Option<usize>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CborSerializer<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_bytes: None,
            _marker: PhantomData,
        }
    }

    /// Cap the accepted decode size. Size limits are caller policy.
    #[must_use]
    pub const fn bounded(max_bytes: usize) -> Self {
        Self {
            max_bytes: Some(max_bytes),
            _marker: PhantomData,
        }
    }
}

impl<T> Serializer<T> for CborSerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self, value: &T) -> Result<Vec<u8>, SerializeError> {
        cbor::serialize(value)
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<T, SerializeError> {
        match self.max_bytes {
            Some(max_bytes) => cbor::deserialize_bounded(bytes, max_bytes),
            None => cbor::deserialize(bytes),
        }
    }
}

///
/// TESTS
///
