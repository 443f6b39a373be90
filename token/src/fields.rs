//! Fixed field tables and the canonical byte layout hashed into the chain.
//!
//! Each entity kind declares its fields once, in hashing order, with the short
//! key used both on the wire and in the canonical bytes. Canonical bytes are,
//! per present field except the signature: key, `0x00`, big-endian `u32`
//! length, value.

use crate::error::TokenError;

/// Static description of one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Short key, e.g. `ts`.
    pub key: &'static str,
    /// Long name, e.g. `timestamp`.
    pub name: &'static str,
    pub mandatory: bool,
    /// Whether the field is covered by hash-to-sign.
    pub signed: bool,
}

const fn def(key: &'static str, name: &'static str, mandatory: bool, signed: bool) -> FieldDef {
    FieldDef {
        key,
        name,
        mandatory,
        signed,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderField {
    Version,
    Algorithm,
    Currency,
    Amount,
    Timestamp,
    Location,
    Target,
    Recipient,
    Reference,
    Signature,
}

impl HeaderField {
    pub const ORDER: [HeaderField; 10] = [
        Self::Version,
        Self::Algorithm,
        Self::Currency,
        Self::Amount,
        Self::Timestamp,
        Self::Location,
        Self::Target,
        Self::Recipient,
        Self::Reference,
        Self::Signature,
    ];

    pub const fn def(&self) -> FieldDef {
        match self {
            Self::Version => def("v", "version", true, true),
            Self::Algorithm => def("alg", "algorithm", true, true),
            Self::Currency => def("cur", "currency", true, true),
            Self::Amount => def("amt", "amount", true, true),
            Self::Timestamp => def("ts", "timestamp", true, true),
            Self::Location => def("loc", "location", true, true),
            Self::Target => def("tgt", "target", true, true),
            Self::Recipient => def("rcp", "recipient", true, true),
            Self::Reference => def("ref", "reference", false, true),
            Self::Signature => def("sig", "signature", true, false),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionField {
    Timestamp,
    Recipient,
    Purpose,
    EncryptedPurpose,
    References,
    Signature,
}

impl TransactionField {
    pub const ORDER: [TransactionField; 6] = [
        Self::Timestamp,
        Self::Recipient,
        Self::Purpose,
        Self::EncryptedPurpose,
        Self::References,
        Self::Signature,
    ];

    /// The recipient is mandatory except on a fork/merge terminator line;
    /// that exception is enforced by [`crate::Transaction`] itself.
    pub const fn def(&self) -> FieldDef {
        match self {
            Self::Timestamp => def("ts", "timestamp", true, true),
            Self::Recipient => def("rcp", "recipient", true, true),
            Self::Purpose => def("pp", "purpose", false, true),
            Self::EncryptedPurpose => def("ep", "encryptedPurpose", false, true),
            Self::References => def("ref", "references", false, true),
            Self::Signature => def("sig", "signature", true, false),
        }
    }
}

fn length_prefix(key: &str, len: usize) -> Result<[u8; 4], TokenError> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| TokenError::FieldTooLong {
            key: key.to_string(),
            len,
        })
}

/// Accumulates canonical field bytes.
#[derive(Debug, Default)]
pub struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the predecessor's hash-to-chain bytes.
    pub fn with_prefix(prefix: &[u8]) -> Self {
        Self {
            buf: prefix.to_vec(),
        }
    }

    /// Append `key`, a zero byte, the value's u32 length and the value.
    pub fn field(&mut self, key: &str, value: &[u8]) -> Result<(), TokenError> {
        let len = length_prefix(key, value.len())?;
        self.buf.extend_from_slice(key.as_bytes());
        self.buf.push(0);
        self.buf.extend_from_slice(&len);
        self.buf.extend_from_slice(value);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
