//! One ownership transfer, signed by the previous owner.

use custody_crypto::Algorithm;
use custody_types::{Address, Hash, PrivateKey, Signature, Timestamp};
use serde::{Deserialize, Serialize};

use crate::chain::{chain_hash, HashCell};
use crate::error::TokenError;
use crate::fields::{CanonicalWriter, TransactionField};
use crate::reference::Reference;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "ts")]
    timestamp: Timestamp,
    #[serde(rename = "rcp", default, skip_serializing_if = "Option::is_none")]
    recipient: Option<Address>,
    #[serde(rename = "pp", default, skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(
        rename = "ep",
        default,
        skip_serializing_if = "Option::is_none",
        with = "hex_bytes"
    )]
    encrypted_purpose: Option<Vec<u8>>,
    #[serde(rename = "ref", default, skip_serializing_if = "Vec::is_empty")]
    references: Vec<Reference>,
    #[serde(rename = "sig", default, skip_serializing_if = "Option::is_none")]
    signature: Option<Signature>,
    #[serde(skip)]
    to_sign: HashCell,
    #[serde(skip)]
    to_chain: HashCell,
}

impl Transaction {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::default()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// `None` only on a fork/merge terminator line.
    pub fn recipient(&self) -> Option<&Address> {
        self.recipient.as_ref()
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn encrypted_purpose(&self) -> Option<&[u8]> {
        self.encrypted_purpose.as_deref()
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// A line without recipient ends the token's transferable life.
    pub fn is_terminator(&self) -> bool {
        self.recipient.is_none()
    }

    /// Canonical bytes of the signed fields, prefixed by the predecessor's
    /// hash-to-chain.
    pub fn canonical_bytes(&self, predecessor: &Hash) -> Result<Vec<u8>, TokenError> {
        if self.recipient.is_none() && self.references.is_empty() {
            return Err(TokenError::MissingField(TransactionField::Recipient.def().key));
        }
        let mut w = CanonicalWriter::with_prefix(predecessor.as_bytes());
        for field in TransactionField::ORDER {
            let key = field.def().key;
            match field {
                TransactionField::Timestamp => w.field(key, &self.timestamp.to_be_bytes())?,
                TransactionField::Recipient => {
                    if let Some(recipient) = &self.recipient {
                        w.field(key, &recipient.to_bytes())?;
                    }
                }
                TransactionField::Purpose => {
                    if let Some(purpose) = &self.purpose {
                        w.field(key, purpose.as_bytes())?;
                    }
                }
                TransactionField::EncryptedPurpose => {
                    if let Some(ep) = &self.encrypted_purpose {
                        w.field(key, ep)?;
                    }
                }
                TransactionField::References => {
                    for reference in &self.references {
                        w.field(key, &reference.to_bytes()?)?;
                    }
                }
                TransactionField::Signature => {}
            }
        }
        Ok(w.into_bytes())
    }

    /// `H(predecessor ++ fields)`.
    pub fn hash_to_sign(&self, algorithm: &dyn Algorithm, predecessor: &Hash) -> Result<Hash, TokenError> {
        self.to_sign.get_or_compute(*predecessor, || {
            Ok(algorithm.hash(&self.canonical_bytes(predecessor)?))
        })
    }

    /// `H(hash_to_sign ++ sig)`; the next line's predecessor.
    pub fn hash_to_chain(&self, algorithm: &dyn Algorithm, predecessor: &Hash) -> Result<Hash, TokenError> {
        let to_sign = self.hash_to_sign(algorithm, predecessor)?;
        self.to_chain.get_or_compute(*predecessor, || {
            chain_hash(algorithm, &to_sign, self.signature.as_ref())
        })
    }

    pub fn to_builder(&self) -> TransactionBuilder {
        TransactionBuilder {
            timestamp: Some(self.timestamp),
            recipient: self.recipient.clone(),
            purpose: self.purpose.clone(),
            encrypted_purpose: self.encrypted_purpose.clone(),
            references: self.references.clone(),
            signature: self.signature.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransactionBuilder {
    timestamp: Option<Timestamp>,
    recipient: Option<Address>,
    purpose: Option<String>,
    encrypted_purpose: Option<Vec<u8>>,
    references: Vec<Reference>,
    signature: Option<Signature>,
}

impl TransactionBuilder {
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn recipient(mut self, recipient: Option<Address>) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn purpose(mut self, purpose: Option<String>) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn encrypted_purpose(mut self, encrypted_purpose: Option<Vec<u8>>) -> Self {
        self.encrypted_purpose = encrypted_purpose;
        self
    }

    pub fn reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn signature(mut self, signature: Option<Signature>) -> Self {
        self.signature = signature;
        self
    }

    pub fn build(self) -> Result<Transaction, TokenError> {
        let timestamp = self
            .timestamp
            .ok_or(TokenError::MissingField(TransactionField::Timestamp.def().key))?;
        if self.recipient.is_none() && self.references.is_empty() {
            return Err(TokenError::MissingField(TransactionField::Recipient.def().key));
        }
        Ok(Transaction {
            timestamp,
            recipient: self.recipient,
            purpose: self.purpose,
            encrypted_purpose: self.encrypted_purpose,
            references: self.references,
            signature: self.signature,
            to_sign: HashCell::default(),
            to_chain: HashCell::default(),
        })
    }

    /// Freeze and sign with the previous owner's key, chained onto `predecessor`.
    pub fn sign(
        mut self,
        algorithm: &dyn Algorithm,
        key: &PrivateKey,
        predecessor: &Hash,
    ) -> Result<Transaction, TokenError> {
        self.signature = None;
        let mut tx = self.build()?;
        let to_sign = tx.hash_to_sign(algorithm, predecessor)?;
        tx.signature = Some(algorithm.sign(&to_sign, key));
        Ok(tx)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
