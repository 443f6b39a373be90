//! Token header: the immutable origin record.

use custody_crypto::Algorithm;
use custody_types::{Address, Hash, Location, PrivateKey, Signature, Target, Timestamp, TokenId, Value};
use serde::{Deserialize, Serialize};

use crate::chain::{chain_hash, check_algorithm, HashCell};
use crate::error::TokenError;
use crate::fields::{CanonicalWriter, HeaderField};
use crate::reference::Reference;

/// Current protocol version written into new headers.
pub const PROTOCOL_VERSION: u32 = 1;

/// The origin record of a token. Immutable once built; construct through
/// [`HeaderBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "v")]
    version: u32,
    #[serde(rename = "alg")]
    algorithm: String,
    #[serde(rename = "cur")]
    currency: String,
    #[serde(rename = "amt")]
    amount: Value,
    #[serde(rename = "ts")]
    timestamp: Timestamp,
    #[serde(rename = "loc")]
    location: Location,
    #[serde(rename = "tgt")]
    target: Target,
    #[serde(rename = "rcp")]
    recipient: Address,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<Reference>,
    #[serde(rename = "sig", default, skip_serializing_if = "Option::is_none")]
    signature: Option<Signature>,
    #[serde(skip)]
    to_sign: HashCell,
    #[serde(skip)]
    to_chain: HashCell,
}

impl Header {
    pub fn builder() -> HeaderBuilder {
        HeaderBuilder::default()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn amount(&self) -> Value {
        self.amount
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// The identity key of the token this header starts.
    pub fn id(&self) -> TokenId {
        TokenId {
            timestamp: self.timestamp,
            location: self.location.clone(),
            version: self.version,
            algorithm: self.algorithm.clone(),
            currency: self.currency.clone(),
        }
    }

    /// Mandatory string fields must be non-empty; everything else is enforced by the type.
    fn check_mandatory(&self) -> Result<(), TokenError> {
        if self.version == 0 {
            return Err(TokenError::MissingField(HeaderField::Version.def().key));
        }
        if self.algorithm.is_empty() {
            return Err(TokenError::MissingField(HeaderField::Algorithm.def().key));
        }
        if self.currency.is_empty() {
            return Err(TokenError::MissingField(HeaderField::Currency.def().key));
        }
        Ok(())
    }

    /// Canonical bytes of every signed field, in table order.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, TokenError> {
        self.check_mandatory()?;
        let mut w = CanonicalWriter::new();
        for field in HeaderField::ORDER {
            let key = field.def().key;
            match field {
                HeaderField::Version => w.field(key, &self.version.to_be_bytes())?,
                HeaderField::Algorithm => w.field(key, self.algorithm.as_bytes())?,
                HeaderField::Currency => w.field(key, self.currency.as_bytes())?,
                HeaderField::Amount => w.field(key, &self.amount.to_be_bytes())?,
                HeaderField::Timestamp => w.field(key, &self.timestamp.to_be_bytes())?,
                HeaderField::Location => w.field(key, self.location.to_string().as_bytes())?,
                HeaderField::Target => w.field(key, self.target.to_string().as_bytes())?,
                HeaderField::Recipient => w.field(key, &self.recipient.to_bytes())?,
                HeaderField::Reference => {
                    if let Some(reference) = &self.reference {
                        w.field(key, &reference.to_bytes()?)?;
                    }
                }
                HeaderField::Signature => {}
            }
        }
        Ok(w.into_bytes())
    }

    /// Hash over all signed fields; the chain root.
    pub fn hash_to_sign(&self, algorithm: &dyn Algorithm) -> Result<Hash, TokenError> {
        check_algorithm(algorithm, &self.algorithm)?;
        self.to_sign
            .get_or_compute(Hash::ZERO, || Ok(algorithm.hash(&self.canonical_bytes()?)))
    }

    /// Hash binding the signature into the chain. Requires a signature.
    pub fn hash_to_chain(&self, algorithm: &dyn Algorithm) -> Result<Hash, TokenError> {
        let to_sign = self.hash_to_sign(algorithm)?;
        self.to_chain
            .get_or_compute(Hash::ZERO, || chain_hash(algorithm, &to_sign, self.signature.as_ref()))
    }

    /// A builder prefilled with this header's fields.
    pub fn to_builder(&self) -> HeaderBuilder {
        HeaderBuilder {
            version: Some(self.version),
            algorithm: Some(self.algorithm.clone()),
            currency: Some(self.currency.clone()),
            amount: Some(self.amount),
            timestamp: Some(self.timestamp),
            location: Some(self.location.clone()),
            target: Some(self.target),
            recipient: Some(self.recipient.clone()),
            reference: self.reference.clone(),
            signature: self.signature.clone(),
        }
    }
}

/// Collects header fields, then freezes them into a [`Header`].
#[derive(Clone, Debug, Default)]
pub struct HeaderBuilder {
    version: Option<u32>,
    algorithm: Option<String>,
    currency: Option<String>,
    amount: Option<Value>,
    timestamp: Option<Timestamp>,
    location: Option<Location>,
    target: Option<Target>,
    recipient: Option<Address>,
    reference: Option<Reference>,
    signature: Option<Signature>,
}

impl HeaderBuilder {
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn amount(mut self, amount: Value) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn reference(mut self, reference: Option<Reference>) -> Self {
        self.reference = reference;
        self
    }

    /// Attach an existing signature, e.g. one read off the wire.
    pub fn signature(mut self, signature: Option<Signature>) -> Self {
        self.signature = signature;
        self
    }

    /// Freeze the fields as given, signed or not.
    pub fn build(self) -> Result<Header, TokenError> {
        let missing = |field: HeaderField| TokenError::MissingField(field.def().key);
        let header = Header {
            version: self.version.unwrap_or(PROTOCOL_VERSION),
            algorithm: self.algorithm.ok_or(missing(HeaderField::Algorithm))?,
            currency: self.currency.ok_or(missing(HeaderField::Currency))?,
            amount: self.amount.ok_or(missing(HeaderField::Amount))?,
            timestamp: self.timestamp.ok_or(missing(HeaderField::Timestamp))?,
            location: self.location.ok_or(missing(HeaderField::Location))?,
            target: self.target.ok_or(missing(HeaderField::Target))?,
            recipient: self.recipient.ok_or(missing(HeaderField::Recipient))?,
            reference: self.reference,
            signature: self.signature,
            to_sign: HashCell::default(),
            to_chain: HashCell::default(),
        };
        header.check_mandatory()?;
        Ok(header)
    }

    /// Freeze and sign with the recipient's key.
    pub fn sign(mut self, algorithm: &dyn Algorithm, key: &PrivateKey) -> Result<Header, TokenError> {
        self.signature = None;
        let mut header = self.build()?;
        let to_sign = header.hash_to_sign(algorithm)?;
        header.signature = Some(algorithm.sign(&to_sign, key));
        Ok(header)
    }
}
