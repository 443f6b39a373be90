//! A token: header plus its append-only transaction chain.

use custody_crypto::Algorithm;
use custody_currency::{Currency, CurrencyRegistry};
use custody_types::{Address, Hash, KeyPair, Timestamp, TokenId, Value};
use serde::{Deserialize, Serialize};

use crate::chain::check_algorithm;
use crate::error::TokenError;
use crate::header::Header;
use crate::reference::Reference;
use crate::transaction::Transaction;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "hdr")]
    header: Header,
    #[serde(rename = "txs", default)]
    transactions: Vec<Transaction>,
}

impl Token {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            transactions: Vec::new(),
        }
    }

    /// Reassemble a token read from storage. No checks; run it through the
    /// validator before trusting it.
    pub fn from_parts(header: Header, transactions: Vec<Transaction>) -> Self {
        Self { header, transactions }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn id(&self) -> TokenId {
        self.header.id()
    }

    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TokenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The trailing no-recipient line, if the token was forked or merged away.
    pub fn terminator(&self) -> Option<&Transaction> {
        self.transactions.last().filter(|tx| tx.is_terminator())
    }

    pub fn is_transferable(&self) -> bool {
        self.terminator().is_none()
    }

    /// Owner before any terminator: the last recipient on the chain.
    pub fn last_owner(&self) -> &Address {
        self.transactions
            .iter()
            .rev()
            .find_map(Transaction::recipient)
            .unwrap_or_else(|| self.header.recipient())
    }

    /// `None` once the token has been terminated.
    pub fn current_owner(&self) -> Option<&Address> {
        self.is_transferable().then(|| self.last_owner())
    }

    /// Timestamp of the newest entry on the chain.
    pub fn last_timestamp(&self) -> Timestamp {
        self.transactions
            .last()
            .map(Transaction::timestamp)
            .unwrap_or_else(|| self.header.timestamp())
    }

    /// The header's reference together with every reference on the chain.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.header
            .reference()
            .into_iter()
            .chain(self.transactions.iter().flat_map(|tx| tx.references()))
    }

    pub fn value_at(&self, currency: &dyn Currency, now: Timestamp) -> Result<Value, TokenError> {
        Ok(currency.value(
            self.header.amount(),
            self.header.timestamp(),
            now,
            self.transactions.len(),
        )?)
    }

    pub fn current_value(&self, currencies: &CurrencyRegistry, now: Timestamp) -> Result<Value, TokenError> {
        let currency = currencies.get(self.header.currency())?;
        self.value_at(currency.as_ref(), now)
    }

    /// Hash-to-chain of the header followed by each transaction's, in order.
    pub fn chain_hashes(&self, algorithm: &dyn Algorithm) -> Result<Vec<Hash>, TokenError> {
        check_algorithm(algorithm, self.header.algorithm())?;
        let mut hashes = Vec::with_capacity(self.transactions.len() + 1);
        let mut previous = self.header.hash_to_chain(algorithm)?;
        hashes.push(previous);
        for tx in &self.transactions {
            previous = tx.hash_to_chain(algorithm, &previous)?;
            hashes.push(previous);
        }
        Ok(hashes)
    }

    /// The predecessor hash for the next line to append.
    pub fn chain_tail_hash(&self, algorithm: &dyn Algorithm) -> Result<Hash, TokenError> {
        check_algorithm(algorithm, self.header.algorithm())?;
        let mut previous = self.header.hash_to_chain(algorithm)?;
        for tx in &self.transactions {
            previous = tx.hash_to_chain(algorithm, &previous)?;
        }
        Ok(previous)
    }

    /// Hand the token to `recipient`, signed by the current owner.
    pub fn transfer(
        &mut self,
        algorithm: &dyn Algorithm,
        owner: &KeyPair,
        recipient: Address,
        at: Timestamp,
        purpose: Option<String>,
    ) -> Result<(), TokenError> {
        let builder = Transaction::builder()
            .timestamp(at)
            .recipient(Some(recipient))
            .purpose(purpose);
        let tx = self.prepare_append(algorithm, owner, at, builder)?;
        tracing::debug!(token = %self.id(), at = %at, "transfer appended");
        self.transactions.push(tx);
        Ok(())
    }

    /// Append the no-recipient line that hands this token's value to a cycle.
    pub(crate) fn terminate(
        &mut self,
        algorithm: &dyn Algorithm,
        owner: &KeyPair,
        at: Timestamp,
        reference: Reference,
    ) -> Result<(), TokenError> {
        let builder = Transaction::builder().timestamp(at).reference(reference);
        let tx = self.prepare_append(algorithm, owner, at, builder)?;
        self.transactions.push(tx);
        Ok(())
    }

    pub(crate) fn check_owner(&self, owner: &KeyPair) -> Result<&Address, TokenError> {
        let current = self.current_owner().ok_or(TokenError::NotTransferable)?;
        if current.key != owner.public {
            return Err(TokenError::NotOwner);
        }
        Ok(current)
    }

    fn prepare_append(
        &self,
        algorithm: &dyn Algorithm,
        owner: &KeyPair,
        at: Timestamp,
        builder: crate::transaction::TransactionBuilder,
    ) -> Result<Transaction, TokenError> {
        self.check_owner(owner)?;
        let previous = self.last_timestamp();
        if at <= previous {
            return Err(TokenError::TimestampNotAfter { at, previous });
        }
        let predecessor = self.chain_tail_hash(algorithm)?;
        builder.sign(algorithm, &owner.private, &predecessor)
    }
}
