#![allow(dead_code)]

use std::sync::Arc;

use custody_crypto::{keypair_from_seed, Ed25519Blake2b, ED25519_BLAKE2B};
use custody_nullables::{NullClock, NullIdentityProvider, NullRepository};
use custody_token::{Header, Reference, Token, Transaction};
use custody_types::{Address, AddressType, KeyPair, Location, Target, Timestamp, Value};
use custody_validator::Validator;

pub const T0: u64 = 1_700_000_000;

pub struct Party {
    pub keys: KeyPair,
    pub address: Address,
}

pub fn party(seed: u8, kind: AddressType) -> Party {
    let keys = keypair_from_seed(&[seed; 32]);
    let address = Address::new(kind, keys.public.clone());
    Party { keys, address }
}

pub fn adult(seed: u8) -> Party {
    party(seed, AddressType::NaturalPersonAdult)
}

pub fn at(offset_secs: u64) -> Timestamp {
    Timestamp::from_secs(T0 + offset_secs)
}

pub fn home() -> Location {
    "DE/BY/MUC".parse().unwrap()
}

pub fn mint(creator: &Party, currency: &str, amount: Value, target: Target, ts: Timestamp) -> Token {
    let header = Header::builder()
        .algorithm(ED25519_BLAKE2B)
        .currency(currency)
        .amount(amount)
        .timestamp(ts)
        .location(home())
        .target(target)
        .recipient(creator.address.clone())
        .sign(&Ed25519Blake2b, &creator.keys.private)
        .unwrap();
    Token::new(header)
}

pub fn income(creator: &Party, ts: Timestamp) -> Token {
    mint(creator, "Thanks", Value::UNIT, Target::PERSON_INCOME, ts)
}

pub fn send(token: &mut Token, from: &Party, to: &Party, ts: Timestamp) {
    token
        .transfer(&Ed25519Blake2b, &from.keys, to.address.clone(), ts, None)
        .unwrap();
}

/// Append a signed no-recipient line without any of the builder's checks.
pub fn terminate(token: &Token, owner: &Party, ts: Timestamp, reference: Reference) -> Token {
    let predecessor = token.chain_tail_hash(&Ed25519Blake2b).unwrap();
    let tx = Transaction::builder()
        .timestamp(ts)
        .reference(reference)
        .sign(&Ed25519Blake2b, &owner.keys.private, &predecessor)
        .unwrap();
    let mut transactions = token.transactions().to_vec();
    transactions.push(tx);
    Token::from_parts(token.header().clone(), transactions)
}

pub struct World {
    pub repository: Arc<NullRepository>,
    pub identities: Arc<NullIdentityProvider>,
    pub clock: Arc<NullClock>,
}

impl World {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(NullRepository::new()),
            identities: Arc::new(NullIdentityProvider::new()),
            clock: Arc::new(NullClock::new(at(10 * 86_400))),
        }
    }

    pub fn certify(&self, party: &Party, location: Location) {
        self.identities.certify(&party.address, location, Timestamp::from_secs(0));
    }

    pub fn store(&self, tokens: &[Token]) {
        for token in tokens {
            self.repository.insert(token.clone());
        }
    }

    pub fn validator(&self) -> Validator {
        Validator::standard()
            .with_repository(self.repository.clone())
            .with_identity_provider(self.identities.clone())
            .with_clock(self.clock.clone())
    }

    /// No repository and no identity provider.
    pub fn bare_validator(&self) -> Validator {
        Validator::standard().with_clock(self.clock.clone())
    }
}
