mod common;

use std::sync::Arc;

use common::*;
use custody_crypto::{Ed25519Blake2b, ED25519_BLAKE2B};
use custody_currency::registry;
use custody_store::{CachedRepository, Repository, TokenCache, Validity};
use custody_token::{fork, merge, Forked, Header, Reference, ReferenceRole, Token};
use custody_types::{FailureKind, Target, Timestamp, Value};
use custody_validator::{ValidationMode, ValidatorConfig};

fn creation() -> ValidationMode {
    ValidationMode {
        validate_creation: true,
        ..ValidationMode::MINIMAL
    }
}

fn split(world: &World, owner: &Party, source: &Token, offset: u64) -> Forked {
    let amounts = [
        Value::from_raw(40_000_000),
        Value::from_raw(30_000_000),
        Value::from_raw(20_000_000),
    ];
    let forked = fork(
        source,
        &owner.keys,
        &amounts,
        at(offset),
        &Ed25519Blake2b,
        &registry::thanks(),
    )
    .unwrap();
    world.store(&[forked.source.clone()]);
    world.store(&forked.created);
    forked
}

fn resign(header: &Header, owner: &Party) -> Header {
    header
        .to_builder()
        .sign(&Ed25519Blake2b, &owner.keys.private)
        .unwrap()
}

#[test]
fn every_forked_token_closes_its_cycle() {
    let world = World::new();
    let a = adult(1);
    let forked = split(&world, &a, &income(&a, at(0)), 100);

    let validator = world.validator();
    for token in &forked.created {
        let result = validator.validate(token, &creation()).unwrap();
        assert!(result.is_fully_verified(), "{result}");
    }
}

#[test]
fn fork_from_a_different_source_is_not_closed() {
    let world = World::new();
    let a = adult(1);
    let forked = split(&world, &a, &income(&a, at(0)), 100);
    let other = split(&world, &a, &income(&a, at(1)), 200);

    // Point the last created token of the first fork at the other source.
    let last = forked.created.last().unwrap();
    let hijacked = last
        .header()
        .to_builder()
        .reference(Some(Reference::new(other.source.id(), ReferenceRole::ForkFrom)));
    let hijacked = Token::new(hijacked.sign(&Ed25519Blake2b, &a.keys.private).unwrap());
    world.store(&[hijacked.clone()]);

    let result = world.validator().validate(&hijacked, &creation()).unwrap();
    assert!(result.has(FailureKind::ReferenceCycleNotClosed), "{result}");
}

#[test]
fn missing_source_is_reference_not_found() {
    let world = World::new();
    let a = adult(1);
    let forked = split(&world, &a, &income(&a, at(0)), 100);
    world.repository.remove(&forked.source.id());

    let last = forked.created.last().unwrap();
    let result = world.validator().validate(last, &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ReferenceNotFound], "{result}");
}

#[test]
fn walk_without_repository_is_missing_a_value() {
    let world = World::new();
    let a = adult(1);
    let forked = split(&world, &a, &income(&a, at(0)), 100);

    let result = world.bare_validator().validate(&forked.created[0], &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::RequiredValueMissing], "{result}");
}

#[test]
fn repository_outage_is_retryable_unless_offline() {
    let world = World::new();
    let a = adult(1);
    let forked = split(&world, &a, &income(&a, at(0)), 100);
    world.repository.set_unreachable(true);

    let err = world.validator().validate(&forked.created[0], &creation()).unwrap_err();
    assert!(err.is_retryable());

    let offline = ValidationMode {
        offline: true,
        ..creation()
    };
    let result = world.validator().validate(&forked.created[0], &offline).unwrap();
    assert!(result.is_valid());
    assert!(!result.is_fully_verified());
}

#[test]
fn long_cycles_are_cut_off() {
    let world = World::new();
    let a = adult(1);
    let forked = split(&world, &a, &income(&a, at(0)), 100);
    let config = ValidatorConfig {
        max_cycle_length: 2,
        ..ValidatorConfig::default()
    };

    let validator = world.validator().with_config(&config);
    let result = validator.validate(&forked.created[1], &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ReferenceCycleNotClosed], "{result}");
}

#[test]
fn inflated_fork_is_out_of_range() {
    let world = World::new();
    let a = adult(1);
    let forked = split(&world, &a, &income(&a, at(0)), 100);

    let first = forked.created[0].header().to_builder().amount(Value::from_units(5)).build().unwrap();
    let first = Token::new(resign(&first, &a));
    world.store(&[first]);

    let result = world.validator().validate(&forked.created[1], &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueOutOfRange], "{result}");
}

#[test]
fn source_cached_before_its_fork_is_fetched_again() {
    let world = World::new();
    let a = adult(1);
    let source = income(&a, at(0));
    world.store(&[source.clone()]);
    let cached = CachedRepository::new(world.repository.clone(), Arc::new(TokenCache::new()));
    assert_eq!(cached.find(&source.id()).unwrap(), Some(source.clone()));

    let forked = split(&world, &a, &source, 100);
    let validator = world.validator().with_repository(Arc::new(cached));
    for token in &forked.created {
        let result = validator.validate(token, &creation()).unwrap();
        assert!(result.is_fully_verified(), "{result}");
    }
}

/// A fork-created header, signed by `owner`.
fn created(owner: &Party, currency: &str, ts: Timestamp, reference: Reference) -> Token {
    let header = Header::builder()
        .algorithm(ED25519_BLAKE2B)
        .currency(currency)
        .amount(Value::from_raw(30_000_000))
        .timestamp(ts)
        .location(home())
        .target(Target::PERSON_INCOME)
        .recipient(owner.address.clone())
        .reference(Some(reference))
        .sign(&Ed25519Blake2b, &owner.keys.private)
        .unwrap();
    Token::new(header)
}

/// Fork `source` by hand into a first token at `at(100)` and a second at
/// `second_ts` in `second_currency`. Returns the first.
fn hand_fork(world: &World, owner: &Party, source: &Token, second_currency: &str, second_ts: Timestamp) -> Token {
    let second = created(owner, second_currency, second_ts, Reference::new(source.id(), ReferenceRole::ForkFrom));
    let first = created(owner, "Thanks", at(100), Reference::new(second.id(), ReferenceRole::ForkWith));
    let source = terminate(source, owner, at(100), Reference::new(first.id(), ReferenceRole::ForkTo));
    world.store(&[source, first.clone(), second]);
    first
}

#[test]
fn fork_siblings_must_be_one_tick_apart() {
    let world = World::new();
    let a = adult(1);
    let late = Timestamp::from_nanos(at(100).as_nanos() + 2);
    let first = hand_fork(&world, &a, &income(&a, at(0)), "Thanks", late);

    let result = world.validator().validate(&first, &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueMismatch], "{result}");
    assert_eq!(result.failures[0].field, "header.ref.ts");
}

#[test]
fn forking_into_another_currency_is_mixed() {
    let world = World::new();
    let a = adult(1);
    let first = hand_fork(&world, &a, &income(&a, at(0)), "Gradido", at(100).next());

    let result = world.validator().validate(&first, &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::CurrencyMixed], "{result}");
}

#[test]
fn merged_token_closes_its_cycle() {
    let world = World::new();
    let a = adult(1);
    world.certify(&a, home());
    let inputs = [income(&a, at(0)), income(&a, at(1))];
    let merged = merge(
        &inputs,
        &a.keys,
        Value::from_raw(150_000_000),
        at(50),
        &Ed25519Blake2b,
        &registry::thanks(),
    )
    .unwrap();
    world.store(&merged.merged);

    let cache = Arc::new(TokenCache::new());
    let validator = world.validator().with_verdict_cache(cache.clone());
    let result = validator.validate(&merged.created, &ValidationMode::FULL).unwrap();
    assert!(result.is_fully_verified(), "{result}");
    let version = merged.created.chain_tail_hash(&Ed25519Blake2b).unwrap();
    assert_eq!(cache.validity(&merged.created.id(), &version), Validity::Valid);
}

#[test]
fn merge_cannot_create_value() {
    let world = World::new();
    let a = adult(1);
    let inputs = [income(&a, at(0)), income(&a, at(1))];
    let merged = merge(&inputs, &a.keys, Value::UNIT, at(50), &Ed25519Blake2b, &registry::thanks()).unwrap();
    world.store(&merged.merged);

    let inflated = merged.created.header().to_builder().amount(Value::from_units(3));
    let inflated = Token::new(inflated.sign(&Ed25519Blake2b, &a.keys.private).unwrap());

    let result = world.validator().validate(&inflated, &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueOutOfRange], "{result}");
    assert_eq!(result.failures[0].field, "header.amt");
}

fn merged_into(world: &World, owner: &Party, inputs: &[Token], ts_offset: u64) -> Token {
    let first = &inputs[0];
    let header = Header::builder()
        .algorithm(first.header().algorithm())
        .currency(first.header().currency())
        .amount(Value::from_raw(10_000_000))
        .timestamp(at(ts_offset))
        .location(home())
        .target(Target::PERSON_INCOME)
        .recipient(owner.address.clone())
        .reference(Some(Reference::new(first.id(), ReferenceRole::MergeFrom)))
        .sign(&Ed25519Blake2b, &owner.keys.private)
        .unwrap();
    let created = Token::new(header);
    for (i, input) in inputs.iter().enumerate() {
        let reference = match inputs.get(i + 1) {
            Some(next) => Reference::new(next.id(), ReferenceRole::MergeWith),
            None => Reference::new(created.id(), ReferenceRole::MergeTo),
        };
        world.store(&[terminate(input, owner, at(ts_offset), reference)]);
    }
    created
}

#[test]
fn merging_different_currencies_is_mixed() {
    let world = World::new();
    let a = adult(1);
    let inputs = [
        income(&a, at(0)),
        mint(&a, "Gradido", Value::UNIT, Target::PERSON_INCOME, at(1)),
    ];
    let created = merged_into(&world, &a, &inputs, 50);

    let result = world.validator().validate(&created, &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::CurrencyMixed], "{result}");
}

#[test]
fn merge_of_one_token_is_too_short() {
    let world = World::new();
    let a = adult(1);
    let created = merged_into(&world, &a, &[income(&a, at(0))], 50);

    let result = world.validator().validate(&created, &creation()).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueOutOfRange], "{result}");
}
