mod common;

use std::sync::Arc;

use common::*;
use custody_crypto::Ed25519Blake2b;
use custody_store::{TokenCache, Validity};
use custody_token::{Reference, ReferenceRole, Token, Transaction};
use custody_types::{AddressType, Clock, FailureKind, Target, TargetType, Value};
use custody_validator::{FailureMode, ValidationError, ValidationMode};

fn community_tax() -> Target {
    Target::new(TargetType::CommunityTax, 2)
}

#[test]
fn minimal_mode_accepts_a_signed_transfer() {
    let world = World::new();
    let (a, b) = (adult(1), adult(2));
    let mut token = mint(&a, "Thanks", Value::from_raw(10_000_000), community_tax(), at(0));
    send(&mut token, &a, &b, at(1));

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert!(result.is_valid(), "{result}");
}

#[test]
fn full_mode_without_identity_provider_is_missing_a_value() {
    let world = World::new();
    let (a, b) = (adult(1), adult(2));
    let mut token = mint(&a, "Thanks", Value::from_raw(10_000_000), community_tax(), at(0));
    send(&mut token, &a, &b, at(1));

    let result = world.bare_validator().validate(&token, &ValidationMode::FULL).unwrap();
    assert!(result.has(FailureKind::RequiredValueMissing), "{result}");
}

#[test]
fn full_mode_with_unknown_creator_is_reference_not_found() {
    let world = World::new();
    let (a, b) = (adult(1), adult(2));
    let mut token = mint(&a, "Thanks", Value::from_raw(10_000_000), community_tax(), at(0));
    send(&mut token, &a, &b, at(1));

    let result = world.validator().validate(&token, &ValidationMode::FULL).unwrap();
    assert!(result.has(FailureKind::ReferenceNotFound), "{result}");
}

#[test]
fn certified_income_passes_full_validation() {
    let world = World::new();
    let (a, b) = (adult(1), adult(2));
    world.certify(&a, home());
    let mut token = income(&a, at(0));
    send(&mut token, &a, &b, at(1));

    let result = world.validator().validate(&token, &ValidationMode::FULL).unwrap();
    assert!(result.is_fully_verified(), "{result}");
}

#[test]
fn creator_location_must_match() {
    let world = World::new();
    let a = adult(1);
    world.certify(&a, "DE/BE".parse().unwrap());
    let token = income(&a, at(0));

    let result = world.validator().validate(&token, &ValidationMode::FULL).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueMismatch], "{result}");
}

#[test]
fn tax_token_reaches_its_representative() {
    let world = World::new();
    let a = adult(1);
    let rep = party(7, AddressType::CommunityRepresentative(2));
    let project = party(8, AddressType::CommunityProject(2));
    world.certify(&a, home());
    world.certify(&rep, "DE/BY".parse().unwrap());

    let mut token = mint(&a, "Thanks", Value::from_raw(10_000_000), community_tax(), at(0));
    send(&mut token, &a, &rep, at(1));
    let en_route = world.validator().validate(&token, &ValidationMode::FULL).unwrap();
    assert_eq!(en_route.kinds(), vec![FailureKind::ValueOutOfRange], "{en_route}");

    send(&mut token, &rep, &project, at(2));
    let arrived = world.validator().validate(&token, &ValidationMode::FULL).unwrap();
    assert!(arrived.is_valid(), "{arrived}");
}

#[test]
fn verdict_for_a_token_en_route_does_not_stick_after_arrival() {
    let world = World::new();
    let a = adult(1);
    let rep = party(7, AddressType::CommunityRepresentative(2));
    let project = party(8, AddressType::CommunityProject(2));
    world.certify(&a, home());
    world.certify(&rep, "DE/BY".parse().unwrap());
    let cache = Arc::new(TokenCache::new());
    let validator = world.validator().with_verdict_cache(cache.clone());

    let mut token = mint(&a, "Thanks", Value::from_raw(10_000_000), community_tax(), at(0));
    send(&mut token, &a, &rep, at(1));
    let en_route_version = token.chain_tail_hash(&Ed25519Blake2b).unwrap();
    let en_route = validator.validate(&token, &ValidationMode::FULL).unwrap();
    assert!(!en_route.is_valid());
    assert_eq!(cache.validity(&token.id(), &en_route_version), Validity::Invalid);

    send(&mut token, &rep, &project, at(2));
    let arrived = validator.validate(&token, &ValidationMode::FULL).unwrap();
    assert!(arrived.is_valid(), "{arrived}");
    let arrived_version = token.chain_tail_hash(&Ed25519Blake2b).unwrap();
    assert_eq!(cache.validity(&token.id(), &arrived_version), Validity::Valid);
    assert_eq!(cache.validity(&token.id(), &en_route_version), Validity::Invalid);
}

#[test]
fn tax_token_to_the_wrong_institution_fails_purpose() {
    let world = World::new();
    let a = adult(1);
    let wrong = party(9, AddressType::SustainabilityRepresentative(2));
    world.certify(&a, home());
    world.certify(&wrong, "DE/BY".parse().unwrap());

    let mut token = mint(&a, "Thanks", Value::from_raw(10_000_000), community_tax(), at(0));
    send(&mut token, &a, &wrong, at(1));
    let mode = ValidationMode {
        public_value: false,
        ..ValidationMode::FULL
    };
    let result = world.validator().validate(&token, &mode).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueMismatch], "{result}");
    assert_eq!(result.failures[0].field, "tx[0].rcp.t");
}

#[test]
fn vote_token_must_carry_one_unit() {
    let world = World::new();
    let a = adult(1);
    let token = mint(&a, "Vote", Value::from_units(2), Target::PERSON_INCOME, at(0));

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert!(result.has(FailureKind::ValueOutOfRange), "{result}");
}

#[test]
fn wrong_creation_amount_is_a_mismatch() {
    let world = World::new();
    let a = adult(1);
    let token = mint(&a, "Gradido", Value::from_units(2), Target::PERSON_INCOME, at(0));

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueMismatch], "{result}");
}

#[test]
fn unknown_currency_is_not_in_option_set() {
    let world = World::new();
    let a = adult(1);
    let token = mint(&a, "Doubloons", Value::UNIT, Target::PERSON_INCOME, at(0));

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueNotInOptionSet], "{result}");
}

#[test]
fn out_of_order_transaction_fails_even_when_signed() {
    let world = World::new();
    let (a, b) = (adult(1), adult(2));
    let token = income(&a, at(5));
    let predecessor = token.chain_tail_hash(&Ed25519Blake2b).unwrap();
    let tx = Transaction::builder()
        .timestamp(at(5))
        .recipient(Some(b.address.clone()))
        .sign(&Ed25519Blake2b, &a.keys.private, &predecessor)
        .unwrap();
    let token = Token::from_parts(token.header().clone(), vec![tx]);

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueOutOfRange], "{result}");
    assert_eq!(result.failures[0].field, "tx[0].ts");
}

#[test]
fn transfer_signed_by_stranger_is_signature_invalid() {
    let world = World::new();
    let (a, b, mallory) = (adult(1), adult(2), adult(3));
    let token = income(&a, at(0));
    let predecessor = token.chain_tail_hash(&Ed25519Blake2b).unwrap();
    let tx = Transaction::builder()
        .timestamp(at(1))
        .recipient(Some(b.address.clone()))
        .sign(&Ed25519Blake2b, &mallory.keys.private, &predecessor)
        .unwrap();
    let token = Token::from_parts(token.header().clone(), vec![tx]);

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::SignatureInvalid], "{result}");
}

#[test]
fn tampered_header_breaks_its_signature() {
    let world = World::new();
    let a = adult(1);
    let token = income(&a, at(0));
    let forged = token
        .header()
        .to_builder()
        .amount(Value::from_raw(50_000_000))
        .build()
        .unwrap();
    let token = Token::new(forged);

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert!(result.has(FailureKind::SignatureInvalid), "{result}");
}

#[test]
fn fail_on_first_raises_the_first_failure() {
    let world = World::new();
    let a = adult(1);
    let token = mint(&a, "Vote", Value::from_units(2), Target::PERSON_INCOME, at(0));
    let mode = ValidationMode::MINIMAL.with_failure_mode(FailureMode::FailOnFirst);

    let err = world.bare_validator().validate(&token, &mode).unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(err.result().unwrap().failures.len(), 1);
}

#[test]
fn fail_at_end_raises_everything() {
    let world = World::new();
    let a = adult(1);
    let token = mint(&a, "Vote", Value::from_units(2), community_tax(), at(0));
    let mode = ValidationMode::MINIMAL.with_failure_mode(FailureMode::FailAtEnd);

    match world.bare_validator().validate(&token, &mode) {
        Err(ValidationError::Invalid(result)) => assert!(result.failures.len() >= 2, "{result}"),
        other => panic!("expected invalid, got {other:?}"),
    }
}

#[test]
fn future_header_is_rejected() {
    let world = World::new();
    let a = adult(1);
    let token = income(&a, world.clock.now().plus_days(1));

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::TimestampInFuture], "{result}");
}

#[test]
fn early_token_is_not_judged_before_its_time() {
    let world = World::new();
    let a = adult(1);
    world.certify(&a, home());
    let cache = Arc::new(TokenCache::new());
    let validator = world.validator().with_verdict_cache(cache.clone());
    let token = income(&a, world.clock.now().plus_days(1));
    let version = token.chain_tail_hash(&Ed25519Blake2b).unwrap();

    let early = validator.validate(&token, &ValidationMode::FULL).unwrap();
    assert!(early.has(FailureKind::TimestampInFuture), "{early}");
    assert_eq!(cache.validity(&token.id(), &version), Validity::Unknown);

    world.clock.advance_days(2);
    let later = validator.validate(&token, &ValidationMode::FULL).unwrap();
    assert!(later.is_valid(), "{later}");
    assert_eq!(cache.validity(&token.id(), &version), Validity::Valid);
}

#[test]
fn references_on_a_normal_transfer_are_a_mismatch() {
    let world = World::new();
    let (a, b) = (adult(1), adult(2));
    let token = income(&a, at(0));
    let predecessor = token.chain_tail_hash(&Ed25519Blake2b).unwrap();
    let tx = Transaction::builder()
        .timestamp(at(1))
        .recipient(Some(b.address.clone()))
        .reference(Reference::new(token.id(), ReferenceRole::MergeWith))
        .sign(&Ed25519Blake2b, &a.keys.private, &predecessor)
        .unwrap();
    let token = Token::from_parts(token.header().clone(), vec![tx]);

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert_eq!(result.kinds(), vec![FailureKind::ValueMismatch], "{result}");
}

#[test]
fn nothing_may_follow_a_terminator() {
    let world = World::new();
    let (a, b) = (adult(1), adult(2));
    let token = income(&a, at(0));
    let other = income(&b, at(0));
    let terminated = terminate(&token, &a, at(1), Reference::new(other.id(), ReferenceRole::ForkTo));
    let predecessor = terminated.chain_tail_hash(&Ed25519Blake2b).unwrap();
    let tx = Transaction::builder()
        .timestamp(at(2))
        .recipient(Some(b.address.clone()))
        .sign(&Ed25519Blake2b, &a.keys.private, &predecessor)
        .unwrap();
    let mut transactions = terminated.transactions().to_vec();
    transactions.push(tx);
    let token = Token::from_parts(token.header().clone(), transactions);

    let result = world.bare_validator().validate(&token, &ValidationMode::MINIMAL).unwrap();
    assert!(result.has(FailureKind::ValueMismatch), "{result}");
}

#[test]
fn unreadable_json_is_fatal() {
    let world = World::new();
    let err = world
        .bare_validator()
        .validate_json("{\"hdr\": 3}", &ValidationMode::MINIMAL)
        .unwrap_err();
    assert!(matches!(err, ValidationError::Fatal(_)));
}

#[test]
fn identity_outage_is_retryable_unless_offline() {
    let world = World::new();
    let a = adult(1);
    world.certify(&a, home());
    world.identities.set_unreachable(true);
    let token = income(&a, at(0));

    let err = world.validator().validate(&token, &ValidationMode::FULL).unwrap_err();
    assert!(err.is_retryable());

    let result = world.validator().validate(&token, &ValidationMode::OFFLINE).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.unverified.len(), 1);
}

#[test]
fn batch_keeps_input_order() {
    let world = World::new();
    let a = adult(1);
    let good = income(&a, at(0));
    let bad = mint(&a, "Vote", Value::from_units(2), Target::PERSON_INCOME, at(1));
    let results = world
        .bare_validator()
        .validate_batch(&[good.clone(), bad, good], &ValidationMode::MINIMAL);
    let valid: Vec<bool> = results.into_iter().map(|r| r.unwrap().is_valid()).collect();
    assert_eq!(valid, vec![true, false, true]);
}
