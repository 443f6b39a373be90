use custody_crypto::{keypair_from_seed, Ed25519Blake2b, ED25519_BLAKE2B};
use custody_types::{Address, AddressType, Target, Timestamp, Value};
use custody_token::{Header, Token, Transaction};
use proptest::prelude::*;

fn header(seed: u8, amount: u128, secs: u64, location: &str) -> Header {
    let kp = keypair_from_seed(&[seed; 32]);
    Header::builder()
        .algorithm(ED25519_BLAKE2B)
        .currency("Thanks")
        .amount(Value::from_raw(amount))
        .timestamp(Timestamp::from_secs(secs))
        .location(location.parse().unwrap())
        .target(Target::PERSON_INCOME)
        .recipient(Address::new(AddressType::NaturalPersonAdult, kp.public.clone()))
        .sign(&Ed25519Blake2b, &kp.private)
        .unwrap()
}

proptest! {
    #[test]
    fn header_json_round_trip_keeps_hash(
        seed in 1u8..=255,
        amount in 1u128..=100_000_000_000,
        secs in 0u64..=4_000_000_000,
        location in "[A-Z]{2}(/[A-Z]{2}){0,2}",
    ) {
        let alg = Ed25519Blake2b;
        let original = header(seed, amount, secs, &location);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Header = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed.canonical_bytes().unwrap(), original.canonical_bytes().unwrap());
        prop_assert_eq!(parsed.hash_to_chain(&alg).unwrap(), original.hash_to_chain(&alg).unwrap());
    }

    #[test]
    fn transaction_json_round_trip_keeps_hash(
        secs in 0u64..=4_000_000_000,
        purpose in proptest::option::of("[a-z ]{0,40}"),
        encrypted in proptest::option::of(proptest::collection::vec(any::<u8>(), 0..64)),
        predecessor in any::<[u8; 32]>(),
    ) {
        let alg = Ed25519Blake2b;
        let kp = keypair_from_seed(&[7u8; 32]);
        let predecessor = custody_types::Hash::new(predecessor);
        let tx = Transaction::builder()
            .timestamp(Timestamp::from_secs(secs))
            .recipient(Some(Address::new(AddressType::Company, kp.public.clone())))
            .purpose(purpose)
            .encrypted_purpose(encrypted)
            .sign(&alg, &kp.private, &predecessor)
            .unwrap();
        let parsed: Transaction = serde_json::from_str(&serde_json::to_string(&tx).unwrap()).unwrap();
        prop_assert_eq!(
            parsed.hash_to_sign(&alg, &predecessor).unwrap(),
            tx.hash_to_sign(&alg, &predecessor).unwrap()
        );
    }

    #[test]
    fn chain_hashes_are_idempotent(transfers in 0usize..6) {
        let alg = Ed25519Blake2b;
        let owners: Vec<_> = (1..=transfers as u8 + 1).map(|s| keypair_from_seed(&[s; 32])).collect();
        let mut token = Token::new(header(1, 100_000_000, 1_000, "DE"));
        for (i, pair) in owners.windows(2).enumerate() {
            let recipient = Address::new(AddressType::NaturalPersonAdult, pair[1].public.clone());
            token
                .transfer(&alg, &pair[0], recipient, Timestamp::from_secs(1_001 + i as u64), None)
                .unwrap();
        }
        let first = token.chain_hashes(&alg).unwrap();
        let second = token.chain_hashes(&alg).unwrap();
        let fresh = Token::from_json(&token.to_json_pretty().unwrap()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, fresh.chain_hashes(&alg).unwrap());
    }
}
