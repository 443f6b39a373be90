use criterion::{black_box, criterion_group, criterion_main, Criterion};
use custody_crypto::{Algorithm, Ed25519Blake2b};
use custody_types::AddressType;

fn ed25519_sign_bench(c: &mut Criterion) {
    let kp = custody_crypto::keypair_from_seed(&[1u8; 32]);
    let msg = [42u8; 32];

    c.bench_function("ed25519_sign_32B", |b| {
        b.iter(|| custody_crypto::sign_message(black_box(&msg), &kp.private))
    });
}

fn ed25519_verify_bench(c: &mut Criterion) {
    let alg = Ed25519Blake2b;
    let kp = custody_crypto::keypair_from_seed(&[2u8; 32]);
    let signer = alg
        .create_address(kp.public, AddressType::NaturalPersonAdult)
        .unwrap();
    let digest = alg.hash(&[42u8; 128]);
    let sig = alg.sign(&digest, &kp.private);

    c.bench_function("ed25519_verify_digest", |b| {
        b.iter(|| alg.verify_signature(black_box(&sig), &signer, &digest))
    });
}

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| custody_crypto::blake2b_256(black_box(&data)))
    });
}

fn address_encode_bench(c: &mut Criterion) {
    let kp = custody_crypto::keypair_from_seed(&[3u8; 32]);
    let addr = custody_crypto::derive_address(kp.public, AddressType::CommunityRepresentative(1)).unwrap();

    c.bench_function("address_encode", |b| {
        b.iter(|| custody_crypto::encode_address(black_box(&addr)))
    });
}

criterion_group!(
    benches,
    ed25519_sign_bench,
    ed25519_verify_bench,
    blake2b_256_bench,
    address_encode_bench,
);
criterion_main!(benches);
