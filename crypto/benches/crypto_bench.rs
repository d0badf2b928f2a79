use criterion::{black_box, criterion_group, criterion_main, Criterion};
use historia_types::{Address, Vote};

fn commit_bench(c: &mut Criterion) {
    let address = Address::parse("g1jg8mtutu9khhfwc4nxmuhcpftf0pajdhfvsqf5").unwrap();
    let secret = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    c.bench_function("commit_sha256", |b| {
        b.iter(|| historia_crypto::commit(black_box(&address), Vote::For, black_box(secret)))
    });
}

fn verify_bench(c: &mut Criterion) {
    let address = Address::parse("g1jg8mtutu9khhfwc4nxmuhcpftf0pajdhfvsqf5").unwrap();
    let secret = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
    let hash = historia_crypto::commit(&address, Vote::Against, secret);

    c.bench_function("verify_sha256", |b| {
        b.iter(|| {
            historia_crypto::verify(black_box(&address), Vote::Against, black_box(secret), &hash)
        })
    });
}

fn secret_generate_bench(c: &mut Criterion) {
    c.bench_function("secret_generate", |b| {
        b.iter(historia_crypto::Secret::generate)
    });
}

criterion_group!(benches, commit_bench, verify_bench, secret_generate_bench);
criterion_main!(benches);
