use criterion::{black_box, criterion_group, criterion_main, Criterion};
use historia_stake::{settle, CreditLedger, StakeEntry};
use historia_types::{Address, Amount, ProtocolParams, Vote};

fn entries(n: usize) -> Vec<StakeEntry> {
    (0..n)
        .map(|i| {
            let vote = match i % 5 {
                0 => None,
                1 | 2 => Some(Vote::For),
                _ => Some(Vote::Against),
            };
            StakeEntry::new(
                Address::parse(format!("g1voter{i:06}")).unwrap(),
                Amount::new(1_000_000 + i as u128 * 7),
                vote,
            )
        })
        .collect()
}

fn settle_bench(c: &mut Criterion) {
    let proposer = Address::parse("g1proposer").unwrap();
    let params = ProtocolParams::default();
    let small = entries(10);
    let large = entries(10_000);

    c.bench_function("settle_10", |b| {
        b.iter(|| settle(black_box(&proposer), black_box(&small), &params))
    });
    c.bench_function("settle_10000", |b| {
        b.iter(|| settle(black_box(&proposer), black_box(&large), &params))
    });
}

fn credit_bench(c: &mut Criterion) {
    let proposer = Address::parse("g1proposer").unwrap();
    let params = ProtocolParams::default();
    let settlement = settle(&proposer, &entries(1_000), &params).unwrap();

    c.bench_function("credit_1000", |b| {
        b.iter(|| {
            let mut ledger = CreditLedger::new();
            ledger.apply(black_box(&settlement), &params.platform_address)
        })
    });
}

criterion_group!(benches, settle_bench, credit_bench);
criterion_main!(benches);
