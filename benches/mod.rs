use criterion::{criterion_group, criterion_main};

mod transport;

criterion_group!(
    benches,
    transport::https::connection::bench_connect_round_trip,
    transport::https::connection::bench_classify_peer_condition
);
criterion_main!(benches);
