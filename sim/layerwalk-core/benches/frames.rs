use criterion::{black_box, criterion_group, criterion_main, Criterion};
use layerwalk_core::{
    build_exchange,
    builder::FrameBuilder,
    exchange::ExchangeKind,
    read_frame,
    rng::SimRng,
    AddressIdentity, TransportProtocol,
};

fn build_tcp(c: &mut Criterion) {
    let builder = FrameBuilder::new(TransportProtocol::Tcp);
    c.bench_function("build_tcp", |b| {
        b.iter(|| builder.build(black_box("Hello, Server!")))
    });
}

fn read_tcp(c: &mut Criterion) {
    let (frame, _) = FrameBuilder::new(TransportProtocol::Tcp).build("Hello, Server!");
    c.bench_function("read_tcp", |b| b.iter(|| read_frame(black_box(&frame))));
}

fn handshake(c: &mut Criterion) {
    let client = AddressIdentity::new("Client", "192.168.1.100", "00:11:22:33:44:01").unwrap();
    let server = AddressIdentity::new("Server", "192.168.1.10", "00:11:22:33:44:04").unwrap();
    let mut rng = SimRng::seeded(0xBAD5EED);
    c.bench_function("handshake", |b| {
        b.iter(|| {
            build_exchange(
                ExchangeKind::Handshake,
                "",
                "TCP",
                &client,
                &server,
                &mut rng,
            )
        })
    });
}

criterion_group!(benches, build_tcp, read_tcp, handshake);
criterion_main!(benches);
