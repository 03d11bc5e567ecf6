use std::{ffi::CStr, hint::black_box};

use criterion::{criterion_group, criterion_main, Criterion};
use shakmaty::{fen::Fen, CastlingMode, Chess};
use syzygy_bridge::{codec, NativeEngine, ProbeArgs, Session, TbPosition};

struct Stub;

impl NativeEngine for Stub {
    fn init(&self, _path: &CStr) -> bool {
        true
    }

    fn largest(&self) -> u32 {
        5
    }

    fn probe_wdl(&self, _args: &ProbeArgs) -> u32 {
        4
    }

    fn probe_root(&self, _args: &ProbeArgs) -> u32 {
        19924244
    }
}

fn bench_decode_dtz(c: &mut Criterion) {
    c.bench_function("decode_dtz", |b| {
        b.iter(|| codec::decode_dtz(black_box(19924244)))
    });
}

fn bench_is_available(c: &mut Criterion) {
    let session = Session::with_engine(Stub);
    session.load("tables/regular");

    c.bench_function("is_available", |b| {
        b.iter(|| session.is_available(black_box(4)))
    });
}

fn bench_probe_dtz(c: &mut Criterion) {
    let session = Session::with_engine(Stub);
    session.load("tables/regular");

    let pos: Chess = "8/8/8/8/8/8/4k3/KR6 w - - 0 1"
        .parse::<Fen>()
        .expect("valid fen")
        .into_position(CastlingMode::Standard)
        .expect("legal position");

    c.bench_function("probe_dtz", |b| {
        b.iter(|| {
            let pos = TbPosition::from_position(black_box(&pos)).expect("no castling rights");
            session.probe_dtz(&pos).expect("probe dtz")
        })
    });
}

criterion_group!(benches, bench_decode_dtz, bench_is_available, bench_probe_dtz);
criterion_main!(benches);
