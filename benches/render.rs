use chrono::{FixedOffset, TimeZone};
use criterion::{criterion_group, criterion_main, Criterion};
use sysloggen::{Fixtures, Format, Generator, Message};

fn render(c: &mut Criterion) {
    let timestamp = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2023, 4, 7, 12, 52, 0)
        .unwrap();
    let msg = Message::new("Failed password for root from 10.0.0.1 port 40022 ssh2")
        .with_timestamp(timestamp)
        .with_hostname("bench-host")
        .with_proc_id("4242");
    let mut group = c.benchmark_group("render");

    group.bench_function("rfc3164", |b| {
        let msg = msg.clone().with_format(Format::RFC3164);
        b.iter(|| msg.render())
    });

    group.bench_function("rfc5424", |b| {
        let msg = msg.clone().with_format(Format::RFC5424);
        b.iter(|| msg.render())
    });

    group.finish();
}

fn generate(c: &mut Criterion) {
    let mut generator = Generator::with_fixtures(Fixtures::seeded(1));
    let mut group = c.benchmark_group("generate");

    for name in ["ssh-failed", "nginx-access"] {
        group.bench_function(name, |b| b.iter(|| generator.generate(name).unwrap()));
    }

    group.finish();
}

criterion_group!(benches, render, generate);
criterion_main!(benches);
