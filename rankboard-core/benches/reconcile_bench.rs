//! Criterion benchmarks for the reconciliation hot path.
//!
//! Benchmarks:
//! 1. Document parse (500-record universe with SEPA charts)
//! 2. Reconcile with an empty query (full table copy)
//! 3. Reconcile with a selective query and action filter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rankboard_core::{
    parse_document, reconcile, Action, ActionFilter, FilterState, Session,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn ticker(i: usize) -> String {
    let letters = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut s = String::new();
    let mut n = i;
    for _ in 0..4 {
        s.push(letters[n % 26] as char);
        n /= 26;
    }
    s
}

fn make_document(n: usize) -> String {
    let buys = n / 5;
    let records: Vec<String> = (0..n)
        .map(|i| {
            let action = if i < buys {
                "BUY"
            } else if i >= n - buys {
                "SELL"
            } else {
                "HOLD"
            };
            format!(
                r#"{{"ticker":"{}","rank":{},"composite_score":{},"momentum_12_1":{},"action":"{}"}}"#,
                ticker(i),
                i + 1,
                1.0 - i as f64 / n as f64,
                0.5 - i as f64 / n as f64,
                action
            )
        })
        .collect();

    let dates: Vec<String> = (0..250).map(|d| format!("\"d{d}\"")).collect();
    let closes: Vec<String> = (0..250).map(|d| format!("{}", 100.0 + d as f64 * 0.1)).collect();
    let charts: Vec<String> = (0..20)
        .map(|i| {
            format!(
                r#"{{"ticker":"{}","rs_score":0.9,"dates":[{}],"close":[{c}],"ma50":[{c}],"ma150":[{c}],"ma200":[{c}]}}"#,
                ticker(i),
                dates.join(","),
                c = closes.join(",")
            )
        })
        .collect();

    format!(
        r#"{{"as_of_date":"2025-01-31","signal":"Composite","universes":[{{"id":"big","name":"Big","records":[{}],"sepa_charts":[{}]}}]}}"#,
        records.join(","),
        charts.join(",")
    )
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let doc = make_document(500);
    c.bench_function("parse_document_500", |b| {
        b.iter(|| parse_document(black_box(doc.as_bytes())).unwrap())
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let doc = make_document(500);
    let ds = parse_document(doc.as_bytes()).unwrap();

    let mut group = c.benchmark_group("reconcile");
    let sessions = [
        ("all", Session::default()),
        (
            "query_buy",
            Session {
                filter: FilterState::new("ab", ActionFilter::Only(Action::Buy)),
                ..Session::default()
            },
        ),
    ];
    for (name, session) in sessions {
        group.bench_with_input(BenchmarkId::from_parameter(name), &session, |b, s| {
            b.iter(|| reconcile(black_box(&ds), black_box(s)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_reconcile);
criterion_main!(benches);
