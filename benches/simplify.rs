use criterion::{black_box, criterion_group, criterion_main, Criterion};

use svgpath::{simplify, PathData, Session, SimplifyOptions};

static CIRCLE: &str = "M0 -10 C5.523 -10 10 -5.523 10 0 C10 5.523 5.523 10 0 10 \
                       C-5.523 10 -10 5.523 -10 0 C-10 -5.523 -5.523 -10 0 -10 Z";

// A wavy outline with many collinear vertices and shallow curves.
fn outline() -> String {
    let mut s = String::from("M0 0");

    for i in 1..=50 {
        s.push_str(&format!(" L{} 0", i * 2));
    }

    for i in 0..25 {
        let x = 100.0 - f64::from(i) * 4.0;
        s.push_str(&format!(" Q{} 10 {} 0", x - 1.0, x - 2.0));
        s.push_str(&format!(" Q{} -10 {} 0", x - 3.0, x - 4.0));
    }

    s.push_str(" Z");
    s
}

fn bench_simplify(c: &mut Criterion) {
    let session = Session::new_for_test_suite();
    let options = SimplifyOptions::default();

    let circle: PathData = CIRCLE.parse().unwrap();
    c.bench_function("simplify circle", |b| {
        b.iter(|| simplify(black_box(&circle), &options, &session));
    });

    let outline: PathData = outline().parse().unwrap();
    c.bench_function("simplify outline", |b| {
        b.iter(|| simplify(black_box(&outline), &options, &session));
    });

    let multipass = SimplifyOptions::default()
        .with_multipass(true)
        .with_keep_details(true);
    c.bench_function("simplify outline, multipass", |b| {
        b.iter(|| simplify(black_box(&outline), &multipass, &session));
    });
}

criterion_group!(benches, bench_simplify);
criterion_main!(benches);
