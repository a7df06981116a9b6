use criterion::{black_box, criterion_group, criterion_main, Criterion};

use svgpath::bench_only::Lexer;
use svgpath::{ParseMode, PathBuilder};

static INPUT: &str = "M10 20 C 30,40 50 60-70,80,90 100,110 120,130,140";

static ARCS: &str = "M10 20 a5 5 0 0110 10 a5 5 0 1 0 10-10 A 20,20 30 0,1 50 50 z";

static SHORTHANDS: &str = "m10 20 h10 v10 s10 10 20 0 t10 10 10 0 q5 5 10 0 z";

fn lex_path(input: &str) {
    let lexer = Lexer::new(black_box(input));

    for (_pos, _token) in lexer {
        // no-op
    }
}

fn path_parser(c: &mut Criterion) {
    c.bench_function("parse path into builder", |b| {
        let input = black_box(INPUT);

        b.iter(|| {
            let mut builder = PathBuilder::default();
            let _ = builder.parse(input, ParseMode::Permissive);
        });
    });

    c.bench_function("parse path with arcs", |b| {
        let input = black_box(ARCS);

        b.iter(|| {
            let mut builder = PathBuilder::default();
            let _ = builder.parse(input, ParseMode::Strict);
        });
    });

    c.bench_function("parse path with shorthands", |b| {
        let input = black_box(SHORTHANDS);

        b.iter(|| {
            let mut builder = PathBuilder::default();
            let _ = builder.parse(input, ParseMode::Permissive);
        });
    });

    c.bench_function("lex str", |b| {
        let input = black_box(INPUT);

        b.iter(|| {
            lex_path(input);
        });
    });
}

criterion_group!(benches, path_parser);
criterion_main!(benches);
