// Parser benchmarks over pre-lexed token streams.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pyrite_syntax::{Parser, tokenize};

const CLOSURES: &str = "\
def make_adder(x):
    def add(y):
        return x + y
    return add
adder = make_adder(5)
print(adder(3))
";

/// Parses a small closure program.
fn bench_closures(c: &mut Criterion) {
    let (tokens, interner) = tokenize(CLOSURES).unwrap();

    c.bench_function("closures", |b| {
        b.iter(|| {
            Parser::new(black_box(tokens.clone()), interner.clone())
                .parse_program()
                .unwrap()
        })
    });
}

/// Parses long arithmetic chains.
fn bench_expression_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("expression_terms");

    for terms in [10, 100, 1000] {
        let expr = vec!["(a * 2 - b / 3)"; terms].join(" + ");
        let source = format!("x = {expr}\n");
        let (tokens, interner) = tokenize(&source).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(terms), &tokens, |b, tokens| {
            b.iter(|| {
                Parser::new(black_box(tokens.clone()), interner.clone())
                    .parse_program()
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_closures, bench_expression_depth);

criterion_main!(benches);
