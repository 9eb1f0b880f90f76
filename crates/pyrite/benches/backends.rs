// Backend benchmarks: the same checked programs run on the tree-walking
// interpreter and on the bytecode VM.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pyrite::bytecode::Vm;
use pyrite::interpreter::Interpreter;
use pyrite::RuntimeConfig;
use std::io;

const FIB: &str = "\
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)
x = fib(18)
";

const LOOP: &str = "\
i = 0
total = 0
while i < 20000:
    total = total + i * 2
    i = i + 1
";

const CLOSURES: &str = "\
def make_adder(x):
    def add(y):
        return x + y
    return add
i = 0
while i < 2000:
    adder = make_adder(i)
    i = adder(1)
";

const PROGRAMS: &[(&str, &str)] = &[("fib", FIB), ("loop", LOOP), ("closures", CLOSURES)];

/// Runs each program on both backends, excluding the frontend.
fn bench_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");

    for (name, source) in PROGRAMS {
        let checked = pyrite::check(source).unwrap();
        let unit = pyrite::bytecode::generate(&checked);

        group.bench_with_input(BenchmarkId::new("interpret", name), &checked, |b, checked| {
            let mut interpreter = Interpreter::new(RuntimeConfig::default(), io::sink());
            b.iter(|| interpreter.interpret(black_box(checked)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("bytecode", name), &unit, |b, unit| {
            let mut vm = Vm::new(RuntimeConfig::default(), io::sink());
            b.iter(|| vm.run(black_box(unit)).unwrap());
        });
    }

    group.finish();
}

/// Code generation on its own.
fn bench_codegen(c: &mut Criterion) {
    let checked = pyrite::check(FIB).unwrap();

    c.bench_function("codegen_fib", |b| {
        b.iter(|| pyrite::bytecode::generate(black_box(&checked)))
    });
}

/// The whole pipeline from source text.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for backend in pyrite::Backend::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(backend), &backend, |b, backend| {
            b.iter(|| pyrite::run(black_box(LOOP), *backend, RuntimeConfig::default(), io::sink()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_execution, bench_codegen, bench_pipeline);

criterion_main!(benches);
