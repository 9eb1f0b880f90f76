//! End-to-end language properties, checked on both backends.

use pyrite::runtime::RuntimeErrorKind;
use pyrite::{Backend, Error, RuntimeConfig};

/// Runs `source` on `backend`, returning what it printed and how it ended.
fn run_on(source: &str, backend: Backend) -> (String, pyrite::Result<()>) {
    let mut out = Vec::new();
    let result = pyrite::run(source, backend, RuntimeConfig::default(), &mut out);
    (String::from_utf8(out).unwrap(), result)
}

/// Output of `source`, asserting both backends agree and succeed.
fn output(source: &str) -> String {
    let (interpreted, result) = run_on(source, Backend::Interpret);
    result.unwrap();
    let (compiled, result) = run_on(source, Backend::Bytecode);
    result.unwrap();
    assert_eq!(interpreted, compiled, "backends disagree on:\n{source}");
    interpreted
}

#[test]
fn test_operator_precedence() {
    assert_eq!(output("print(2 + 3 * 4)\n"), "14\n");
    assert_eq!(output("print((2 + 3) * 4)\n"), "20\n");
}

#[test]
fn test_left_associativity() {
    assert_eq!(output("print(10 - 3 - 2)\n"), "5\n");
    assert_eq!(output("print(100 / 10 / 5)\n"), "2.0\n");
}

#[test]
fn test_blocks_do_not_scope() {
    assert_eq!(output("if 1 == 1:\n    x = 1\nprint(x)\n"), "1\n");
    assert_eq!(
        output("i = 0\nwhile i < 3:\n    last = i\n    i = i + 1\nprint(last)\n"),
        "2\n"
    );
}

#[test]
fn test_closures() {
    let source = "def make_adder(x):\n    def add(y):\n        return x + y\n    return add\nadder = make_adder(5)\nprint(adder(3))\n";
    assert_eq!(output(source), "8\n");
}

#[test]
fn test_closures_capture_their_own_frame() {
    let source = "\
def make_adder(x):
    def add(y):
        return x + y
    return add
add1 = make_adder(1)
add10 = make_adder(10)
print(add1(1), add10(1), add1(2))
";
    assert_eq!(output(source), "2 11 3\n");
}

#[test]
fn test_closures_are_lexical() {
    let source = "\
x = 'global'
def show():
    return x
def caller():
    x = 'local'
    return show()
print(caller())
";
    assert_eq!(output(source), "global\n");
}

#[test]
fn test_recursion() {
    let source = "def fact(n):\n    if n == 0:\n        return 1\n    else:\n        return n * fact(n - 1)\nprint(fact(5))\n";
    assert_eq!(output(source), "120\n");
}

#[test]
fn test_undeclared_identifier_rejected_before_running() {
    for backend in Backend::ALL {
        let (out, result) = run_on("print('start')\nprint(x)\n", backend);
        assert!(out.is_empty(), "{backend} produced output");
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Semantic(_)));
        assert_eq!((err.line(), err.column()), (2, 7));
    }
}

#[test]
fn test_bad_dedent_is_a_lex_error() {
    let source = "if 1 == 1:\n        x = 1\n    y = 2\n";
    for backend in Backend::ALL {
        let (out, result) = run_on(source, backend);
        assert!(out.is_empty());
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Lex(_)), "{err}");
        assert_eq!(err.line(), 3);
    }
}

#[test]
fn test_division_policy() {
    assert_eq!(output("print(7 / 2)\n"), "3.5\n");
    assert_eq!(output("print(10 / 2)\n"), "5.0\n");
    assert_eq!(output("print(7 * 2, 7 - 9)\n"), "14 -2\n");
    assert_eq!(output("print(1.5 + 1, 2 * 0.5)\n"), "2.5 1.0\n");
}

#[test]
fn test_chained_comparison_compares_left_result() {
    assert_eq!(output("print(1 < 2 == 2)\n"), "False\n");
    for backend in Backend::ALL {
        let (_, result) = run_on("print(1 < 2 < 3)\n", backend);
        let err = result.unwrap_err();
        assert!(matches!(
            err.runtime_kind(),
            Some(RuntimeErrorKind::TypeMismatch { .. })
        ));
        assert_eq!((err.line(), err.column()), (1, 13));
    }
}

#[test]
fn test_string_operations() {
    assert_eq!(output("print('ab' + 'cd')\n"), "abcd\n");
    assert_eq!(output("print('apple' < 'banana', 'b' == 'b')\n"), "True True\n");
    for backend in Backend::ALL {
        let (_, result) = run_on("print(1 + 'a')\n", backend);
        assert!(matches!(
            result.unwrap_err().runtime_kind(),
            Some(RuntimeErrorKind::TypeMismatch { .. })
        ));
    }
}

#[test]
fn test_return_unwinds_one_call() {
    let source = "\
def inner():
    i = 0
    while 1 == 1:
        if i == 2:
            return i
        i = i + 1
def outer():
    n = inner()
    print('inner gave', n)
    return n * 10
print(outer())
";
    assert_eq!(output(source), "inner gave 2\n20\n");
}

#[test]
fn test_recursion_limit() {
    let source = "def down(n):\n    return down(n + 1)\ndown(0)\n";
    let config = RuntimeConfig::default().with_max_call_depth(100);
    for backend in Backend::ALL {
        let err = pyrite::run(source, backend, config, Vec::new()).unwrap_err();
        assert_eq!(
            err.runtime_kind(),
            Some(&RuntimeErrorKind::RecursionLimit { limit: 100 })
        );
        assert!(err.message().starts_with("recursion depth exceeded"));
        assert_eq!((err.line(), err.column()), (2, 12));
    }
}

const DOWN: &str = "\
def down(n):
    if n == 0:
        return 0
    else:
        return 1 + down(n - 1)
";

#[test]
fn test_default_recursion_limit_is_reachable() {
    assert_eq!(output(&format!("{DOWN}print(down(999))\n")), "999\n");

    let source = format!("{DOWN}print(down(1000))\n");
    for backend in Backend::ALL {
        let (out, result) = run_on(&source, backend);
        let err = result.unwrap_err();
        assert_eq!(
            err.runtime_kind(),
            Some(&RuntimeErrorKind::RecursionLimit { limit: 1000 })
        );
        assert_eq!((err.line(), err.column()), (5, 20));
        assert!(out.is_empty());
    }
}

#[test]
fn test_closure_frames_are_released() {
    let source = "\
def make(x):
    def add(y):
        return x + y
    return 0
i = 0
while i < 20000:
    make(i)
    i = i + 1
print(i)
";
    let checked = pyrite::check(source).unwrap();
    let limit = 2 * pyrite::runtime::heap::MIN_COLLECT_THRESHOLD;

    let mut interpreter = pyrite::interpreter::Interpreter::new(RuntimeConfig::default(), Vec::new());
    interpreter.interpret(&checked).unwrap();
    let stats = interpreter.heap_stats();
    assert!(stats.peak <= limit, "{stats:?}");
    assert_eq!(interpreter.into_output(), b"20000\n");

    let unit = pyrite::bytecode::generate(&checked);
    let mut vm = pyrite::bytecode::Vm::new(RuntimeConfig::default(), Vec::new());
    vm.run(&unit).unwrap();
    let stats = vm.heap_stats();
    assert!(stats.peak <= limit, "{stats:?}");
    assert_eq!(vm.into_output(), b"20000\n");
}

#[test]
fn test_large_ints_compare_exactly_with_floats() {
    assert_eq!(
        output("big = 9007199254740993\nprint(big == 9007199254740992.0, big > 9007199254740992.0)\n"),
        "False True\n"
    );
}
