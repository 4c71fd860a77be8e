use criterion::{black_box, criterion_group, criterion_main, Criterion};

use algeff::{handle, run, Action, Handlers, Program, Value};

fn counting_chain(n: u64) -> Program {
    let mut program = Program::pure(Value::Int(0));
    for _ in 0..n {
        program = program.and_then(|acc| {
            let acc = acc.as_int().unwrap_or(0);
            Program::perform(Action::nullary("State", "get"))
                .map(move |v| Value::Int(acc + v.as_int().unwrap_or(0)))
        });
    }
    program
}

fn bench_dispatch(c: &mut Criterion) {
    c.bench_function("dispatch_1000_value_entries", |b| {
        b.iter(|| {
            let table = Handlers::new().value("State", "get", 1i64);
            let result = run(handle(counting_chain(black_box(1000)), table)).unwrap();
            assert_eq!(result, Value::Int(1000));
        })
    });

    c.bench_function("dispatch_1000_func_entries", |b| {
        b.iter(|| {
            let table = Handlers::new().on("State", "get", |_args, tactics| {
                tactics.resume(Value::Int(1))?;
                Ok(None)
            });
            let result = run(handle(counting_chain(black_box(1000)), table)).unwrap();
            assert_eq!(result, Value::Int(1000));
        })
    });

    c.bench_function("forwarding_depth_8", |b| {
        b.iter(|| {
            // One real handler at the outermost layer, seven forwarding layers.
            let mut handled = handle(counting_chain(100), Handlers::new());
            for _ in 0..7 {
                handled = handle(handled, Handlers::new());
            }
            let table = Handlers::new().value("State", "get", 1i64);
            let result = run(handle(handled, table)).unwrap();
            assert_eq!(result, Value::Int(100));
        })
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
