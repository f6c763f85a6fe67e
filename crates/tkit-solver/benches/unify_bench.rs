//! Unification benchmarks.
//!
//! Measures ancestor searches over deep inheritance chains and wide
//! interface sets, with and without a reused unifier.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tkit_solver::{SymbolKind, SymbolTable, TypeArgument, TypeRef, TypeSymbol, Unifier, supertypes_of, unify};

/// `Level0 <- Level1 <- ... <- Level{depth}`, each level also implementing
/// `Tagged<LevelN>`.
fn deep_chain(depth: usize) -> (SymbolTable, TypeSymbol, TypeSymbol, TypeSymbol) {
    let table = SymbolTable::with_root();
    let tagged = table.declare(SymbolKind::Interface, "Bench.Tagged", &["T"]);
    let mut levels = Vec::with_capacity(depth + 1);
    for i in 0..=depth {
        let level = table.declare(SymbolKind::Class, &format!("Bench.Level{i}"), &[]);
        table.add_interface(level, TypeRef::generic(tagged, [TypeArgument::simple(level)]));
        if let Some(&parent) = levels.last() {
            table.set_base(level, Some(TypeRef::simple(parent)));
        }
        levels.push(level);
    }
    (table, tagged, levels[0], levels[depth])
}

/// A generic `Bag<T>` implementing `width` generic interfaces.
fn wide_interfaces(width: usize) -> (SymbolTable, TypeSymbol, TypeSymbol, TypeSymbol) {
    let table = SymbolTable::with_root();
    let int = table.declare(SymbolKind::Primitive, "System.Int32", &[]);
    let bag = table.declare(SymbolKind::Class, "Bench.Bag", &["T"]);
    let mut last = bag;
    for i in 0..width {
        let interface = table.declare(SymbolKind::Interface, &format!("Bench.Facet{i}"), &["T"]);
        table.add_interface(bag, TypeRef::generic(interface, [TypeArgument::param(bag, 0)]));
        last = interface;
    }
    (table, int, bag, last)
}

fn bench_deep_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("unify_deep_chain");

    for depth in [4usize, 16, 48] {
        let (table, tagged, root_level, leaf) = deep_chain(depth);
        let ancestor = TypeRef::simple(root_level);
        let leaf = TypeRef::simple(leaf);
        let tag = TypeRef::generic(tagged, [TypeArgument::simple(root_level)]);

        group.bench_with_input(BenchmarkId::new("ancestor", depth), &depth, |b, _| {
            b.iter(|| unify(&table, black_box(&ancestor), black_box(&leaf)));
        });
        group.bench_with_input(BenchmarkId::new("inherited_interface", depth), &depth, |b, _| {
            b.iter(|| unify(&table, black_box(&tag), black_box(&leaf)));
        });
        group.bench_with_input(BenchmarkId::new("no_match", depth), &depth, |b, _| {
            b.iter(|| unify(&table, black_box(&leaf), black_box(&ancestor)));
        });
        group.bench_with_input(BenchmarkId::new("supertypes_of", depth), &depth, |b, _| {
            b.iter(|| supertypes_of(&table, black_box(&leaf)));
        });
    }

    group.finish();
}

fn bench_wide_interfaces(c: &mut Criterion) {
    let mut group = c.benchmark_group("unify_wide_interfaces");

    for width in [8usize, 64] {
        let (table, int, bag, last) = wide_interfaces(width);
        let bag_of_int = TypeRef::generic(bag, [TypeArgument::simple(int)]);
        let facet_of_int = TypeRef::generic(last, [TypeArgument::simple(int)]);

        group.bench_with_input(BenchmarkId::new("last_facet", width), &width, |b, _| {
            b.iter(|| unify(&table, black_box(&facet_of_int), black_box(&bag_of_int)));
        });
        group.bench_with_input(BenchmarkId::new("reused_unifier", width), &width, |b, _| {
            let mut unifier = Unifier::new(&table);
            b.iter(|| unifier.unify(black_box(&facet_of_int), black_box(&bag_of_int)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_deep_chain, bench_wide_interfaces);
criterion_main!(benches);
