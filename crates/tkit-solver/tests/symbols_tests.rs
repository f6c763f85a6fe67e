use super::*;
use crate::test_fixtures::Scenario;
use crate::types::TypeArgument;

#[test]
fn test_register_and_get() {
    let table = SymbolTable::new();
    let list = table.declare(SymbolKind::Class, "System.Collections.Generic.List", &["T"]);

    assert!(list.is_valid());
    assert!(table.contains(list));
    let info = table.get(list).expect("declared");
    assert_eq!(info.kind, SymbolKind::Class);
    assert_eq!(info.arity(), 1);
    assert_eq!(&*table.name_of(list).expect("name"), "List");
    assert_eq!(
        &*table.namespace_of(list).expect("namespace"),
        "System.Collections.Generic"
    );
    // No root: classes start without a base
    assert!(info.base.is_none());
}

#[test]
fn test_with_root_gives_classes_a_base() {
    let table = SymbolTable::with_root();
    let root = table.root().expect("root");
    assert!(table.is_root(root));

    let class = table.declare(SymbolKind::Class, "Car", &[]);
    let iface = table.declare(SymbolKind::Interface, "IDrivable", &[]);
    assert_eq!(table.base_type(class), Some(TypeRef::simple(root)));
    assert_eq!(table.base_type(iface), None);
    assert_eq!(table.base_type(root), None);
}

#[test]
fn test_lookup_by_qualified_and_bare_name() {
    let s = Scenario::build();
    assert_eq!(s.table.lookup("Company.Manager"), Some(s.manager));
    assert_eq!(s.table.lookup("Manager"), Some(s.manager));
    assert_eq!(s.table.lookup("System.Object"), Some(s.object));
    assert_eq!(s.table.lookup("Object"), Some(s.object));
    assert_eq!(s.table.lookup("Truck"), None);
}

#[test]
fn test_param_lookup() {
    let s = Scenario::build();
    assert_eq!(s.table.param_by_name(s.pair, "V"), Some(ParamRef::new(s.pair, 1)));
    assert_eq!(s.table.param_by_name(s.pair, "X"), None);
    assert_eq!(s.table.param(s.pair, 1), Some(ParamRef::new(s.pair, 1)));
    assert_eq!(s.table.param(s.pair, 2), None);
    assert_eq!(
        &*s.table.param_name(ParamRef::new(s.my_list, 0)).expect("T"),
        "T"
    );
}

#[test]
fn test_interfaces_are_flattened_through_bases() {
    let s = Scenario::build();
    let equatable_person = TypeRef::generic(s.equatable, [TypeArgument::simple(s.person)]);

    assert_eq!(s.table.interfaces(s.person), vec![equatable_person.clone()]);
    assert_eq!(s.table.interfaces(s.employee), vec![equatable_person.clone()]);
    assert_eq!(s.table.interfaces(s.manager), vec![equatable_person]);
    assert!(s.table.interfaces(s.car).is_empty());
}

#[test]
fn test_interfaces_substitute_through_generic_base() {
    let s = Scenario::build();
    // IntList : MyList<Int32>, MyList<T> : Enumerable<T>
    assert_eq!(
        s.table.interfaces(s.int_list),
        vec![s.closed(s.enumerable, &[s.int32])]
    );
    // The declaration itself keeps its own placeholder
    assert_eq!(
        s.table.interfaces(s.my_list),
        vec![TypeRef::generic(s.enumerable, [TypeArgument::param(s.my_list, 0)])]
    );
}

#[test]
fn test_interface_inheritance_is_flattened_and_deduplicated() {
    let table = SymbolTable::with_root();
    let enumerable = table.declare(SymbolKind::Interface, "Enumerable", &["T"]);
    let collection = table.declare(SymbolKind::Interface, "Collection", &["T"]);
    let list = table.declare(SymbolKind::Class, "List", &["T"]);
    let enumerable_of = |owner| TypeRef::generic(enumerable, [TypeArgument::param(owner, 0)]);

    table.add_interface(collection, enumerable_of(collection));
    table.add_interface(
        list,
        TypeRef::generic(collection, [TypeArgument::param(list, 0)]),
    );
    // Redundantly re-declared, as reflection metadata often is
    table.add_interface(list, enumerable_of(list));

    assert_eq!(
        table.interfaces(list),
        vec![
            TypeRef::generic(collection, [TypeArgument::param(list, 0)]),
            enumerable_of(list),
        ]
    );
}

#[test]
fn test_self_referential_interface_terminates() {
    let table = SymbolTable::new();
    let fractal = table.declare(SymbolKind::Interface, "Fractal", &["T"]);
    let deeper = TypeRef::generic(
        fractal,
        [TypeArgument::Type(TypeRef::generic(
            fractal,
            [TypeArgument::param(fractal, 0)],
        ))],
    );
    table.add_interface(fractal, deeper.clone());

    assert_eq!(table.interfaces(fractal), vec![deeper]);
}

#[test]
fn test_interfaces_within_limits() {
    let table = SymbolTable::new();
    let base = table.declare(SymbolKind::Interface, "Face0", &[]);
    let mut top = base;
    for i in 1..=5 {
        let face = table.declare(SymbolKind::Interface, &format!("Face{i}"), &[]);
        table.add_interface(face, TypeRef::simple(top));
        top = face;
    }

    let shallow = RecursionProfile::Custom {
        max_depth: 3,
        max_iterations: 100,
    };
    assert_eq!(
        table.interfaces_within(top, shallow),
        Err(UnifyError::DepthExceeded { depth: 3 })
    );
    let within = table
        .interfaces_within(top, RecursionProfile::SupertypeClosure)
        .expect("flatten");
    assert_eq!(within.len(), 5);
    assert_eq!(table.interfaces(top).len(), 5);
    assert_eq!(table.interfaces_within(TypeSymbol(999), shallow), Ok(Vec::new()));
}

#[test]
fn test_check_type_ref() {
    let s = Scenario::build();
    assert!(s.table.check_type_ref(&s.closed(s.my_list, &[s.int32])).is_ok());
    assert!(s.table.check_type_ref(&s.open(s.pair)).is_ok());

    assert_eq!(
        s.table.check_type_ref(&s.simple(s.my_list)),
        Err(UnifyError::ArityMismatch {
            symbol: s.my_list,
            expected: 1,
            found: 0
        })
    );
    assert_eq!(
        s.table.check_type_ref(&TypeRef::simple(TypeSymbol(999))),
        Err(UnifyError::UnknownSymbol(TypeSymbol(999)))
    );
    assert_eq!(
        s.table
            .check_type_ref(&TypeRef::generic(s.my_list, [TypeArgument::param(s.my_list, 3)])),
        Err(UnifyError::ParamOutOfRange {
            owner: s.my_list,
            index: 3,
            arity: 1
        })
    );
    // Nested arguments are checked too
    let nested = TypeRef::generic(s.my_list, [TypeArgument::Type(s.simple(s.pair))]);
    assert!(matches!(
        s.table.check_type_ref(&nested),
        Err(UnifyError::ArityMismatch { .. })
    ));
}

#[test]
fn test_all_symbols_in_allocation_order() {
    let s = Scenario::build();
    let all = s.table.all_symbols();
    assert_eq!(all.len(), s.table.len());
    assert_eq!(all.first(), Some(&s.object));
    assert_eq!(all.last(), Some(&s.car));
}
