//! Shared type universe for solver tests.
//!
//! ```text
//! Object (root)
//! Int32      : Equatable<Int32>
//! Person     : Equatable<Person>
//! Employee   : Person
//! Manager    : Employee
//! MyList<T>  : Enumerable<T>
//! IntList    : MyList<Int32>
//! Pair<K, V> : Enumerable<Pair<K, V>>
//! Car
//! ```

use crate::symbols::{SymbolKind, SymbolTable};
use crate::types::{TypeArgument, TypeRef, TypeSymbol};

pub struct Scenario {
    pub table: SymbolTable,
    pub object: TypeSymbol,
    pub int32: TypeSymbol,
    pub string: TypeSymbol,
    pub equatable: TypeSymbol,
    pub enumerable: TypeSymbol,
    pub person: TypeSymbol,
    pub employee: TypeSymbol,
    pub manager: TypeSymbol,
    pub my_list: TypeSymbol,
    pub int_list: TypeSymbol,
    pub pair: TypeSymbol,
    pub car: TypeSymbol,
}

impl Scenario {
    pub fn build() -> Self {
        let table = SymbolTable::with_root();
        let object = table.root().expect("root registered");

        let equatable = table.declare(SymbolKind::Interface, "System.Equatable", &["T"]);
        let enumerable = table.declare(SymbolKind::Interface, "System.Enumerable", &["T"]);
        let int32 = table.declare(SymbolKind::Primitive, "System.Int32", &[]);
        let string = table.declare(SymbolKind::Primitive, "System.String", &[]);
        let person = table.declare(SymbolKind::Class, "Company.Person", &[]);
        let employee = table.declare(SymbolKind::Class, "Company.Employee", &[]);
        let manager = table.declare(SymbolKind::Class, "Company.Manager", &[]);
        let my_list = table.declare(SymbolKind::Class, "Collections.MyList", &["T"]);
        let int_list = table.declare(SymbolKind::Class, "Collections.IntList", &[]);
        let pair = table.declare(SymbolKind::Struct, "Collections.Pair", &["K", "V"]);
        let car = table.declare(SymbolKind::Class, "Garage.Car", &[]);

        let equatable_of = |arg: TypeSymbol| TypeRef::generic(equatable, [TypeArgument::simple(arg)]);
        table.add_interface(int32, equatable_of(int32));
        table.add_interface(person, equatable_of(person));
        table.set_base(employee, Some(TypeRef::simple(person)));
        table.set_base(manager, Some(TypeRef::simple(employee)));
        table.add_interface(
            my_list,
            TypeRef::generic(enumerable, [TypeArgument::param(my_list, 0)]),
        );
        table.set_base(
            int_list,
            Some(TypeRef::generic(my_list, [TypeArgument::simple(int32)])),
        );
        table.add_interface(
            pair,
            TypeRef::generic(enumerable, [TypeArgument::Type(TypeRef::open(pair, 2))]),
        );

        Self {
            table,
            object,
            int32,
            string,
            equatable,
            enumerable,
            person,
            employee,
            manager,
            my_list,
            int_list,
            pair,
            car,
        }
    }

    pub fn simple(&self, symbol: TypeSymbol) -> TypeRef {
        TypeRef::simple(symbol)
    }

    /// `symbol<args...>` with non-generic arguments.
    pub fn closed(&self, symbol: TypeSymbol, args: &[TypeSymbol]) -> TypeRef {
        TypeRef::generic(symbol, args.iter().map(|a| TypeArgument::simple(*a)))
    }

    /// `symbol<>`.
    pub fn open(&self, symbol: TypeSymbol) -> TypeRef {
        let arity = self.table.get(symbol).expect("declared").arity();
        TypeRef::open(symbol, arity)
    }
}
