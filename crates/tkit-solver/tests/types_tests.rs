use super::*;

const LIST: TypeSymbol = TypeSymbol(10);
const MY_LIST: TypeSymbol = TypeSymbol(11);
const DICT: TypeSymbol = TypeSymbol(12);
const INT: TypeSymbol = TypeSymbol(13);

#[test]
fn test_type_symbol_validity() {
    assert!(!TypeSymbol::INVALID.is_valid());
    assert!(TypeSymbol(1).is_valid());
}

#[test]
fn test_non_generic_is_open_and_closed() {
    let int = TypeRef::simple(INT);
    assert!(int.is_open_definition());
    assert!(int.is_closed());
    assert!(!int.has_only_params());
    assert_eq!(int.generic_definition(), int);
}

#[test]
fn test_open_definition_uses_identity_placeholders() {
    let open = TypeRef::open(DICT, 2);
    assert!(open.is_open_definition());
    assert!(!open.is_closed());
    assert!(open.has_only_params());
    assert_eq!(open.args[1], TypeArgument::param(DICT, 1));
}

#[test]
fn test_foreign_placeholders_are_closed() {
    // List<T> where T belongs to MyList
    let list_of_t = TypeRef::generic(LIST, [TypeArgument::param(MY_LIST, 0)]);
    assert!(!list_of_t.is_open_definition());
    assert!(list_of_t.is_closed());
    assert!(list_of_t.has_only_params());
}

#[test]
fn test_swapped_placeholders_are_closed() {
    // Dict<V, K> of Dict's own parameters is not the definition
    let swapped = TypeRef::generic(
        DICT,
        [TypeArgument::param(DICT, 1), TypeArgument::param(DICT, 0)],
    );
    assert!(!swapped.is_open_definition());
    assert!(swapped.has_only_params());
}

#[test]
fn test_substitute_replaces_only_owned_params() {
    let ty = TypeRef::generic(
        DICT,
        [
            TypeArgument::param(MY_LIST, 0),
            TypeArgument::Type(TypeRef::generic(LIST, [TypeArgument::param(LIST, 0)])),
        ],
    );
    let replaced = ty.substitute(MY_LIST, &[TypeArgument::simple(INT)]);
    assert_eq!(replaced.args[0], TypeArgument::simple(INT));
    // List's own T is untouched
    assert_eq!(replaced.args[1], ty.args[1]);
    assert!(replaced.contains_params());

    let fully = replaced.substitute(LIST, &[TypeArgument::simple(INT)]);
    assert!(!fully.contains_params());
}

#[test]
fn test_substitute_out_of_range_keeps_param() {
    let ty = TypeRef::open(DICT, 2);
    let partial = ty.substitute(DICT, &[TypeArgument::simple(INT)]);
    assert_eq!(partial.args[0], TypeArgument::simple(INT));
    assert_eq!(partial.args[1], TypeArgument::param(DICT, 1));
}

#[test]
fn test_structural_equality_and_hash() {
    use rustc_hash::FxHashSet;

    let a = TypeRef::generic(LIST, [TypeArgument::simple(INT)]);
    let b = TypeRef::generic(LIST, [TypeArgument::simple(INT)]);
    assert_eq!(a, b);

    let mut set = FxHashSet::default();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_display_uses_ids() {
    let ty = TypeRef::generic(DICT, [TypeArgument::simple(INT), TypeArgument::param(DICT, 1)]);
    assert_eq!(ty.to_string(), "#12<#13, #12!1>");
}

#[test]
fn test_argument_accessors() {
    let param = TypeArgument::param(LIST, 0);
    assert!(param.is_param());
    assert_eq!(param.as_param(), Some(ParamRef::new(LIST, 0)));
    assert!(param.as_type().is_none());

    let ty: TypeArgument = TypeRef::simple(INT).into();
    assert_eq!(ty.as_type(), Some(&TypeRef::simple(INT)));
}
