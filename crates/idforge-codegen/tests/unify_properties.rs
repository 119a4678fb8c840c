//! Property-based tests for attribute and member unification
//! **Property: unification is order-preserving concatenation**

use idforge_codegen::builder::{attribute, attribute_lists, unify_attribute_lists, unify_members};
use idforge_codegen::syntax::{AttributeList, MemberDecl, Name, TypeDecl, TypeKind};
use proptest::prelude::*;

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9]{0,8}"
}

fn attribute_list_strategy() -> impl Strategy<Value = Vec<AttributeList>> {
    prop::collection::vec(identifier_strategy(), 0..4).prop_map(|names| {
        let attributes = names
            .into_iter()
            .map(|name| attribute(Name::identifier(name), Vec::new()))
            .collect();
        attribute_lists(attributes, false)
    })
}

fn member_list_strategy() -> impl Strategy<Value = Vec<MemberDecl>> {
    prop::collection::vec(identifier_strategy(), 0..4).prop_map(|names| {
        names
            .into_iter()
            .map(|name| TypeDecl::new(TypeKind::Class, name).into())
            .collect()
    })
}

proptest! {
    /// Property: the unified list is every input list, in order
    #[test]
    fn prop_unify_attribute_lists_concatenates(
        inputs in prop::collection::vec(attribute_list_strategy(), 0..5),
    ) {
        let expected: Vec<AttributeList> = inputs.iter().flatten().cloned().collect();
        let unified = unify_attribute_lists(inputs.clone());

        prop_assert_eq!(unified.len(), inputs.iter().map(Vec::len).sum::<usize>());
        prop_assert_eq!(unified, expected);
    }

    /// Property: a single input comes back unchanged
    #[test]
    fn prop_unify_single_input_is_identity(members in member_list_strategy()) {
        prop_assert_eq!(unify_members(vec![members.clone()]), members);
    }

    /// Property: unification is associative
    #[test]
    fn prop_unify_members_is_associative(
        a in member_list_strategy(),
        b in member_list_strategy(),
        c in member_list_strategy(),
    ) {
        let left = unify_members(vec![unify_members(vec![a.clone(), b.clone()]), c.clone()]);
        let right = unify_members(vec![a, unify_members(vec![b, c])]);
        prop_assert_eq!(left, right);
    }
}

#[test]
fn test_unify_with_no_inputs_is_empty() {
    assert!(unify_members(Vec::new()).is_empty());
    assert!(unify_attribute_lists(Vec::new()).is_empty());
}
