//! "Generate comparison operators" for one chosen property.
//!
//! The generated operators compare `a.P` and `b.P` directly. Nothing checks that
//! the property type defines them.
use tracing::warn;

use super::members;
use crate::syntax::factory::{binary, ident, member, parameter, predicate_operator};
use crate::syntax::{OperatorKind, PropertyDeclaration, TypeDeclaration};

pub fn add_comparison_operators(decl: &TypeDeclaration, property: &PropertyDeclaration) -> TypeDeclaration {
    if members::declares_operator(decl, OperatorKind::Equality) {
        warn!(type_name = %decl.name, "type already declares operator ==; output will not compile as-is");
    }

    let self_type = decl.self_type();
    let parameters = vec![parameter("a", self_type.clone()), parameter("b", self_type)];

    let mut new_members = decl.members.clone();
    new_members.extend(OperatorKind::RELATIONAL.into_iter().map(|kind| {
        let compare = binary(
            kind.binary_op(),
            member(ident("a"), &property.name),
            member(ident("b"), &property.name),
        );
        predicate_operator(kind, parameters.clone(), compare)
    }));
    decl.with_members(new_members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_type;
    use crate::syntax::{DeclarationKind, Member};
    use pretty_assertions::assert_eq;

    #[test]
    fn person_age_operators() {
        let age = PropertyDeclaration::auto("int", "Age", true);
        let mut decl = TypeDeclaration::new(DeclarationKind::Class, "Person");
        decl.members = vec![Member::Property(age.clone())];

        let expected = "\
public class Person
{
    public int Age { get; set; }

    public static bool operator ==(Person a, Person b) => a.Age == b.Age;

    public static bool operator !=(Person a, Person b) => a.Age != b.Age;

    public static bool operator >(Person a, Person b) => a.Age > b.Age;

    public static bool operator <(Person a, Person b) => a.Age < b.Age;

    public static bool operator >=(Person a, Person b) => a.Age >= b.Age;

    public static bool operator <=(Person a, Person b) => a.Age <= b.Age;
}
";
        assert_eq!(render_type(&add_comparison_operators(&decl, &age), 4), expected);
    }

    #[test]
    fn input_is_left_untouched() {
        let age = PropertyDeclaration::auto("int", "Age", true);
        let mut decl = TypeDeclaration::new(DeclarationKind::Struct, "Version");
        decl.members = vec![Member::Property(age.clone())];
        let before = decl.clone();
        let out = add_comparison_operators(&decl, &age);
        assert_eq!(decl, before);
        assert_eq!(out.operators().count(), 6);
        assert!(members::declares_operator(&out, OperatorKind::LessThanOrEqual));
    }
}
