//! Member classification shared by every recipe.
use crate::semantics::Semantics;
use crate::syntax::{
    AccessorKind, ConstructorDeclaration, OperatorKind, PropertyDeclaration, TypeDeclaration,
    TypeRef,
};

/// A public instance auto-property with a getter. Non-public, static and
/// computed properties are invisible to the generators.
pub fn is_data_property(property: &PropertyDeclaration) -> bool {
    property.is_public()
        && !property.is_static()
        && property.is_auto()
        && property.has_accessor(AccessorKind::Get)
}

/// Data properties in declaration order.
pub fn data_properties(decl: &TypeDeclaration) -> Vec<&PropertyDeclaration> {
    decl.properties().filter(|p| is_data_property(p)).collect()
}

/// Data properties that still carry a setter.
pub fn settable_properties(decl: &TypeDeclaration) -> Vec<&PropertyDeclaration> {
    decl.properties()
        .filter(|p| is_data_property(p) && p.has_accessor(AccessorKind::Set))
        .collect()
}

pub fn existing_constructors(decl: &TypeDeclaration) -> Vec<&ConstructorDeclaration> {
    decl.constructors().collect()
}

pub fn declares_operator(decl: &TypeDeclaration, kind: OperatorKind) -> bool {
    decl.operators().any(|o| o.operator == kind)
}

/// What the equality generator needs to know about one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFact {
    pub name: String,
    pub ty: TypeRef,
    pub is_reference: bool,
}

/// Resolved fresh on every call; facts are never carried across trees.
pub fn property_facts(decl: &TypeDeclaration, semantics: &Semantics<'_>) -> Vec<PropertyFact> {
    data_properties(decl)
        .into_iter()
        .map(|p| PropertyFact {
            name: p.name.clone(),
            ty: p.ty.clone(),
            is_reference: semantics.is_reference(&p.ty),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::KnownTypes;
    use crate::syntax::{Accessor, Body, DeclarationKind, Expr, Member, Modifier};

    fn sample() -> TypeDeclaration {
        let mut private = PropertyDeclaration::auto("int", "Hidden", true);
        private.modifiers = vec![Modifier::Private];

        let mut shared = PropertyDeclaration::auto("int", "Count", true);
        shared.modifiers.push(Modifier::Static);

        let mut computed = PropertyDeclaration::auto("int", "Area", false);
        computed.accessors = vec![Accessor {
            body: Some(Body::Expression(Expr::Int(0))),
            ..Accessor::new(AccessorKind::Get)
        }];

        let mut decl = TypeDeclaration::new(DeclarationKind::Class, "Shape");
        decl.members = vec![
            Member::Property(PropertyDeclaration::auto("string", "Name", true)),
            Member::Property(private),
            Member::Property(shared),
            Member::Property(computed),
            Member::Property(PropertyDeclaration::auto("int", "Sides", false)),
        ];
        decl
    }

    #[test]
    fn only_public_instance_auto_properties_are_visible() {
        let decl = sample();
        let names: Vec<_> = data_properties(&decl).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Name", "Sides"]);
        let settable: Vec<_> = settable_properties(&decl).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(settable, ["Name"]);
    }

    #[test]
    fn facts_follow_declaration_order() {
        let known = KnownTypes::builtin();
        let facts = property_facts(&sample(), &Semantics::new(&known));
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].name, "Name");
        assert!(facts[0].is_reference);
        assert_eq!(facts[1].name, "Sides");
        assert!(!facts[1].is_reference);
    }
}
