//! The four code-generation recipes and how a host applies them to a tree.
//!
//! Each recipe is a pure `TypeDeclaration -> TypeDeclaration` function in its
//! own module. [`Recipe::apply`] is the host-side wiring: find the target node,
//! run the generator, substitute the result into a new tree.
pub mod members;
pub mod equality;
pub mod immutability;
pub mod operators;
pub mod value_type;

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::semantics::Semantics;
use crate::syntax::SyntaxTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipe {
    #[serde(rename = "equality")]
    StructuralEquality,
    #[serde(rename = "readonly")]
    Readonly,
    #[serde(rename = "operators")]
    ComparisonOperators,
    #[serde(rename = "record")]
    ValueType,
}

impl Recipe {
    pub const ALL: [Recipe; 4] = [
        Self::StructuralEquality,
        Self::Readonly,
        Self::ComparisonOperators,
        Self::ValueType,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::StructuralEquality => "Add structural equality",
            Self::Readonly => "Make class readonly",
            Self::ComparisonOperators => "Generate comparison operators",
            Self::ValueType => "Convert to record type",
        }
    }

    /// Short name used on the command line and in fixtures.
    pub fn name(self) -> &'static str {
        match self {
            Self::StructuralEquality => "equality",
            Self::Readonly => "readonly",
            Self::ComparisonOperators => "operators",
            Self::ValueType => "record",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Whether the recipe is triggered on a property rather than a type.
    pub fn wants_property(self) -> bool {
        matches!(self, Self::ComparisonOperators)
    }

    /// Locate `target` in `tree`, generate, and substitute: one replacement.
    pub fn apply(self, tree: &SyntaxTree, target: &Target, semantics: &Semantics<'_>) -> Result<SyntaxTree> {
        if self.wants_property() != matches!(target, Target::Property { .. }) {
            return Err(Error::TargetMismatch { recipe: self.name(), target: target.to_string() });
        }
        let decl = tree.find_type(target.type_name())?;
        let generated = match (self, target) {
            (Self::ComparisonOperators, Target::Property { type_name, property }) => {
                let chosen = tree.find_property(type_name, property)?;
                // Same rule `offers` uses: static and computed properties are not operands.
                if !members::is_data_property(chosen) {
                    return Err(Error::TargetMismatch { recipe: self.name(), target: target.to_string() });
                }
                operators::add_comparison_operators(decl, chosen)
            }
            (Self::StructuralEquality, _) => equality::add_structural_equality(decl, semantics),
            (Self::Readonly, _) => immutability::make_readonly(decl),
            (Self::ValueType, _) => value_type::convert_to_value_type(decl, semantics),
            (Self::ComparisonOperators, Target::Type(_)) => {
                return Err(Error::TargetMismatch { recipe: self.name(), target: target.to_string() });
            }
        };
        info!(recipe = self.title(), %target, "applied recipe");
        tree.replace_type(decl, generated)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The node a recipe is triggered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Type(String),
    Property { type_name: String, property: String },
}

impl Target {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Type(name) => name,
            Self::Property { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "type `{name}`"),
            Self::Property { type_name, property } => write!(f, "property `{type_name}.{property}`"),
        }
    }
}

/// A recipe the host would offer for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub recipe: Recipe,
    pub target: Target,
}

/// Every (recipe, node) pair in document order: the type-level recipes for each
/// type declaration, the operator recipe for each of its data properties.
pub fn offers(tree: &SyntaxTree) -> Vec<Offer> {
    let mut out = Vec::new();
    for (qualified, decl) in tree.types() {
        for recipe in Recipe::ALL.into_iter().filter(|r| !r.wants_property()) {
            out.push(Offer { recipe, target: Target::Type(qualified.clone()) });
        }
        for property in members::data_properties(decl) {
            out.push(Offer {
                recipe: Recipe::ComparisonOperators,
                target: Target::Property {
                    type_name: qualified.clone(),
                    property: property.name.clone(),
                },
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::KnownTypes;
    use crate::syntax::{DeclarationKind, Item, Member, Namespace, PropertyDeclaration, TypeDeclaration};

    fn tree() -> SyntaxTree {
        let mut person = TypeDeclaration::new(DeclarationKind::Class, "Person");
        person.members = vec![Member::Property(PropertyDeclaration::auto("int", "Age", true))];
        let other = TypeDeclaration::new(DeclarationKind::Class, "Other");
        SyntaxTree {
            usings: vec!["System".into()],
            items: vec![Item::Namespace(Namespace {
                name: "People".into(),
                items: vec![Item::Type(person), Item::Type(other)],
            })],
        }
    }

    #[test]
    fn names_round_trip() {
        for recipe in Recipe::ALL {
            assert_eq!(Recipe::from_name(recipe.name()), Some(recipe));
        }
        assert_eq!(Recipe::from_name("nope"), None);
    }

    #[test]
    fn apply_replaces_only_the_target() {
        let tree = tree();
        let known = KnownTypes::builtin();
        let out = Recipe::Readonly
            .apply(&tree, &Target::Type("Person".into()), &Semantics::new(&known))
            .unwrap();
        let Item::Namespace(ns) = &out.items[0] else { panic!("namespace expected") };
        let Item::Type(person) = &ns.items[0] else { panic!("type expected") };
        assert_eq!(person.constructors().count(), 1);
        let Item::Namespace(before) = &tree.items[0] else { panic!("namespace expected") };
        assert_eq!(ns.items[1], before.items[1]);
        assert_eq!(out.usings, tree.usings);
    }

    #[test]
    fn operators_need_a_property_target() {
        let tree = tree();
        let known = KnownTypes::builtin();
        let semantics = Semantics::new(&known);
        let err = Recipe::ComparisonOperators
            .apply(&tree, &Target::Type("Person".into()), &semantics)
            .unwrap_err();
        assert!(matches!(err, Error::TargetMismatch { .. }));

        let err = Recipe::ComparisonOperators
            .apply(
                &tree,
                &Target::Property { type_name: "Person".into(), property: "Height".into() },
                &semantics,
            )
            .unwrap_err();
        assert!(matches!(err, Error::PropertyNotFound { .. }));

        let out = Recipe::ComparisonOperators
            .apply(
                &tree,
                &Target::Property { type_name: "People.Person".into(), property: "Age".into() },
                &semantics,
            )
            .unwrap();
        assert_eq!(out.find_type("Person").unwrap().operators().count(), 6);
    }

    #[test]
    fn operators_are_only_generated_for_offered_properties() {
        let mut tree = tree();
        let Item::Namespace(ns) = &mut tree.items[0] else { panic!("namespace expected") };
        let Item::Type(person) = &mut ns.items[0] else { panic!("type expected") };
        let mut score = PropertyDeclaration::auto("int", "Score", false);
        score.accessors.clear();
        score.expression_body = Some(crate::syntax::Expr::Int(1));
        let mut count = PropertyDeclaration::auto("int", "Count", true);
        count.modifiers.push(crate::syntax::Modifier::Static);
        person.members.push(Member::Property(score));
        person.members.push(Member::Property(count));

        let known = KnownTypes::builtin();
        let semantics = Semantics::new(&known);
        for property in ["Score", "Count"] {
            let target = Target::Property { type_name: "Person".into(), property: property.into() };
            let err = Recipe::ComparisonOperators.apply(&tree, &target, &semantics).unwrap_err();
            assert!(matches!(err, Error::TargetMismatch { .. }), "{property}");
        }
        let offered: Vec<_> = offers(&tree)
            .into_iter()
            .filter(|o| o.recipe == Recipe::ComparisonOperators)
            .map(|o| o.target)
            .collect();
        assert_eq!(
            offered,
            [Target::Property { type_name: "People.Person".into(), property: "Age".into() }]
        );
    }

    #[test]
    fn offers_cover_types_and_properties() {
        let offers = offers(&tree());
        assert_eq!(offers.len(), 3 + 1 + 3);
        assert!(offers.contains(&Offer {
            recipe: Recipe::ComparisonOperators,
            target: Target::Property { type_name: "People.Person".into(), property: "Age".into() },
        }));
        assert!(offers.contains(&Offer {
            recipe: Recipe::ValueType,
            target: Target::Type("People.Other".into()),
        }));
    }
}
