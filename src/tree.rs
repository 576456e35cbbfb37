//! Locating type declarations and substituting one node for another.
//!
//! Substitution is by identity: the node handed to [`SyntaxTree::replace_type`]
//! must have been borrowed from the same tree. Everything else is cloned into
//! the new tree unchanged.
use crate::error::{Error, Result};
use crate::syntax::{Item, Member, Namespace, PropertyDeclaration, SyntaxTree, TypeDeclaration};

impl SyntaxTree {
    /// Every type declaration with its qualified name, in document order.
    /// Nested types follow their enclosing type.
    pub fn types(&self) -> Vec<(String, &TypeDeclaration)> {
        fn visit_items<'t>(scope: &str, items: &'t [Item], out: &mut Vec<(String, &'t TypeDeclaration)>) {
            for item in items {
                match item {
                    Item::Namespace(ns) => visit_items(&join(scope, &ns.name), &ns.items, out),
                    Item::Type(decl) => visit_type(scope, decl, out),
                }
            }
        }
        fn visit_type<'t>(scope: &str, decl: &'t TypeDeclaration, out: &mut Vec<(String, &'t TypeDeclaration)>) {
            let qualified = join(scope, &decl.name);
            out.push((qualified.clone(), decl));
            for member in &decl.members {
                if let Member::Type(nested) = member {
                    visit_type(&qualified, nested, out);
                }
            }
        }
        let mut out = Vec::new();
        visit_items("", &self.items, &mut out);
        out
    }

    /// Look a type up by qualified name, or by simple name when that is unique.
    pub fn find_type(&self, name: &str) -> Result<&TypeDeclaration> {
        let types = self.types();
        if let Some((_, decl)) = types.iter().find(|(qualified, _)| qualified == name) {
            return Ok(*decl);
        }
        let mut matches = types.iter().filter(|(_, decl)| decl.name == name);
        match (matches.next(), matches.next()) {
            (None, _) => Err(Error::TypeNotFound(name.to_string())),
            (Some((_, decl)), None) => Ok(*decl),
            (Some(_), Some(_)) => Err(Error::AmbiguousType {
                name: name.to_string(),
                candidates: types
                    .iter()
                    .filter(|(_, decl)| decl.name == name)
                    .map(|(qualified, _)| qualified.clone())
                    .collect(),
            }),
        }
    }

    pub fn find_property(&self, type_name: &str, property: &str) -> Result<&PropertyDeclaration> {
        self.find_type(type_name)?
            .properties()
            .find(|p| p.name == property)
            .ok_or_else(|| Error::PropertyNotFound {
                type_name: type_name.to_string(),
                property: property.to_string(),
            })
    }

    /// New tree with `old` (borrowed from `self`) replaced by `new`.
    pub fn replace_type(&self, old: &TypeDeclaration, new: TypeDeclaration) -> Result<SyntaxTree> {
        let mut pending = Some(new);
        let items = replace_in_items(&self.items, old, &mut pending);
        if pending.is_some() {
            return Err(Error::NodeNotInTree);
        }
        Ok(SyntaxTree { usings: self.usings.clone(), items })
    }
}

fn join(scope: &str, name: &str) -> String {
    if scope.is_empty() { name.to_string() } else { format!("{scope}.{name}") }
}

fn replace_in_items(items: &[Item], old: &TypeDeclaration, pending: &mut Option<TypeDeclaration>) -> Vec<Item> {
    items
        .iter()
        .map(|item| match item {
            Item::Namespace(ns) => Item::Namespace(Namespace {
                name: ns.name.clone(),
                items: replace_in_items(&ns.items, old, pending),
            }),
            Item::Type(decl) => Item::Type(replace_in_type(decl, old, pending)),
        })
        .collect()
}

fn replace_in_type(decl: &TypeDeclaration, old: &TypeDeclaration, pending: &mut Option<TypeDeclaration>) -> TypeDeclaration {
    if std::ptr::eq(decl, old) {
        if let Some(new) = pending.take() {
            return new;
        }
    }
    if pending.is_none() || !decl.members.iter().any(|m| matches!(m, Member::Type(_))) {
        return decl.clone();
    }
    let members = decl
        .members
        .iter()
        .map(|m| match m {
            Member::Type(nested) => Member::Type(replace_in_type(nested, old, pending)),
            other => other.clone(),
        })
        .collect();
    decl.with_members(members)
}
