//! Source-to-source generators for C#-style type declarations: structural
//! equality, readonly properties with an assigning constructor, comparison
//! operators, and the composite "record" conversion.
//!
//! Pipeline: JSON document → [`SyntaxTree`] → [`Recipe::apply`] → new tree →
//! [`render`] (or back to JSON).
pub mod config;
pub mod error;
pub mod path_de;
pub mod recipes;
pub mod render;
pub mod semantics;
pub mod syntax;
pub mod tree;

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use recipes::{offers, Offer, Recipe, Target};
pub use render::{render_tree, render_type};
pub use semantics::{KnownTypes, Semantics, TypeKind, TypeKindResolver};
pub use syntax::{SyntaxTree, TypeDeclaration, TypeRef};
