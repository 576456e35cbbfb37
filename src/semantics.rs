//! Reference-vs-value classification of type references.
//!
//! Generators never look types up themselves: they ask a [`TypeKindResolver`]
//! handed in by the host, wrapped in [`Semantics`] which applies the configured
//! default for types the resolver cannot classify.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::GeneratorConfig;
use crate::syntax::{Item, Member, SyntaxTree, TypeDeclaration, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Shared by reference, may be null.
    Reference,
    /// Copied by value, never null.
    #[default]
    Value,
}

/// The semantic query the equality generator depends on.
pub trait TypeKindResolver {
    /// `None` when the type cannot be resolved.
    fn kind_of(&self, ty: &TypeRef) -> Option<TypeKind>;
}

impl<F> TypeKindResolver for F
where
    F: Fn(&TypeRef) -> Option<TypeKind>,
{
    fn kind_of(&self, ty: &TypeRef) -> Option<TypeKind> {
        self(ty)
    }
}

/// A resolver plus the kind assumed for unresolvable types.
#[derive(Clone, Copy)]
pub struct Semantics<'a> {
    resolver: &'a dyn TypeKindResolver,
    unresolved: TypeKind,
}

impl<'a> Semantics<'a> {
    pub fn new(resolver: &'a dyn TypeKindResolver) -> Self {
        Self { resolver, unresolved: TypeKind::default() }
    }

    pub fn with_unresolved(self, unresolved: TypeKind) -> Self {
        Self { unresolved, ..self }
    }

    pub fn kind_of(&self, ty: &TypeRef) -> TypeKind {
        match self.resolver.kind_of(ty) {
            Some(kind) => kind,
            None => {
                warn!(ty = %ty, assumed = ?self.unresolved, "could not resolve type kind");
                self.unresolved
            }
        }
    }

    pub fn is_reference(&self, ty: &TypeRef) -> bool {
        self.kind_of(ty) == TypeKind::Reference
    }
}

// ————————————————————————————————————————————————————————————————————————————
// KNOWN TYPES
// ————————————————————————————————————————————————————————————————————————————

const BUILTIN_VALUE_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "nint",
    "nuint", "long", "ulong", "short", "ushort",
    "Boolean", "Byte", "SByte", "Char", "Decimal", "Double", "Single", "Int16", "Int32",
    "Int64", "UInt16", "UInt32", "UInt64", "IntPtr", "UIntPtr", "Guid", "DateTime",
    "DateTimeOffset", "TimeSpan", "DateOnly", "TimeOnly", "Nullable", "ValueTuple",
    "KeyValuePair",
];

const BUILTIN_REFERENCE_TYPES: &[&str] = &[
    "string", "object", "dynamic", "String", "Object", "Uri", "Type", "Exception", "Array",
    "StringBuilder", "List", "IList", "ICollection", "IEnumerable", "IReadOnlyList",
    "IReadOnlyCollection", "Dictionary", "IDictionary", "IReadOnlyDictionary", "HashSet",
    "ISet", "Func", "Action", "Task",
];

/// Table-driven resolver: builtin C# types, the declarations of one document and
/// user overrides, in increasing order of precedence.
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    kinds: IndexMap<String, TypeKind>,
}

impl KnownTypes {
    pub fn builtin() -> Self {
        let mut out = Self::default();
        for name in BUILTIN_VALUE_TYPES {
            out.insert(*name, TypeKind::Value);
        }
        for name in BUILTIN_REFERENCE_TYPES {
            out.insert(*name, TypeKind::Reference);
        }
        out
    }

    /// Builtins, then every type declared in `tree`, then the config overrides.
    pub fn for_tree(tree: &SyntaxTree, config: &GeneratorConfig) -> Self {
        let mut out = Self::builtin();
        out.add_declarations(tree);
        for name in &config.reference_types {
            out.insert(name.as_str(), TypeKind::Reference);
        }
        for name in &config.value_types {
            out.insert(name.as_str(), TypeKind::Value);
        }
        out
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: TypeKind) {
        self.kinds.insert(name.into(), kind);
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Classes are reference types, structs value types. Registered under both
    /// the simple and the qualified name.
    pub fn add_declarations(&mut self, tree: &SyntaxTree) {
        fn visit_items(out: &mut KnownTypes, scope: &str, items: &[Item]) {
            for item in items {
                match item {
                    Item::Namespace(ns) => visit_items(out, &qualify(scope, &ns.name), &ns.items),
                    Item::Type(decl) => visit_type(out, scope, decl),
                }
            }
        }
        fn visit_type(out: &mut KnownTypes, scope: &str, decl: &TypeDeclaration) {
            let kind = if decl.is_struct() { TypeKind::Value } else { TypeKind::Reference };
            let qualified = qualify(scope, &decl.name);
            out.insert(decl.name.clone(), kind);
            out.insert(qualified.clone(), kind);
            for member in &decl.members {
                if let Member::Type(nested) = member {
                    visit_type(out, &qualified, nested);
                }
            }
        }
        visit_items(self, "", &tree.items);
    }

    fn lookup(&self, name: &str) -> Option<TypeKind> {
        if let Some(kind) = self.kinds.get(name) {
            return Some(*kind);
        }
        let last = name.rsplit('.').next()?;
        self.kinds.get(last).copied()
    }
}

impl TypeKindResolver for KnownTypes {
    fn kind_of(&self, ty: &TypeRef) -> Option<TypeKind> {
        let shape = TypeShape::parse(ty.as_str())?;
        if shape.is_tuple {
            return Some(TypeKind::Value);
        }
        if shape.is_array {
            return Some(TypeKind::Reference);
        }
        // `T?` has the kind of `T`: `int?` stays a value type, `string?` is only
        // an annotation on a reference type.
        self.lookup(&shape.base)
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() { name.to_string() } else { format!("{scope}.{name}") }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE REFERENCE SHAPE
// ————————————————————————————————————————————————————————————————————————————

static TYPE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:global::)?(?P<base>@?[A-Za-z_]\w*(?:\s*\.\s*@?[A-Za-z_]\w*)*)\s*(?P<args><.*>)?(?P<suffix>[\[\],?\s]*)$",
    )
    .expect("type shape regex is valid")
});

/// Just enough structure of a type reference to classify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    /// Dotted name without generic arguments or suffixes, whitespace removed.
    pub base: String,
    pub generic_args: Option<String>,
    pub is_array: bool,
    pub is_nullable: bool,
    pub is_tuple: bool,
}

impl TypeShape {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.starts_with('(') {
            let is_array = text.trim_end_matches('?').ends_with(']');
            return Some(Self {
                base: "ValueTuple".to_string(),
                generic_args: None,
                is_array,
                is_nullable: text.ends_with('?'),
                is_tuple: !is_array,
            });
        }
        let caps = TYPE_SHAPE.captures(text)?;
        let base: String = caps["base"].chars().filter(|c| !c.is_whitespace()).collect();
        let suffix = caps.name("suffix").map(|m| m.as_str()).unwrap_or_default();
        Some(Self {
            base: base.trim_start_matches('@').to_string(),
            generic_args: caps.name("args").map(|m| m.as_str().to_string()),
            is_array: suffix.contains('['),
            is_nullable: suffix.ends_with('?'),
            is_tuple: false,
        })
    }
}
