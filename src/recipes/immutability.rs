//! "Make class readonly": strip setters from data properties and add a
//! constructor that assigns them.
use std::collections::HashSet;
use tracing::debug;

use super::members;
use crate::syntax::factory::{assign, constructor, ident, member, parameter};
use crate::syntax::{ConstructorDeclaration, Expr, Member, PropertyDeclaration, TypeDeclaration, TypeRef};

pub fn make_readonly(decl: &TypeDeclaration) -> TypeDeclaration {
    debug!(
        type_name = %decl.name,
        setters = members::settable_properties(decl).len(),
        "stripping setters"
    );

    let mut assigned: Vec<&PropertyDeclaration> = Vec::new();
    let mut new_members = Vec::with_capacity(decl.members.len() + 1);
    for m in &decl.members {
        match m {
            Member::Property(p) if members::is_data_property(p) => {
                assigned.push(p);
                new_members.push(Member::Property(p.without_setter()));
            }
            other => new_members.push(other.clone()),
        }
    }

    let ctor = assigning_constructor(decl, &assigned);
    let wanted = parameter_set(&ctor);
    let duplicate = members::existing_constructors(decl)
        .into_iter()
        .any(|existing| parameter_set(existing) == wanted);
    if duplicate {
        debug!(type_name = %decl.name, "matching constructor already declared, skipping");
    } else {
        new_members.push(Member::Constructor(ctor));
    }

    decl.with_members(new_members)
}

fn assigning_constructor(decl: &TypeDeclaration, properties: &[&PropertyDeclaration]) -> ConstructorDeclaration {
    let parameters = properties
        .iter()
        .map(|p| parameter(parameter_name(&p.name), p.ty.clone()))
        .collect();
    let statements = properties
        .iter()
        .map(|p| assign(member(Expr::This, &p.name), ident(parameter_name(&p.name))))
        .collect();
    constructor(&decl.name, parameters, statements)
}

/// Order is deliberately ignored: `(int x, int y)` matches `(int y, int x)`.
fn parameter_set(ctor: &ConstructorDeclaration) -> HashSet<(&TypeRef, &str)> {
    ctor.parameters.iter().map(|p| (&p.ty, p.name.as_str())).collect()
}

/// `FirstName` → `firstName`; keywords are escaped (`Class` → `@class`).
pub fn parameter_name(property: &str) -> String {
    let mut chars = property.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    if CSHARP_KEYWORDS.contains(&name.as_str()) { format!("@{name}") } else { name }
}

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_type;
    use crate::syntax::{AccessorKind, DeclarationKind, Modifier};
    use pretty_assertions::assert_eq;

    fn point() -> TypeDeclaration {
        let mut decl = TypeDeclaration::new(DeclarationKind::Class, "Point");
        decl.members = vec![
            Member::Property(PropertyDeclaration::auto("int", "X", true)),
            Member::Property(PropertyDeclaration::auto("int", "Y", true)),
        ];
        decl
    }

    #[test]
    fn point_gets_readonly_properties_and_constructor() {
        let expected = "\
public class Point
{
    public int X { get; }
    public int Y { get; }

    public Point(int x, int y)
    {
        this.X = x;
        this.Y = y;
    }
}
";
        assert_eq!(render_type(&make_readonly(&point()), 4), expected);
    }

    #[test]
    fn get_only_properties_are_constructor_parameters_too() {
        let mut decl = TypeDeclaration::new(DeclarationKind::Class, "Point");
        decl.members = vec![
            Member::Property(PropertyDeclaration::auto("int", "X", false)),
            Member::Property(PropertyDeclaration::auto("int", "Y", true)),
        ];
        let out = make_readonly(&decl);
        let ctor = out.constructors().next().unwrap();
        assert_eq!(ctor.parameters, vec![parameter("x", "int"), parameter("y", "int")]);
        assert_eq!(out.members[0], decl.members[0]);

        // nothing settable at all still yields the full constructor, not a parameterless one
        let text = render_type(&make_readonly(&out.with_members(out.members[..2].to_vec())), 4);
        assert!(text.contains("public Point(int x, int y)"), "{text}");
    }

    #[test]
    fn applying_twice_changes_nothing() {
        let once = make_readonly(&point());
        let twice = make_readonly(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn existing_constructor_in_any_order_is_respected() {
        let mut decl = point();
        decl.members.push(Member::Constructor(constructor(
            "Point",
            vec![parameter("y", "int"), parameter("x", "int")],
            Vec::new(),
        )));
        let out = make_readonly(&decl);
        assert_eq!(out.constructors().count(), 1);
        assert!(out.properties().all(|p| !p.has_accessor(AccessorKind::Set)));
    }

    #[test]
    fn no_data_properties_yields_parameterless_constructor() {
        let mut decl = TypeDeclaration::new(DeclarationKind::Struct, "Empty");
        let mut hidden = PropertyDeclaration::auto("int", "Secret", true);
        hidden.modifiers = vec![Modifier::Private];
        decl.members.push(Member::Property(hidden.clone()));

        let out = make_readonly(&decl);
        assert_eq!(out.members[0], Member::Property(hidden));
        let ctor = out.constructors().next().unwrap();
        assert!(ctor.parameters.is_empty());
        assert!(ctor.body.is_empty());
    }

    #[test]
    fn untouched_members_keep_their_position() {
        let mut decl = point();
        decl.members.insert(1, Member::Verbatim("// keep me".into()));
        let out = make_readonly(&decl);
        assert_eq!(out.members[1], Member::Verbatim("// keep me".into()));
        assert!(matches!(out.members.last(), Some(Member::Constructor(_))));
    }

    #[test]
    fn parameter_names() {
        assert_eq!(parameter_name("FirstName"), "firstName");
        assert_eq!(parameter_name("X"), "x");
        assert_eq!(parameter_name("Class"), "@class");
        assert_eq!(parameter_name("Émile"), "émile");
    }
}
