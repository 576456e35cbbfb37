//! "Add structural equality": typed `Equals`, `Equals(object)`, `GetHashCode`
//! and the `System.IEquatable<Self>` contract.
use tracing::debug;

use super::members::{self, PropertyFact};
use crate::semantics::Semantics;
use crate::syntax::factory::{
    and_all, assign, binary, cast, conditional, conditional_member, ident, invoke, is_not_null,
    is_type, local, member, method, new_object, parameter, try_cast,
};
use crate::syntax::{BinaryOp, Expr, Member, Modifier, Stmt, TypeDeclaration, TypeRef};

pub const EQUATABLE: &str = "System.IEquatable";

const HASH_SEED: i64 = 17;
const HASH_FACTOR: i64 = 23;

pub fn add_structural_equality(decl: &TypeDeclaration, semantics: &Semantics<'_>) -> TypeDeclaration {
    let facts = members::property_facts(decl, semantics);
    extend_with_equality(decl, &facts)
}

/// Append the equality members to `target`, comparing the properties in `facts`.
/// `facts` may come from a different declaration than `target`.
pub fn extend_with_equality(target: &TypeDeclaration, facts: &[PropertyFact]) -> TypeDeclaration {
    debug!(type_name = %target.name, properties = facts.len(), "generating structural equality");

    let mut members = target.members.clone();
    members.push(typed_equals(target, facts));
    members.push(object_equals(target));
    members.push(get_hash_code(facts));

    let mut out = target.with_members(members);
    let contract = TypeRef::new(format!("{EQUATABLE}<{}>", target.self_type()));
    if !out.base_types.contains(&contract) {
        out.base_types.push(contract);
    }
    out
}

fn typed_equals(decl: &TypeDeclaration, facts: &[PropertyFact]) -> Member {
    let mut terms = Vec::with_capacity(facts.len() + 1);
    if !decl.is_struct() {
        terms.push(is_not_null(ident("other")));
    }
    terms.extend(facts.iter().map(|fact| {
        invoke(
            ident("Equals"),
            vec![member(Expr::This, &fact.name), member(ident("other"), &fact.name)],
        )
    }));

    let statement = match and_all(terms) {
        Some(condition) if !facts.is_empty() => Stmt::Return(condition),
        _ => Stmt::Throw(new_object("NotImplementedException", Vec::new())),
    };

    method(
        vec![Modifier::Public],
        "bool",
        "Equals",
        vec![parameter("other", decl.self_type())],
        vec![statement],
    )
}

fn object_equals(decl: &TypeDeclaration) -> Member {
    let this_type = decl.self_type();
    let result = if decl.is_struct() {
        conditional(
            is_type(ident("other"), this_type.clone()),
            invoke(ident("Equals"), vec![cast(this_type, ident("other"))]),
            Expr::Bool(false),
        )
    } else {
        invoke(ident("Equals"), vec![try_cast(ident("other"), this_type)])
    };

    method(
        vec![Modifier::Public, Modifier::Override],
        "bool",
        "Equals",
        vec![parameter("other", "object")],
        vec![Stmt::Return(result)],
    )
}

fn get_hash_code(facts: &[PropertyFact]) -> Member {
    let mut statements = vec![local("hashCode", Expr::Int(HASH_SEED))];
    for fact in facts {
        let contribution = if fact.is_reference {
            binary(
                BinaryOp::Coalesce,
                invoke(conditional_member(ident(&fact.name), "GetHashCode"), Vec::new()),
                Expr::Int(0),
            )
        } else {
            invoke(member(ident(&fact.name), "GetHashCode"), Vec::new())
        };
        let scaled = binary(BinaryOp::Multiply, ident("hashCode"), Expr::Int(HASH_FACTOR));
        statements.push(assign(ident("hashCode"), binary(BinaryOp::Add, scaled, contribution)));
    }
    statements.push(Stmt::Return(ident("hashCode")));

    method(
        vec![Modifier::Public, Modifier::Override],
        "int",
        "GetHashCode",
        Vec::new(),
        statements,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_type;
    use crate::semantics::KnownTypes;
    use crate::syntax::{DeclarationKind, PropertyDeclaration};
    use pretty_assertions::assert_eq;

    fn point(kind: DeclarationKind) -> TypeDeclaration {
        let mut decl = TypeDeclaration::new(kind, "Point");
        decl.members = vec![
            Member::Property(PropertyDeclaration::auto("int", "X", true)),
            Member::Property(PropertyDeclaration::auto("int", "Y", true)),
        ];
        decl
    }

    #[test]
    fn class_equality_checks_null_first() {
        let known = KnownTypes::builtin();
        let out = add_structural_equality(&point(DeclarationKind::Class), &Semantics::new(&known));
        let expected = "\
public class Point : System.IEquatable<Point>
{
    public int X { get; set; }
    public int Y { get; set; }

    public bool Equals(Point other)
    {
        return other is not null && Equals(this.X, other.X) && Equals(this.Y, other.Y);
    }

    public override bool Equals(object other)
    {
        return Equals(other as Point);
    }

    public override int GetHashCode()
    {
        var hashCode = 17;
        hashCode = hashCode * 23 + X.GetHashCode();
        hashCode = hashCode * 23 + Y.GetHashCode();
        return hashCode;
    }
}
";
        assert_eq!(render_type(&out, 4), expected);
    }

    #[test]
    fn struct_equality_uses_type_test() {
        let known = KnownTypes::builtin();
        let out = add_structural_equality(&point(DeclarationKind::Struct), &Semantics::new(&known));
        let text = render_type(&out, 4);
        assert!(text.contains("return Equals(this.X, other.X) && Equals(this.Y, other.Y);"));
        assert!(text.contains("return other is Point ? Equals((Point)other) : false;"));
        assert!(!text.contains("is not null"));
    }

    #[test]
    fn reference_properties_hash_null_safely() {
        let mut decl = TypeDeclaration::new(DeclarationKind::Class, "Customer");
        decl.members = vec![
            Member::Property(PropertyDeclaration::auto("string", "Name", true)),
            Member::Property(PropertyDeclaration::auto("Address", "Home", true)),
        ];
        let known = KnownTypes::builtin();
        let semantics = Semantics::new(&known);
        let text = render_type(&add_structural_equality(&decl, &semantics), 4);
        assert!(text.contains("hashCode = hashCode * 23 + (Name?.GetHashCode() ?? 0);"));
        // `Address` is unknown and falls back to the value branch by default.
        assert!(text.contains("hashCode = hashCode * 23 + Home.GetHashCode();"));

        let semantics = semantics.with_unresolved(crate::semantics::TypeKind::Reference);
        let text = render_type(&add_structural_equality(&decl, &semantics), 4);
        assert!(text.contains("hashCode = hashCode * 23 + (Home?.GetHashCode() ?? 0);"));
    }

    #[test]
    fn empty_property_list_defers_to_runtime_failure() {
        let decl = TypeDeclaration::new(DeclarationKind::Class, "Marker");
        let known = KnownTypes::builtin();
        let out = add_structural_equality(&decl, &Semantics::new(&known));
        let Member::Method(equals) = &out.members[0] else { panic!("expected a method") };
        assert_eq!(
            equals.body,
            crate::syntax::Body::Block(vec![Stmt::Throw(new_object("NotImplementedException", Vec::new()))])
        );
        let text = render_type(&out, 4);
        assert!(text.contains("        var hashCode = 17;\n        return hashCode;\n"));
    }

    #[test]
    fn contract_is_added_once_and_names_type_parameters() {
        let mut decl = point(DeclarationKind::Class);
        decl.name = "Pair".into();
        decl.type_parameters = vec!["T".into()];
        let known = KnownTypes::builtin();
        let semantics = Semantics::new(&known);
        let once = add_structural_equality(&decl, &semantics);
        let twice = add_structural_equality(&once, &semantics);
        assert_eq!(twice.base_types, vec![TypeRef::new("System.IEquatable<Pair<T>>")]);
        assert_eq!(once.members.len(), 5);
    }
}
