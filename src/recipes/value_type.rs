//! "Convert to record type": readonly first, then structural equality.
use super::{equality, immutability, members};
use crate::semantics::Semantics;
use crate::syntax::TypeDeclaration;

/// Facts are taken from `decl` itself, edits are applied to the readonly
/// intermediate. Property identity is the same in both.
pub fn convert_to_value_type(decl: &TypeDeclaration, semantics: &Semantics<'_>) -> TypeDeclaration {
    let facts = members::property_facts(decl, semantics);
    let readonly = immutability::make_readonly(decl);
    equality::extend_with_equality(&readonly, &facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_type;
    use crate::semantics::KnownTypes;
    use crate::syntax::{DeclarationKind, Member, PropertyDeclaration};
    use pretty_assertions::assert_eq;

    #[test]
    fn money_becomes_an_immutable_value_type() {
        let mut decl = TypeDeclaration::new(DeclarationKind::Struct, "Money");
        decl.members = vec![
            Member::Property(PropertyDeclaration::auto("decimal", "Amount", true)),
            Member::Property(PropertyDeclaration::auto("string", "Currency", true)),
        ];
        let known = KnownTypes::builtin();
        let out = convert_to_value_type(&decl, &Semantics::new(&known));

        let expected = "\
public struct Money : System.IEquatable<Money>
{
    public decimal Amount { get; }
    public string Currency { get; }

    public Money(decimal amount, string currency)
    {
        this.Amount = amount;
        this.Currency = currency;
    }

    public bool Equals(Money other)
    {
        return Equals(this.Amount, other.Amount) && Equals(this.Currency, other.Currency);
    }

    public override bool Equals(object other)
    {
        return other is Money ? Equals((Money)other) : false;
    }

    public override int GetHashCode()
    {
        var hashCode = 17;
        hashCode = hashCode * 23 + Amount.GetHashCode();
        hashCode = hashCode * 23 + (Currency?.GetHashCode() ?? 0);
        return hashCode;
    }
}
";
        assert_eq!(render_type(&out, 4), expected);
    }

    #[test]
    fn equality_covers_every_original_property() {
        let mut decl = TypeDeclaration::new(DeclarationKind::Class, "Line");
        decl.members = vec![
            Member::Property(PropertyDeclaration::auto("int", "From", true)),
            Member::Property(PropertyDeclaration::auto("int", "To", false)),
        ];
        let known = KnownTypes::builtin();
        let semantics = Semantics::new(&known);
        let composite = convert_to_value_type(&decl, &semantics);
        let staged = equality::add_structural_equality(&immutability::make_readonly(&decl), &semantics);
        assert_eq!(composite, staged);
        let text = render_type(&composite, 4);
        assert!(text.contains("Equals(this.From, other.From) && Equals(this.To, other.To)"));
        assert!(text.contains("public Line(int from, int to)"));
    }
}
