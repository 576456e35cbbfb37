//! Node constructors used by the recipes.
use super::{
    BinaryOp, Body, ConstructorDeclaration, Expr, Member, MethodDeclaration, Modifier,
    OperatorDeclaration, OperatorKind, Parameter, Stmt, TypeRef,
};

pub fn ident(name: impl Into<String>) -> Expr {
    Expr::Identifier(name.into())
}

pub fn member(target: Expr, name: impl Into<String>) -> Expr {
    Expr::MemberAccess { target: Box::new(target), name: name.into() }
}

/// `target?.name`
pub fn conditional_member(target: Expr, name: impl Into<String>) -> Expr {
    Expr::ConditionalAccess { target: Box::new(target), name: name.into() }
}

pub fn invoke(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Invocation { callee: Box::new(callee), args }
}

pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
}

/// Left fold with `&&`: `((a && b) && c)`. `None` for an empty sequence.
pub fn and_all<I>(terms: I) -> Option<Expr>
where
    I: IntoIterator<Item = Expr>,
{
    terms
        .into_iter()
        .reduce(|acc, next| binary(BinaryOp::LogicalAnd, acc, next))
}

pub fn new_object(ty: impl Into<TypeRef>, args: Vec<Expr>) -> Expr {
    Expr::ObjectCreation { ty: ty.into(), args }
}

pub fn cast(ty: TypeRef, expr: Expr) -> Expr {
    Expr::Cast { ty, expr: Box::new(expr) }
}

pub fn try_cast(expr: Expr, ty: TypeRef) -> Expr {
    Expr::As { expr: Box::new(expr), ty }
}

pub fn is_type(expr: Expr, ty: TypeRef) -> Expr {
    Expr::Is { expr: Box::new(expr), ty }
}

pub fn is_not_null(expr: Expr) -> Expr {
    Expr::IsNotNull(Box::new(expr))
}

pub fn conditional(condition: Expr, when_true: Expr, when_false: Expr) -> Expr {
    Expr::Conditional {
        condition: Box::new(condition),
        when_true: Box::new(when_true),
        when_false: Box::new(when_false),
    }
}

pub fn local(name: impl Into<String>, value: Expr) -> Stmt {
    Stmt::Local { name: name.into(), value }
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::Assign { target, value }
}

pub fn parameter(name: impl Into<String>, ty: impl Into<TypeRef>) -> Parameter {
    Parameter { ty: ty.into(), name: name.into() }
}

pub fn method(
    modifiers: Vec<Modifier>,
    return_type: &str,
    name: &str,
    parameters: Vec<Parameter>,
    statements: Vec<Stmt>,
) -> Member {
    Member::Method(MethodDeclaration {
        modifiers,
        return_type: TypeRef::new(return_type),
        name: name.to_string(),
        parameters,
        body: Body::Block(statements),
    })
}

pub fn constructor(name: &str, parameters: Vec<Parameter>, statements: Vec<Stmt>) -> ConstructorDeclaration {
    ConstructorDeclaration {
        modifiers: vec![Modifier::Public],
        name: name.to_string(),
        parameters,
        body: statements,
    }
}

/// `public static bool operator {op}(..) => {expr};`
pub fn predicate_operator(kind: OperatorKind, parameters: Vec<Parameter>, expr: Expr) -> Member {
    Member::Operator(OperatorDeclaration {
        modifiers: vec![Modifier::Public, Modifier::Static],
        return_type: TypeRef::new("bool"),
        operator: kind,
        parameters,
        body: Body::Expression(expr),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_all_folds_left() {
        let folded = and_all([ident("a"), ident("b"), ident("c")]).unwrap();
        let expected = binary(
            BinaryOp::LogicalAnd,
            binary(BinaryOp::LogicalAnd, ident("a"), ident("b")),
            ident("c"),
        );
        assert_eq!(folded, expected);
        assert!(and_all(Vec::new()).is_none());
    }
}
