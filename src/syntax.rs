//! Syntax tree for C#-style type declarations.
//!
//! Nodes are plain values. Transformations clone what they keep and build new
//! nodes for what they change; nothing here is edited in place by a recipe.
//! Every node round-trips through serde so hosts can hand trees over as JSON.
pub mod factory;

use std::fmt;
use serde::{Deserialize, Serialize};

// ————————————————————————————————————————————————————————————————————————————
// DOCUMENT
// ————————————————————————————————————————————————————————————————————————————

/// One compilation unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyntaxTree {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usings: Vec<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Namespace(Namespace),
    Type(TypeDeclaration),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// May be dotted (`Shop.Orders`).
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Struct,
}

impl DeclarationKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub kind: DeclarationKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_types: Vec<TypeRef>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDeclaration {
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_parameters: Vec::new(),
            modifiers: vec![Modifier::Public],
            base_types: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn is_struct(&self) -> bool {
        self.kind == DeclarationKind::Struct
    }

    /// The type as referenced from inside its own body: `Pair<TKey, TValue>`.
    pub fn self_type(&self) -> TypeRef {
        if self.type_parameters.is_empty() {
            TypeRef::new(&self.name)
        } else {
            TypeRef::new(format!("{}<{}>", self.name, self.type_parameters.join(", ")))
        }
    }

    /// Same header, different member list.
    pub fn with_members(&self, members: Vec<Member>) -> Self {
        Self {
            kind: self.kind,
            name: self.name.clone(),
            type_parameters: self.type_parameters.clone(),
            modifiers: self.modifiers.clone(),
            base_types: self.base_types.clone(),
            members,
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDeclaration> {
        self.members.iter().filter_map(|m| match m {
            Member::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDeclaration> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(c) => Some(c),
            _ => None,
        })
    }

    pub fn operators(&self) -> impl Iterator<Item = &OperatorDeclaration> {
        self.members.iter().filter_map(|m| match m {
            Member::Operator(o) => Some(o),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Readonly,
    Override,
    Virtual,
    Abstract,
    Sealed,
    Partial,
    New,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Static => "static",
            Self::Readonly => "readonly",
            Self::Override => "override",
            Self::Virtual => "virtual",
            Self::Abstract => "abstract",
            Self::Sealed => "sealed",
            Self::Partial => "partial",
            Self::New => "new",
        }
    }
}

/// Textual type reference (`int`, `string?`, `List<Point>`, `int[]`).
/// Two references are the same type when their text is the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MEMBERS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Member {
    Property(PropertyDeclaration),
    Field(FieldDeclaration),
    Constructor(ConstructorDeclaration),
    Method(MethodDeclaration),
    Operator(OperatorDeclaration),
    Type(TypeDeclaration),
    /// Anything the model does not represent; printed as-is.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<Accessor>,
    /// `public int Area => Width * Height;`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_body: Option<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expr>,
}

impl PropertyDeclaration {
    /// `public {ty} {name} { get; set; }`
    pub fn auto(ty: impl Into<TypeRef>, name: impl Into<String>, setter: bool) -> Self {
        let mut accessors = vec![Accessor::new(AccessorKind::Get)];
        if setter {
            accessors.push(Accessor::new(AccessorKind::Set));
        }
        Self {
            modifiers: vec![Modifier::Public],
            ty: ty.into(),
            name: name.into(),
            accessors,
            expression_body: None,
            initializer: None,
        }
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.contains(&Modifier::Public)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn has_accessor(&self, kind: AccessorKind) -> bool {
        self.accessors.iter().any(|a| a.kind == kind)
    }

    /// Accessor list present and no accessor carries a body.
    pub fn is_auto(&self) -> bool {
        self.expression_body.is_none()
            && !self.accessors.is_empty()
            && self.accessors.iter().all(|a| a.body.is_none())
    }

    pub fn without_setter(&self) -> Self {
        let mut out = self.clone();
        out.accessors.retain(|a| a.kind != AccessorKind::Set);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

impl AccessorKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Init => "init",
        }
    }
}

/// In JSON an accessor is either a bare kind (`"get"`) or a full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AccessorRepr", into = "AccessorRepr")]
pub struct Accessor {
    pub kind: AccessorKind,
    pub modifiers: Vec<Modifier>,
    pub body: Option<Body>,
}

impl Accessor {
    pub fn new(kind: AccessorKind) -> Self {
        Self { kind, modifiers: Vec::new(), body: None }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AccessorRepr {
    Bare(AccessorKind),
    Full {
        kind: AccessorKind,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modifiers: Vec<Modifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<Body>,
    },
}

impl From<AccessorRepr> for Accessor {
    fn from(value: AccessorRepr) -> Self {
        match value {
            AccessorRepr::Bare(kind) => Self::new(kind),
            AccessorRepr::Full { kind, modifiers, body } => Self { kind, modifiers, body },
        }
    }
}

impl From<Accessor> for AccessorRepr {
    fn from(value: Accessor) -> Self {
        if value.modifiers.is_empty() && value.body.is_none() {
            Self::Bare(value.kind)
        } else {
            Self::Full { kind: value.kind, modifiers: value.modifiers, body: value.body }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeRef,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorDeclaration {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeRef,
    pub operator: OperatorKind,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: TypeRef,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Equality,
    Inequality,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl OperatorKind {
    /// Declaration order used by the comparison recipe.
    pub const RELATIONAL: [OperatorKind; 6] = [
        Self::Equality,
        Self::Inequality,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterThanOrEqual,
        Self::LessThanOrEqual,
    ];

    pub fn binary_op(self) -> BinaryOp {
        match self {
            Self::Equality => BinaryOp::Equal,
            Self::Inequality => BinaryOp::NotEqual,
            Self::GreaterThan => BinaryOp::GreaterThan,
            Self::LessThan => BinaryOp::LessThan,
            Self::GreaterThanOrEqual => BinaryOp::GreaterThanOrEqual,
            Self::LessThanOrEqual => BinaryOp::LessThanOrEqual,
        }
    }

    pub fn token(self) -> &'static str {
        self.binary_op().token()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// STATEMENTS & EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Block(Vec<Stmt>),
    /// `=> expr;`
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// `var {name} = {value};`
    Local { name: String, value: Expr },
    Assign { target: Expr, value: Expr },
    Expression(Expr),
    Return(Expr),
    Throw(Expr),
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    This,
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Identifier(String),
    MemberAccess { target: Box<Expr>, name: String },
    /// `target?.name`
    ConditionalAccess { target: Box<Expr>, name: String },
    Invocation {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    ObjectCreation {
        ty: TypeRef,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Cast { ty: TypeRef, expr: Box<Expr> },
    /// `expr as ty`
    As { expr: Box<Expr>, ty: TypeRef },
    /// `expr is ty`
    Is { expr: Box<Expr>, ty: TypeRef },
    /// `expr is not null`; never dispatches to a user-defined `!=`.
    IsNotNull(Box<Expr>),
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Conditional {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },
    Verbatim(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Multiply,
    Add,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    LogicalAnd,
    LogicalOr,
    Coalesce,
}

impl BinaryOp {
    pub fn token(self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Add => "+",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThanOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Coalesce => "??",
        }
    }
}
