//! C# source printer.
//!
//! Not a formatter: layout is fixed (Allman braces, one member per line group)
//! and expressions get parentheses only where C# precedence requires them.
use crate::syntax::{
    Accessor, BinaryOp, Body, ConstructorDeclaration, Expr, FieldDeclaration, Item, Member,
    MethodDeclaration, Modifier, Namespace, OperatorDeclaration, Parameter, PropertyDeclaration,
    Stmt, SyntaxTree, TypeDeclaration,
};

pub fn render_tree(tree: &SyntaxTree, indent: usize) -> String {
    let mut printer = Printer::new(indent);
    printer.emit_tree(tree);
    printer.into_string()
}

pub fn render_type(decl: &TypeDeclaration, indent: usize) -> String {
    let mut printer = Printer::new(indent);
    printer.emit_type(decl);
    printer.into_string()
}

pub struct Printer {
    out: String,
    indent: usize,
    level: usize,
}

impl Printer {
    pub fn new(indent: usize) -> Self {
        Self { out: String::new(), indent, level: 0 }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn emit_tree(&mut self, tree: &SyntaxTree) {
        for using in &tree.usings {
            self.line(&format!("using {using};"));
        }
        if !tree.usings.is_empty() && !tree.items.is_empty() {
            self.blank();
        }
        self.emit_items(&tree.items);
    }

    pub fn emit_type(&mut self, decl: &TypeDeclaration) {
        let mut header = format!("{}{} {}", modifiers(&decl.modifiers), decl.kind.keyword(), decl.name);
        if !decl.type_parameters.is_empty() {
            header.push_str(&format!("<{}>", decl.type_parameters.join(", ")));
        }
        if !decl.base_types.is_empty() {
            let bases: Vec<&str> = decl.base_types.iter().map(|t| t.as_str()).collect();
            header.push_str(&format!(" : {}", bases.join(", ")));
        }
        self.line(&header);
        self.open();
        let mut previous: Option<&Member> = None;
        for member in &decl.members {
            if let Some(prev) = previous {
                if !(is_compact(prev) && is_compact(member)) {
                    self.blank();
                }
            }
            self.emit_member(member);
            previous = Some(member);
        }
        self.close();
    }

    fn emit_items(&mut self, items: &[Item]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            match item {
                Item::Namespace(ns) => self.emit_namespace(ns),
                Item::Type(decl) => self.emit_type(decl),
            }
        }
    }

    fn emit_namespace(&mut self, ns: &Namespace) {
        self.line(&format!("namespace {}", ns.name));
        self.open();
        self.emit_items(&ns.items);
        self.close();
    }

    fn emit_member(&mut self, member: &Member) {
        match member {
            Member::Property(p) => self.emit_property(p),
            Member::Field(f) => self.emit_field(f),
            Member::Constructor(c) => self.emit_constructor(c),
            Member::Method(m) => self.emit_method(m),
            Member::Operator(o) => self.emit_operator(o),
            Member::Type(t) => self.emit_type(t),
            Member::Verbatim(text) => {
                for line in text.lines() {
                    self.line(line.trim_end());
                }
            }
        }
    }

    fn emit_property(&mut self, p: &PropertyDeclaration) {
        let head = format!("{}{} {}", modifiers(&p.modifiers), p.ty, p.name);
        if let Some(expr) = &p.expression_body {
            self.line(&format!("{head} => {};", expr_to_string(expr)));
            return;
        }
        if p.accessors.iter().all(|a| a.body.is_none()) {
            let accessors: Vec<String> = p.accessors.iter().map(accessor_head).collect();
            let mut text = format!("{head} {{ {}; }}", accessors.join("; "));
            if let Some(init) = &p.initializer {
                text.push_str(&format!(" = {};", expr_to_string(init)));
            }
            self.line(&text);
            return;
        }
        self.line(&head);
        self.open();
        for accessor in &p.accessors {
            let signature = accessor_head(accessor);
            match &accessor.body {
                None => self.line(&format!("{signature};")),
                Some(body) => self.emit_body(&signature, body),
            }
        }
        self.close();
    }

    fn emit_field(&mut self, f: &FieldDeclaration) {
        let mut text = format!("{}{} {}", modifiers(&f.modifiers), f.ty, f.name);
        if let Some(init) = &f.initializer {
            text.push_str(&format!(" = {}", expr_to_string(init)));
        }
        text.push(';');
        self.line(&text);
    }

    fn emit_constructor(&mut self, c: &ConstructorDeclaration) {
        self.line(&format!("{}{}({})", modifiers(&c.modifiers), c.name, parameters(&c.parameters)));
        self.emit_block(&c.body);
    }

    fn emit_method(&mut self, m: &MethodDeclaration) {
        let signature = format!(
            "{}{} {}({})",
            modifiers(&m.modifiers),
            m.return_type,
            m.name,
            parameters(&m.parameters)
        );
        self.emit_body(&signature, &m.body);
    }

    fn emit_operator(&mut self, o: &OperatorDeclaration) {
        let signature = format!(
            "{}{} operator {}({})",
            modifiers(&o.modifiers),
            o.return_type,
            o.operator.token(),
            parameters(&o.parameters)
        );
        self.emit_body(&signature, &o.body);
    }

    fn emit_body(&mut self, signature: &str, body: &Body) {
        match body {
            Body::Expression(expr) => self.line(&format!("{signature} => {};", expr_to_string(expr))),
            Body::Block(statements) => {
                self.line(signature);
                self.emit_block(statements);
            }
        }
    }

    fn emit_block(&mut self, statements: &[Stmt]) {
        self.open();
        for stmt in statements {
            self.emit_stmt(stmt);
        }
        self.close();
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Local { name, value } => self.line(&format!("var {name} = {};", expr_to_string(value))),
            Stmt::Assign { target, value } => {
                self.line(&format!("{} = {};", expr_to_string(target), expr_to_string(value)))
            }
            Stmt::Expression(expr) => self.line(&format!("{};", expr_to_string(expr))),
            Stmt::Return(expr) => self.line(&format!("return {};", expr_to_string(expr))),
            Stmt::Throw(expr) => self.line(&format!("throw {};", expr_to_string(expr))),
            Stmt::Verbatim(text) => {
                for line in text.lines() {
                    self.line(line.trim_end());
                }
            }
        }
    }

    fn open(&mut self) {
        self.line("{");
        self.level += 1;
    }

    fn close(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.line("}");
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.out.push_str(&" ".repeat(self.indent * self.level));
            self.out.push_str(text);
        }
        self.out.push('\n');
    }
}

/// Members that print on a single line and sit together without blank lines.
fn is_compact(member: &Member) -> bool {
    match member {
        Member::Field(_) => true,
        Member::Property(p) => p.expression_body.is_some() || p.accessors.iter().all(|a| a.body.is_none()),
        Member::Verbatim(text) => !text.contains('\n'),
        _ => false,
    }
}

fn modifiers(mods: &[Modifier]) -> String {
    mods.iter().map(|m| format!("{} ", m.keyword())).collect()
}

fn accessor_head(accessor: &Accessor) -> String {
    format!("{}{}", modifiers(&accessor.modifiers), accessor.kind.keyword())
}

fn parameters(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

// ————————————————————————————————————————————————————————————————————————————
// EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

const PRIMARY: u8 = 13;
const UNARY: u8 = 12;
const RELATIONAL: u8 = 8;
const CONDITIONAL: u8 = 1;

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Multiply => 11,
        BinaryOp::Add => 10,
        BinaryOp::LessThan
        | BinaryOp::GreaterThan
        | BinaryOp::LessThanOrEqual
        | BinaryOp::GreaterThanOrEqual => RELATIONAL,
        BinaryOp::Equal | BinaryOp::NotEqual => 7,
        BinaryOp::LogicalAnd => 4,
        BinaryOp::LogicalOr => 3,
        BinaryOp::Coalesce => 2,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Conditional { .. } => CONDITIONAL,
        Expr::As { .. } | Expr::Is { .. } | Expr::IsNotNull(_) => RELATIONAL,
        Expr::Cast { .. } => UNARY,
        _ => PRIMARY,
    }
}

pub fn expr_to_string(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, 0);
    out
}

fn write_expr(out: &mut String, expr: &Expr, min: u8) {
    let wrap = precedence(expr) < min;
    if wrap {
        out.push('(');
    }
    match expr {
        Expr::This => out.push_str("this"),
        Expr::Null => out.push_str("null"),
        Expr::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Expr::Int(i) => out.push_str(&i.to_string()),
        Expr::Str(s) => {
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    c => out.push(c),
                }
            }
            out.push('"');
        }
        Expr::Identifier(name) | Expr::Verbatim(name) => out.push_str(name),
        Expr::MemberAccess { target, name } => {
            write_expr(out, target, PRIMARY);
            out.push('.');
            out.push_str(name);
        }
        Expr::ConditionalAccess { target, name } => {
            write_expr(out, target, PRIMARY);
            out.push_str("?.");
            out.push_str(name);
        }
        Expr::Invocation { callee, args } => {
            write_expr(out, callee, PRIMARY);
            write_args(out, args);
        }
        Expr::ObjectCreation { ty, args } => {
            out.push_str("new ");
            out.push_str(ty.as_str());
            write_args(out, args);
        }
        Expr::Cast { ty, expr } => {
            out.push('(');
            out.push_str(ty.as_str());
            out.push(')');
            write_expr(out, expr, UNARY);
        }
        Expr::As { expr, ty } => {
            write_expr(out, expr, RELATIONAL);
            out.push_str(" as ");
            out.push_str(ty.as_str());
        }
        Expr::Is { expr, ty } => {
            write_expr(out, expr, RELATIONAL);
            out.push_str(" is ");
            out.push_str(ty.as_str());
        }
        Expr::IsNotNull(expr) => {
            write_expr(out, expr, RELATIONAL);
            out.push_str(" is not null");
        }
        Expr::Binary { op, lhs, rhs } => {
            let p = binary_precedence(*op);
            // `??` associates to the right, everything else to the left.
            let (left_min, right_min) = if *op == BinaryOp::Coalesce { (p + 1, p) } else { (p, p + 1) };
            write_expr(out, lhs, left_min);
            out.push(' ');
            out.push_str(op.token());
            out.push(' ');
            write_expr(out, rhs, right_min);
        }
        Expr::Conditional { condition, when_true, when_false } => {
            write_expr(out, condition, CONDITIONAL + 1);
            out.push_str(" ? ");
            write_expr(out, when_true, CONDITIONAL);
            out.push_str(" : ");
            write_expr(out, when_false, CONDITIONAL);
        }
    }
    if wrap {
        out.push(')');
    }
}

fn write_args(out: &mut String, args: &[Expr]) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, arg, 0);
    }
    out.push(')');
}
