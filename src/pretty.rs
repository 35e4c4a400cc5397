use crate::parser::ast::*;
use crate::span::Spanned;

/// Print an AST in canonical form. The output depends only on the tree, never
/// on the original layout or comments, and re-parses to a tree that prints the same.
pub fn normalize(ast: &Ast) -> String {
    let mut pp = PrettyPrinter::new(ast);
    pp.emit_unit();
    pp.buf
}

/// Canonical text of one type, e.g. `Map<String, List<? extends Number>>`.
pub fn type_to_string(ast: &Ast, ty: TypeId) -> String {
    let mut pp = PrettyPrinter::new(ast);
    pp.emit_type(ty);
    pp.buf
}

/// Canonical text of an annotation, e.g. `@Retention(RUNTIME)`.
pub fn annotation_to_string(ast: &Ast, annotation: &Annotation) -> String {
    let mut pp = PrettyPrinter::new(ast);
    pp.emit_annotation(annotation);
    pp.buf
}

// Expression precedence levels, loosest first.
const LAMBDA: u8 = 0;
const ASSIGN: u8 = 1;
const TERNARY: u8 = 2;
const UNARY: u8 = 13;
const POSTFIX: u8 = 14;
const PRIMARY: u8 = 15;

fn binop_prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 3,
        BinaryOp::And => 4,
        BinaryOp::BitOr => 5,
        BinaryOp::BitXor => 6,
        BinaryOp::BitAnd => 7,
        BinaryOp::Eq | BinaryOp::Ne => 8,
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 9,
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::UnsignedShiftRight => 10,
        BinaryOp::Add | BinaryOp::Sub => 11,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 12,
    }
}

const RELATIONAL: u8 = 9;

struct PrettyPrinter<'a> {
    ast: &'a Ast,
    buf: String,
    indent: usize,
}

impl<'a> PrettyPrinter<'a> {
    fn new(ast: &'a Ast) -> Self {
        Self { ast, buf: String::new(), indent: 0 }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent -= 1;
    }

    fn comma_separated<T: Copy>(&mut self, items: &[T], mut emit: impl FnMut(&mut Self, T)) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            emit(self, item);
        }
    }

    // ── Compilation unit ─────────────────────────────────────────────

    fn emit_unit(&mut self) {
        let ast = self.ast;
        let unit = &ast.unit;
        let mut has_output = false;

        if let Some(package) = &unit.package {
            for annotation in &package.node.annotations {
                self.emit_annotation(&annotation.node);
                self.newline();
            }
            self.write("package ");
            self.write(&dotted(&package.node.name));
            self.write(";");
            self.newline();
            has_output = true;
        }

        if !unit.imports.is_empty() {
            if has_output {
                self.newline();
            }
            for import in &unit.imports {
                self.write("import ");
                if import.node.is_static {
                    self.write("static ");
                }
                self.write(&import.node.full_path());
                if import.node.wildcard {
                    self.write(".*");
                }
                self.write(";");
                self.newline();
            }
            has_output = true;
        }

        for &decl in &unit.types {
            if has_output {
                self.newline();
            }
            self.emit_type_decl(decl);
            self.newline();
            has_output = true;
        }
    }

    // ── Modifiers and annotations ────────────────────────────────────

    /// Annotations each on their own line, then keywords. The cursor is
    /// already indented.
    fn emit_decl_modifiers(&mut self, modifiers: &ModifierSet) {
        for annotation in &modifiers.annotations {
            self.emit_annotation(&annotation.node);
            self.newline();
            self.write_indent();
        }
        self.emit_keywords(modifiers);
    }

    /// Annotations and keywords on one line, for parameters and locals.
    fn emit_inline_modifiers(&mut self, modifiers: &ModifierSet) {
        for annotation in &modifiers.annotations {
            self.emit_annotation(&annotation.node);
            self.write(" ");
        }
        self.emit_keywords(modifiers);
    }

    fn emit_keywords(&mut self, modifiers: &ModifierSet) {
        for modifier in modifiers.canonical() {
            self.write(modifier.as_str());
            self.write(" ");
        }
    }

    fn emit_annotation(&mut self, annotation: &Annotation) {
        self.write("@");
        self.write(&annotation.qualified_name());
        match &annotation.args {
            AnnotationArgs::None => {}
            AnnotationArgs::Single(value) => {
                self.write("(");
                self.emit_element_value(value);
                self.write(")");
            }
            AnnotationArgs::Named(pairs) => {
                self.write("(");
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write(&key.node);
                    self.write(" = ");
                    self.emit_element_value(value);
                }
                self.write(")");
            }
        }
    }

    fn emit_element_value(&mut self, value: &ElementValue) {
        match value {
            ElementValue::Expr(e) => self.emit_expr(*e, TERNARY),
            ElementValue::Annotation(nested) => self.emit_annotation(&nested.node),
            ElementValue::Array(items) => {
                self.write("{");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_element_value(item);
                }
                self.write("}");
            }
        }
    }

    // ── Type declarations ────────────────────────────────────────────

    /// The cursor is already indented. Leaves the cursor after the closing `}`.
    fn emit_type_decl(&mut self, id: DeclId) {
        let ast = self.ast;
        let decl = &ast.decl(id).node;
        self.emit_decl_modifiers(&decl.modifiers);
        self.write(decl.kind.keyword());
        self.write(" ");
        self.write(&decl.name.node);
        self.emit_type_params(&decl.type_params);
        if !decl.extends.is_empty() {
            self.write(" extends ");
            self.comma_separated(&decl.extends, |pp, t| pp.emit_type(t));
        }
        if !decl.implements.is_empty() {
            self.write(" implements ");
            self.comma_separated(&decl.implements, |pp, t| pp.emit_type(t));
        }
        self.write(" {");
        self.newline();
        self.indent();

        if decl.kind == TypeDeclKind::Enum {
            self.emit_enum_constants(&decl.enum_constants, !decl.members.is_empty());
            if !decl.members.is_empty() {
                self.newline();
            }
        }
        self.emit_members(&decl.members);

        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_enum_constants(&mut self, constants: &[Spanned<EnumConstant>], has_members: bool) {
        if constants.is_empty() {
            if has_members {
                self.write_indent();
                self.write(";");
                self.newline();
            }
            return;
        }
        for (i, constant) in constants.iter().enumerate() {
            let constant = &constant.node;
            self.write_indent();
            for annotation in &constant.annotations {
                self.emit_annotation(&annotation.node);
                self.newline();
                self.write_indent();
            }
            self.write(&constant.name.node);
            if let Some(args) = &constant.args {
                self.emit_args(args);
            }
            if let Some(body) = &constant.body {
                self.write(" ");
                self.emit_class_body(body);
            }
            if i + 1 < constants.len() {
                self.write(",");
            } else if has_members {
                self.write(";");
            }
            self.newline();
        }
    }

    /// Members one per line with a blank line between them.
    fn emit_members(&mut self, members: &[MemberId]) {
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                self.newline();
            }
            self.write_indent();
            self.emit_member(member);
            self.newline();
        }
    }

    /// `{`, the members, then `}` at the current indent.
    fn emit_class_body(&mut self, members: &[MemberId]) {
        self.write("{");
        self.newline();
        self.indent();
        self.emit_members(members);
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.write("<");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&param.name.node);
            if !param.bounds.is_empty() {
                self.write(" extends ");
                for (j, &bound) in param.bounds.iter().enumerate() {
                    if j > 0 {
                        self.write(" & ");
                    }
                    self.emit_type(bound);
                }
            }
        }
        self.write(">");
    }

    // ── Members ──────────────────────────────────────────────────────

    fn emit_member(&mut self, id: MemberId) {
        let ast = self.ast;
        match &ast.member(id).node {
            Member::Field(field) => {
                self.emit_decl_modifiers(&field.modifiers);
                self.emit_type(field.ty);
                self.write(" ");
                self.emit_declarators(&field.declarators);
                self.write(";");
            }
            Member::Method(method) => self.emit_method(method),
            Member::Initializer(init) => {
                if init.is_static {
                    self.write("static ");
                }
                self.emit_block(init.body);
            }
            Member::Type(decl) => self.emit_type_decl(*decl),
        }
    }

    fn emit_method(&mut self, method: &MethodDecl) {
        self.emit_decl_modifiers(&method.modifiers);
        if !method.type_params.is_empty() {
            self.emit_type_params(&method.type_params);
            self.write(" ");
        }
        if let Some(ret) = method.return_type {
            self.emit_type(ret);
            self.write(" ");
        }
        self.write(&method.name.node);
        self.emit_params(&method.params);
        if !method.throws.is_empty() {
            self.write(" throws ");
            self.comma_separated(&method.throws, |pp, t| pp.emit_type(t));
        }
        if let Some(value) = &method.default_value {
            self.write(" default ");
            self.emit_element_value(value);
        }
        match method.body {
            Some(body) => {
                self.write(" ");
                self.emit_block(body);
            }
            None => self.write(";"),
        }
    }

    fn emit_params(&mut self, params: &[Spanned<Param>]) {
        self.write("(");
        for (i, Spanned { node: param, .. }) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_inline_modifiers(&param.modifiers);
            self.emit_type(param.ty);
            if param.varargs {
                self.write("...");
            }
            self.write(" ");
            self.write(&param.name.node);
        }
        self.write(")");
    }

    fn emit_declarators(&mut self, declarators: &[Spanned<VarDeclarator>]) {
        for (i, Spanned { node: declarator, .. }) in declarators.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&declarator.name.node);
            for _ in 0..declarator.dims {
                self.write("[]");
            }
            if let Some(init) = declarator.init {
                self.write(" = ");
                self.emit_expr(init, LAMBDA);
            }
        }
    }

    // ── Statements ───────────────────────────────────────────────────

    /// `{`, the statements, then `}` at the current indent.
    fn emit_block(&mut self, id: StmtId) {
        let ast = self.ast;
        self.write("{");
        self.newline();
        self.indent();
        if let Stmt::Block(stmts) = &ast.stmt(id).node {
            for &stmt in stmts {
                self.emit_stmt(stmt);
            }
        } else {
            self.emit_stmt(id);
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn is_block(&self, id: StmtId) -> bool {
        matches!(self.ast.stmt(id).node, Stmt::Block(_))
    }

    /// One statement on its own line(s), ending with a newline.
    fn emit_stmt(&mut self, id: StmtId) {
        self.write_indent();
        self.emit_stmt_inline(id);
    }

    /// Body of a loop or branch: ` {..}` for blocks, otherwise the statement
    /// on the next line, one level deeper. Always ends the line.
    fn emit_body(&mut self, id: StmtId) {
        if self.is_block(id) {
            self.write(" ");
            self.emit_block(id);
            self.newline();
        } else {
            self.newline();
            self.indent();
            self.emit_stmt(id);
            self.dedent();
        }
    }

    /// A statement starting at the cursor, ending with a newline.
    fn emit_stmt_inline(&mut self, id: StmtId) {
        let ast = self.ast;
        match &ast.stmt(id).node {
            Stmt::Block(_) => {
                self.emit_block(id);
                self.newline();
            }
            Stmt::LocalVar(decl) => {
                self.emit_local_var(decl);
                self.write(";");
                self.newline();
            }
            Stmt::LocalClass(decl) => {
                self.emit_type_decl(*decl);
                self.newline();
            }
            Stmt::Expr(e) => {
                self.emit_expr(*e, LAMBDA);
                self.write(";");
                self.newline();
            }
            Stmt::If { cond, then_branch, else_branch } => {
                self.emit_if(*cond, *then_branch, *else_branch);
            }
            Stmt::SwitchClassic { selector, cases } => {
                self.write("switch (");
                self.emit_expr(*selector, LAMBDA);
                self.write(") ");
                self.emit_classic_cases(cases);
                self.newline();
            }
            Stmt::SwitchArrow { selector, cases } => {
                self.write("switch (");
                self.emit_expr(*selector, LAMBDA);
                self.write(") ");
                self.emit_arrow_cases(cases);
                self.newline();
            }
            Stmt::For { init, cond, update, body } => {
                self.write("for (");
                for (i, &s) in init.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    match &ast.stmt(s).node {
                        Stmt::LocalVar(decl) => self.emit_local_var(decl),
                        Stmt::Expr(e) => self.emit_expr(*e, LAMBDA),
                        _ => {}
                    }
                }
                self.write(";");
                if let Some(cond) = cond {
                    self.write(" ");
                    self.emit_expr(*cond, LAMBDA);
                }
                self.write(";");
                if !update.is_empty() {
                    self.write(" ");
                    self.comma_separated(update, |pp, e| pp.emit_expr(e, LAMBDA));
                }
                self.write(")");
                self.emit_body(*body);
            }
            Stmt::ForEach { modifiers, ty, name, iterable, body } => {
                self.write("for (");
                self.emit_inline_modifiers(modifiers);
                self.emit_type(*ty);
                self.write(" ");
                self.write(&name.node);
                self.write(" : ");
                self.emit_expr(*iterable, LAMBDA);
                self.write(")");
                self.emit_body(*body);
            }
            Stmt::While { cond, body } => {
                self.write("while (");
                self.emit_expr(*cond, LAMBDA);
                self.write(")");
                self.emit_body(*body);
            }
            Stmt::DoWhile { body, cond } => {
                self.write("do");
                if self.is_block(*body) {
                    self.write(" ");
                    self.emit_block(*body);
                    self.write(" ");
                } else {
                    self.newline();
                    self.indent();
                    self.emit_stmt(*body);
                    self.dedent();
                    self.write_indent();
                }
                self.write("while (");
                self.emit_expr(*cond, LAMBDA);
                self.write(");");
                self.newline();
            }
            Stmt::Try { resources, body, catches, finally } => {
                self.write("try ");
                if !resources.is_empty() {
                    self.write("(");
                    for (i, resource) in resources.iter().enumerate() {
                        if i > 0 {
                            self.write("; ");
                        }
                        match &resource.node {
                            Resource::Decl { modifiers, ty, name, init } => {
                                self.emit_inline_modifiers(modifiers);
                                self.emit_type(*ty);
                                self.write(" ");
                                self.write(&name.node);
                                self.write(" = ");
                                self.emit_expr(*init, LAMBDA);
                            }
                            Resource::Expr(e) => self.emit_expr(*e, LAMBDA),
                        }
                    }
                    self.write(") ");
                }
                self.emit_block(*body);
                for catch in catches {
                    let catch = &catch.node;
                    self.write(" catch (");
                    self.emit_inline_modifiers(&catch.modifiers);
                    for (i, &ty) in catch.types.iter().enumerate() {
                        if i > 0 {
                            self.write(" | ");
                        }
                        self.emit_type(ty);
                    }
                    self.write(" ");
                    self.write(&catch.name.node);
                    self.write(") ");
                    self.emit_block(catch.body);
                }
                if let Some(finally) = finally {
                    self.write(" finally ");
                    self.emit_block(*finally);
                }
                self.newline();
            }
            Stmt::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.emit_expr(*value, LAMBDA);
                }
                self.write(";");
                self.newline();
            }
            Stmt::Break(label) | Stmt::Continue(label) => {
                let keyword = if matches!(ast.stmt(id).node, Stmt::Break(_)) { "break" } else { "continue" };
                self.write(keyword);
                if let Some(label) = label {
                    self.write(" ");
                    self.write(&label.node);
                }
                self.write(";");
                self.newline();
            }
            Stmt::Throw(value) => {
                self.write("throw ");
                self.emit_expr(*value, LAMBDA);
                self.write(";");
                self.newline();
            }
            Stmt::Assert { cond, message } => {
                self.write("assert ");
                self.emit_expr(*cond, LAMBDA);
                if let Some(message) = message {
                    self.write(" : ");
                    self.emit_expr(*message, LAMBDA);
                }
                self.write(";");
                self.newline();
            }
            Stmt::Labeled { label, body } => {
                self.write(&label.node);
                self.write(": ");
                self.emit_stmt_inline(*body);
            }
            Stmt::Synchronized { lock, body } => {
                self.write("synchronized (");
                self.emit_expr(*lock, LAMBDA);
                self.write(") ");
                self.emit_block(*body);
                self.newline();
            }
            Stmt::Yield(value) => {
                self.write("yield ");
                self.emit_expr(*value, LAMBDA);
                self.write(";");
                self.newline();
            }
            Stmt::Empty => {
                self.write(";");
                self.newline();
            }
        }
    }

    fn emit_local_var(&mut self, decl: &LocalVarDecl) {
        self.emit_inline_modifiers(&decl.modifiers);
        self.emit_type(decl.ty);
        self.write(" ");
        self.emit_declarators(&decl.declarators);
    }

    fn emit_if(&mut self, cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId>) {
        self.write("if (");
        self.emit_expr(cond, LAMBDA);
        self.write(")");
        let Some(else_branch) = else_branch else {
            self.emit_body(then_branch);
            return;
        };
        if self.is_block(then_branch) {
            self.write(" ");
            self.emit_block(then_branch);
            self.write(" else");
        } else {
            self.emit_body(then_branch);
            self.write_indent();
            self.write("else");
        }
        let ast = self.ast;
        match &ast.stmt(else_branch).node {
            Stmt::If { cond, then_branch, else_branch } => {
                self.write(" ");
                self.emit_if(*cond, *then_branch, *else_branch);
            }
            _ => self.emit_body(else_branch),
        }
    }

    fn emit_case_labels(&mut self, labels: &[ExprId]) {
        if labels.is_empty() {
            self.write("default");
        } else {
            self.write("case ");
            self.comma_separated(labels, |pp, e| pp.emit_expr(e, TERNARY));
        }
    }

    /// `{`, labels one level in, statements two levels in, then `}`.
    fn emit_classic_cases(&mut self, cases: &[Spanned<ClassicCase>]) {
        self.write("{");
        self.newline();
        self.indent();
        for case in cases {
            self.write_indent();
            self.emit_case_labels(&case.node.labels);
            self.write(":");
            self.newline();
            self.indent();
            for &stmt in &case.node.body {
                self.emit_stmt(stmt);
            }
            self.dedent();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_arrow_cases(&mut self, cases: &[Spanned<ArrowCase>]) {
        self.write("{");
        self.newline();
        self.indent();
        for case in cases {
            self.write_indent();
            self.emit_case_labels(&case.node.labels);
            self.write(" -> ");
            match case.node.body {
                ArrowBody::Expr(e) => {
                    self.emit_expr(e, LAMBDA);
                    self.write(";");
                    self.newline();
                }
                ArrowBody::Block(s) => {
                    self.emit_block(s);
                    self.newline();
                }
                ArrowBody::Throw(s) => self.emit_stmt_inline(s),
            }
        }
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    // ── Expressions ──────────────────────────────────────────────────

    fn prec_of(&self, id: ExprId) -> u8 {
        match &self.ast.expr(id).node {
            Expr::Lambda { .. } => LAMBDA,
            Expr::Assign { .. } => ASSIGN,
            Expr::Ternary { .. } => TERNARY,
            Expr::Binary { op, .. } => binop_prec(*op),
            Expr::InstanceOf { .. } => RELATIONAL,
            Expr::Unary { op, .. } if op.is_postfix() => POSTFIX,
            Expr::Unary { .. } | Expr::Cast { .. } => UNARY,
            _ => PRIMARY,
        }
    }

    fn is_relational(&self, id: ExprId) -> bool {
        match &self.ast.expr(id).node {
            Expr::Binary { op, .. } => op.is_relational(),
            Expr::InstanceOf { .. } => true,
            _ => false,
        }
    }

    fn is_lambda(&self, id: ExprId) -> bool {
        matches!(self.ast.expr(id).node, Expr::Lambda { .. })
    }

    /// Emit `id`, parenthesized when it binds looser than `parent_prec`.
    fn emit_expr(&mut self, id: ExprId, parent_prec: u8) {
        if self.prec_of(id) < parent_prec {
            self.write("(");
            self.emit_expr_bare(id);
            self.write(")");
        } else {
            self.emit_expr_bare(id);
        }
    }

    /// Relational operands are always parenthesized: `a < b < c` does not
    /// re-parse reliably once generics are in play.
    fn emit_relational_operand(&mut self, id: ExprId, parent_prec: u8) {
        if self.is_relational(id) {
            self.write("(");
            self.emit_expr_bare(id);
            self.write(")");
        } else {
            self.emit_expr(id, parent_prec);
        }
    }

    fn emit_expr_bare(&mut self, id: ExprId) {
        let ast = self.ast;
        match &ast.expr(id).node {
            Expr::Literal(literal) => self.emit_literal(literal),
            Expr::Name(name) => self.write(&name.node),
            Expr::This => self.write("this"),
            Expr::Super => self.write("super"),
            Expr::Binary { op, lhs, rhs } => {
                let prec = binop_prec(*op);
                if op.is_relational() {
                    self.emit_relational_operand(*lhs, prec);
                } else {
                    self.emit_expr(*lhs, prec);
                }
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.emit_expr(*rhs, prec + 1);
            }
            Expr::Assign { op, target, value } => {
                self.emit_expr(*target, ASSIGN + 1);
                self.write(" ");
                self.write(op.as_str());
                self.write(" ");
                self.emit_expr(*value, LAMBDA);
            }
            Expr::Unary { op, operand } => {
                if op.is_postfix() {
                    self.emit_expr(*operand, POSTFIX);
                    self.write(op.as_str());
                } else {
                    self.write(op.as_str());
                    if self.starts_with_sign_of(*operand, *op) {
                        self.write(" ");
                    }
                    self.emit_expr(*operand, UNARY);
                }
            }
            Expr::Ternary { cond, then_expr, else_expr } => {
                self.emit_expr(*cond, TERNARY + 1);
                self.write(" ? ");
                self.emit_expr(*then_expr, LAMBDA);
                self.write(" : ");
                let else_prec = if self.is_lambda(*else_expr) { LAMBDA } else { TERNARY };
                self.emit_expr(*else_expr, else_prec);
            }
            Expr::InstanceOf { expr, ty, binding, is_final } => {
                self.emit_relational_operand(*expr, RELATIONAL);
                self.write(" instanceof ");
                if *is_final {
                    self.write("final ");
                }
                self.emit_type(*ty);
                if let Some(binding) = binding {
                    self.write(" ");
                    self.write(&binding.node);
                }
            }
            Expr::Cast { ty, expr } => {
                self.write("(");
                self.emit_type(*ty);
                self.write(") ");
                let primitive = matches!(ast.ty(*ty).node, TypeNode::Primitive(_));
                if !primitive && self.starts_with_sign(*expr) {
                    self.write("(");
                    self.emit_expr_bare(*expr);
                    self.write(")");
                } else {
                    self.emit_expr(*expr, UNARY);
                }
            }
            Expr::MethodCall { target, type_args, name, args } => {
                if let Some(target) = target {
                    self.emit_expr(*target, POSTFIX);
                    self.write(".");
                    self.emit_type_args(type_args);
                }
                self.write(&name.node);
                self.emit_args(args);
            }
            Expr::FieldAccess { target, name } => {
                self.emit_expr(*target, POSTFIX);
                self.write(".");
                self.write(&name.node);
            }
            Expr::ArrayAccess { array, index } => {
                // `new int[3][0]` would read back as a two-dimensional creation.
                let bare_creation = matches!(ast.expr(*array).node, Expr::NewArray { init: None, .. });
                if bare_creation {
                    self.write("(");
                    self.emit_expr_bare(*array);
                    self.write(")");
                } else {
                    self.emit_expr(*array, POSTFIX);
                }
                self.write("[");
                self.emit_expr(*index, LAMBDA);
                self.write("]");
            }
            Expr::ArrayInit(items) => {
                self.write("{");
                self.comma_separated(items, |pp, e| pp.emit_expr(e, LAMBDA));
                self.write("}");
            }
            Expr::Lambda { params, body } => {
                match params {
                    LambdaParams::Inferred(names) if names.len() == 1 => self.write(&names[0].node),
                    LambdaParams::Inferred(names) => {
                        self.write("(");
                        for (i, name) in names.iter().enumerate() {
                            if i > 0 {
                                self.write(", ");
                            }
                            self.write(&name.node);
                        }
                        self.write(")");
                    }
                    LambdaParams::Typed(params) => self.emit_params(params),
                }
                self.write(" -> ");
                match body {
                    LambdaBody::Expr(e) => self.emit_expr(*e, LAMBDA),
                    LambdaBody::Block(s) => self.emit_block(*s),
                }
            }
            Expr::MethodRef { target, type_args, name } => {
                match target {
                    MethodRefTarget::Expr(e) => self.emit_expr(*e, POSTFIX),
                    MethodRefTarget::Type(t) => self.emit_type(*t),
                }
                self.write("::");
                self.emit_type_args(type_args);
                self.write(&name.node);
            }
            Expr::New { ty, args, body } => {
                self.write("new ");
                self.emit_type(*ty);
                self.emit_args(args);
                if let Some(body) = body {
                    self.write(" ");
                    self.emit_class_body(body);
                }
            }
            Expr::NewArray { element, dims, extra_dims, init } => {
                self.write("new ");
                self.emit_type(*element);
                for &dim in dims {
                    self.write("[");
                    self.emit_expr(dim, LAMBDA);
                    self.write("]");
                }
                for _ in 0..*extra_dims {
                    self.write("[]");
                }
                if let Some(init) = init {
                    self.write(" ");
                    self.emit_expr(*init, LAMBDA);
                }
            }
            Expr::ClassLiteral(ty) => {
                self.emit_type(*ty);
                self.write(".class");
            }
            Expr::Switch { selector, body } => {
                self.write("switch (");
                self.emit_expr(*selector, LAMBDA);
                self.write(") ");
                match body {
                    SwitchBody::Classic(cases) => self.emit_classic_cases(cases),
                    SwitchBody::Arrow(cases) => self.emit_arrow_cases(cases),
                }
            }
        }
    }

    /// Whether `id` prints with a leading `+` or `-`.
    fn starts_with_sign(&self, id: ExprId) -> bool {
        matches!(
            self.ast.expr(id).node,
            Expr::Unary { op: UnaryOp::Plus | UnaryOp::Neg | UnaryOp::PreInc | UnaryOp::PreDec, .. }
        )
    }

    /// Whether `op` followed directly by `id` would lex as a different operator
    /// (`- -x` versus `--x`).
    fn starts_with_sign_of(&self, id: ExprId, op: UnaryOp) -> bool {
        let Expr::Unary { op: inner, .. } = self.ast.expr(id).node else {
            return false;
        };
        match op {
            UnaryOp::Plus | UnaryOp::PreInc => matches!(inner, UnaryOp::Plus | UnaryOp::PreInc),
            UnaryOp::Neg | UnaryOp::PreDec => matches!(inner, UnaryOp::Neg | UnaryOp::PreDec),
            _ => false,
        }
    }

    fn emit_args(&mut self, args: &[ExprId]) {
        self.write("(");
        self.comma_separated(args, |pp, e| pp.emit_expr(e, LAMBDA));
        self.write(")");
    }

    fn emit_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Int(text) | Literal::Long(text) | Literal::Float(text) | Literal::Double(text) => {
                self.write(text)
            }
            Literal::Char(value) => {
                self.write("'");
                let escaped = escape(value, '\'');
                self.write(&escaped);
                self.write("'");
            }
            Literal::String(value) => {
                self.write("\"");
                let escaped = escape(value, '"');
                self.write(&escaped);
                self.write("\"");
            }
            Literal::Bool(true) => self.write("true"),
            Literal::Bool(false) => self.write("false"),
            Literal::Null => self.write("null"),
        }
    }

    // ── Types ────────────────────────────────────────────────────────

    fn emit_type(&mut self, id: TypeId) {
        let ast = self.ast;
        match &ast.ty(id).node {
            TypeNode::Primitive(p) => self.write(p.as_str()),
            TypeNode::Boxed(b) => self.write(b.as_str()),
            TypeNode::Named(name) => self.write(&dotted(name)),
            TypeNode::Generic { raw, args } => {
                self.emit_type(*raw);
                self.write("<");
                self.comma_separated(args, |pp, t| pp.emit_type(t));
                self.write(">");
            }
            TypeNode::Array { element } => {
                self.emit_type(*element);
                self.write("[]");
            }
            TypeNode::Wildcard { bound } => {
                self.write("?");
                match bound {
                    Some((WildcardBound::Extends, t)) => {
                        self.write(" extends ");
                        self.emit_type(*t);
                    }
                    Some((WildcardBound::Super, t)) => {
                        self.write(" super ");
                        self.emit_type(*t);
                    }
                    None => {}
                }
            }
        }
    }

    fn emit_type_args(&mut self, args: &[TypeId]) {
        if args.is_empty() {
            return;
        }
        self.write("<");
        self.comma_separated(args, |pp, t| pp.emit_type(t));
        self.write(">");
    }
}

/// Re-escape a decoded string or char literal body. `quote` is the delimiter
/// that needs a backslash.
fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}
