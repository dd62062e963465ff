// Source code generation from the tree
// Renders PHP text for reports and for the `source` output format. Layout
// is normalised; original formatting is not preserved.

use super::*;

const INDENT: &str = "    ";

/// Trait for types that can generate their source code representation
pub trait ToSource {
    fn to_source(&self) -> String;
}

impl ToSource for Node {
    fn to_source(&self) -> String {
        let mut writer = SourceWriter::default();
        match &self.data {
            NodeData::Program { stmts } => {
                writer.out.push_str("<?php\n");
                for stmt in stmts {
                    writer.out.push('\n');
                    writer.statement(stmt);
                }
            }
            _ if KindSet::STATEMENT.contains_kind(self.kind()) || is_member(self) => {
                writer.statement(self)
            }
            _ => writer.expression(self),
        }
        writer.out
    }
}

impl ToSource for SyntaxTree {
    fn to_source(&self) -> String {
        self.root().to_source()
    }
}

impl ToSource for Param {
    fn to_source(&self) -> String {
        match &self.type_hint {
            Some(hint) => format!("{hint} ${}", self.name),
            None => format!("${}", self.name),
        }
    }
}

fn is_member(node: &Node) -> bool {
    matches!(
        node.kind(),
        NodeKind::Method | NodeKind::Property | NodeKind::ClassConst
    )
}

fn format_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| p.to_source())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_return_type(return_type: &Option<String>) -> String {
    match return_type {
        Some(ty) => format!(": {ty}"),
        None => String::new(),
    }
}

fn format_modifiers(flags: Modifiers) -> String {
    let mut words = flags.keywords().join(" ");
    if !words.is_empty() {
        words.push(' ');
    }
    words
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[derive(Default)]
struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn line(&mut self, text: &str) {
        self.indent();
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn block(&mut self, stmts: &[Node]) {
        self.depth += 1;
        for stmt in stmts {
            self.statement(stmt);
        }
        self.depth -= 1;
    }

    fn statement(&mut self, node: &Node) {
        match &node.data {
            NodeData::Program { stmts } => {
                for stmt in stmts {
                    self.statement(stmt);
                }
            }
            NodeData::Class(class) => {
                let mut header = format!("{}class {}", format_modifiers(class.flags), class.name);
                if let Some(parent) = &class.extends {
                    header.push_str(&format!(" extends {parent}"));
                }
                if !class.implements.is_empty() {
                    header.push_str(&format!(" implements {}", class.implements.join(", ")));
                }
                self.line(&header);
                self.line("{");
                self.depth += 1;
                for (i, member) in class.members.iter().enumerate() {
                    if i > 0 {
                        self.out.push('\n');
                    }
                    self.statement(member);
                }
                self.depth -= 1;
                self.line("}");
            }
            NodeData::Method(method) => {
                let header = format!(
                    "{}function {}({}){}",
                    format_modifiers(method.flags),
                    method.name,
                    format_params(&method.params),
                    format_return_type(&method.return_type)
                );
                match &method.body {
                    Some(body) => {
                        self.line(&header);
                        self.line("{");
                        self.block(body);
                        self.line("}");
                    }
                    None => self.line(&format!("{header};")),
                }
            }
            NodeData::Property(property) => {
                self.indent();
                if property.flags.is_empty() {
                    self.out.push_str("var ");
                } else {
                    self.out.push_str(&format_modifiers(property.flags));
                }
                if let Some(hint) = &property.type_hint {
                    self.out.push_str(&format!("{hint} "));
                }
                self.out.push_str(&format!("${}", property.name));
                if let Some(default) = &property.default {
                    self.out.push_str(" = ");
                    self.expression(default);
                }
                self.out.push_str(";\n");
            }
            NodeData::ClassConst(constant) => {
                self.indent();
                self.out.push_str(&format!(
                    "{}const {} = ",
                    format_modifiers(constant.flags),
                    constant.name
                ));
                self.expression(&constant.value);
                self.out.push_str(";\n");
            }
            NodeData::Function(function) => {
                self.line(&format!(
                    "function {}({}){}",
                    function.name,
                    format_params(&function.params),
                    format_return_type(&function.return_type)
                ));
                self.line("{");
                self.block(&function.body);
                self.line("}");
            }
            NodeData::Expression { expr } => {
                self.indent();
                self.expression(expr);
                self.out.push_str(";\n");
            }
            NodeData::Return { expr } => {
                self.indent();
                self.out.push_str("return");
                if let Some(expr) = expr {
                    self.out.push(' ');
                    self.expression(expr);
                }
                self.out.push_str(";\n");
            }
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.indent();
                self.out.push_str("if (");
                self.expression(cond);
                self.out.push_str(") {\n");
                self.block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.line("} else {");
                    self.block(else_branch);
                }
                self.line("}");
            }
            NodeData::Foreach {
                subject,
                value_var,
                body,
            } => {
                self.indent();
                self.out.push_str("foreach (");
                self.expression(subject);
                self.out.push_str(" as ");
                self.expression(value_var);
                self.out.push_str(") {\n");
                self.block(body);
                self.line("}");
            }
            // Bare expression in statement position
            _ => {
                self.indent();
                self.expression(node);
                self.out.push_str(";\n");
            }
        }
    }

    fn expression(&mut self, node: &Node) {
        match &node.data {
            NodeData::Assign { var, expr } => {
                self.expression(var);
                self.out.push_str(" = ");
                self.expression(expr);
            }
            NodeData::Variable { name } => {
                self.out.push('$');
                self.out.push_str(name);
            }
            NodeData::Array { items } => {
                self.out.push('[');
                self.list(items);
                self.out.push(']');
            }
            NodeData::Yield { value } => {
                self.out.push_str("yield");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expression(value);
                }
            }
            NodeData::Call { name, args } => {
                self.out.push_str(name);
                self.out.push('(');
                self.list(args);
                self.out.push(')');
            }
            NodeData::BinaryOp { op, left, right } => {
                self.operand(left);
                self.out.push_str(&format!(" {} ", op.symbol()));
                self.operand(right);
            }
            NodeData::Scalar(scalar) => match scalar {
                Scalar::String(value) => self.out.push_str(&quote(value)),
                Scalar::Int(value) => self.out.push_str(&value.to_string()),
                Scalar::Float(value) => self.out.push_str(&format!("{value:?}")),
                Scalar::Bool(value) => self.out.push_str(if *value { "true" } else { "false" }),
                Scalar::Null => self.out.push_str("null"),
            },
            NodeData::Closure(closure) => {
                if closure.is_static {
                    self.out.push_str("static ");
                }
                self.out
                    .push_str(&format!("function ({})", format_params(&closure.params)));
                if !closure.uses.is_empty() {
                    let uses: Vec<String> =
                        closure.uses.iter().map(|name| format!("${name}")).collect();
                    self.out.push_str(&format!(" use ({})", uses.join(", ")));
                }
                self.out.push_str(&format_return_type(&closure.return_type));
                self.out.push_str(" {\n");
                self.block(&closure.body);
                self.indent();
                self.out.push('}');
            }
            _ => self.out.push_str(&format!("/* {} */", node.kind())),
        }
    }

    fn operand(&mut self, node: &Node) {
        if matches!(node.data, NodeData::BinaryOp { .. } | NodeData::Assign { .. }) {
            self.out.push('(');
            self.expression(node);
            self.out.push(')');
        } else {
            self.expression(node);
        }
    }

    fn list(&mut self, items: &[Node]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expression(item);
        }
    }
}
