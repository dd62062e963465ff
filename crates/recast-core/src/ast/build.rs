//! Shorthand constructors for tree nodes.
//!
//! Nodes built here are unassigned; a [`SyntaxTree`](super::SyntaxTree) numbers
//! them when it adopts them, and the engine numbers replacement subtrees.

use super::*;

pub fn program(stmts: Vec<Node>) -> Node {
    Node::new(NodeData::Program { stmts })
}

pub fn class(name: &str, flags: Modifiers, members: Vec<Node>) -> Node {
    Node::new(NodeData::Class(ClassDecl {
        name: name.to_string(),
        flags,
        extends: None,
        implements: Vec::new(),
        members,
    }))
}

pub fn class_extending(name: &str, flags: Modifiers, parent: &str, members: Vec<Node>) -> Node {
    Node::new(NodeData::Class(ClassDecl {
        name: name.to_string(),
        flags,
        extends: Some(parent.to_string()),
        implements: Vec::new(),
        members,
    }))
}

pub fn method(name: &str, flags: Modifiers, body: Vec<Node>) -> Node {
    Node::new(NodeData::Method(MethodDecl {
        name: name.to_string(),
        flags,
        params: Vec::new(),
        return_type: None,
        body: Some(body),
    }))
}

/// Method without a body, as declared in interfaces and abstract classes
pub fn abstract_method(name: &str, flags: Modifiers) -> Node {
    Node::new(NodeData::Method(MethodDecl {
        name: name.to_string(),
        flags,
        params: Vec::new(),
        return_type: None,
        body: None,
    }))
}

pub fn property(name: &str, flags: Modifiers) -> Node {
    Node::new(NodeData::Property(PropertyDecl {
        name: name.to_string(),
        flags,
        type_hint: None,
        default: None,
    }))
}

pub fn class_const(name: &str, flags: Modifiers, value: Node) -> Node {
    Node::new(NodeData::ClassConst(ClassConstDecl {
        name: name.to_string(),
        flags,
        value: Box::new(value),
    }))
}

pub fn function(name: &str, body: Vec<Node>) -> Node {
    Node::new(NodeData::Function(FunctionDecl {
        name: name.to_string(),
        params: Vec::new(),
        return_type: None,
        body,
    }))
}

pub fn function_returning(name: &str, return_type: &str, body: Vec<Node>) -> Node {
    Node::new(NodeData::Function(FunctionDecl {
        name: name.to_string(),
        params: Vec::new(),
        return_type: Some(return_type.to_string()),
        body,
    }))
}

pub fn closure(uses: &[&str], body: Vec<Node>) -> Node {
    Node::new(NodeData::Closure(ClosureDecl {
        is_static: false,
        params: Vec::new(),
        uses: uses.iter().map(|name| name.to_string()).collect(),
        return_type: None,
        body,
    }))
}

/// Expression statement
pub fn stmt(expr: Node) -> Node {
    Node::new(NodeData::Expression {
        expr: Box::new(expr),
    })
}

pub fn ret(expr: Node) -> Node {
    Node::new(NodeData::Return {
        expr: Some(Box::new(expr)),
    })
}

pub fn ret_void() -> Node {
    Node::new(NodeData::Return { expr: None })
}

pub fn if_else(cond: Node, then_branch: Vec<Node>, else_branch: Option<Vec<Node>>) -> Node {
    Node::new(NodeData::If {
        cond: Box::new(cond),
        then_branch,
        else_branch,
    })
}

pub fn foreach(subject: Node, value_var: Node, body: Vec<Node>) -> Node {
    Node::new(NodeData::Foreach {
        subject: Box::new(subject),
        value_var: Box::new(value_var),
        body,
    })
}

pub fn assign(var: Node, expr: Node) -> Node {
    Node::new(NodeData::Assign {
        var: Box::new(var),
        expr: Box::new(expr),
    })
}

/// `$name = expr;` as a statement
pub fn assign_stmt(name: &str, expr: Node) -> Node {
    stmt(assign(variable(name), expr))
}

pub fn variable(name: &str) -> Node {
    Node::new(NodeData::Variable {
        name: name.to_string(),
    })
}

pub fn array(items: Vec<Node>) -> Node {
    Node::new(NodeData::Array { items })
}

pub fn empty_array() -> Node {
    array(Vec::new())
}

pub fn yield_value(value: Node) -> Node {
    Node::new(NodeData::Yield {
        value: Some(Box::new(value)),
    })
}

pub fn call(name: &str, args: Vec<Node>) -> Node {
    Node::new(NodeData::Call {
        name: name.to_string(),
        args,
    })
}

pub fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
    Node::new(NodeData::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn string(value: &str) -> Node {
    Node::new(NodeData::Scalar(Scalar::String(value.to_string())))
}

pub fn int(value: i64) -> Node {
    Node::new(NodeData::Scalar(Scalar::Int(value)))
}

pub fn null() -> Node {
    Node::new(NodeData::Scalar(Scalar::Null))
}
