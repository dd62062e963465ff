// Syntax tree for PHP sources
// One uniform `Node` type covers statements and expressions so that the
// engine can walk, replace and remove nodes without knowing their shape.

pub mod build;
pub mod kind;
pub mod source_gen;
pub use kind::{KindSet, NodeKind};
pub use source_gen::ToSource;


use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Identity of a node within one tree
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Id carried by nodes a rule has built but the tree has not adopted yet
    pub const UNASSIGNED: NodeId = NodeId(0);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source position of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
}

impl Span {
    pub fn new(start: u32, end: u32, line: u32) -> Self {
        Self { start, end, line }
    }
}

bitflags! {
    /// Modifier bitfield of classes and class members
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1;
        const PROTECTED = 2;
        const PRIVATE = 4;
        const STATIC = 8;
        const ABSTRACT = 16;
        const FINAL = 32;
    }
}

impl Modifiers {
    pub const VISIBILITY: Modifiers = Modifiers::PUBLIC
        .union(Modifiers::PROTECTED)
        .union(Modifiers::PRIVATE);

    pub fn visibility(self) -> Modifiers {
        self & Self::VISIBILITY
    }

    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Modifiers::FINAL)
    }

    /// Keywords in the order PHP prints them
    pub fn keywords(self) -> Vec<&'static str> {
        let mut words = Vec::new();
        if self.contains(Modifiers::ABSTRACT) {
            words.push("abstract");
        }
        if self.contains(Modifiers::FINAL) {
            words.push("final");
        }
        if self.contains(Modifiers::PUBLIC) {
            words.push("public");
        }
        if self.contains(Modifiers::PROTECTED) {
            words.push("protected");
        }
        if self.contains(Modifiers::PRIVATE) {
            words.push("private");
        }
        if self.contains(Modifiers::STATIC) {
            words.push("static");
        }
        words
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub type_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub flags: Modifiers,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub members: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub flags: Modifiers,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<String>,
    /// `None` for abstract and interface methods
    #[serde(default)]
    pub body: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(default)]
    pub flags: Modifiers,
    #[serde(default)]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub default: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConstDecl {
    pub name: String,
    #[serde(default)]
    pub flags: Modifiers,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureDecl {
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub params: Vec<Param>,
    /// Variables captured with `use (...)`
    #[serde(default)]
    pub uses: Vec<String>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Concat,
    Add,
    Sub,
    Mul,
    Equal,
    Identical,
    NotIdentical,
    Less,
    Greater,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Concat => ".",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Equal => "==",
            BinaryOp::Identical => "===",
            BinaryOp::NotIdentical => "!==",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    // Top level and declarations
    Program { stmts: Vec<Node> },
    Class(ClassDecl),
    Method(MethodDecl),
    Property(PropertyDecl),
    ClassConst(ClassConstDecl),
    Function(FunctionDecl),
    Closure(ClosureDecl),

    // Statements
    /// Expression statement: `expr;`
    Expression { expr: Box<Node> },
    Return { expr: Option<Box<Node>> },
    If {
        cond: Box<Node>,
        then_branch: Vec<Node>,
        else_branch: Option<Vec<Node>>,
    },
    Foreach {
        subject: Box<Node>,
        value_var: Box<Node>,
        body: Vec<Node>,
    },

    // Expressions
    Assign { var: Box<Node>, expr: Box<Node> },
    Variable { name: String },
    Array { items: Vec<Node> },
    Yield { value: Option<Box<Node>> },
    Call { name: String, args: Vec<Node> },
    BinaryOp {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub data: NodeData,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            id: NodeId::UNASSIGNED,
            span: Span::default(),
            data,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn kind(&self) -> NodeKind {
        match &self.data {
            NodeData::Program { .. } => NodeKind::Program,
            NodeData::Class(_) => NodeKind::Class,
            NodeData::Method(_) => NodeKind::Method,
            NodeData::Property(_) => NodeKind::Property,
            NodeData::ClassConst(_) => NodeKind::ClassConst,
            NodeData::Function(_) => NodeKind::Function,
            NodeData::Closure(_) => NodeKind::Closure,
            NodeData::Expression { .. } => NodeKind::Expression,
            NodeData::Return { .. } => NodeKind::Return,
            NodeData::If { .. } => NodeKind::If,
            NodeData::Foreach { .. } => NodeKind::Foreach,
            NodeData::Assign { .. } => NodeKind::Assign,
            NodeData::Variable { .. } => NodeKind::Variable,
            NodeData::Array { .. } => NodeKind::Array,
            NodeData::Yield { .. } => NodeKind::Yield,
            NodeData::Call { .. } => NodeKind::Call,
            NodeData::BinaryOp { .. } => NodeKind::BinaryOp,
            NodeData::Scalar(_) => NodeKind::Scalar,
        }
    }

    pub fn is_function_like(&self) -> bool {
        self.kind().is_function_like()
    }

    pub fn modifiers(&self) -> Option<Modifiers> {
        match &self.data {
            NodeData::Class(class) => Some(class.flags),
            NodeData::Method(method) => Some(method.flags),
            NodeData::Property(property) => Some(property.flags),
            NodeData::ClassConst(constant) => Some(constant.flags),
            _ => None,
        }
    }

    pub fn modifiers_mut(&mut self) -> Option<&mut Modifiers> {
        match &mut self.data {
            NodeData::Class(class) => Some(&mut class.flags),
            NodeData::Method(method) => Some(&mut method.flags),
            NodeData::Property(property) => Some(&mut property.flags),
            NodeData::ClassConst(constant) => Some(&mut constant.flags),
            _ => None,
        }
    }

    /// Declared return type of a function-like node
    pub fn return_type(&self) -> Option<&str> {
        match &self.data {
            NodeData::Method(method) => method.return_type.as_deref(),
            NodeData::Function(function) => function.return_type.as_deref(),
            NodeData::Closure(closure) => closure.return_type.as_deref(),
            _ => None,
        }
    }

    /// Sets the return type of a function-like node. Returns false for other kinds.
    pub fn set_return_type(&mut self, return_type: impl Into<String>) -> bool {
        let slot = match &mut self.data {
            NodeData::Method(method) => &mut method.return_type,
            NodeData::Function(function) => &mut function.return_type,
            NodeData::Closure(closure) => &mut closure.return_type,
            _ => return false,
        };
        *slot = Some(return_type.into());
        true
    }

    /// Body statements of a function-like node; `None` when it has no body
    pub fn body(&self) -> Option<&[Node]> {
        match &self.data {
            NodeData::Method(method) => method.body.as_deref(),
            NodeData::Function(function) => Some(&function.body),
            NodeData::Closure(closure) => Some(&closure.body),
            _ => None,
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&Node> {
        match &self.data {
            NodeData::Program { stmts } => stmts.iter().collect(),
            NodeData::Class(class) => class.members.iter().collect(),
            NodeData::Method(method) => method.body.iter().flatten().collect(),
            NodeData::Property(property) => property.default.as_deref().into_iter().collect(),
            NodeData::ClassConst(constant) => vec![constant.value.as_ref()],
            NodeData::Function(function) => function.body.iter().collect(),
            NodeData::Closure(closure) => closure.body.iter().collect(),
            NodeData::Expression { expr } => vec![expr.as_ref()],
            NodeData::Return { expr } => expr.as_deref().into_iter().collect(),
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => std::iter::once(cond.as_ref())
                .chain(then_branch.iter())
                .chain(else_branch.iter().flatten())
                .collect(),
            NodeData::Foreach {
                subject,
                value_var,
                body,
            } => [subject.as_ref(), value_var.as_ref()]
                .into_iter()
                .chain(body.iter())
                .collect(),
            NodeData::Assign { var, expr } => vec![var.as_ref(), expr.as_ref()],
            NodeData::Array { items } => items.iter().collect(),
            NodeData::Yield { value } => value.as_deref().into_iter().collect(),
            NodeData::Call { args, .. } => args.iter().collect(),
            NodeData::BinaryOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            NodeData::Variable { .. } | NodeData::Scalar(_) => Vec::new(),
        }
    }

    /// Direct children in source order, mutably
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        match &mut self.data {
            NodeData::Program { stmts } => stmts.iter_mut().collect(),
            NodeData::Class(class) => class.members.iter_mut().collect(),
            NodeData::Method(method) => method.body.iter_mut().flatten().collect(),
            NodeData::Property(property) => {
                property.default.as_deref_mut().into_iter().collect()
            }
            NodeData::ClassConst(constant) => vec![constant.value.as_mut()],
            NodeData::Function(function) => function.body.iter_mut().collect(),
            NodeData::Closure(closure) => closure.body.iter_mut().collect(),
            NodeData::Expression { expr } => vec![expr.as_mut()],
            NodeData::Return { expr } => expr.as_deref_mut().into_iter().collect(),
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => std::iter::once(cond.as_mut())
                .chain(then_branch.iter_mut())
                .chain(else_branch.iter_mut().flatten())
                .collect(),
            NodeData::Foreach {
                subject,
                value_var,
                body,
            } => [subject.as_mut(), value_var.as_mut()]
                .into_iter()
                .chain(body.iter_mut())
                .collect(),
            NodeData::Assign { var, expr } => vec![var.as_mut(), expr.as_mut()],
            NodeData::Array { items } => items.iter_mut().collect(),
            NodeData::Yield { value } => value.as_deref_mut().into_iter().collect(),
            NodeData::Call { args, .. } => args.iter_mut().collect(),
            NodeData::BinaryOp { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            NodeData::Variable { .. } | NodeData::Scalar(_) => Vec::new(),
        }
    }

    /// Child at `index`, numbered as in [`Node::children`]
    pub fn child(&self, index: usize) -> Option<&Node> {
        match &self.data {
            NodeData::Program { stmts } => stmts.get(index),
            NodeData::Class(class) => class.members.get(index),
            NodeData::Method(method) => method.body.as_ref()?.get(index),
            NodeData::Property(property) => property.default.as_deref().filter(|_| index == 0),
            NodeData::ClassConst(constant) => (index == 0).then_some(constant.value.as_ref()),
            NodeData::Function(function) => function.body.get(index),
            NodeData::Closure(closure) => closure.body.get(index),
            NodeData::Expression { expr } => (index == 0).then_some(expr.as_ref()),
            NodeData::Return { expr } => expr.as_deref().filter(|_| index == 0),
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => match index.checked_sub(1) {
                None => Some(cond.as_ref()),
                Some(index) if index < then_branch.len() => then_branch.get(index),
                Some(index) => else_branch.as_ref()?.get(index - then_branch.len()),
            },
            NodeData::Foreach {
                subject,
                value_var,
                body,
            } => match index {
                0 => Some(subject.as_ref()),
                1 => Some(value_var.as_ref()),
                _ => body.get(index - 2),
            },
            NodeData::Assign { var, expr } => match index {
                0 => Some(var.as_ref()),
                1 => Some(expr.as_ref()),
                _ => None,
            },
            NodeData::Array { items } => items.get(index),
            NodeData::Yield { value } => value.as_deref().filter(|_| index == 0),
            NodeData::Call { args, .. } => args.get(index),
            NodeData::BinaryOp { left, right, .. } => match index {
                0 => Some(left.as_ref()),
                1 => Some(right.as_ref()),
                _ => None,
            },
            NodeData::Variable { .. } | NodeData::Scalar(_) => None,
        }
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        match &mut self.data {
            NodeData::Program { stmts } => stmts.get_mut(index),
            NodeData::Class(class) => class.members.get_mut(index),
            NodeData::Method(method) => method.body.as_mut()?.get_mut(index),
            NodeData::Property(property) => {
                property.default.as_deref_mut().filter(|_| index == 0)
            }
            NodeData::ClassConst(constant) => (index == 0).then_some(constant.value.as_mut()),
            NodeData::Function(function) => function.body.get_mut(index),
            NodeData::Closure(closure) => closure.body.get_mut(index),
            NodeData::Expression { expr } => (index == 0).then_some(expr.as_mut()),
            NodeData::Return { expr } => expr.as_deref_mut().filter(|_| index == 0),
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => match index.checked_sub(1) {
                None => Some(cond.as_mut()),
                Some(index) if index < then_branch.len() => then_branch.get_mut(index),
                Some(index) => {
                    let index = index - then_branch.len();
                    else_branch.as_mut()?.get_mut(index)
                }
            },
            NodeData::Foreach {
                subject,
                value_var,
                body,
            } => match index {
                0 => Some(subject.as_mut()),
                1 => Some(value_var.as_mut()),
                _ => body.get_mut(index - 2),
            },
            NodeData::Assign { var, expr } => match index {
                0 => Some(var.as_mut()),
                1 => Some(expr.as_mut()),
                _ => None,
            },
            NodeData::Array { items } => items.get_mut(index),
            NodeData::Yield { value } => value.as_deref_mut().filter(|_| index == 0),
            NodeData::Call { args, .. } => args.get_mut(index),
            NodeData::BinaryOp { left, right, .. } => match index {
                0 => Some(left.as_mut()),
                1 => Some(right.as_mut()),
                _ => None,
            },
            NodeData::Variable { .. } | NodeData::Scalar(_) => None,
        }
    }

    /// Equality of shape and content, ignoring ids and spans throughout
    pub fn structurally_eq(&self, other: &Node) -> bool {
        fn anonymous(node: &Node) -> Node {
            let mut node = node.clone();
            let mut stack = vec![&mut node];
            while let Some(current) = stack.pop() {
                current.id = NodeId::UNASSIGNED;
                current.span = Span::default();
                stack.extend(current.children_mut());
            }
            node
        }

        self.kind() == other.kind()
            && self.subtree_size() == other.subtree_size()
            && anonymous(self) == anonymous(other)
    }

    /// Detaches the child at `index` when it is an element of a statement list.
    ///
    /// Indices follow [`Node::children`]. Returns `None` for children held in
    /// a fixed slot (a condition, an operand, a default value, ...).
    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        fn take(list: &mut Vec<Node>, index: usize) -> Option<Node> {
            (index < list.len()).then(|| list.remove(index))
        }

        match &mut self.data {
            NodeData::Program { stmts } => take(stmts, index),
            NodeData::Class(class) => take(&mut class.members, index),
            NodeData::Method(method) => method.body.as_mut().and_then(|body| take(body, index)),
            NodeData::Function(function) => take(&mut function.body, index),
            NodeData::Closure(closure) => take(&mut closure.body, index),
            NodeData::If {
                then_branch,
                else_branch,
                ..
            } => {
                // child 0 is the condition
                let index = index.checked_sub(1)?;
                if index < then_branch.len() {
                    return Some(then_branch.remove(index));
                }
                let index = index - then_branch.len();
                else_branch.as_mut().and_then(|branch| take(branch, index))
            }
            NodeData::Foreach { body, .. } => {
                // children 0 and 1 are the subject and the loop variable
                let index = index.checked_sub(2)?;
                take(body, index)
            }
            _ => None,
        }
    }

    /// Name carried by the node, if any
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Class(class) => Some(&class.name),
            NodeData::Method(method) => Some(&method.name),
            NodeData::Property(property) => Some(&property.name),
            NodeData::ClassConst(constant) => Some(&constant.name),
            NodeData::Function(function) => Some(&function.name),
            NodeData::Variable { name } => Some(name),
            NodeData::Call { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.data {
            NodeData::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassDecl> {
        match &mut self.data {
            NodeData::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

/// One parsed unit of input, owned by a single engine run
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    root: Node,
    next_id: u32,
}

impl SyntaxTree {
    /// Adopts `root`, giving every unassigned node a fresh id
    pub fn new(root: Node) -> Self {
        let mut max_id = 0;
        let mut stack = vec![&root];
        while let Some(node) = stack.pop() {
            max_id = max_id.max(node.id.0);
            stack.extend(node.children());
        }

        let mut tree = Self {
            root,
            next_id: max_id + 1,
        };
        tree.assign_ids(&[]);
        tree
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let root: Node = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.root)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Node reached by following child indices from the root
    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(&self.root, |node, &index| node.child(index))
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = &mut self.root;
        for &index in path {
            node = node.child_mut(index)?;
        }
        Some(node)
    }

    /// The node at `path` together with its ancestors, root first
    pub fn get_with_ancestors(&self, path: &[usize]) -> Option<(&Node, Vec<&Node>)> {
        let mut ancestors = Vec::with_capacity(path.len());
        let mut node = &self.root;
        for &index in path {
            let child = node.child(index)?;
            ancestors.push(node);
            node = child;
        }
        Some((node, ancestors))
    }

    pub fn find_by_id(&self, id: NodeId) -> Option<&Node> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children());
        }
        None
    }

    /// Numbers every unassigned node in the subtree at `path`, in pre-order
    pub(crate) fn assign_ids(&mut self, path: &[usize]) {
        let mut next_id = self.next_id;
        let Some(start) = self.get_mut(path) else {
            return;
        };

        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !node.id.is_assigned() {
                node.id = NodeId(next_id);
                next_id += 1;
            }
            let mut children = node.children_mut();
            children.reverse();
            stack.extend(children);
        }
        self.next_id = next_id;
    }

    /// Detaches the node at `path` from its parent's statement list
    pub(crate) fn remove(&mut self, path: &[usize]) -> Option<Node> {
        let (&index, parent_path) = path.split_last()?;
        self.get_mut(parent_path)?.remove_child(index)
    }
}

#[cfg(test)]
mod tests {
    use super::build::*;
    use super::*;

    fn sample() -> Node {
        program(vec![
            function(
                "values",
                vec![
                    assign_stmt("values", array(vec![int(1), int(2)])),
                    if_else(
                        variable("ready"),
                        vec![stmt(call("log", vec![string("a")]))],
                        Some(vec![ret(null())]),
                    ),
                    foreach(variable("items"), variable("item"), vec![stmt(variable("item"))]),
                    ret(binary(BinaryOp::Concat, variable("values"), string(""))),
                ],
            ),
            class(
                "Box",
                Modifiers::empty(),
                vec![
                    property("value", Modifiers::PRIVATE),
                    class_const("LIMIT", Modifiers::PUBLIC, int(10)),
                ],
            ),
        ])
    }

    #[test]
    fn test_child_matches_children() {
        let mut root = sample();
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            let children = node.children();
            for (index, child) in children.iter().enumerate() {
                assert_eq!(node.child(index), Some(*child));
            }
            assert_eq!(node.child(children.len()), None);
            stack.extend(children.into_iter().cloned());
        }

        // if: condition, then branch, else branch
        let branch = root.child_mut(0).and_then(|f| f.child_mut(1)).unwrap();
        assert_eq!(branch.child(0).unwrap().name(), Some("ready"));
        assert_eq!(branch.child(2).unwrap().kind(), NodeKind::Return);
        assert_eq!(branch.child_mut(2).unwrap().kind(), NodeKind::Return);
        assert!(branch.child_mut(3).is_none());
    }

    #[test]
    fn test_structural_equality_ignores_ids_and_spans() {
        let tree = SyntaxTree::new(sample());
        let fresh = sample().with_span(Span::new(0, 99, 1));

        assert_ne!(tree.root(), &fresh);
        assert!(tree.root().structurally_eq(&fresh));

        let mut renamed = sample();
        renamed.child_mut(1).unwrap().as_class_mut().unwrap().name = "Crate".to_string();
        assert!(!tree.root().structurally_eq(&renamed));
    }
}
