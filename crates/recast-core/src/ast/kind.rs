// Node kinds and kind sets.
// Rules declare the kinds they apply to as a `KindSet`; the engine and the
// modifier manipulator check node kinds against these sets.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Fieldless tag of a [`NodeData`](super::NodeData) variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    Class,
    Method,
    Property,
    ClassConst,
    Function,
    Closure,
    Expression,
    Return,
    If,
    Foreach,
    Assign,
    Variable,
    Array,
    Yield,
    Call,
    BinaryOp,
    Scalar,
}

impl NodeKind {
    pub const ALL: [NodeKind; 18] = [
        NodeKind::Program,
        NodeKind::Class,
        NodeKind::Method,
        NodeKind::Property,
        NodeKind::ClassConst,
        NodeKind::Function,
        NodeKind::Closure,
        NodeKind::Expression,
        NodeKind::Return,
        NodeKind::If,
        NodeKind::Foreach,
        NodeKind::Assign,
        NodeKind::Variable,
        NodeKind::Array,
        NodeKind::Yield,
        NodeKind::Call,
        NodeKind::BinaryOp,
        NodeKind::Scalar,
    ];

    /// The single-kind set for this kind
    pub fn bit(self) -> KindSet {
        match self {
            NodeKind::Program => KindSet::PROGRAM,
            NodeKind::Class => KindSet::CLASS,
            NodeKind::Method => KindSet::METHOD,
            NodeKind::Property => KindSet::PROPERTY,
            NodeKind::ClassConst => KindSet::CLASS_CONST,
            NodeKind::Function => KindSet::FUNCTION,
            NodeKind::Closure => KindSet::CLOSURE,
            NodeKind::Expression => KindSet::EXPRESSION_STMT,
            NodeKind::Return => KindSet::RETURN,
            NodeKind::If => KindSet::IF,
            NodeKind::Foreach => KindSet::FOREACH,
            NodeKind::Assign => KindSet::ASSIGN,
            NodeKind::Variable => KindSet::VARIABLE,
            NodeKind::Array => KindSet::ARRAY,
            NodeKind::Yield => KindSet::YIELD,
            NodeKind::Call => KindSet::CALL,
            NodeKind::BinaryOp => KindSet::BINARY_OP,
            NodeKind::Scalar => KindSet::SCALAR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Class => "Class",
            NodeKind::Method => "Method",
            NodeKind::Property => "Property",
            NodeKind::ClassConst => "ClassConst",
            NodeKind::Function => "Function",
            NodeKind::Closure => "Closure",
            NodeKind::Expression => "Expression",
            NodeKind::Return => "Return",
            NodeKind::If => "If",
            NodeKind::Foreach => "Foreach",
            NodeKind::Assign => "Assign",
            NodeKind::Variable => "Variable",
            NodeKind::Array => "Array",
            NodeKind::Yield => "Yield",
            NodeKind::Call => "Call",
            NodeKind::BinaryOp => "BinaryOp",
            NodeKind::Scalar => "Scalar",
        }
    }

    /// Function, method or closure: the kinds that open a new variable scope
    pub fn is_function_like(self) -> bool {
        KindSet::FUNCTION_LIKE.contains(self.bit())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A finite set of node kinds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KindSet: u32 {
        const PROGRAM = 1 << 0;
        const CLASS = 1 << 1;
        const METHOD = 1 << 2;
        const PROPERTY = 1 << 3;
        const CLASS_CONST = 1 << 4;
        const FUNCTION = 1 << 5;
        const CLOSURE = 1 << 6;
        const EXPRESSION_STMT = 1 << 7;
        const RETURN = 1 << 8;
        const IF = 1 << 9;
        const FOREACH = 1 << 10;
        const ASSIGN = 1 << 11;
        const VARIABLE = 1 << 12;
        const ARRAY = 1 << 13;
        const YIELD = 1 << 14;
        const CALL = 1 << 15;
        const BINARY_OP = 1 << 16;
        const SCALAR = 1 << 17;
    }
}

impl KindSet {
    pub const FUNCTION_LIKE: KindSet = KindSet::FUNCTION
        .union(KindSet::METHOD)
        .union(KindSet::CLOSURE);

    pub const CLASS_LIKE: KindSet = KindSet::CLASS;

    pub const STATEMENT: KindSet = KindSet::CLASS
        .union(KindSet::FUNCTION)
        .union(KindSet::EXPRESSION_STMT)
        .union(KindSet::RETURN)
        .union(KindSet::IF)
        .union(KindSet::FOREACH);

    pub const EXPRESSION: KindSet = KindSet::CLOSURE
        .union(KindSet::ASSIGN)
        .union(KindSet::VARIABLE)
        .union(KindSet::ARRAY)
        .union(KindSet::YIELD)
        .union(KindSet::CALL)
        .union(KindSet::BINARY_OP)
        .union(KindSet::SCALAR);

    pub fn of(kinds: &[NodeKind]) -> Self {
        kinds
            .iter()
            .fold(KindSet::empty(), |set, kind| set | kind.bit())
    }

    pub fn contains_kind(self, kind: NodeKind) -> bool {
        self.contains(kind.bit())
    }

    /// Member kinds in declaration order
    pub fn kinds(self) -> impl Iterator<Item = NodeKind> {
        NodeKind::ALL
            .into_iter()
            .filter(move |kind| self.contains_kind(*kind))
    }
}

impl From<NodeKind> for KindSet {
    fn from(kind: NodeKind) -> Self {
        kind.bit()
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds().map(NodeKind::name).collect();
        write!(f, "{}", names.join(", "))
    }
}
