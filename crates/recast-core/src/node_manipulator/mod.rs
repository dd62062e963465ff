/*!
# Visibility Manipulator

Every legal change to a node's modifier bitfield goes through here. Each
operation checks the node kind against its permitted set before touching the
bits, so a rule that calls it on the wrong node fails loudly instead of
producing a tree the printer cannot express.

| Operation | Permitted kinds |
|---|---|
| `make_static` / `make_non_static` | Method, Property |
| `make_abstract` | Method, Class |
| `make_final` / `make_non_final` | Method, Class |
| `remove_visibility` | Method, Property, ClassConst |
| `change_visibility` (and `make_public` / `make_protected` / `make_private`) | Method, Property, ClassConst |
| `remove_final` | Class (by type) |

A node never carries more than one of `PUBLIC`, `PROTECTED`, `PRIVATE`.
Changing visibility keeps `STATIC` when the node had it.
*/

use crate::ast::{ClassDecl, KindSet, Modifiers, Node, NodeKind};


const STATIC_KINDS: KindSet = KindSet::METHOD.union(KindSet::PROPERTY);
const ABSTRACT_KINDS: KindSet = KindSet::METHOD.union(KindSet::CLASS);
const FINAL_KINDS: KindSet = KindSet::METHOD.union(KindSet::CLASS);
const VISIBILITY_KINDS: KindSet = KindSet::METHOD
    .union(KindSet::PROPERTY)
    .union(KindSet::CLASS_CONST);

/// Bits `change_visibility` accepts as a target
const VISIBILITY_TARGETS: [Modifiers; 6] = [
    Modifiers::PUBLIC,
    Modifiers::PROTECTED,
    Modifiers::PRIVATE,
    Modifiers::STATIC,
    Modifiers::ABSTRACT,
    Modifiers::FINAL,
];

/// Misuse of a modifier operation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModifierError {
    /// The node kind is outside the operation's permitted set
    #[error("\"{operation}\" only accepts {allowed} nodes, {given} given")]
    InvalidNodeKind {
        operation: &'static str,
        allowed: KindSet,
        given: NodeKind,
    },

    /// `change_visibility` target is not a single known modifier bit
    #[error("\"{operation}\" expects one of public, protected, private, static, abstract or final, {value:?} given")]
    InvalidArgument {
        operation: &'static str,
        value: Modifiers,
    },
}

pub type ModifierResult<T> = std::result::Result<T, ModifierError>;

/// Typed operations on node modifier bitfields
pub struct VisibilityManipulator;

impl VisibilityManipulator {
    pub fn make_static(node: &mut Node) -> ModifierResult<()> {
        Self::add_flag(node, STATIC_KINDS, Modifiers::STATIC, "make_static")
    }

    pub fn make_non_static(node: &mut Node) -> ModifierResult<()> {
        let flags = guarded(node, STATIC_KINDS, "make_non_static")?;
        flags.remove(Modifiers::STATIC);
        Ok(())
    }

    pub fn make_abstract(node: &mut Node) -> ModifierResult<()> {
        Self::add_flag(node, ABSTRACT_KINDS, Modifiers::ABSTRACT, "make_abstract")
    }

    pub fn make_final(node: &mut Node) -> ModifierResult<()> {
        Self::add_flag(node, FINAL_KINDS, Modifiers::FINAL, "make_final")
    }

    pub fn make_non_final(node: &mut Node) -> ModifierResult<()> {
        let flags = guarded(node, FINAL_KINDS, "make_non_final")?;
        flags.remove(Modifiers::FINAL);
        Ok(())
    }

    /// Clears the visibility bit; `abstract`, `static` and `final` are kept
    pub fn remove_visibility(node: &mut Node) -> ModifierResult<()> {
        let flags = guarded(node, VISIBILITY_KINDS, "remove_visibility")?;
        if flags.is_empty() {
            return Ok(());
        }
        flags.remove(Modifiers::VISIBILITY);
        Ok(())
    }

    /// Sets `visibility` on the node.
    ///
    /// A plain visibility target replaces the current visibility bit; the
    /// other targets are added alongside it. `STATIC` survives either way.
    pub fn change_visibility(node: &mut Node, visibility: Modifiers) -> ModifierResult<()> {
        const OPERATION: &str = "change_visibility";

        if !VISIBILITY_TARGETS.contains(&visibility) {
            return Err(ModifierError::InvalidArgument {
                operation: OPERATION,
                value: visibility,
            });
        }

        let flags = guarded(node, VISIBILITY_KINDS, OPERATION)?;
        let was_static = flags.is_static();
        let is_plain_visibility = Modifiers::VISIBILITY.contains(visibility);

        if is_plain_visibility {
            flags.remove(Modifiers::VISIBILITY);
        }
        flags.insert(visibility);
        if is_plain_visibility && was_static {
            flags.insert(Modifiers::STATIC);
        }
        Ok(())
    }

    pub fn make_public(node: &mut Node) -> ModifierResult<()> {
        Self::change_visibility(node, Modifiers::PUBLIC)
    }

    pub fn make_protected(node: &mut Node) -> ModifierResult<()> {
        Self::change_visibility(node, Modifiers::PROTECTED)
    }

    pub fn make_private(node: &mut Node) -> ModifierResult<()> {
        Self::change_visibility(node, Modifiers::PRIVATE)
    }

    /// Allows the class to be extended again
    pub fn remove_final(class: &mut ClassDecl) {
        class.flags.remove(Modifiers::FINAL);
    }

    fn add_flag(
        node: &mut Node,
        allowed: KindSet,
        flag: Modifiers,
        operation: &'static str,
    ) -> ModifierResult<()> {
        guarded(node, allowed, operation)?.insert(flag);
        Ok(())
    }
}

/// Checks `node` against the permitted kinds and hands out its bitfield
fn guarded<'a>(
    node: &'a mut Node,
    allowed: KindSet,
    operation: &'static str,
) -> ModifierResult<&'a mut Modifiers> {
    let given = node.kind();
    let invalid = ModifierError::InvalidNodeKind {
        operation,
        allowed,
        given,
    };
    if !allowed.contains_kind(given) {
        return Err(invalid);
    }
    node.modifiers_mut().ok_or(invalid)
}
