/*!
# Privatize Final Class Property

A final class that extends nothing has no subclass or parent that could read
its protected properties, so they can be private.
*/

use crate::ast::{KindSet, Modifiers, Node};
use crate::engine::{Outcome, Rule, RuleContext, RuleDefinition};
use crate::node_manipulator::VisibilityManipulator;
use crate::Result;

pub struct PrivatizeFinalClassProperty;

impl PrivatizeFinalClassProperty {
    pub const NAME: &'static str = "privatize_final_class_property";
}

impl Rule for PrivatizeFinalClassProperty {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn definition(&self) -> RuleDefinition {
        RuleDefinition {
            description: "Change property to private if possible",
            before: "final class SomeClass
{
    protected $value;
}",
            after: "final class SomeClass
{
    private $value;
}",
        }
    }

    fn applicable_kinds(&self) -> KindSet {
        KindSet::PROPERTY
    }

    fn apply(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Outcome> {
        let is_protected = node
            .modifiers()
            .is_some_and(|flags| flags.contains(Modifiers::PROTECTED));
        if !is_protected {
            return Ok(Outcome::Unchanged);
        }

        let closed_class = ctx
            .parent()
            .and_then(Node::as_class)
            .is_some_and(|class| class.flags.is_final() && class.extends.is_none());
        if !closed_class {
            return Ok(Outcome::Unchanged);
        }

        let mut private = node.clone();
        VisibilityManipulator::make_private(&mut private)?;
        Ok(Outcome::Replace(private))
    }
}
