/*!
# Explicit Public Visibility

Members declared without a visibility keyword are public; this rule spells
the keyword out.
*/

use crate::ast::{KindSet, Node, NodeKind};
use crate::config::LanguageVersion;
use crate::engine::{Outcome, Rule, RuleContext, RuleDefinition};
use crate::node_manipulator::VisibilityManipulator;
use crate::Result;

/// Adds `public` to methods, properties and class constants that lack a
/// visibility. Constants only accept a visibility from 7.1 on, so they are
/// left alone for older targets.
pub struct ExplicitPublicVisibility {
    target: LanguageVersion,
}

impl ExplicitPublicVisibility {
    pub const NAME: &'static str = "explicit_public_visibility";

    pub fn new(target: LanguageVersion) -> Self {
        Self { target }
    }

    fn handles_constants(&self) -> bool {
        self.target >= LanguageVersion::PHP_71
    }
}

impl Default for ExplicitPublicVisibility {
    fn default() -> Self {
        Self::new(LanguageVersion::default())
    }
}

impl Rule for ExplicitPublicVisibility {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn definition(&self) -> RuleDefinition {
        RuleDefinition {
            description: "Add explicit public visibility to class members without one",
            before: "class SomeClass
{
    const LIMIT = 10;

    var $items;

    static function create()
    {
    }
}",
            after: "class SomeClass
{
    public const LIMIT = 10;

    public $items;

    public static function create()
    {
    }
}",
        }
    }

    fn applicable_kinds(&self) -> KindSet {
        KindSet::METHOD | KindSet::PROPERTY | KindSet::CLASS_CONST
    }

    fn apply(&self, node: &Node, _ctx: &RuleContext<'_>) -> Result<Outcome> {
        if node.kind() == NodeKind::ClassConst && !self.handles_constants() {
            return Ok(Outcome::Unchanged);
        }
        let Some(flags) = node.modifiers() else {
            return Ok(Outcome::Unchanged);
        };
        if !flags.visibility().is_empty() {
            return Ok(Outcome::Unchanged);
        }

        let mut public = node.clone();
        VisibilityManipulator::make_public(&mut public)?;
        Ok(Outcome::Replace(public))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::ast::{Modifiers, SyntaxTree, ToSource};
    use crate::engine::Engine;

    fn members() -> Node {
        class(
            "SomeClass",
            Modifiers::empty(),
            vec![
                class_const("LIMIT", Modifiers::empty(), int(10)),
                property("items", Modifiers::empty()),
                method("create", Modifiers::STATIC, vec![]),
                method("hidden", Modifiers::PRIVATE, vec![]),
            ],
        )
    }

    #[test]
    fn test_members_become_public() -> anyhow::Result<()> {
        let mut tree = SyntaxTree::new(program(vec![members()]));
        let mut engine = Engine::new();
        engine.add_rule(ExplicitPublicVisibility::new(LanguageVersion::PHP_74));
        let summary = engine.run(&mut tree)?;

        assert_eq!(summary.mutations, 3);
        let source = tree.to_source();
        assert!(source.contains("public const LIMIT = 10;"));
        assert!(source.contains("public $items;"));
        assert!(source.contains("public static function create()"));
        assert!(source.contains("private function hidden()"));
        Ok(())
    }

    #[test]
    fn test_constants_wait_for_7_1() -> anyhow::Result<()> {
        let mut tree = SyntaxTree::new(program(vec![members()]));
        let mut engine = Engine::new();
        engine.add_rule(ExplicitPublicVisibility::new(LanguageVersion::PHP_70));
        engine.run(&mut tree)?;

        assert_eq!(tree.get(&[0, 0]).unwrap().modifiers(), Some(Modifiers::empty()));
        assert_eq!(tree.get(&[0, 1]).unwrap().modifiers(), Some(Modifiers::PUBLIC));
        Ok(())
    }
}
