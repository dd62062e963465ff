/*!
# Return Type From Strict New Array

Adds an `array` return type to a function, method or closure that builds a
local array from a literal and returns only that variable.
*/

use crate::ast::{KindSet, Node, NodeData, NodeKind};
use crate::config::LanguageVersion;
use crate::engine::{Outcome, Rule, RuleContext, RuleDefinition};
use crate::node_finder::NodeFinder;
use crate::node_name::NameResolver;
use crate::Result;

/// Infers `: array` from `$values = []; ... return $values;`
///
/// The rule gives up, leaving the node unchanged, when
/// - a return type is already declared, or there is no body
/// - no top-level statement assigns an array literal to a variable
/// - the function yields
/// - there is not exactly one return in the function's own scope
/// - that return does not return the variable
/// - any assignment in scope gives the variable a non-array value
pub struct ReturnTypeFromStrictNewArray;

impl ReturnTypeFromStrictNewArray {
    pub const NAME: &'static str = "return_type_from_strict_new_array";
}

impl Rule for ReturnTypeFromStrictNewArray {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn definition(&self) -> RuleDefinition {
        RuleDefinition {
            description: "Add strict return array type based on created empty array and returned",
            before: "final class SomeClass
{
    public function run()
    {
        $values = [];

        return $values;
    }
}",
            after: "final class SomeClass
{
    public function run(): array
    {
        $values = [];

        return $values;
    }
}",
        }
    }

    fn applicable_kinds(&self) -> KindSet {
        KindSet::FUNCTION_LIKE
    }

    fn min_version(&self) -> Option<LanguageVersion> {
        Some(LanguageVersion::PHP_70)
    }

    fn apply(&self, node: &Node, _ctx: &RuleContext<'_>) -> Result<Outcome> {
        if node.return_type().is_some() {
            return Ok(Outcome::Unchanged);
        }
        let Some(body) = node.body() else {
            return Ok(Outcome::Unchanged);
        };
        let Some(variable) = array_assigned_variable(body) else {
            return Ok(Outcome::Unchanged);
        };

        // generators never return the array itself
        if NodeFinder::has_scoped(node, KindSet::YIELD) {
            return Ok(Outcome::Unchanged);
        }

        let returns: Vec<&Node> = NodeFinder::find_scoped(node, KindSet::RETURN).collect();
        let [only_return] = returns.as_slice() else {
            return Ok(Outcome::Unchanged);
        };

        let returns_variable = only_return.child(0).is_some_and(|expr| {
            expr.kind() == NodeKind::Variable && NameResolver::are_names_equal(expr, variable)
        });
        if !returns_variable || is_overridden_with_non_array(node, variable) {
            return Ok(Outcome::Unchanged);
        }

        let mut typed = node.clone();
        if !typed.set_return_type("array") {
            return Ok(Outcome::Unchanged);
        }
        Ok(Outcome::Replace(typed))
    }
}

/// First top-level `$var = [...];` statement's variable
fn array_assigned_variable(body: &[Node]) -> Option<&Node> {
    body.iter().find_map(|stmt| {
        let NodeData::Expression { expr } = &stmt.data else {
            return None;
        };
        let NodeData::Assign { var, expr: value } = &expr.data else {
            return None;
        };
        (var.kind() == NodeKind::Variable && value.kind() == NodeKind::Array)
            .then_some(var.as_ref())
    })
}

/// Any assignment in scope, before or after the return, counts
fn is_overridden_with_non_array(function: &Node, variable: &Node) -> bool {
    NodeFinder::find_scoped(function, KindSet::ASSIGN).any(|assign| match &assign.data {
        NodeData::Assign { var, expr } => {
            var.kind() == NodeKind::Variable
                && NameResolver::are_names_equal(var, variable)
                && expr.kind() != NodeKind::Array
        }
        _ => false,
    })
}
