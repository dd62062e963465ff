/*!
# Rewrite Engine

Rule contract and the fixed-point engine that applies rules to one tree.

## Example Usage

```rust
use recast_core::ast::{build::*, SyntaxTree};
use recast_core::engine::Engine;
use recast_core::rules::ReturnTypeFromStrictNewArray;

let mut tree = SyntaxTree::new(program(vec![function(
    "values",
    vec![assign_stmt("values", empty_array()), ret(variable("values"))],
)]));

let mut engine = Engine::new().max_passes(10);
engine.add_rule(ReturnTypeFromStrictNewArray);
let summary = engine.run(&mut tree)?;

assert_eq!(summary.passes, 2);
assert_eq!(tree.get(&[0]).unwrap().return_type(), Some("array"));
# Ok::<(), recast_core::RewriteError>(())
```
*/

pub mod fixed_point;
pub mod rule;


pub use fixed_point::{Engine, PassReport, PassState, Registration, RunSummary};
pub use rule::{FnRule, Outcome, Rule, RuleContext, RuleDefinition, RuleStats};
