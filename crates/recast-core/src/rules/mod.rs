/*!
# Rule Catalogue

Concrete rewrite rules and the catalogue that assembles them into a rule set
for a configured target version.
*/

pub mod catalogue;
pub mod explicit_public_visibility;
pub mod privatize_final_class_property;
pub mod return_type_from_strict_new_array;


// Re-export commonly used rules
pub use catalogue::VersionGate;
pub use explicit_public_visibility::ExplicitPublicVisibility;
pub use privatize_final_class_property::PrivatizeFinalClassProperty;
pub use return_type_from_strict_new_array::ReturnTypeFromStrictNewArray;
