//! Safe cast evaluation.
//!
//! This is the only thing SharpPtr can execute. A cast looks up the literal
//! recorded for its source variable and converts it to the destination type.
//!
//! | from | to | result |
//! |--|--|--|
//! | any | `string` | the literal unchanged |
//! | `string` | `int` | the literal when it is a 32-bit integer |
//! | other | `int` | error |
//! | any | other | unsupported |

use crate::{ast::SafeCast, error::cast::CastError, registry::SymbolRegistry};

/// Type name used for variables that were never given one.
const UNKNOWN_TYPE: &str = "unknown";

/// Evaluate `cast` against the variables recorded in `registry`.
pub fn evaluate_safe_cast(cast: &SafeCast, registry: &SymbolRegistry) -> Result<String, CastError> {
	let variable = registry.variable(&cast.source).ok_or_else(|| CastError::NullVariable(cast.source.clone()))?;
	let from = variable.r#type.as_deref().unwrap_or(UNKNOWN_TYPE);

	match cast.target.as_str() {
		"string" => Ok(variable.value.clone()),
		"int" => match (from, variable.value.trim().parse::<i32>()) {
			("string", Ok(n)) => Ok(n.to_string()),
			_ => Err(CastError::InvalidConversion { from: from.to_string(), to: cast.target.clone() }),
		},
		_ => Err(CastError::Unsupported(cast.target.clone())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ast::VariableAssignment;

	fn registry(variables: &[(&str, &str, Option<&str>)]) -> SymbolRegistry {
		let mut registry = SymbolRegistry::new();
		for &(name, value, r#type) in variables {
			registry.add_variable(VariableAssignment {
				name:   name.into(),
				value:  value.into(),
				r#type: r#type.map(Into::into),
			});
		}
		registry
	}

	fn cast(source: &str, target: &str) -> SafeCast { SafeCast { source: source.into(), target: target.into() } }

	#[test]
	fn anything_to_string() {
		let registry = registry(&[("health", "100", Some("int")), ("speed", "1.5", None)]);
		assert_eq!(evaluate_safe_cast(&cast("health", "string"), &registry), Ok("100".to_string()));
		assert_eq!(evaluate_safe_cast(&cast("speed", "string"), &registry), Ok("1.5".to_string()));
	}

	#[test]
	fn string_to_int() {
		let registry = registry(&[("a", "42", Some("string")), ("b", "+7", Some("string")), ("c", "bob", Some("string"))]);
		assert_eq!(evaluate_safe_cast(&cast("a", "int"), &registry), Ok("42".to_string()));
		assert_eq!(evaluate_safe_cast(&cast("b", "int"), &registry), Ok("7".to_string()));
		assert_eq!(
			evaluate_safe_cast(&cast("c", "int"), &registry),
			Err(CastError::InvalidConversion { from: "string".into(), to: "int".into() })
		);
	}

	#[test]
	fn only_strings_become_int() {
		let registry = registry(&[("health", "100", Some("int")), ("raw", "5", None)]);
		let e = evaluate_safe_cast(&cast("health", "int"), &registry).unwrap_err();
		assert_eq!(e.to_string(), "Cannot cast int to int");
		let e = evaluate_safe_cast(&cast("raw", "int"), &registry).unwrap_err();
		assert_eq!(e.to_string(), "Cannot cast unknown to int");
	}

	#[test]
	fn unsupported_target() {
		let registry = registry(&[("health", "100", Some("int"))]);
		assert_eq!(evaluate_safe_cast(&cast("health", "bool"), &registry), Err(CastError::Unsupported("bool".into())));
	}

	#[test]
	fn missing_source() {
		let e = evaluate_safe_cast(&cast("ghost", "string"), &SymbolRegistry::new()).unwrap_err();
		assert_eq!(e, CastError::NullVariable("ghost".into()));
		assert_eq!(e.to_string(), "null variable 'ghost'");
	}
}
