//! Symbol tables filled while parsing.
//!
//! A [`SymbolRegistry`] lives for one parse run and answers "was this declared
//! in the source I just read?". The [`Catalog`] outlives runs and holds every
//! name the front-end has ever seen plus the builtin types and keywords. The
//! [`Binder`] is the one place that writes to both.

mod binder;
pub mod catalog;

use std::{collections::BTreeMap, fmt::Display};

pub use binder::Binder;
pub use catalog::{Catalog, CatalogEntry, SymbolKind};

use crate::{
	ast::{MethodCall, SafeCast, VariableAssignment},
	error::registry::RegistryError,
};

/// Declarations and usages seen during a single parse run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolRegistry {
	/// Keyed by `receiver.method`
	calls:     BTreeMap<String, MethodCall>,
	/// Keyed by `source->target`
	casts:     BTreeMap<String, SafeCast>,
	/// Keyed by variable name
	variables: BTreeMap<String, VariableAssignment>,
}

impl SymbolRegistry {
	pub fn new() -> Self { Self::default() }

	pub fn call_key(call: &MethodCall) -> String { format!("{}.{}", call.receiver, call.method) }

	pub fn cast_key(cast: &SafeCast) -> String { format!("{}->{}", cast.source, cast.target) }

	/// Record a method call, each `receiver.method` pair may appear once per run.
	pub fn add_call(&mut self, call: MethodCall) -> Result<(), RegistryError> {
		let key = Self::call_key(&call);
		if self.calls.contains_key(&key) {
			return Err(RegistryError::Duplicate(key));
		}
		self.calls.insert(key, call);
		Ok(())
	}

	/// Record a safe cast, each `source->target` pair may appear once per run.
	pub fn add_cast(&mut self, cast: SafeCast) -> Result<(), RegistryError> {
		let key = Self::cast_key(&cast);
		if self.casts.contains_key(&key) {
			return Err(RegistryError::Duplicate(key));
		}
		self.casts.insert(key, cast);
		Ok(())
	}

	/// A variable statement doesn’t just define a new variable, it can also be
	/// used to redefine an existing one. The last assignment wins.
	pub fn add_variable(&mut self, variable: VariableAssignment) {
		self.variables.insert(variable.name.clone(), variable);
	}

	pub fn call(&self, key: &str) -> Option<&MethodCall> { self.calls.get(key) }

	pub fn cast(&self, key: &str) -> Option<&SafeCast> { self.casts.get(key) }

	pub fn variable(&self, name: &str) -> Option<&VariableAssignment> { self.variables.get(name) }

	pub fn contains_variable(&self, name: &str) -> bool { self.variables.contains_key(name) }

	pub fn calls(&self) -> impl Iterator<Item = &MethodCall> { self.calls.values() }

	pub fn casts(&self) -> impl Iterator<Item = &SafeCast> { self.casts.values() }

	pub fn variables(&self) -> impl Iterator<Item = &VariableAssignment> { self.variables.values() }

	pub fn len(&self) -> usize { self.calls.len() + self.casts.len() + self.variables.len() }

	pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Display for SymbolRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for call in self.calls() {
			writeln!(f, "  method: {call}")?;
		}
		for cast in self.casts() {
			writeln!(f, "  cast: {cast}")?;
		}
		for variable in self.variables() {
			writeln!(f, "  var: {variable}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn call(receiver: &str, method: &str) -> MethodCall {
		MethodCall { receiver: receiver.into(), method: method.into(), arguments: vec![] }
	}

	fn variable(name: &str, value: &str) -> VariableAssignment {
		VariableAssignment { name: name.into(), value: value.into(), r#type: Some("int".into()) }
	}

	#[test]
	fn duplicate_call_is_rejected() {
		let mut registry = SymbolRegistry::new();
		registry.add_call(call("player", "jump")).unwrap();
		registry.add_call(call("player", "run")).unwrap();
		assert_eq!(registry.add_call(call("player", "jump")), Err(RegistryError::Duplicate("player.jump".into())));
		assert!(registry.call("player.jump").is_some());
		assert_eq!(registry.calls().count(), 2);
	}

	#[test]
	fn duplicate_cast_is_rejected() {
		let mut registry = SymbolRegistry::new();
		let cast = SafeCast { source: "hp".into(), target: "string".into() };
		registry.add_cast(cast.clone()).unwrap();
		assert_eq!(registry.add_cast(cast), Err(RegistryError::Duplicate("hp->string".into())));
		assert!(registry.cast("hp->string").is_some());
	}

	#[test]
	fn last_variable_wins() {
		let mut registry = SymbolRegistry::new();
		registry.add_variable(variable("x", "1"));
		registry.add_variable(variable("x", "2"));
		assert_eq!(registry.variable("x").map(|v| v.value.as_str()), Some("2"));
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn dump() {
		let mut registry = SymbolRegistry::new();
		assert!(registry.is_empty());
		registry.add_call(MethodCall { arguments: vec!["1".into()], ..call("p", "hit") }).unwrap();
		registry.add_cast(SafeCast { source: "x".into(), target: "string".into() }).unwrap();
		registry.add_variable(variable("x", "5"));
		assert_eq!(registry.to_string(), "  method: p->hit(1)\n  cast: x-?string\n  var: int x = 5\n");
	}
}
