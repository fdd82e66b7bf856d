use std::{
	collections::{BTreeMap, HashMap},
	fmt::Display,
};

use crate::ast::{MethodCall, Node, SafeCast, VariableAssignment};

/// What a catalog name stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
	Variable,
	Method,
	Type,
	Keyword,
	Operator,
	Builtin,
	Custom,
}

impl Display for SymbolKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{self:?}") }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
	pub kind:        SymbolKind,
	/// A copy of the node that introduced the name, builtins have none.
	pub definition:  Option<Node>,
	pub description: String,
	/// Builtins survive [`Catalog::remove`] and [`Catalog::clear`].
	pub builtin:     bool,
}

impl Display for CatalogEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.definition {
			Some(definition) => write!(f, "[{}] {definition} - {}", self.kind, self.description),
			None => write!(f, "[{}] - {}", self.kind, self.description),
		}
	}
}

/// Every name the front-end knows about, across parse runs.
///
/// Seeded with the builtin keyword `null` and the builtin types `void`, `int`,
/// `string` and `bool`. Registering an existing name overwrites it, but a
/// builtin stays builtin.
#[derive(Debug, Clone)]
pub struct Catalog {
	entries: BTreeMap<String, CatalogEntry>,
	tags:    HashMap<String, Vec<String>>,
}

const BUILTINS: [(&str, SymbolKind, &str); 5] = [
	("null", SymbolKind::Keyword, "null value"),
	("void", SymbolKind::Type, "void type"),
	("int", SymbolKind::Type, "integer type"),
	("string", SymbolKind::Type, "string type"),
	("bool", SymbolKind::Type, "boolean type"),
];

impl Default for Catalog {
	fn default() -> Self { Self::new() }
}

impl Catalog {
	pub fn new() -> Self {
		let entries = BUILTINS
			.iter()
			.map(|&(name, kind, description)| {
				(name.to_string(), CatalogEntry { kind, definition: None, description: description.to_string(), builtin: true })
			})
			.collect();
		Self { entries, tags: HashMap::new() }
	}

	/// Add or overwrite `name`.
	pub fn register(&mut self, name: &str, kind: SymbolKind, definition: Option<Node>, description: &str) {
		let builtin = self.entries.get(name).is_some_and(|entry| entry.builtin);
		if builtin {
			tracing::debug!(name, "overwriting builtin catalog entry");
		}
		self.entries
			.insert(name.to_string(), CatalogEntry { kind, definition, description: description.to_string(), builtin });
	}

	/// Register `receiver.method` as a method.
	pub fn add_method(&mut self, receiver: &str, method: &str, description: &str) {
		let call = MethodCall { receiver: receiver.to_string(), method: method.to_string(), arguments: Vec::new() };
		self.register(&format!("{receiver}.{method}"), SymbolKind::Method, Some(Node::MethodCall(call)), description);
	}

	/// Register the `source` to `target` conversion as a type entry.
	pub fn add_cast(&mut self, source: &str, target: &str, description: &str) {
		let cast = SafeCast { source: source.to_string(), target: target.to_string() };
		self.register(&format!("{source}_to_{target}"), SymbolKind::Type, Some(Node::SafeCast(cast)), description);
	}

	pub fn add_variable(&mut self, name: &str, value: &str, description: &str) {
		let variable = VariableAssignment { name: name.to_string(), value: value.to_string(), r#type: None };
		self.register(name, SymbolKind::Variable, Some(Node::Variable(variable)), description);
	}

	pub fn get(&self, name: &str) -> Option<&CatalogEntry> { self.entries.get(name) }

	pub fn definition(&self, name: &str) -> Option<&Node> { self.get(name)?.definition.as_ref() }

	pub fn contains(&self, name: &str) -> bool { self.entries.contains_key(name) }

	/// Remove a non-builtin entry, returns whether anything was removed.
	pub fn remove(&mut self, name: &str) -> bool {
		match self.entries.get(name) {
			Some(entry) if !entry.builtin => {
				self.entries.remove(name);
				true
			}
			_ => false,
		}
	}

	/// File `name` under `tag`, once.
	pub fn tag(&mut self, name: &str, tag: &str) {
		let names = self.tags.entry(tag.to_string()).or_default();
		if !names.iter().any(|existing| existing == name) {
			names.push(name.to_string());
		}
	}

	/// Names filed under `tag`, in the order they were tagged.
	pub fn tagged(&self, tag: &str) -> &[String] { self.tags.get(tag).map(Vec::as_slice).unwrap_or_default() }

	pub fn by_kind(&self, kind: SymbolKind) -> Vec<(&str, &CatalogEntry)> {
		self.iter().filter(|(_, entry)| entry.kind == kind).collect()
	}

	/// All entries, ordered by name.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
		self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
	}

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }

	/// Forget everything except the builtins. Tags are always dropped.
	pub fn clear(&mut self) {
		self.entries.retain(|_, entry| entry.builtin);
		self.tags.clear();
	}
}

impl Display for Catalog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (name, entry) in self.iter() {
			let marker = if entry.builtin { "[builtin]" } else { "[mine]" };
			writeln!(f, "{marker} {name}: {entry}")?;
		}

		if !self.tags.is_empty() {
			let mut tags: Vec<_> = self.tags.iter().collect();
			tags.sort_by(|a, b| a.0.cmp(b.0));
			writeln!(f, "\n=== tags ===")?;
			for (tag, names) in tags {
				writeln!(f, "#{tag}: {}", names.join(", "))?;
			}
		}
		Ok(())
	}
}
