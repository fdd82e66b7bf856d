use super::{Catalog, SymbolKind, SymbolRegistry};
use crate::{ast::Node, error::registry::RegistryError};

/// Applies the registration side effects of parsed nodes.
///
/// The parser hands every node it finishes to [`Binder::bind`], children
/// before the block that contains them.
pub struct Binder<'c> {
	registry: SymbolRegistry,
	catalog:  &'c mut Catalog,
}

impl<'c> Binder<'c> {
	pub fn new(catalog: &'c mut Catalog) -> Self { Self { registry: SymbolRegistry::new(), catalog } }

	pub fn bind(&mut self, node: &Node) -> Result<(), RegistryError> {
		tracing::trace!(%node, "bind");
		match node {
			Node::Variable(variable) => {
				let mut variable = variable.clone();
				// A reassignment keeps the type it was declared with.
				if variable.r#type.is_none() {
					variable.r#type = self.registry.variable(&variable.name).and_then(|v| v.r#type.clone());
				}
				self.catalog.add_variable(&variable.name, &variable.value, "parsed variable");
				self.registry.add_variable(variable);
			}
			Node::MethodCall(call) => {
				self.registry.add_call(call.clone())?;
				self.catalog.add_method(&call.receiver, &call.method, "parsed method call");
			}
			Node::SafeCast(cast) => {
				self.registry.add_cast(cast.clone())?;
				self.catalog.add_cast(&cast.source, &cast.target, "parsed safe cast");
			}
			Node::Class(class) => {
				self.catalog.register(&class.name, SymbolKind::Type, Some(node.clone()), "parsed class definition")
			}
			Node::Main(_) => self.catalog.register("main", SymbolKind::Method, Some(node.clone()), "main function"),
			Node::Method(method) => {
				self.catalog.register(&method.name, SymbolKind::Method, Some(node.clone()), "user-defined function")
			}
		}
		Ok(())
	}

	pub fn registry(&self) -> &SymbolRegistry { &self.registry }

	pub fn finish(self) -> SymbolRegistry { self.registry }
}
