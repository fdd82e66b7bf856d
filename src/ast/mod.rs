//! SharpPtr has no expressions in the usual sense. Every construct is a
//! statement that either declares something (a variable, a class, a method,
//! the program entry) or uses something (a method call, a safe cast), so the
//! tree is a flat list of [`Node`]s with nested bodies for the block forms.

use std::fmt::Display;

/// A statement in the SharpPtr language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// `int x = 5` or, for an already declared name, `x = 5`.
	Variable(VariableAssignment),
	/// `player->jump(1, "high")`.
	MethodCall(MethodCall),
	/// `health -? string`.
	SafeCast(SafeCast),
	Class(ClassDefinition),
	Main(MainDefinition),
	Method(MethodDefinition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAssignment {
	pub name:   String,
	/// Literal text of the value, a number or a bare name.
	pub value:  String,
	/// Declared type, `None` for a reassignment.
	pub r#type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
	pub receiver:  String,
	pub method:    String,
	pub arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeCast {
	pub source: String,
	pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
	pub name: String,
	pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainDefinition {
	pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
	pub name:       String,
	pub parameters: Vec<Parameter>,
	pub body:       Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
	pub name:   String,
	pub r#type: Option<String>,
}

impl Node {
	/// Nested statements of a block form, empty for the others.
	pub fn body(&self) -> &[Node] {
		match self {
			Node::Class(class) => &class.body,
			Node::Main(main) => &main.body,
			Node::Method(method) => &method.body,
			Node::Variable(_) | Node::MethodCall(_) | Node::SafeCast(_) => &[],
		}
	}

	/// This node followed by every nested node, in source order.
	pub fn walk(&self) -> Vec<&Node> {
		let mut nodes = vec![self];
		for child in self.body() {
			nodes.extend(child.walk());
		}
		nodes
	}
}

impl Display for Node {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Node::Variable(variable) => write!(f, "{variable}"),
			Node::MethodCall(call) => write!(f, "{call}"),
			Node::SafeCast(cast) => write!(f, "{cast}"),
			Node::Class(ClassDefinition { name, body }) => write!(f, "class {name} {{ {} items }}", body.len()),
			Node::Main(MainDefinition { body }) => write!(f, "main {{ {} items }}", body.len()),
			Node::Method(MethodDefinition { name, parameters, body }) => write!(
				f,
				"method {name}({}) {{ {} items }}",
				parameters.iter().map(|p| p.to_string()).collect::<Vec<String>>().join(", "),
				body.len()
			),
		}
	}
}

impl Display for VariableAssignment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.r#type {
			Some(declared) => write!(f, "{declared} {} = {}", self.name, self.value),
			None => write!(f, "{} = {}", self.name, self.value),
		}
	}
}

impl Display for MethodCall {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}->{}({})", self.receiver, self.method, self.arguments.join(", "))
	}
}

impl Display for SafeCast {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}-?{}", self.source, self.target) }
}

impl Display for Parameter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.r#type {
			Some(declared) => write!(f, "{declared} {}", self.name),
			None => write!(f, "{}", self.name),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn variable(name: &str, value: &str, r#type: Option<&str>) -> Node {
		Node::Variable(VariableAssignment {
			name:   name.to_string(),
			value:  value.to_string(),
			r#type: r#type.map(str::to_string),
		})
	}

	#[test]
	fn display_leaves() {
		assert_eq!(variable("x", "5", Some("int")).to_string(), "int x = 5");
		assert_eq!(variable("x", "6", None).to_string(), "x = 6");

		let call = MethodCall { receiver: "player".into(), method: "jump".into(), arguments: vec![] };
		assert_eq!(call.to_string(), "player->jump()");
		let call = MethodCall { arguments: vec!["1".into(), "high".into()], ..call };
		assert_eq!(call.to_string(), "player->jump(1, high)");

		let cast = SafeCast { source: "health".into(), target: "string".into() };
		assert_eq!(cast.to_string(), "health-?string");
	}

	#[test]
	fn display_blocks() {
		let method = Node::Method(MethodDefinition {
			name:       "hit".into(),
			parameters: vec![Parameter { name: "amount".into(), r#type: Some("int".into()) }, Parameter {
				name:   "who".into(),
				r#type: None,
			}],
			body:       vec![variable("x", "1", Some("int"))],
		});
		assert_eq!(method.to_string(), "method hit(int amount, who) { 1 items }");

		let class = Node::Class(ClassDefinition { name: "Player".into(), body: vec![method.clone(), method] });
		assert_eq!(class.to_string(), "class Player { 2 items }");
		assert_eq!(Node::Main(MainDefinition { body: vec![] }).to_string(), "main { 0 items }");
	}

	#[test]
	fn walk_is_preorder() {
		let inner = Node::Method(MethodDefinition {
			name:       "f".into(),
			parameters: vec![],
			body:       vec![variable("b", "2", Some("int"))],
		});
		let class = Node::Class(ClassDefinition { name: "A".into(), body: vec![variable("a", "1", Some("int")), inner] });
		let rendered: Vec<String> = class.walk().iter().map(|node| node.to_string()).collect();
		assert_eq!(rendered, vec!["class A { 2 items }", "int a = 1", "method f() { 1 items }", "int b = 2"]);
	}
}
