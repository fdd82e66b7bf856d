/// Errors raised by the per-run symbol tables.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
	/// The call or cast key was already registered during this run.
	#[error("'{0}' already exists")]
	Duplicate(String),
}
