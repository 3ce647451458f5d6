//! Interface metadata for WebAssembly extensions.
//!
//! An interface is the host's side of the contract with a plugin: the
//! functions the host expects the component to export. A component built
//! against an older or newer version of the interface may not match it, which
//! surfaces at call time as a [`FaultKind::Linkage`]( crate::FaultKind::Linkage ) failure.

use std::collections::HashMap ;



/// A single WIT interface the host expects an extension to export.
///
/// Note that interfaces don't have a name field; their full paths (e.g.
/// `my:package/example`) are provided as keys of the map passed to
/// [`WasmPlugin::new`]( crate::wasm::WasmPlugin::new ). This prevents duplicates.
#[derive( Debug, Clone, Default )]
pub struct Interface {
	/// Functions exported by this interface, keyed by WIT name
	functions: HashMap<String, Function>,
}

impl Interface {

	/// Creates a new interface declaration.
	pub fn new( functions: HashMap<String, Function> ) -> Self {
		Self { functions }
	}

	/// Functions exported by this interface.
	#[inline] pub fn functions( &self ) -> &HashMap<String, Function> { &self.functions }

	/// Looks up a function by its WIT name.
	#[inline] pub fn function( &self, name: &str ) -> Option<&Function> { self.functions.get( name ) }

}

/// Metadata about a function declared by an interface.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct Function {
	return_kind: ReturnKind,
}

impl Function {

	/// Creates a new function metadata entry.
	pub fn new( return_kind: ReturnKind ) -> Self {
		Self { return_kind }
	}

	/// How the function's result is handled.
	#[inline] pub fn return_kind( &self ) -> ReturnKind { self.return_kind }

}

/// Whether a function produces a result.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum ReturnKind {
	/// Function returns nothing (void).
	#[default] Void,
	/// Function returns a single value.
	Value,
}

impl std::fmt::Display for ReturnKind {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
		match self {
			Self::Void => write!( f, "Function returns no data" ),
			Self::Value => write!( f, "Function returns a value" ),
		}
	}
}
