//! Static extension metadata.
//!
//! Every extension a plugin supplies describes itself through an
//! [`ExtensionDescriptor`]: the capability interfaces it implements and the
//! thread its methods expect to be called on.

use nonempty_collections::NEVec ;



/// The thread an extension expects its methods to be dispatched on.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug, Default )]
pub enum DispatchThread {
	/// Methods may be called from any thread.
	#[default] Any,
	/// Methods must be called on the designated UI thread.
	Ui,
}

impl std::fmt::Display for DispatchThread {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match self {
			Self::Any => write!( f, "any thread" ),
			Self::Ui => write!( f, "UI thread" ),
		}
	}
}

/// Metadata declared by an extension.
///
/// An extension always implements at least one capability interface, which is
/// why the capability list is non-empty.
#[derive( Debug, Clone )]
pub struct ExtensionDescriptor {
	/// Names of the capability interfaces this extension implements
	capabilities: NEVec<String>,
	/// Thread affinity of the extension's methods
	dispatch_thread: DispatchThread,
}

impl ExtensionDescriptor {

	/// Creates a descriptor with [`DispatchThread::Any`] affinity.
	pub fn new( capabilities: NEVec<String> ) -> Self {
		Self { capabilities, dispatch_thread: DispatchThread::Any }
	}

	/// Sets the dispatch thread affinity.
	pub fn with_dispatch_thread( mut self, dispatch_thread: DispatchThread ) -> Self {
		self.dispatch_thread = dispatch_thread ;
		self
	}

	/// Capability interfaces this extension implements.
	#[inline] pub fn capabilities( &self ) -> &NEVec<String> { &self.capabilities }

	/// Thread affinity of the extension's methods.
	#[inline] pub fn dispatch_thread( &self ) -> DispatchThread { self.dispatch_thread }

	/// Whether this extension implements `capability`.
	pub fn implements( &self, capability: &str ) -> bool {
		IntoIterator::into_iter( &self.capabilities ).any(| name | name == capability )
	}

}

/// A plugin-supplied object implementing one or more host capability interfaces.
///
/// Capability interfaces are ordinary traits defined by the host. Calls into them
/// are routed through an [`ExtensionProxy`]( crate::ExtensionProxy ) so that thread
/// affinity and incompatibility faults are handled in one place.
///
/// ```
/// use nonempty_collections::nev ;
/// use extension_proxy::{ DispatchThread, Extension, ExtensionDescriptor };
///
/// struct StatusBadge { descriptor: ExtensionDescriptor }
///
/// impl Extension for StatusBadge {
/// 	fn descriptor( &self ) -> &ExtensionDescriptor { &self.descriptor }
/// }
///
/// let badge = StatusBadge {
/// 	descriptor: ExtensionDescriptor::new( nev![ "badge".to_string() ])
/// 		.with_dispatch_thread( DispatchThread::Ui ),
/// };
/// assert!( badge.descriptor().implements( "badge" ));
/// ```
pub trait Extension: Send + Sync {
	/// Returns the static metadata of this extension.
	fn descriptor( &self ) -> &ExtensionDescriptor ;
}
