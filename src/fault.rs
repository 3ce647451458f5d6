//! Failure classification.
//!
//! Extensions report failures through their own error types. The interceptor
//! only needs to know which category a failure belongs to, so error types
//! returned through an [`ExtensionProxy`]( crate::ExtensionProxy ) implement
//! [`Fault`]. Classification is by category (the enum variant) and never by
//! message text.

use std::any::Any ;



/// Category of a failure raised by an extension call.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum FaultKind {
	/// Expected failure that is part of the capability's contract.
	///
	/// Returned to the caller without logging.
	Ordinary,
	/// Severe failure that is not caused by an incompatibility.
	///
	/// Logged with the method name and failure detail, then returned.
	Severe,
	/// The plugin was built against an incompatible version of the host's
	/// interfaces (a missing export, a changed signature).
	///
	/// Logged like [`Severe`]( Self::Severe ), then triggers containment:
	/// the plugin is marked uninstalled and the host restarts.
	Linkage,
}

impl FaultKind {

	/// Whether failures of this kind are logged before being returned.
	#[inline] pub fn is_severe( self ) -> bool { match self {
		Self::Severe | Self::Linkage => true,
		Self::Ordinary => false,
	}}

	/// Whether failures of this kind trigger containment.
	#[inline] pub fn is_linkage( self ) -> bool { self == Self::Linkage }

}

impl std::fmt::Display for FaultKind {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match self {
			Self::Ordinary => write!( f, "ordinary failure" ),
			Self::Severe => write!( f, "severe failure" ),
			Self::Linkage => write!( f, "fatal linkage failure" ),
		}
	}
}

/// An error type whose values can be classified by the interceptor.
///
/// ```
/// use extension_proxy::{ Fault, FaultKind };
///
/// #[derive( Debug, thiserror::Error )]
/// enum RenderError {
/// 	#[error( "nothing to render" )] Empty,
/// 	#[error( "renderer entry point missing: {0}" )] MissingEntryPoint( String ),
/// }
///
/// impl Fault for RenderError {
/// 	fn fault_kind( &self ) -> FaultKind { match self {
/// 		Self::Empty => FaultKind::Ordinary,
/// 		Self::MissingEntryPoint( _ ) => FaultKind::Linkage,
/// 	}}
/// }
///
/// assert!( RenderError::MissingEntryPoint( "draw".into() ).fault_kind().is_severe() );
/// ```
pub trait Fault: std::error::Error {
	/// Returns the category of this failure.
	fn fault_kind( &self ) -> FaultKind ;
}

impl Fault for std::convert::Infallible {
	fn fault_kind( &self ) -> FaultKind { match *self {} }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message( payload: &( dyn Any + Send )) -> String {
	if let Some( message ) = payload.downcast_ref::<&'static str>() {
		return ( *message ).to_string();
	}
	if let Some( message ) = payload.downcast_ref::<String>() {
		return message.clone();
	}
	"non-string panic payload".to_string()
}
