use std::sync::Mutex ;
use nonempty_collections::NEMap ;
use thiserror::Error ;
use wasmtime::component::{ Instance, Val };
use wasmtime::{ Store, Trap };

use crate::{ Extension, ExtensionDescriptor, ExtensionProxy, Fault, FaultKind };
use super::{ Interface, ReturnKind };
use super::signature ;



/// An instantiated WebAssembly extension, ready for dispatch.
///
/// Created by calling [`WasmPlugin::instantiate`]( super::WasmPlugin::instantiate ).
/// Calls are serialised on the extension's store.
pub struct WasmExtension<Ctx: 'static> {
	store: Mutex<Store<Ctx>>,
	instance: Instance,
	interfaces: NEMap<String, Interface>,
	descriptor: ExtensionDescriptor,
}

impl<Ctx: std::fmt::Debug + 'static> std::fmt::Debug for WasmExtension<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::result::Result<(), std::fmt::Error> {
		f.debug_struct( "WasmExtension" )
			.field( "store", &self.store )
			.field( "interfaces", &self.interfaces )
			.field( "descriptor", &self.descriptor )
			.finish_non_exhaustive()
	}
}

/// Errors that can occur when calling a function of a [`WasmExtension`].
///
/// Each variant maps to a [`FaultKind`]: a component that doesn't export what
/// its declared interfaces promise was built against a different version of
/// those interfaces and is treated as a linkage failure. Signatures are checked
/// against the component's types before calling, so a failure raised during the
/// call itself (a trap, an error from a host import) is only ever severe.
#[derive( Error, Debug )]
pub enum CallError {
	/// Failed to acquire the lock on the extension's store.
	#[error( "Lock Rejected" )] LockRejected,
	/// The host asked for an interface the extension doesn't declare.
	#[error( "Unknown Interface: {0}" )] UnknownInterface( String ),
	/// The host asked for a function the interface doesn't declare.
	#[error( "Unknown Function: {0}" )] UnknownFunction( String ),
	/// A declared interface or function is not exported by the component.
	#[error( "Missing Export: {0}" )] MissingExport( String ),
	/// The component's function signature doesn't match the call.
	#[error( "Signature Mismatch: {0}" )] SignatureMismatch( String ),
	/// Function was expected to return a value but didn't.
	#[error( "Missing Response" )] MissingResponse,
	/// The WASM function trapped during execution.
	#[error( "Trap: {0}" )] Trap( wasmtime::Error ),
	/// The call failed without trapping, for example in a host import.
	#[error( "Call Failed: {0}" )] CallFailed( wasmtime::Error ),
}

impl CallError {
	fn from_call( error: wasmtime::Error ) -> Self {
		match error.downcast_ref::<Trap>() {
			Some( _ ) => Self::Trap( error ),
			None => Self::CallFailed( error ),
		}
	}
}

impl Fault for CallError {
	fn fault_kind( &self ) -> FaultKind { match self {
		Self::LockRejected
		| Self::UnknownInterface( _ )
		| Self::UnknownFunction( _ ) => FaultKind::Ordinary,
		Self::Trap( _ )
		| Self::CallFailed( _ ) => FaultKind::Severe,
		Self::MissingExport( _ )
		| Self::SignatureMismatch( _ )
		| Self::MissingResponse => FaultKind::Linkage,
	}}
}

impl<Ctx: Send + 'static> Extension for WasmExtension<Ctx> {
	fn descriptor( &self ) -> &ExtensionDescriptor { &self.descriptor }
}

impl<Ctx: Send + 'static> WasmExtension<Ctx> {

	const PLACEHOLDER_VAL: Val = Val::Tuple( vec![] );

	pub(super) fn new(
		store: Store<Ctx>,
		instance: Instance,
		interfaces: NEMap<String, Interface>,
		descriptor: ExtensionDescriptor,
	) -> Self {
		Self { store: Mutex::new( store ), instance, interfaces, descriptor }
	}

	/// Interfaces this extension declares, keyed by WIT path.
	#[inline] pub fn interfaces( &self ) -> &NEMap<String, Interface> { &self.interfaces }

	/// Calls `function_name` of the interface at `interface_path`.
	///
	/// Void functions yield an empty tuple.
	///
	/// # Errors
	/// See [`CallError`].
	pub fn call(
		&self,
		interface_path: &str,
		function_name: &str,
		args: &[Val],
	) -> Result<Val, CallError> {

		let function = self.interfaces
			.get( interface_path )
			.ok_or_else(|| CallError::UnknownInterface( interface_path.to_string() ))?
			.function( function_name )
			.ok_or_else(|| CallError::UnknownFunction( format!( "{}#{}", interface_path, function_name )))?;

		let mut buffer = match function.return_kind() {
			ReturnKind::Value => vec![ Self::PLACEHOLDER_VAL ],
			ReturnKind::Void => Vec::with_capacity( 0 ),
		};

		let mut store = self.store.lock().map_err(|_| CallError::LockRejected )?;
		let interface_index = self.instance
			.get_export_index( &mut *store, None, interface_path )
			.ok_or_else(|| CallError::MissingExport( interface_path.to_string() ))?;
		let func_index = self.instance
			.get_export_index( &mut *store, Some( &interface_index ), function_name )
			.ok_or_else(|| CallError::MissingExport( format!( "{}#{}", interface_path, function_name )))?;
		let func = self.instance
			.get_func( &mut *store, func_index )
			.ok_or_else(|| CallError::MissingExport( format!( "{}#{}", interface_path, function_name )))?;

		if let Some( mismatch ) = signature::mismatch( &func.ty( &*store ), args, function.return_kind() ) {
			return Err( CallError::SignatureMismatch( format!( "{}#{}: {}", interface_path, function_name, mismatch )));
		}

		func.call( &mut *store, args, &mut buffer ).map_err( CallError::from_call )?;
		if let Err( err ) = func.post_return( &mut *store ) {
			tracing::warn!( interface = interface_path, function = function_name, error = %err, "post-return cleanup failed" );
		}

		Ok( match function.return_kind() {
			ReturnKind::Value => buffer.pop().ok_or( CallError::MissingResponse )?,
			ReturnKind::Void => Self::PLACEHOLDER_VAL,
		})

	}

}

impl<Ctx: Send + 'static> ExtensionProxy<'_, WasmExtension<Ctx>> {

	/// Calls `function_name` of the interface at `interface_path` through the proxy.
	///
	/// The method is reported in diagnostics as `interface_path#function_name`.
	///
	/// # Errors
	/// Returns the extension's [`CallError`] unchanged.
	pub fn dispatch(
		&self,
		interface_path: &str,
		function_name: &str,
		args: &[Val],
	) -> Result<Val, CallError> {
		let method = format!( "{}#{}", interface_path, function_name );
		self.invoke( &method, | extension | extension.call( interface_path, function_name, args ))
	}

}
