//! WebAssembly plugin declarations.

use nonempty_collections::{ NEMap, NEVec, NonEmptyIterator };
use wasmtime::{ Engine, Store };
use wasmtime::component::{ Component, Linker };

use crate::{ DispatchThread, ExtensionDescriptor };
use super::{ Interface, WasmExtension };



/// A WASM component bundled with its runtime context, ready for instantiation.
///
/// The `context` is consumed during instantiation to become the wasmtime
/// `Store`'s data.
///
/// # Type Parameters
/// - `Ctx`: User context type that will be stored in the wasmtime Store
#[must_use = "call .instantiate() to create a WasmExtension"]
pub struct WasmPlugin<Ctx> {
	/// Compiled WASM component
	component: Component,
	/// User context consumed at load time to become `Store<Ctx>`
	context: Ctx,
	/// Interfaces the host expects the component to export, keyed by full path
	interfaces: NEMap<String, Interface>,
	/// Thread the extension's functions must be called on
	dispatch_thread: DispatchThread,
}

impl<Ctx> WasmPlugin<Ctx>
where
	Ctx: Send + 'static,
{

	/// Creates a new plugin declaration.
	///
	/// `interfaces` lists the capability interfaces the host expects this
	/// component to implement, keyed by WIT path (e.g. `my:package/example`).
	pub fn new(
		component: Component,
		context: Ctx,
		interfaces: NEMap<String, Interface>,
	) -> Self {
		Self { component, context, interfaces, dispatch_thread: DispatchThread::Any }
	}

	/// Sets the thread the extension's functions must be called on.
	pub fn with_dispatch_thread( mut self, dispatch_thread: DispatchThread ) -> Self {
		self.dispatch_thread = dispatch_thread ;
		self
	}

	/// Instantiates the component.
	///
	/// # Errors
	/// Returns an error if instantiation fails, for example when the component
	/// imports something the linker doesn't provide.
	pub fn instantiate(
		self,
		engine: &Engine,
		linker: &Linker<Ctx>,
	) -> Result<WasmExtension<Ctx>, wasmtime::Error> {
		let mut store = Store::new( engine, self.context );
		let instance = linker.instantiate( &mut store, &self.component )?;
		let capabilities = self.interfaces.nonempty_iter()
			.map(|( path, _ )| path.clone() )
			.collect::<NEVec<_>>();
		let descriptor = ExtensionDescriptor::new( capabilities )
			.with_dispatch_thread( self.dispatch_thread );
		Ok( WasmExtension::new( store, instance, self.interfaces, descriptor ))
	}

}

impl<Ctx: std::fmt::Debug> std::fmt::Debug for WasmPlugin<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "WasmPlugin" )
			.field( "component", &"<Component>" )
			.field( "context", &self.context )
			.field( "interfaces", &self.interfaces )
			.field( "dispatch_thread", &self.dispatch_thread )
			.finish_non_exhaustive()
	}
}
