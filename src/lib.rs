//! Dispatch interception and fault containment for plugin extensions.
//!
//! A host loads plugins, and plugins supply **extensions**: objects implementing
//! one or more of the host's capability interfaces. `extension_proxy` sits
//! between the host and every extension call. It does two things:
//!
//! - **Thread affinity diagnostics.** Extensions that must run on the UI thread
//! 	declare [`DispatchThread::Ui`]. Calling them from another thread is logged;
//! 	the call is never blocked or moved.
//!
//! - **Fault containment.** A failure classified as [`FaultKind::Linkage`] means
//! 	the plugin was built against an incompatible version of the host's
//! 	interfaces. The plugin's directory is marked `uninstalled` and the host is
//! 	restarted so the incompatible code never runs again. The caller still
//! 	receives the original failure.
//!
//! # Core Concepts
//!
//! - [`Extension`]: Trait implemented by plugin-supplied objects. Exposes an
//! 	[`ExtensionDescriptor`] listing capabilities and thread affinity.
//!
//! - [`Fault`]: Trait implemented by extension error types. Maps each failure to
//! 	a [`FaultKind`]: `Ordinary`, `Severe` or `Linkage`.
//!
//! - [`ExtensionProxy`]: Pairs one [`Plugin`] with one extension. Every call goes
//! 	through [`ExtensionProxy::invoke`].
//!
//! - [`Containment`]: Process-wide context holding the [`PluginRegistry`] and the
//! 	[`RestartOrchestrator`]. Proxies borrow it.
//!
//! - [`UiThread`]: Handle to the single-consumer task queue of the UI thread.
//!
//! # Wiring a Host
//!
//! ```
//! use std::sync::Arc ;
//! use nonempty_collections::nev ;
//! use extension_proxy::{
//! 	Containment, DispatchThread, Extension, ExtensionDescriptor, Fault, FaultKind,
//! 	LoadedPlugins, LogNotifier, CommandRestarter, ModuleId, Plugin, PluginDescriptor,
//! 	RestartOrchestrator, StdProcessExit, UiThread,
//! };
//!
//! // A capability interface defined by the host.
//! trait Greeter: Extension {
//! 	fn greet( &self, name: &str ) -> Result<String, GreetError> ;
//! }
//!
//! #[derive( Debug, thiserror::Error )]
//! enum GreetError {
//! 	#[error( "nobody to greet" )] Empty,
//! 	#[error( "greeter built against another host version" )] Incompatible,
//! }
//!
//! impl Fault for GreetError {
//! 	fn fault_kind( &self ) -> FaultKind { match self {
//! 		Self::Empty => FaultKind::Ordinary,
//! 		Self::Incompatible => FaultKind::Linkage,
//! 	}}
//! }
//!
//! // An extension supplied by a plugin.
//! struct Polite { descriptor: ExtensionDescriptor }
//! impl Extension for Polite {
//! 	fn descriptor( &self ) -> &ExtensionDescriptor { &self.descriptor }
//! }
//! impl Greeter for Polite {
//! 	fn greet( &self, name: &str ) -> Result<String, GreetError> {
//! 		if name.is_empty() { return Err( GreetError::Empty ) }
//! 		Ok( format!( "Good day, {}", name ))
//! 	}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // The UI thread. Hosts with their own main loop use `UiThread::bind_current`.
//! let ( ui, _ui_join ) = UiThread::spawn( "ui" )?;
//!
//! // The registry is filled by the host's plugin loader.
//! let plugin = Arc::new( Plugin::new( "polite-greetings", ModuleId::new( 7 )));
//! let registry = Arc::new( LoadedPlugins::new() );
//! registry.register( PluginDescriptor::builtin( Arc::clone( &plugin )))?;
//!
//! let exit = Arc::new( StdProcessExit );
//! let orchestrator = Arc::new( RestartOrchestrator::new(
//! 	ui,
//! 	Arc::new( LogNotifier ),
//! 	Arc::new( CommandRestarter::new( exit.clone() )),
//! 	exit,
//! ));
//! let containment = Containment::new( registry, orchestrator );
//!
//! let polite = Polite {
//! 	descriptor: ExtensionDescriptor::new( nev![ "greeter".to_string() ])
//! 		.with_dispatch_thread( DispatchThread::Any ),
//! };
//!
//! let proxy = containment.proxy( &plugin, &polite );
//! assert_eq!( proxy.invoke( "greet", | greeter | greeter.greet( "Ada" ))?, "Good day, Ada" );
//! assert!( matches!( proxy.invoke( "greet", | greeter | greeter.greet( "" )), Err( GreetError::Empty )));
//! # Ok(())
//! # }
//! ```
//!
//! # WebAssembly Extensions
//!
//! The [`wasm`] module provides an [`Extension`] backed by a wasmtime component,
//! whose call failures are already classified. See its documentation.
//!
//! # Re-exports
//!
//! `extension_proxy` re-exports a small set of types from `wasmtime` for
//! convenience (`Engine`, `Component`, `Linker`, `Val`). These types are defined
//! by wasmtime; see the [wasmtime docs](https://docs.rs/wasmtime/latest/wasmtime/)
//! for details.

mod descriptor ;
mod fault ;
mod ui ;
mod affinity ;
mod plugin ;
mod proxy ;
mod containment ;
mod restart ;
pub mod wasm ;
pub mod logging ;

#[doc( no_inline )]
pub use wasmtime::Engine ;
#[doc( no_inline )]
pub use wasmtime::component::{ Component, Linker, Val };
#[doc( no_inline )]
pub use nonempty_collections::{ NEMap, NEVec, nem, nev };

pub use descriptor::{ DispatchThread, Extension, ExtensionDescriptor };
pub use fault::{ Fault, FaultKind };
pub use ui::{ UiEventLoop, UiThread, UiThreadClosed };
pub use affinity::is_violation as is_affinity_violation ;
pub use plugin::{
	LoadedPlugins, ModuleId, Plugin, PluginDescriptor, PluginRegistry, RegistryError,
	UNINSTALLED_MARKER, is_marked_uninstalled, marker_path,
};
pub use proxy::ExtensionProxy ;
pub use containment::Containment ;
pub use restart::{
	CommandRestarter, LogNotifier, Notifier, ProcessExit, RestartError, RestartOrchestrator,
	RestartRequest, Restarter, StdProcessExit,
};
