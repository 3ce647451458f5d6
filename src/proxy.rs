//! The dispatch interceptor.
//!
//! Every call the host makes into an extension goes through an
//! [`ExtensionProxy`]. On the happy path the proxy is a plain pass-through; its
//! only additions are affinity diagnostics and, for incompatibility faults,
//! containment of the plugin. The caller always receives exactly what the
//! extension produced.

use std::panic::{ AssertUnwindSafe, catch_unwind, resume_unwind };

use crate::{ Extension, Fault, FaultKind };
use crate::affinity ;
use crate::containment::Containment ;
use crate::fault::panic_message ;
use crate::plugin::Plugin ;



/// Safe handle to one extension of one plugin.
///
/// Proxies are cheap, hold no state of their own and may be created on demand
/// from any thread. Several proxies may wrap the same extension at once.
///
/// ```
/// # use std::sync::Arc ;
/// # use nonempty_collections::nev ;
/// # use extension_proxy::*;
/// trait Clock: Extension {
/// 	fn now( &self ) -> Result<u64, std::convert::Infallible> ;
/// }
///
/// struct FixedClock( ExtensionDescriptor );
/// impl Extension for FixedClock {
/// 	fn descriptor( &self ) -> &ExtensionDescriptor { &self.0 }
/// }
/// impl Clock for FixedClock {
/// 	fn now( &self ) -> Result<u64, std::convert::Infallible> { Ok( 42 ) }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let ( ui, _event_loop ) = UiThread::bind_current();
/// let registry = Arc::new( LoadedPlugins::new() );
/// let orchestrator = Arc::new( RestartOrchestrator::new(
/// 	ui,
/// 	Arc::new( LogNotifier ),
/// 	Arc::new( CommandRestarter::new( Arc::new( StdProcessExit ))),
/// 	Arc::new( StdProcessExit ),
/// ));
/// let containment = Containment::new( registry, orchestrator );
///
/// let plugin = Plugin::new( "clock", ModuleId::new( 1 ));
/// let clock = FixedClock( ExtensionDescriptor::new( nev![ "clock".to_string() ]));
///
/// let now = containment.proxy( &plugin, &clock ).invoke( "now", | clock | clock.now() )?;
/// assert_eq!( now, 42 );
/// # Ok(())
/// # }
/// ```
pub struct ExtensionProxy<'a, E: Extension + ?Sized> {
	plugin: &'a Plugin,
	extension: &'a E,
	containment: &'a Containment,
}

impl<E: Extension + ?Sized> Clone for ExtensionProxy<'_, E> {
	fn clone( &self ) -> Self { *self }
}

impl<E: Extension + ?Sized> Copy for ExtensionProxy<'_, E> {}

impl<E: Extension + ?Sized> std::fmt::Debug for ExtensionProxy<'_, E> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ExtensionProxy" )
			.field( "plugin", &self.plugin )
			.field( "descriptor", self.extension.descriptor() )
			.finish_non_exhaustive()
	}
}

impl<'a, E: Extension + ?Sized> ExtensionProxy<'a, E> {

	/// Pairs `extension` with the `plugin` that supplied it.
	pub fn new( plugin: &'a Plugin, extension: &'a E, containment: &'a Containment ) -> Self {
		Self { plugin, extension, containment }
	}

	/// The plugin the wrapped extension belongs to.
	#[inline] pub fn plugin( &self ) -> &'a Plugin { self.plugin }

	/// The wrapped extension.
	///
	/// Calls made on it directly bypass interception.
	#[inline] pub fn extension( &self ) -> &'a E { self.extension }

	/// Calls `method` on the wrapped extension.
	///
	/// `call` performs the actual call; `method` names it in diagnostics. The
	/// result of `call` is returned unchanged. Along the way:
	///
	/// - If the extension requires the UI thread and this isn't it, the violation
	/// 	is logged. The call still runs on the current thread.
	/// - A failure whose [`FaultKind`] is severe is logged with its full detail.
	/// - A [`FaultKind::Linkage`] failure additionally triggers
	/// 	[`Containment::contain`] before it is returned.
	/// - A panic is logged and resumed with its original payload.
	///
	/// # Errors
	/// Returns the extension's own failure.
	pub fn invoke<T, F>(
		&self,
		method: &str,
		call: impl FnOnce( &'a E ) -> Result<T, F>,
	) -> Result<T, F>
	where
		F: Fault,
	{

		affinity::check(
			self.extension.descriptor().dispatch_thread(),
			self.containment.ui(),
			self.plugin.name(),
			method,
		);

		let extension = self.extension ;
		match catch_unwind( AssertUnwindSafe( move || call( extension ))) {
			Ok( Ok( value )) => Ok( value ),
			Ok( Err( fault )) => {
				self.on_fault( method, &fault );
				Err( fault )
			}
			Err( payload ) => {
				tracing::error!(
					plugin = self.plugin.name(),
					method,
					panic = %panic_message( payload.as_ref() ),
					"extension panicked"
				);
				resume_unwind( payload )
			}
		}

	}

	fn on_fault<F: Fault>( &self, method: &str, fault: &F ) {
		let kind = fault.fault_kind();
		if kind.is_severe() {
			tracing::error!(
				plugin = self.plugin.name(),
				method,
				kind = %kind,
				error = %fault,
				detail = ?fault,
				"error invoking extension method"
			);
		}
		if kind == FaultKind::Linkage {
			self.containment.contain( self.plugin );
		}
	}

}
