//! Containment of incompatible plugins.
//!
//! When an extension call fails with a [`FaultKind::Linkage`]( crate::FaultKind::Linkage )
//! failure the plugin it belongs to can't be trusted to run again in this
//! process. [`Containment::contain`] marks every directory of that plugin as
//! uninstalled and hands off to the [`RestartOrchestrator`]. It is best-effort
//! and forward-only: marker failures are logged and the restart happens anyway.

use std::path::Path ;
use std::sync::Arc ;
use itertools::Itertools ;

use crate::{ Extension, ExtensionProxy };
use crate::plugin::{ MarkOutcome, Plugin, PluginRegistry, mark_uninstalled };
use crate::restart::RestartOrchestrator ;
use crate::ui::UiThread ;



/// Context shared by every [`ExtensionProxy`] of a host.
///
/// Holds the injected plugin registry and the restart orchestrator. Proxies
/// borrow it, so one `Containment` usually lives for the whole process.
pub struct Containment {
	registry: Arc<dyn PluginRegistry>,
	orchestrator: Arc<RestartOrchestrator>,
}

impl std::fmt::Debug for Containment {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Containment" )
			.field( "orchestrator", &self.orchestrator )
			.finish_non_exhaustive()
	}
}

impl Containment {

	/// Creates the containment context.
	pub fn new( registry: Arc<dyn PluginRegistry>, orchestrator: Arc<RestartOrchestrator> ) -> Self {
		Self { registry, orchestrator }
	}

	/// Wraps `extension` of `plugin` in a proxy.
	pub fn proxy<'a, E: Extension + ?Sized>( &'a self, plugin: &'a Plugin, extension: &'a E ) -> ExtensionProxy<'a, E> {
		ExtensionProxy::new( plugin, extension, self )
	}

	/// The designated UI thread.
	#[inline] pub fn ui( &self ) -> &UiThread { self.orchestrator.ui() }

	/// The restart orchestrator containment hands off to.
	#[inline] pub fn orchestrator( &self ) -> &Arc<RestartOrchestrator> { &self.orchestrator }

	/// Disables `plugin` on disk and requests a host restart.
	///
	/// Returns the number of uninstall markers newly created. Markers that already
	/// exist are left alone; directories that can't be marked are logged and skipped.
	pub fn contain( &self, plugin: &Plugin ) -> usize {
		tracing::warn!( plugin = plugin.name(), module = %plugin.module(), "containing incompatible plugin" );
		let marked = self.mark_uninstalled( plugin );
		self.orchestrator.request_restart( plugin.name() );
		marked
	}

	fn mark_uninstalled( &self, plugin: &Plugin ) -> usize {
		self.registry.loaded_descriptors()
			.iter()
			.filter(| descriptor | descriptor.plugin().module() == plugin.module() )
			.filter_map(| descriptor | descriptor.path() )
			.unique()
			.filter(| path | mark_one( plugin, path ))
			.count()
	}

}

fn mark_one( plugin: &Plugin, path: &Path ) -> bool {
	match mark_uninstalled( path ) {
		Ok( MarkOutcome::Created ) => {
			tracing::info!( plugin = plugin.name(), path = %path.display(), "plugin marked uninstalled" );
			true
		}
		Ok( MarkOutcome::AlreadyMarked ) => {
			tracing::debug!( plugin = plugin.name(), path = %path.display(), "plugin already marked uninstalled" );
			false
		}
		Err( err ) => {
			tracing::warn!( plugin = plugin.name(), path = %path.display(), error = %err, "failed to write uninstall marker" );
			false
		}
	}
}
