//! Loaded plugins and the registry that owns them.
//!
//! The interception layer never owns plugins. It borrows a [`Plugin`] for the
//! duration of a call and reaches the on-disk state of that plugin only through
//! the [`PluginDescriptor`]s a [`PluginRegistry`] hands out.

use std::fs::OpenOptions ;
use std::io::ErrorKind ;
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, PoisonError, RwLock };
use thiserror::Error ;



/// Name of the file whose presence marks a plugin directory as uninstalled.
pub const UNINSTALLED_MARKER: &str = "uninstalled" ;

/// Identifies the loaded module a plugin was instantiated from.
///
/// Two plugins with the same `ModuleId` are the same loaded plugin, which is how
/// containment finds the descriptors belonging to a failing extension.
#[derive( Copy, Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd )]
pub struct ModuleId( u64 );

impl ModuleId {
	/// Creates a new module identifier from a `u64`.
	pub const fn new( id: u64 ) -> Self { Self( id )}
}

impl std::fmt::Display for ModuleId {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
		std::fmt::Display::fmt( &self.0, f )
	}
}

impl From<ModuleId> for u64 {
	fn from( id: ModuleId ) -> Self { id.0 }
}

/// A loaded plugin.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Plugin {
	/// Human readable plugin name, shown to the user on containment
	name: String,
	/// Handle of the module the plugin was loaded from
	module: ModuleId,
}

impl Plugin {

	/// Creates a plugin record.
	pub fn new( name: impl Into<String>, module: ModuleId ) -> Self {
		Self { name: name.into(), module }
	}

	/// Human readable plugin name.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Handle of the module the plugin was loaded from.
	#[inline] pub fn module( &self ) -> ModuleId { self.module }

}

/// Registry record pairing a loaded plugin with its directory on disk.
///
/// Built-in plugins have no directory and therefore can't be marked uninstalled.
#[derive( Debug, Clone )]
pub struct PluginDescriptor {
	plugin: Arc<Plugin>,
	path: Option<PathBuf>,
}

impl PluginDescriptor {

	/// Creates a descriptor for a plugin installed at `path`.
	pub fn new( plugin: Arc<Plugin>, path: impl Into<PathBuf> ) -> Self {
		Self { plugin, path: Some( path.into() ) }
	}

	/// Creates a descriptor for a plugin with no on-disk directory.
	pub fn builtin( plugin: Arc<Plugin> ) -> Self {
		Self { plugin, path: None }
	}

	/// The plugin this descriptor belongs to.
	#[inline] pub fn plugin( &self ) -> &Arc<Plugin> { &self.plugin }

	/// The plugin's directory, if it has one.
	#[inline] pub fn path( &self ) -> Option<&Path> { self.path.as_deref() }

}

/// Source of the descriptors of every plugin currently loaded.
pub trait PluginRegistry: Send + Sync {
	/// Returns a snapshot of all loaded plugin descriptors.
	fn loaded_descriptors( &self ) -> Vec<PluginDescriptor> ;
}

/// Errors that occur when changing the set of loaded plugins.
#[derive( Debug, Error )]
pub enum RegistryError {
	/// A plugin loaded from the same module is already registered.
	#[error( "Module {0} is already registered" )] Conflict( ModuleId ),
	/// The plugin's directory carries the uninstall marker.
	#[error( "Plugin at {} is marked uninstalled", .0.display() )] MarkedUninstalled( PathBuf ),
}

/// In-memory [`PluginRegistry`] populated by the host's plugin loader.
#[derive( Debug, Default )]
pub struct LoadedPlugins {
	descriptors: RwLock<Vec<PluginDescriptor>>,
}

impl LoadedPlugins {

	/// Creates an empty registry.
	pub fn new() -> Self { Self::default() }

	/// Adds a loaded plugin.
	///
	/// # Errors
	/// Fails if the plugin's module is already registered, or if its directory
	/// was marked uninstalled by an earlier containment.
	pub fn register( &self, descriptor: PluginDescriptor ) -> Result<(), RegistryError> {
		if let Some( path ) = descriptor.path().filter(| path | is_marked_uninstalled( path )) {
			return Err( RegistryError::MarkedUninstalled( path.to_path_buf() ));
		}
		let mut descriptors = self.descriptors.write().unwrap_or_else( PoisonError::into_inner );
		let module = descriptor.plugin().module();
		if descriptors.iter().any(| loaded | loaded.plugin().module() == module ) {
			return Err( RegistryError::Conflict( module ));
		}
		descriptors.push( descriptor );
		Ok(())
	}

	/// Removes the plugin loaded from `module`, returning its descriptor.
	pub fn unregister( &self, module: ModuleId ) -> Option<PluginDescriptor> {
		let mut descriptors = self.descriptors.write().unwrap_or_else( PoisonError::into_inner );
		let index = descriptors.iter().position(| loaded | loaded.plugin().module() == module )?;
		Some( descriptors.remove( index ))
	}

	/// Returns the plugin loaded from `module`.
	pub fn get( &self, module: ModuleId ) -> Option<Arc<Plugin>> {
		self.descriptors.read().unwrap_or_else( PoisonError::into_inner )
			.iter()
			.find(| loaded | loaded.plugin().module() == module )
			.map(| loaded | Arc::clone( loaded.plugin() ))
	}

	/// Number of loaded plugins.
	pub fn len( &self ) -> usize {
		self.descriptors.read().unwrap_or_else( PoisonError::into_inner ).len()
	}

	/// Whether no plugin is loaded.
	pub fn is_empty( &self ) -> bool { self.len() == 0 }

}

impl PluginRegistry for LoadedPlugins {
	fn loaded_descriptors( &self ) -> Vec<PluginDescriptor> {
		self.descriptors.read().unwrap_or_else( PoisonError::into_inner ).clone()
	}
}

/// Location of the uninstall marker inside a plugin directory.
pub fn marker_path( plugin_dir: &Path ) -> PathBuf {
	plugin_dir.join( UNINSTALLED_MARKER )
}

/// Whether `plugin_dir` carries the uninstall marker.
pub fn is_marked_uninstalled( plugin_dir: &Path ) -> bool {
	marker_path( plugin_dir ).is_file()
}

/// Result of writing an uninstall marker.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub(crate) enum MarkOutcome {
	Created,
	AlreadyMarked,
}

/// Creates the uninstall marker in `plugin_dir` if it is not already there.
pub(crate) fn mark_uninstalled( plugin_dir: &Path ) -> std::io::Result<MarkOutcome> {
	match OpenOptions::new().write( true ).create_new( true ).open( marker_path( plugin_dir )) {
		Ok( _ ) => Ok( MarkOutcome::Created ),
		Err( err ) if err.kind() == ErrorKind::AlreadyExists => Ok( MarkOutcome::AlreadyMarked ),
		Err( err ) => Err( err ),
	}
}
