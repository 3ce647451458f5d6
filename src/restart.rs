//! Host restart after containment.
//!
//! The [`RestartOrchestrator`] is the last step of containment. It always runs
//! its sequence on the UI thread: a blocking notice naming the incompatible
//! plugin, then a call into the [`Restarter`]. If the restart can't be
//! scheduled, the process is terminated so it never keeps running with
//! incompatible plugin code loaded.

use std::num::NonZeroI32 ;
use std::path::{ Path, PathBuf };
use std::process::{ Command, Stdio };
use std::sync::Arc ;
use std::sync::atomic::{ AtomicBool, Ordering };
use thiserror::Error ;
use pipe_trait::Pipe ;

use crate::ui::UiThread ;



/// Shows a modal error notice to the user.
pub trait Notifier: Send + Sync {
	/// Displays `message` and blocks until the user dismisses it.
	///
	/// Only ever called on the UI thread.
	fn show_blocking_error( &self, message: &str, title: &str );
}

/// Relaunches the host process.
pub trait Restarter: Send + Sync {
	/// Starts relaunching the host.
	///
	/// # Errors
	/// Returns an error if the relaunch could not be started.
	fn schedule_restart( &self, request: &RestartRequest ) -> Result<(), RestartError> ;
}

/// Ends the current process.
pub trait ProcessExit: Send + Sync {
	/// Terminates the process with `code`. Implementations must not return.
	fn terminate( &self, code: i32 );
}

/// Parameters of a relaunch.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct RestartRequest {
	/// Full command line of the new process; `None` relaunches the current host.
	pub args: Option<Vec<String>>,
	/// Whether to relaunch with elevated privileges.
	pub elevate: bool,
	/// Extra flags appended to the command line.
	pub extra_flags: Vec<String>,
}

impl RestartRequest {
	/// Relaunch the current host as-is.
	pub fn immediate() -> Self { Self::default() }
}

/// Errors raised by a [`Restarter`].
#[derive( Debug, Error )]
pub enum RestartError {
	/// The host can't be relaunched from its current installation.
	#[error( "Restart Unsupported: {0}" )] Unsupported( String ),
	/// Elevated relaunch was requested but is not available.
	#[error( "Elevated Restart Unsupported" )] ElevationUnsupported,
	/// The new process failed to start.
	#[error( "Failed to spawn {program}: {source}" )]
	Spawn {
		program: String,
		#[source]
		source: std::io::Error,
	},
}

const DEFAULT_TITLE: &str = "Plugin Error" ;
const DEFAULT_EXIT_CODE: NonZeroI32 = match NonZeroI32::new( 1 ) {
	Some( code ) => code,
	None => unreachable!(),
};

/// Runs the restart sequence on the UI thread.
///
/// Requests may arrive from any thread and may arrive more than once. Only the
/// first request that reaches the UI thread shows the notice and restarts;
/// later ones are dropped.
pub struct RestartOrchestrator {
	ui: UiThread,
	notifier: Arc<dyn Notifier>,
	restarter: Arc<dyn Restarter>,
	exit: Arc<dyn ProcessExit>,
	title: String,
	exit_code: NonZeroI32,
	finished: AtomicBool,
}

impl std::fmt::Debug for RestartOrchestrator {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "RestartOrchestrator" )
			.field( "ui", &self.ui )
			.field( "title", &self.title )
			.field( "exit_code", &self.exit_code )
			.field( "finished", &self.finished )
			.finish_non_exhaustive()
	}
}

impl RestartOrchestrator {

	/// Creates an orchestrator bound to `ui`.
	pub fn new(
		ui: UiThread,
		notifier: Arc<dyn Notifier>,
		restarter: Arc<dyn Restarter>,
		exit: Arc<dyn ProcessExit>,
	) -> Self {
		Self {
			ui,
			notifier,
			restarter,
			exit,
			title: DEFAULT_TITLE.to_string(),
			exit_code: DEFAULT_EXIT_CODE,
			finished: AtomicBool::new( false ),
		}
	}

	/// Sets the title of the notice shown before restarting.
	pub fn with_title( mut self, title: impl Into<String> ) -> Self {
		self.title = title.into();
		self
	}

	/// Sets the exit code used when the restart can't be scheduled.
	pub fn with_exit_code( mut self, exit_code: NonZeroI32 ) -> Self {
		self.exit_code = exit_code ;
		self
	}

	/// The UI thread this orchestrator runs on.
	#[inline] pub fn ui( &self ) -> &UiThread { &self.ui }

	/// Whether a restart sequence has already run.
	#[inline] pub fn is_finished( &self ) -> bool { self.finished.load( Ordering::SeqCst ) }

	/// Requests a host restart because `plugin_name` turned out to be incompatible.
	///
	/// Off the UI thread this posts the request and returns immediately.
	pub fn request_restart( self: &Arc<Self>, plugin_name: &str ) {
		tracing::info!( plugin = plugin_name, "host restart requested" );
		if self.ui.is_current() {
			self.restart_on_ui( plugin_name );
			return ;
		}

		let orchestrator = Arc::clone( self );
		let plugin_name_owned = plugin_name.to_string();
		if self.ui.invoke_later( move || orchestrator.restart_on_ui( &plugin_name_owned )).is_err() {
			tracing::error!( plugin = plugin_name, "UI thread is closed, terminating instead of restarting" );
			self.exit.terminate( self.exit_code.get() );
		}
	}

	fn restart_on_ui( &self, plugin_name: &str ) {
		debug_assert!( self.ui.is_current() );
		if self.finished.swap( true, Ordering::SeqCst ) {
			tracing::debug!( plugin = plugin_name, "restart already in progress" );
			return ;
		}

		self.notifier.show_blocking_error( &incompatible_message( plugin_name ), &self.title );

		match self.restarter.schedule_restart( &RestartRequest::immediate() ) {
			Ok(()) => tracing::info!( plugin = plugin_name, "host restart scheduled" ),
			Err( err ) => {
				tracing::error!( plugin = plugin_name, error = %err, detail = ?err, "failed to schedule host restart" );
				self.exit.terminate( self.exit_code.get() );
			}
		}
	}

}

fn incompatible_message( plugin_name: &str ) -> String {
	format!(
		"The plugin \"{}\" is not compatible with this version of the application and has been disabled. The application will now restart.",
		plugin_name,
	)
}

/// [`Notifier`] for headless hosts: the notice goes to the log.
#[derive( Debug, Default, Clone, Copy )]
pub struct LogNotifier ;

impl Notifier for LogNotifier {
	fn show_blocking_error( &self, message: &str, title: &str ) {
		tracing::error!( title, "{}", message );
	}
}

/// [`ProcessExit`] backed by [`std::process::exit`].
#[derive( Debug, Default, Clone, Copy )]
pub struct StdProcessExit ;

impl ProcessExit for StdProcessExit {
	fn terminate( &self, code: i32 ) {
		std::process::exit( code )
	}
}

/// [`Restarter`] that spawns a fresh copy of the host and ends the current process.
///
/// Only the first successful call spawns; later calls are accepted and ignored.
pub struct CommandRestarter {
	exit: Arc<dyn ProcessExit>,
	working_dir: Option<PathBuf>,
	restarting: AtomicBool,
}

impl std::fmt::Debug for CommandRestarter {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "CommandRestarter" )
			.field( "working_dir", &self.working_dir )
			.field( "restarting", &self.restarting )
			.finish_non_exhaustive()
	}
}

impl CommandRestarter {

	/// Creates a restarter that ends the current process through `exit` once the
	/// new one is running.
	pub fn new( exit: Arc<dyn ProcessExit> ) -> Self {
		Self { exit, working_dir: home_dir(), restarting: AtomicBool::new( false ) }
	}

	/// Sets the working directory of the relaunched process.
	pub fn with_working_dir( mut self, working_dir: impl Into<PathBuf> ) -> Self {
		self.working_dir = Some( working_dir.into() );
		self
	}

	fn spawn( &self, request: &RestartRequest ) -> Result<String, RestartError> {

		let command_line = Self::command_line( request )?;
		let ( program, args ) = command_line.split_first()
			.ok_or_else(|| RestartError::Unsupported( "empty command line".to_string() ))?;

		let mut command = Command::new( program );
		command.args( args )
			.stdin( Stdio::null() )
			.stdout( Stdio::null() )
			.stderr( Stdio::null() );
		if cfg!( target_os = "linux" ) { command.env_remove( "LD_LIBRARY_PATH" ); }
		if let Some( dir ) = &self.working_dir { command.current_dir( dir ); }

		command.spawn()
			.map_err(| source | RestartError::Spawn { program: program.clone(), source })?;
		Ok( program.clone() )

	}

	fn command_line( request: &RestartRequest ) -> Result<Vec<String>, RestartError> {
		let base = match &request.args {
			Some( args ) if !args.is_empty() => args.clone(),
			_ => startup_command()?,
		};
		Ok( base.into_iter().chain( request.extra_flags.iter().cloned() ).collect() )
	}

}

impl Restarter for CommandRestarter {
	fn schedule_restart( &self, request: &RestartRequest ) -> Result<(), RestartError> {

		if request.elevate { return Err( RestartError::ElevationUnsupported ) }
		if self.restarting.swap( true, Ordering::SeqCst ) { return Ok(()) }

		let program = match self.spawn( request ) {
			Ok( program ) => program,
			Err( err ) => {
				self.restarting.store( false, Ordering::SeqCst );
				return Err( err );
			}
		};

		tracing::info!( program = %program, "relaunched host, exiting" );
		self.exit.terminate( 0 );
		Ok(())

	}
}

fn startup_command() -> Result<Vec<String>, RestartError> {
	let is_app_image = std::env::var( "LinuxAppImage" )
		.is_ok_and(| value | value.eq_ignore_ascii_case( "true" ));
	if cfg!( target_os = "linux" ) && is_app_image {
		return std::env::var( "APPIMAGE" ).ok()
			.filter(| path | !path.trim().is_empty() && Path::new( path ).exists() )
			.map(| path | vec![ path ])
			.ok_or_else(|| RestartError::Unsupported( "APPIMAGE is not set".to_string() ));
	}
	std::env::current_exe()
		.map_err(| err | RestartError::Unsupported( err.to_string() ))?
		.pipe(| exe | launch_command( &exe, cfg!( target_os = "macos" )))
}

/// Command that starts a new instance of the executable at `exe`.
///
/// On macOS a bundled host is relaunched with `open -n <bundle>`.
fn launch_command( exe: &Path, macos: bool ) -> Result<Vec<String>, RestartError> {
	match app_bundle( exe ).filter(|_| macos ) {
		Some( app ) => Ok( vec![ "open".to_string(), "-n".to_string(), path_string( app )? ]),
		None => Ok( vec![ path_string( exe )? ]),
	}
}

/// The `.app` directory `exe` is packaged in, if any.
fn app_bundle( exe: &Path ) -> Option<&Path> {
	exe.ancestors()
		.skip( 1 )
		.find(| dir | dir.extension().is_some_and(| ext | ext.eq_ignore_ascii_case( "app" )))
}

fn path_string( path: &Path ) -> Result<String, RestartError> {
	path.to_str()
		.map( str::to_string )
		.ok_or_else(|| RestartError::Unsupported( format!( "non UTF-8 executable path {:?}", path )))
}

fn home_dir() -> Option<PathBuf> {
	[ "HOME", "USERPROFILE" ].iter()
		.find_map(| key | std::env::var_os( key ))
		.filter(| value | !value.is_empty() )
		.map( PathBuf::from )
		.filter(| path | path.is_dir() )
}
