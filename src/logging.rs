//! Logging bootstrap for hosts.
//!
//! The crate itself only emits `tracing` events. Hosts that don't install a
//! subscriber of their own can call [`init_tracing`] once at startup.

use once_cell::sync::OnceCell ;
use tracing_subscriber::EnvFilter ;



static INIT: OnceCell<()> = OnceCell::new();

const DEBUG_FILTER: &str = "debug,cranelift_codegen=warn,cranelift_frontend=warn,wasmtime_cranelift=warn,wasmtime_internal_cranelift=warn,wasmtime_internal_jit_debug=warn,wasmtime_internal_cache=warn" ;
const RELEASE_FILTER: &str = "info" ;

/// Installs a formatting subscriber as the global default.
///
/// The filter is read from `RUST_LOG`; without it, debug builds log at `debug`
/// with wasmtime and cranelift internals kept at `warn`, release builds at `info`.
/// Calling this more than once, or after another global subscriber was set, is a no-op.
pub fn init_tracing() {
	INIT.get_or_init(|| {
		let filter = EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| EnvFilter::new( default_filter() ));
		tracing_subscriber::fmt()
			.with_env_filter( filter )
			.with_target( true )
			.with_thread_names( true )
			.with_thread_ids( true )
			.try_init()
			.ok();
	});
}

/// Returns the filter directives used when `RUST_LOG` is unset.
pub fn default_filter() -> &'static str {
	if cfg!( debug_assertions ) { DEBUG_FILTER } else { RELEASE_FILTER }
}
