//! Thread affinity checking.
//!
//! Affinity is a soft contract: a violation is reported to the log so that the
//! offending call site can be fixed, but the call itself always proceeds on the
//! thread it was made from.

use crate::DispatchThread ;
use crate::ui::UiThread ;



/// Whether calling an extension with `dispatch_thread` affinity from the
/// current thread violates that affinity.
#[inline]
pub fn is_violation( dispatch_thread: DispatchThread, ui: &UiThread ) -> bool {
	match dispatch_thread {
		DispatchThread::Any => false,
		DispatchThread::Ui => !ui.is_current(),
	}
}

/// Logs a violation if the current thread does not satisfy `dispatch_thread`.
///
/// Returns whether a violation was logged.
pub(crate) fn check( dispatch_thread: DispatchThread, ui: &UiThread, plugin: &str, method: &str ) -> bool {
	let violation = is_violation( dispatch_thread, ui );
	if violation {
		let current = std::thread::current();
		tracing::error!(
			plugin,
			method,
			thread = current.name().unwrap_or( "<unnamed>" ),
			expected = %dispatch_thread,
			"extension called off the UI thread"
		);
	}
	violation
}
