//! The designated UI thread.
//!
//! A [`UiThread`] is a cloneable handle to a single-consumer task queue bound to
//! one thread. Any thread may post work onto it; only the bound thread runs it.
//! Hosts either let the crate own that thread ([`UiThread::spawn`]) or bind
//! their own main loop to it ([`UiThread::bind_current`]).

use std::panic::{ AssertUnwindSafe, catch_unwind };
use std::sync::{ Arc, PoisonError, RwLock };
use std::thread::{ self, JoinHandle, ThreadId };
use crossbeam_channel::{ Receiver, Sender };
use thiserror::Error ;

use crate::fault::panic_message ;



type Task = Box<dyn FnOnce() + Send>;

enum UiMessage {
	Run( Task ),
	Shutdown,
}

/// The UI loop is no longer accepting work.
#[derive( Debug, Error, Clone, Copy, PartialEq, Eq )]
#[error( "UI thread is closed" )]
pub struct UiThreadClosed ;

/// Whether the UI loop still accepts work.
///
/// Senders hold the read side for the whole of a post; the loop takes the write
/// side to close, so every post that succeeded is already queued once it is closed.
#[derive( Debug, Default )]
struct Gate {
	closed: RwLock<bool>,
}

impl Gate {

	fn post( &self, tx: &Sender<UiMessage>, message: UiMessage ) -> Result<(), UiThreadClosed> {
		let closed = self.closed.read().unwrap_or_else( PoisonError::into_inner );
		if *closed { return Err( UiThreadClosed ) }
		tx.send( message ).map_err(|_| UiThreadClosed )
	}

	fn close( &self ) {
		*self.closed.write().unwrap_or_else( PoisonError::into_inner ) = true ;
	}

}

/// Handle to the designated UI thread.
#[derive( Clone )]
pub struct UiThread {
	tx: Sender<UiMessage>,
	gate: Arc<Gate>,
	id: ThreadId,
}

impl std::fmt::Debug for UiThread {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "UiThread" )
			.field( "id", &self.id )
			.finish_non_exhaustive()
	}
}

impl UiThread {

	/// Spawns a dedicated thread running the UI loop.
	///
	/// # Errors
	/// Returns an error if the operating system refuses to spawn the thread.
	pub fn spawn( name: impl Into<String> ) -> std::io::Result<( Self, JoinHandle<()> )> {
		let ( tx, rx ) = crossbeam_channel::unbounded();
		let gate = Arc::new( Gate::default() );
		let event_loop = UiEventLoop { rx, gate: Arc::clone( &gate ) };
		let join = thread::Builder::new()
			.name( name.into() )
			.spawn( move || event_loop.run() )?;
		let id = join.thread().id();
		Ok(( Self { tx, gate, id }, join ))
	}

	/// Designates the calling thread as the UI thread.
	///
	/// Posted tasks only run once the returned loop is driven on this same
	/// thread through [`UiEventLoop::run`] or [`UiEventLoop::pump`].
	pub fn bind_current() -> ( Self, UiEventLoop ) {
		let ( tx, rx ) = crossbeam_channel::unbounded();
		let gate = Arc::new( Gate::default() );
		let event_loop = UiEventLoop { rx, gate: Arc::clone( &gate ) };
		( Self { tx, gate, id: thread::current().id() }, event_loop )
	}

	/// Identity of the UI thread.
	#[inline] pub fn id( &self ) -> ThreadId { self.id }

	/// Whether the calling thread is the UI thread.
	#[inline] pub fn is_current( &self ) -> bool { thread::current().id() == self.id }

	/// Posts `task` to run on the UI thread and returns immediately.
	///
	/// A task that was posted successfully always runs, even when a shutdown was
	/// requested before it.
	///
	/// # Errors
	/// Returns [`UiThreadClosed`] if the UI loop has stopped.
	pub fn invoke_later( &self, task: impl FnOnce() + Send + 'static ) -> Result<(), UiThreadClosed> {
		self.gate.post( &self.tx, UiMessage::Run( Box::new( task )))
	}

	/// Runs `task` on the UI thread and waits for its result.
	///
	/// Runs inline when called from the UI thread itself.
	///
	/// # Errors
	/// Returns [`UiThreadClosed`] if the UI loop has stopped or the task panicked.
	pub fn invoke_and_wait<R: Send + 'static>(
		&self,
		task: impl FnOnce() -> R + Send + 'static,
	) -> Result<R, UiThreadClosed> {
		if self.is_current() { return Ok( task() ) }
		let ( response_tx, response_rx ) = crossbeam_channel::bounded( 1 );
		self.invoke_later( move || { let _ = response_tx.send( task() ); })?;
		response_rx.recv().map_err(|_| UiThreadClosed )
	}

	/// Asks the UI loop to stop.
	///
	/// The loop stops accepting work once it reaches the request, then runs
	/// everything still queued before returning.
	///
	/// # Errors
	/// Returns [`UiThreadClosed`] if the UI loop has already stopped.
	pub fn shutdown( &self ) -> Result<(), UiThreadClosed> {
		self.gate.post( &self.tx, UiMessage::Shutdown )
	}

}

/// The consumer end of the UI task queue.
#[must_use = "posted tasks only run while the loop is driven"]
pub struct UiEventLoop {
	rx: Receiver<UiMessage>,
	gate: Arc<Gate>,
}

impl UiEventLoop {

	/// Runs tasks until [`UiThread::shutdown`] is requested or every handle is dropped.
	///
	/// Tasks queued behind the shutdown request still run before this returns.
	pub fn run( self ) {
		while let Ok( message ) = self.rx.recv() {
			match message {
				UiMessage::Run( task ) => run_task( task ),
				UiMessage::Shutdown => break,
			}
		}
		self.gate.close();
		let drained = self.pump();
		tracing::debug!( drained, "UI loop stopped" );
	}

	/// Runs every task already queued without blocking and returns how many ran.
	///
	/// A pending shutdown request is dropped; use [`UiEventLoop::run`] to honour it.
	pub fn pump( &self ) -> usize {
		self.rx.try_iter()
			.filter_map(| message | match message {
				UiMessage::Run( task ) => Some( task ),
				UiMessage::Shutdown => None,
			})
			.map( run_task )
			.count()
	}

}

impl Drop for UiEventLoop {
	fn drop( &mut self ) {
		self.gate.close();
		let dropped = self.rx.len();
		if dropped > 0 {
			tracing::warn!( dropped, "UI loop dropped with tasks still queued" );
		}
	}
}

fn run_task( task: Task ) {
	if let Err( payload ) = catch_unwind( AssertUnwindSafe( task )) {
		tracing::error!( panic = %panic_message( payload.as_ref() ), "UI task panicked" );
	}
}
