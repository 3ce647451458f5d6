use std::num::NonZeroI32 ;
use std::sync::Arc ;
use pipe_trait::Pipe ;
use extension_proxy::{ RestartOrchestrator, UiThread };
use crate::fixture_host::{ RecordingExit, RecordingNotifier, RecordingRestarter };

#[test]
fn restart_custom_title_and_exit_code() {

	let ( ui, event_loop ) = UiThread::bind_current();
	let notifier = Arc::new( RecordingNotifier::default() );
	let exit = Arc::new( RecordingExit::default() );
	let orchestrator = RestartOrchestrator::new(
		ui,
		notifier.clone(),
		Arc::new( RecordingRestarter::failing() ),
		exit.clone(),
	)
		.with_title( "Extension Manager" )
		.with_exit_code( NonZeroI32::new( 3 ).expect( "non-zero" ))
		.pipe( Arc::new );

	orchestrator.request_restart( "badges" );
	assert_eq!( event_loop.pump(), 0 );

	let notices = notifier.notices();
	assert_eq!( notices.len(), 1 );
	assert_eq!( notices[0].title, "Extension Manager" );
	assert!( notices[0].message.contains( "\"badges\"" ));
	assert_eq!( exit.codes(), vec![ 3 ]);

}
