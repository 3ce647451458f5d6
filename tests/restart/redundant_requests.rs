use std::sync::Arc ;
use crate::fixture_host::Host ;

#[test]
fn restart_redundant_requests() {

	let host = Host::spawned();
	let orchestrator = Arc::clone( host.containment.orchestrator() );
	assert!( !orchestrator.is_finished() );

	std::thread::scope(| scope | {
		for index in 0..4 {
			let orchestrator = Arc::clone( &orchestrator );
			scope.spawn( move || orchestrator.request_restart( &format!( "plugin-{}", index )));
		}
	});
	orchestrator.request_restart( "late" );
	host.flush_ui();

	assert!( orchestrator.is_finished() );
	assert_eq!( host.notifier.notices().len(), 1 );
	assert_eq!( host.restarter.requests().len(), 1 );
	assert!( host.exit.codes().is_empty() );

}
