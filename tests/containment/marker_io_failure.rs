use tracing::Level ;
use extension_proxy::{ DispatchThread, is_marked_uninstalled };
use crate::fixture_host::{ Host, Gauge, GaugeError };
use crate::log_capture::capture ;

#[test]
fn containment_marker_io_failure() {

	let host = Host::bound();
	let ( plugin, dir ) = host.install( "vanished", 50 );
	std::fs::remove_dir_all( &dir ).expect( "Failed to remove plugin directory" );
	let gauge = Gauge::new( DispatchThread::Any );

	let ( result, records ) = capture(|| {
		let result = host.containment.proxy( &plugin, &gauge )
			.invoke( "fail", | gauge | gauge.fail( GaugeError::Incompatible( "old interface".to_string() )));
		host.flush_ui();
		result
	});

	match result {
		Err( GaugeError::Incompatible( _ )) => {}
		value => panic!( "Expected Incompatible error, found: {:#?}", value ),
	}
	assert_logged!( records, Level::WARN, "failed to write uninstall marker" );
	assert!( !is_marked_uninstalled( &dir ));
	assert_eq!( host.notifier.notices().len(), 1 );
	assert_eq!( host.restarter.requests().len(), 1 );
	assert!( host.exit.codes().is_empty() );

}
