use tracing::Level ;
use extension_proxy::DispatchThread ;
use crate::fixture_host::{ Host, Gauge, GaugeError };
use crate::log_capture::capture ;

#[test]
fn interception_linkage_failure() {

	let host = Host::bound();
	let ( plugin, dir ) = host.install( "linkage-failure", 4 );
	let gauge = Gauge::new( DispatchThread::Any );

	let ( result, records ) = capture(|| {
		let result = host.containment.proxy( &plugin, &gauge )
			.invoke( "fail", | gauge | gauge.fail( GaugeError::Incompatible( "missing symbol".to_string() )));
		host.flush_ui();
		result
	});

	match result {
		Err( GaugeError::Incompatible( detail )) if detail == "missing symbol" => {}
		value => panic!( "Expected Incompatible error, found: {:#?}", value ),
	}

	assert_logged!( records, Level::ERROR, "error invoking extension method" );
	assert_logged!( records, Level::WARN, "containing incompatible plugin" );
	assert!( extension_proxy::is_marked_uninstalled( &dir ));

	let notices = host.notifier.notices();
	assert_eq!( notices.len(), 1 );
	assert!( notices[0].message.contains( "\"linkage-failure\"" ), "Unexpected notice: {:#?}", notices );
	assert_eq!( notices[0].title, "Plugin Error" );

	let requests = host.restarter.requests();
	assert_eq!( requests.len(), 1 );
	assert_eq!( requests[0].0, extension_proxy::RestartRequest::immediate() );
	assert!( host.exit.codes().is_empty() );

}
