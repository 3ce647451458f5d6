use tracing::Level ;
use extension_proxy::DispatchThread ;
use crate::fixture_host::{ Host, Gauge };
use crate::log_capture::capture ;

#[test]
fn interception_pass_through() {

	let host = Host::bound();
	let ( plugin, dir ) = host.install( "pass-through", 1 );
	let gauge = Gauge::new( DispatchThread::Any );

	let ( result, records ) = capture(|| host.containment.proxy( &plugin, &gauge ).invoke( "answer", | gauge | gauge.answer( 42 )));
	host.flush_ui();

	match result {
		Ok( 42 ) => {}
		value => panic!( "Expected Ok( 42 ), found: {:#?}", value ),
	}
	assert_eq!( gauge.calls(), 1 );
	assert!( !records.iter().any(| record | record.level <= Level::WARN ), "Unexpected diagnostics: {:#?}", records );
	assert!( !extension_proxy::is_marked_uninstalled( &dir ));
	assert!( host.notifier.notices().is_empty() );
	assert!( host.restarter.requests().is_empty() );

}

#[test]
fn interception_pass_through_repeated_calls() {

	let host = Host::spawned();
	let ( plugin, _ ) = host.install( "pass-through", 1 );
	let gauge = Gauge::new( DispatchThread::Any );
	let proxy = host.containment.proxy( &plugin, &gauge );

	let answers = ( 0..5 )
		.map(| value | proxy.invoke( "answer", | gauge | gauge.answer( value )))
		.collect::<Result<Vec<_>, _>>()
		.expect( "Gauge refused a call" );

	assert_eq!( answers, vec![ 0, 1, 2, 3, 4 ]);
	assert_eq!( gauge.calls(), 5 );

}
