use std::panic::{ AssertUnwindSafe, catch_unwind };
use tracing::Level ;
use extension_proxy::DispatchThread ;
use crate::fixture_host::{ Host, Gauge };
use crate::log_capture::capture ;

#[test]
fn interception_panic_passthrough() {

	let host = Host::bound();
	let ( plugin, dir ) = host.install( "panicking", 5 );
	let gauge = Gauge::new( DispatchThread::Any );

	let ( result, records ) = capture(|| catch_unwind( AssertUnwindSafe(||
		host.containment.proxy( &plugin, &gauge ).invoke( "explode", | gauge | gauge.explode() )
	)));
	host.flush_ui();

	let payload = match result {
		Err( payload ) => payload,
		Ok( value ) => panic!( "Expected the panic to propagate, found: {:#?}", value ),
	};
	assert_eq!( payload.downcast_ref::<&str>(), Some( &"gauge exploded" ));

	assert_logged!( records, Level::ERROR, "extension panicked" );
	assert!( !extension_proxy::is_marked_uninstalled( &dir ));
	assert!( host.restarter.requests().is_empty() );

}
