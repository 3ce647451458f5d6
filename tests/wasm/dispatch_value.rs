use extension_proxy::{ DispatchThread, Extension, Val };
use extension_proxy::wasm::WasmPlugin ;
use crate::fixture_host::Host ;
use crate::wasm_component::{ ROOT, instantiate_root };

#[test]
fn wasm_dispatch_value() {

	let host = Host::spawned();
	let ( plugin, dir ) = host.install( "wasm-gauge", 200 );
	let extension = instantiate_root();
	let proxy = host.containment.proxy( &plugin, &extension );

	match proxy.dispatch( ROOT, "get-value", &[] ) {
		Ok( Val::U32( 42 )) => {}
		value => panic!( "Expected Ok( U32( 42 )), found: {:#?}", value ),
	}
	match proxy.dispatch( ROOT, "ping", &[] ) {
		Ok( Val::Tuple( fields )) if fields.is_empty() => {}
		value => panic!( "Expected empty tuple, found: {:#?}", value ),
	}

	assert!( extension.descriptor().implements( ROOT ));
	assert_eq!( extension.descriptor().dispatch_thread(), DispatchThread::Any );
	assert!( !extension_proxy::is_marked_uninstalled( &dir ));
	host.flush_ui();
	assert!( host.restarter.requests().is_empty() );

}

#[test]
fn wasm_dispatch_thread_declared_by_plugin() {

	let engine = extension_proxy::Engine::default();
	let linker = extension_proxy::Linker::new( &engine );
	let component = extension_proxy::Component::new( &engine, "(component)" ).expect( "Failed to compile component" );
	let extension = WasmPlugin::new(
		component,
		(),
		extension_proxy::NEMap::new( "test:ui/panel".to_string(), extension_proxy::wasm::Interface::new( Default::default() )),
	)
		.with_dispatch_thread( DispatchThread::Ui )
		.instantiate( &engine, &linker )
		.expect( "Failed to instantiate component" );

	assert_eq!( extension.descriptor().dispatch_thread(), DispatchThread::Ui );
	assert!( extension.descriptor().implements( "test:ui/panel" ));
	assert!( !extension.descriptor().implements( "test:gauge/root" ));

}
