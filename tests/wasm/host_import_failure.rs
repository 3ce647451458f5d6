use tracing::Level ;
use wasmtime::StoreContextMut ;
use extension_proxy::{ Component, Engine, Fault, FaultKind, Linker, NEMap, is_marked_uninstalled };
use extension_proxy::wasm::{ CallError, WasmPlugin };
use crate::fixture_host::Host ;
use crate::log_capture::capture ;
use crate::wasm_component::{ ROOT, root_interface };

const IMPORTING_WAT: &str = r#"(component
	(import "host-fail" (func $host_fail (result u32)))
	(core func $lowered (canon lower (func $host_fail)))
	(core module $m
		(import "host" "fail" (func $fail (result i32)))
		(func (export "get-value") (result i32) call $fail)
		(func (export "ping"))
		(func (export "trap") (result i32) unreachable)
	)
	(core instance $host (export "fail" (func $lowered)))
	(core instance $i (instantiate $m (with "host" (instance $host))))
	(func $get_value (result u32) (canon lift (core func $i "get-value")))
	(func $ping (canon lift (core func $i "ping")))
	(func $trap (result u32) (canon lift (core func $i "trap")))
	(instance $root
		(export "get-value" (func $get_value))
		(export "ping" (func $ping))
		(export "trap" (func $trap))
	)
	(export "test:gauge/root" (instance $root))
)"# ;

#[test]
fn wasm_host_import_failure() {

	let host = Host::bound();
	let ( plugin, dir ) = host.install( "compatible-wasm", 250 );

	let engine = Engine::default();
	let mut linker = Linker::<()>::new( &engine );
	linker.root()
		.func_wrap( "host-fail", | _: StoreContextMut<'_, ()>, (): () | -> wasmtime::Result<( u32, )> {
			Err( wasmtime::Error::msg( "host database unavailable" ))
		})
		.expect( "Failed to define host import" );
	let component = Component::new( &engine, IMPORTING_WAT ).expect( "Failed to compile component" );
	let extension = WasmPlugin::new( component, (), NEMap::new( ROOT.to_string(), root_interface() ))
		.instantiate( &engine, &linker )
		.expect( "Failed to instantiate component" );

	let ( result, records ) = capture(|| {
		let result = host.containment.proxy( &plugin, &extension ).dispatch( ROOT, "get-value", &[] );
		host.flush_ui();
		result
	});

	match &result {
		Err( error @ CallError::CallFailed( _ )) if error.fault_kind() == FaultKind::Severe => {}
		value => panic!( "Expected CallFailed error, found: {:#?}", value ),
	}
	assert_logged!( records, Level::ERROR, "error invoking extension method" );
	assert_not_logged!( records, "containing incompatible plugin" );
	assert!( !is_marked_uninstalled( &dir ));
	assert!( host.notifier.notices().is_empty() );
	assert!( host.restarter.requests().is_empty() );

}
