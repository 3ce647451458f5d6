use std::collections::HashMap ;
use extension_proxy::{ NEMap, Val, is_marked_uninstalled };
use extension_proxy::wasm::{ CallError, Function, Interface, ReturnKind };
use crate::fixture_host::Host ;
use crate::wasm_component::{ ROOT, instantiate, instantiate_root };

#[test]
fn wasm_signature_mismatch() {

	let host = Host::spawned();
	let ( plugin, dir ) = host.install( "mismatched-wasm", 220 );
	let extension = instantiate_root();

	match host.containment.proxy( &plugin, &extension ).dispatch( ROOT, "get-value", &[ Val::U32( 1 ) ]) {
		Err( CallError::SignatureMismatch( _ )) => {}
		value => panic!( "Expected SignatureMismatch error, found: {:#?}", value ),
	}
	host.flush_ui();

	assert!( is_marked_uninstalled( &dir ));
	assert_eq!( host.notifier.notices().len(), 1 );
	assert_eq!( host.restarter.requests().len(), 1 );

}

#[test]
fn wasm_result_arity_mismatch() {

	let host = Host::spawned();
	let ( plugin, dir ) = host.install( "changed-result-wasm", 221 );

	// The host's interface says `get-value` returns nothing; the component returns a u32.
	let extension = instantiate( NEMap::new( ROOT.to_string(), Interface::new( HashMap::from([
		( "get-value".to_string(), Function::new( ReturnKind::Void )),
	]))));

	match host.containment.proxy( &plugin, &extension ).dispatch( ROOT, "get-value", &[] ) {
		Err( CallError::SignatureMismatch( detail )) if detail.contains( "result" ) => {}
		value => panic!( "Expected SignatureMismatch error, found: {:#?}", value ),
	}
	host.flush_ui();

	assert!( is_marked_uninstalled( &dir ));
	assert_eq!( host.restarter.requests().len(), 1 );

}
