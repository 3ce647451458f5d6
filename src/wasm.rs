//! WebAssembly component extensions.
//!
//! A [`WasmPlugin`] pairs a compiled component with the interfaces the host
//! expects it to implement. Instantiating it yields a [`WasmExtension`] whose
//! functions are called dynamically by interface path and function name, which
//! makes it the natural place for incompatibilities to show up: a component
//! built against another version of an interface simply lacks the export, or
//! exports it with a different signature.
//!
//! ```
//! # use std::sync::Arc ;
//! # use std::collections::HashMap ;
//! # use extension_proxy::*;
//! # use extension_proxy::wasm::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::default();
//! let linker = Linker::new( &engine );
//!
//! let extension = WasmPlugin::new(
//! 	Component::new( &engine, r#"(component
//! 		(core module $m (func (export "f") (result i32) i32.const 42))
//! 		(core instance $i (instantiate $m))
//! 		(func $f (result u32) (canon lift (core func $i "f")))
//! 		(instance $inst (export "get-value" (func $f)))
//! 		(export "my:package/example" (instance $inst))
//! 	)"# )?,
//! 	(),
//! 	nem![ "my:package/example".to_string() => Interface::new( HashMap::from([
//! 		( "get-value".to_string(), Function::new( ReturnKind::Value )),
//! 	]))],
//! ).instantiate( &engine, &linker )?;
//!
//! # let ( ui, _event_loop ) = UiThread::bind_current();
//! # let orchestrator = Arc::new( RestartOrchestrator::new(
//! # 	ui, Arc::new( LogNotifier ), Arc::new( CommandRestarter::new( Arc::new( StdProcessExit ))), Arc::new( StdProcessExit ),
//! # ));
//! # let containment = Containment::new( Arc::new( LoadedPlugins::new() ), orchestrator );
//! let plugin = Plugin::new( "example", ModuleId::new( 1 ));
//! let value = containment.proxy( &plugin, &extension )
//! 	.dispatch( "my:package/example", "get-value", &[] )?;
//! assert!( matches!( value, Val::U32( 42 )));
//! # Ok(())
//! # }
//! ```

mod interface ;
mod plugin ;
mod extension ;
mod signature ;

pub use interface::{ Interface, Function, ReturnKind };
pub use plugin::WasmPlugin ;
pub use extension::{ WasmExtension, CallError };
