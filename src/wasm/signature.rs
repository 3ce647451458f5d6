//! Call signatures checked against the component's own function types.
//!
//! wasmtime reports a type mismatch and a failing host import through the same
//! error type, so mismatches are detected before the call is made.

use wasmtime::component::{ Type, Val };
use wasmtime::component::types::ComponentFunc ;

use super::ReturnKind ;



/// Describes how `args` and `return_kind` disagree with `ty`, if they do.
pub(super) fn mismatch( ty: &ComponentFunc, args: &[Val], return_kind: ReturnKind ) -> Option<String> {

	let params = ty.params().collect::<Vec<_>>();
	if params.len() != args.len() {
		return Some( format!( "expected {} argument(s), got {}", params.len(), args.len() ));
	}

	if let Some(( name, _ )) = params.iter()
		.zip( args )
		.find(|(( _, param_ty ), arg )| !matches_type( arg, param_ty ))
		.map(|( param, _ )| param )
	{
		return Some( format!( "argument `{}` has the wrong type", name ));
	}

	let expected_results = match return_kind {
		ReturnKind::Value => 1,
		ReturnKind::Void => 0,
	};
	let results = ty.results().len();
	if results != expected_results {
		return Some( format!( "expected {} result(s), component returns {}", expected_results, results ));
	}

	None

}

/// Whether `val` is a value of type `ty`.
pub(super) fn matches_type( val: &Val, ty: &Type ) -> bool {
	match ( val, ty ) {
		( Val::Bool( _ ), Type::Bool )
		| ( Val::S8( _ ), Type::S8 )
		| ( Val::U8( _ ), Type::U8 )
		| ( Val::S16( _ ), Type::S16 )
		| ( Val::U16( _ ), Type::U16 )
		| ( Val::S32( _ ), Type::S32 )
		| ( Val::U32( _ ), Type::U32 )
		| ( Val::S64( _ ), Type::S64 )
		| ( Val::U64( _ ), Type::U64 )
		| ( Val::Float32( _ ), Type::Float32 )
		| ( Val::Float64( _ ), Type::Float64 )
		| ( Val::Char( _ ), Type::Char )
		| ( Val::String( _ ), Type::String )
		| ( Val::Resource( _ ), Type::Own( _ ) | Type::Borrow( _ ))
		| ( Val::Future( _ ), Type::Future( _ ))
		| ( Val::Stream( _ ), Type::Stream( _ ))
		| ( Val::ErrorContext( _ ), Type::ErrorContext ) => true,

		( Val::List( items ), Type::List( list )) => {
			let item_ty = list.ty();
			items.iter().all(| item | matches_type( item, &item_ty ))
		}

		( Val::Record( fields ), Type::Record( record )) => fields.len() == record.fields().len()
			&& record.fields().zip( fields ).all(| ( field_ty, ( name, value )) |
				field_ty.name == name.as_str() && matches_type( value, &field_ty.ty )
			),

		( Val::Tuple( values ), Type::Tuple( tuple )) => values.len() == tuple.types().len()
			&& tuple.types().zip( values ).all(|( item_ty, value )| matches_type( value, &item_ty )),

		( Val::Variant( name, payload ), Type::Variant( variant )) => variant.cases()
			.find(| case | case.name == name.as_str() )
			.is_some_and(| case | matches_payload( payload.as_deref(), case.ty.as_ref() )),

		( Val::Enum( name ), Type::Enum( enum_ty )) => enum_ty.names().any(| case | case == name.as_str() ),

		( Val::Option( value ), Type::Option( option )) => value.as_deref()
			.is_none_or(| value | matches_type( value, &option.ty() )),

		( Val::Result( Ok( value )), Type::Result( result )) => matches_payload( value.as_deref(), result.ok().as_ref() ),
		( Val::Result( Err( value )), Type::Result( result )) => matches_payload( value.as_deref(), result.err().as_ref() ),

		( Val::Flags( names ), Type::Flags( flags )) => names.iter()
			.all(| name | flags.names().any(| flag | flag == name.as_str() )),

		_ => false,
	}
}

fn matches_payload( value: Option<&Val>, ty: Option<&Type> ) -> bool {
	match ( value, ty ) {
		( None, None ) => true,
		( Some( value ), Some( ty )) => matches_type( value, ty ),
		_ => false,
	}
}
