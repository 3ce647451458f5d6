#[macro_export]
macro_rules! assert_logged {
	( $records:expr, $level:expr, $message:literal ) => {
		if !$records.iter().any(| record | record.level == $level && record.message == $message ) {
			panic!( "Expected {} event {:?}, found: {:#?}", $level, $message, $records )
		}
	};
}

#[macro_export]
macro_rules! assert_logged_once {
	( $records:expr, $level:expr, $message:literal ) => {{
		let count = $records.iter().filter(| record | record.level == $level && record.message == $message ).count();
		if count != 1 { panic!( "Expected one {} event {:?}, found {}: {:#?}", $level, $message, count, $records ) }
	}};
}

#[macro_export]
macro_rules! assert_not_logged {
	( $records:expr, $message:literal ) => {
		if let Some( record ) = $records.iter().find(| record | record.message == $message ) {
			panic!( "Unexpected event {:?}, found: {:#?}", $message, record )
		}
	};
}

mod log_capture {
	#![allow( dead_code )]

	use std::sync::{ Arc, Mutex };
	use tracing::{ Event, Level, Subscriber };
	use tracing::field::{ Field, Visit };
	use tracing_subscriber::layer::{ Context, Layer, SubscriberExt };

	#[derive( Debug, Clone )]
	pub struct Record {
		pub level: Level,
		pub message: String,
		pub fields: Vec<( String, String )>,
	}

	impl Record {
		pub fn field( &self, name: &str ) -> Option<&str> {
			self.fields.iter().find(|( key, _ )| key == name ).map(|( _, value )| value.as_str() )
		}
	}

	#[derive( Debug, Clone, Default )]
	pub struct LogCapture {
		records: Arc<Mutex<Vec<Record>>>,
	}

	impl LogCapture {
		pub fn records( &self ) -> Vec<Record> { self.records.lock().unwrap().clone() }
	}

	impl<S: Subscriber> Layer<S> for LogCapture {
		fn on_event( &self, event: &Event<'_>, _: Context<'_, S> ) {
			let mut visitor = RecordVisitor::default();
			event.record( &mut visitor );
			self.records.lock().unwrap().push( Record {
				level: *event.metadata().level(),
				message: visitor.message,
				fields: visitor.fields,
			});
		}
	}

	#[derive( Default )]
	struct RecordVisitor {
		message: String,
		fields: Vec<( String, String )>,
	}

	impl Visit for RecordVisitor {
		fn record_str( &mut self, field: &Field, value: &str ) {
			self.store( field, value.to_string() );
		}
		fn record_debug( &mut self, field: &Field, value: &dyn std::fmt::Debug ) {
			self.store( field, format!( "{:?}", value ));
		}
	}

	impl RecordVisitor {
		fn store( &mut self, field: &Field, value: String ) {
			match field.name() {
				"message" => self.message = value,
				name => self.fields.push(( name.to_string(), value )),
			}
		}
	}

	/// Runs `f` with every event emitted on the current thread captured.
	pub fn capture<R>( f: impl FnOnce() -> R ) -> ( R, Vec<Record> ) {
		let capture = LogCapture::default();
		let subscriber = tracing_subscriber::registry().with( capture.clone() );
		let result = tracing::subscriber::with_default( subscriber, f );
		( result, capture.records() )
	}

}
