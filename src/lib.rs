//! Converts flow log records (one JSON object per connection time window) into
//! fixed order, space delimited plain text lines.
//!
//! ```
//! use flowlog_converter::Converter;
//!
//! let record = r#"{
//!     "direction": "O",
//!     "transport_protocol": 6,
//!     "key": "a/account=ACCT123/b/c/subnet=net-1%3A10.0.0.0%2F24",
//!     "instance_crn": "crn:v1:bluemix:public:is:region:a/acc::instance:0123-abcd"
//! }"#;
//!
//! let line = Converter::default().convert_str(record).unwrap();
//! assert_eq!(
//!     line,
//!     "Null Null Null ACCT123 10.0.0.0%2F24 0123-abcd O Null Null Null Null TCP Null Null Null Null "
//! );
//! ```

pub mod application_state;
pub mod cli;
pub mod config;
pub mod converter;
pub mod errors;
pub mod exporters;
pub mod extractor;
pub mod flow;
pub mod importers;
pub mod renderer;
pub mod settings;

pub use converter::Converter;
pub use errors::{CompositeField, ConvertError, InputFormatError};
pub use extractor::{DerivedFields, EnrichedFlowLog, Extractor, ProtocolTable};
pub use flow::{FlowLog, ProtocolNumber, Scalar};
pub use renderer::{Field, Renderer, Schema, PLACEHOLDER};
