use log::debug;
use serde_json::Value;

use crate::errors::ConvertError;
use crate::extractor::{Extractor, ProtocolTable};
use crate::flow::FlowLog;
use crate::renderer::{Renderer, Schema};

/// Converts a single flow log record into its plain text line.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    extractor: Extractor,
    renderer: Renderer,
}

impl Converter {
    pub fn new(schema: Schema, protocols: ProtocolTable) -> Self {
        Self {
            extractor: Extractor::new(protocols),
            renderer: Renderer::new(schema),
        }
    }

    pub fn schema(&self) -> &Schema {
        self.renderer.schema()
    }

    pub fn protocols(&self) -> &ProtocolTable {
        self.extractor.protocols()
    }

    pub fn convert(&self, flow: FlowLog) -> Result<String, ConvertError> {
        let enriched = self.extractor.extract(flow)?;
        Ok(self.renderer.render(&enriched))
    }

    /// Converts an already decoded JSON document.
    ///
    /// `null` and an empty object are passed through as an empty line.
    pub fn convert_value(&self, value: Value) -> Result<String, ConvertError> {
        if is_empty(&value) {
            debug!("empty flow log record, nothing to convert");
            return Ok(String::new());
        }

        let flow: FlowLog = serde_json::from_value(value)?;
        self.convert(flow)
    }

    /// Decodes a JSON document and converts it, blank input is passed through as an empty line.
    pub fn convert_str(&self, raw: &str) -> Result<String, ConvertError> {
        if raw.trim().is_empty() {
            debug!("blank input, nothing to convert");
            return Ok(String::new());
        }

        let value: Value = serde_json::from_str(raw)?;
        self.convert_value(value)
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CompositeField, InputFormatError};
    use crate::renderer::PLACEHOLDER;
    use pretty_assertions::assert_eq;
    use serde_json::error::Category;
    use serde_json::json;
    use test_case::case;

    const SAMPLE: &str = include_str!("../resources/sample.log");

    fn record(protocol: Value) -> Value {
        json!({
            "version": "0.0.1",
            "start_time": "2022-10-20T10:00:00Z",
            "end_time": "2022-10-20T10:01:00Z",
            "direction": "O",
            "action": "accepted",
            "initiator_ip": "10.240.0.4",
            "initiator_port": 44321,
            "target_ip": "10.240.0.5",
            "target_port": 443,
            "transport_protocol": protocol,
            "packets_from_initiator": 10,
            "bytes_from_initiator": 1000,
            "key": "a/account=ACCT123/b/c/subnet=net-1%3A10.0.0.0%2F24",
            "instance_crn": "crn:v1:bluemix:public:is:region:a/acc::instance:0123-abcd"
        })
    }

    #[test]
    fn test_convert_end_to_end() {
        let line = Converter::default().convert_value(record(json!(6))).unwrap();

        assert_eq!(
            "0.0.1 2022-10-20T10:00:00Z 2022-10-20T10:01:00Z ACCT123 10.0.0.0%2F24 0123-abcd O 10.240.0.4 44321 10.240.0.5 443 TCP 10 1000 accepted Null ",
            line
        );
    }

    #[case(json!(6), "TCP"; "tcp")]
    #[case(json!(17), "UDP"; "udp")]
    #[case(json!("17"), "UDP"; "udp as string")]
    #[case(json!(1), PLACEHOLDER; "unknown protocol")]
    #[case(Value::Null, PLACEHOLDER; "missing protocol")]
    fn test_convert_protocol_column(protocol: Value, expected: &str) {
        let converter = Converter::default();
        let line = converter.convert_value(record(protocol)).unwrap();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        assert_eq!(converter.schema().len(), tokens.len());
        assert_eq!(expected, tokens[11]);
    }

    #[case(""; "empty string")]
    #[case("  \n"; "whitespace")]
    #[case("null"; "json null")]
    #[case("{}"; "empty object")]
    fn test_convert_empty_input_passes_through(raw: &str) {
        assert_eq!(Ok(String::new()), Converter::default().convert_str(raw))
    }

    #[case("{\"key\": ", Category::Eof; "truncated document")]
    #[case("[1, 2]", Category::Data; "array instead of object")]
    #[case("{\"target_port\": [443]}", Category::Data; "array instead of port")]
    #[case("{\"key\": 42}", Category::Data; "numeric key")]
    fn test_convert_undecodable_input(raw: &str, category: Category) {
        match Converter::default().convert_str(raw) {
            Err(ConvertError::Decode(e)) => assert_eq!(category, e.classify()),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[case("version", json!(1), "1"; "numeric version")]
    #[case("target_port", json!("443"), "443"; "string port")]
    #[case("state", json!(true), "True"; "bool state")]
    #[case("bytes_from_initiator", json!(1000.5), "1000.5"; "float counter")]
    #[case("packets_from_initiator", json!(-1), "-1"; "negative counter")]
    fn test_convert_unexpected_scalar_types(field: &str, value: Value, expected: &str) {
        let mut raw = record(json!(6));
        raw[field] = value;
        let converter = Converter::new(field.parse().unwrap(), ProtocolTable::default());

        let line = converter.convert_value(raw).unwrap();

        assert_eq!(format!("{} ", expected), line);
    }

    #[test]
    fn test_convert_short_key_fails_whole_record() {
        let mut value = record(json!(6));
        value["key"] = json!("a/account=ACCT123/b");

        let result = Converter::default().convert_value(value);

        assert_eq!(
            Err(ConvertError::InputFormat(InputFormatError::MissingSegment {
                field: CompositeField::Key,
                segment: 4
            })),
            result
        );
    }

    #[test]
    fn test_convert_with_injected_configuration() {
        let converter = Converter::new(
            "protocol account_id state".parse().unwrap(),
            ProtocolTable::new([(1, "ICMP")]),
        );

        let line = converter.convert_value(record(json!(1))).unwrap();

        assert_eq!("ICMP ACCT123 Null ", line);
    }

    #[test]
    fn test_convert_sample_log() {
        let line = Converter::default().convert_str(SAMPLE).unwrap();

        assert_eq!(
            "0.0.1 2022-10-20T09:59:02Z 2022-10-20T10:00:02Z fa3b2a5b0d7e4c4b9b5f0c0b0e0d0c0a 0717-9a1c4b0e-5e6f-4c1a-8d2b-1f3e5a7c9b0d 0717_6a1b2c3d-4e5f-6a7b-8c9d-0e1f2a3b4c5d O 10.240.0.4 45678 161.26.0.10 53 UDP 1 64 accepted ok ",
            line
        );
    }
}
