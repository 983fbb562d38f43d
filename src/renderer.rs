//! Rendering of enriched flow logs into space delimited plain text lines.

use core::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::SchemaError;
use crate::extractor::EnrichedFlowLog;
use crate::flow::{ProtocolNumber, Scalar};

/// Token written in place of an absent or empty value.
pub const PLACEHOLDER: &str = "Null";

const FIELD_DELIMITER: char = ' ';

/// Borrowed value of a single field, formatted the way it appears in a rendered line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Flag(bool),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Unsigned(n) => write!(f, "{}", n),
            Self::Signed(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Flag(true) => write!(f, "True"),
            Self::Flag(false) => write!(f, "False"),
        }
    }
}

impl<'a> From<&'a Scalar> for FieldValue<'a> {
    fn from(scalar: &'a Scalar) -> Self {
        match scalar {
            Scalar::Flag(b) => Self::Flag(*b),
            Scalar::Unsigned(n) => Self::Unsigned(*n),
            Scalar::Signed(n) => Self::Signed(*n),
            Scalar::Float(n) => Self::Float(*n),
            Scalar::Text(s) => Self::Text(s),
        }
    }
}

fn text(value: &Option<String>) -> Option<FieldValue<'_>> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(FieldValue::Text)
}

fn scalar(value: &Option<Scalar>) -> Option<FieldValue<'_>> {
    match value.as_ref()? {
        Scalar::Text(s) if s.is_empty() => None,
        other => Some(FieldValue::from(other)),
    }
}

fn protocol_number(value: &Option<ProtocolNumber>) -> Option<FieldValue<'_>> {
    match value.as_ref()? {
        ProtocolNumber::Number(n) => Some(FieldValue::Unsigned(*n)),
        ProtocolNumber::Text(s) if s.is_empty() => None,
        ProtocolNumber::Text(s) => Some(FieldValue::Text(s)),
        ProtocolNumber::Other(other) => Some(FieldValue::from(other)),
    }
}

fn derived(value: &str) -> Option<FieldValue<'_>> {
    Some(value).filter(|s| !s.is_empty()).map(FieldValue::Text)
}

macro_rules! fields {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Selector of a single column of the rendered line.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $($variant),+
        }

        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }
    };
}

fields! {
    Version => "version",
    StartTime => "start_time",
    EndTime => "end_time",
    ConnectionStartTime => "connection_start_time",
    CaptureStartTime => "capture_start_time",
    CaptureEndTime => "capture_end_time",
    Direction => "direction",
    Action => "action",
    State => "state",
    InitiatorIp => "initiator_ip",
    InitiatorPort => "initiator_port",
    TargetIp => "target_ip",
    TargetPort => "target_port",
    TransportProtocol => "transport_protocol",
    EtherType => "ether_type",
    WasInitiated => "was_initiated",
    WasTerminated => "was_terminated",
    BytesFromInitiator => "bytes_from_initiator",
    PacketsFromInitiator => "packets_from_initiator",
    BytesFromTarget => "bytes_from_target",
    PacketsFromTarget => "packets_from_target",
    CumulativeBytesFromInitiator => "cumulative_bytes_from_initiator",
    CumulativePacketsFromInitiator => "cumulative_packets_from_initiator",
    CumulativeBytesFromTarget => "cumulative_bytes_from_target",
    CumulativePacketsFromTarget => "cumulative_packets_from_target",
    InstanceCrn => "instance_crn",
    NetworkInterfaceId => "network_interface_id",
    VpcCrn => "vpc_crn",
    AttachedEndpointType => "attached_endpoint_type",
    CollectorCrn => "collector_crn",
    Key => "key",
    App => "_app",
    Protocol => "protocol",
    AccountId => "account_id",
    SubnetId => "subnet_id",
    InstanceId => "instance_id",
}

impl Field {
    /// Value of this field in `record`, `None` if it is absent or empty.
    pub fn value<'a>(&self, record: &'a EnrichedFlowLog) -> Option<FieldValue<'a>> {
        let flow = &record.flow;
        let derived_fields = &record.derived;

        match self {
            Self::Version => scalar(&flow.version),
            Self::StartTime => scalar(&flow.start_time),
            Self::EndTime => scalar(&flow.end_time),
            Self::ConnectionStartTime => scalar(&flow.connection_start_time),
            Self::CaptureStartTime => scalar(&flow.capture_start_time),
            Self::CaptureEndTime => scalar(&flow.capture_end_time),
            Self::Direction => scalar(&flow.direction),
            Self::Action => scalar(&flow.action),
            Self::State => scalar(&flow.state),
            Self::InitiatorIp => scalar(&flow.initiator_ip),
            Self::InitiatorPort => scalar(&flow.initiator_port),
            Self::TargetIp => scalar(&flow.target_ip),
            Self::TargetPort => scalar(&flow.target_port),
            Self::TransportProtocol => protocol_number(&flow.transport_protocol),
            Self::EtherType => scalar(&flow.ether_type),
            Self::WasInitiated => scalar(&flow.was_initiated),
            Self::WasTerminated => scalar(&flow.was_terminated),
            Self::BytesFromInitiator => scalar(&flow.bytes_from_initiator),
            Self::PacketsFromInitiator => scalar(&flow.packets_from_initiator),
            Self::BytesFromTarget => scalar(&flow.bytes_from_target),
            Self::PacketsFromTarget => scalar(&flow.packets_from_target),
            Self::CumulativeBytesFromInitiator => scalar(&flow.cumulative_bytes_from_initiator),
            Self::CumulativePacketsFromInitiator => scalar(&flow.cumulative_packets_from_initiator),
            Self::CumulativeBytesFromTarget => scalar(&flow.cumulative_bytes_from_target),
            Self::CumulativePacketsFromTarget => scalar(&flow.cumulative_packets_from_target),
            Self::InstanceCrn => text(&flow.instance_crn),
            Self::NetworkInterfaceId => scalar(&flow.network_interface_id),
            Self::VpcCrn => scalar(&flow.vpc_crn),
            Self::AttachedEndpointType => scalar(&flow.attached_endpoint_type),
            Self::CollectorCrn => scalar(&flow.collector_crn),
            Self::Key => text(&flow.key),
            Self::App => scalar(&flow.app),
            Self::Protocol => text(&derived_fields.protocol),
            Self::AccountId => derived(&derived_fields.account_id),
            Self::SubnetId => derived(&derived_fields.subnet_id),
            Self::InstanceId => derived(&derived_fields.instance_id),
        }
    }
}

impl FromStr for Field {
    type Err = SchemaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|field| field.name() == name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const DEFAULT_FIELDS: [Field; 16] = [
    Field::Version,
    Field::StartTime,
    Field::EndTime,
    Field::AccountId,
    Field::SubnetId,
    Field::InstanceId,
    Field::Direction,
    Field::InitiatorIp,
    Field::InitiatorPort,
    Field::TargetIp,
    Field::TargetPort,
    Field::Protocol,
    Field::PacketsFromInitiator,
    Field::BytesFromInitiator,
    Field::Action,
    Field::State,
];

/// Ordered list of fields, defines both the column order and the completeness of a line.
///
/// Its textual form is a whitespace separated list of field names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Schema(Vec<Field>);

impl Schema {
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        Ok(Self(fields))
    }

    pub fn fields(&self) -> &[Field] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self(DEFAULT_FIELDS.to_vec())
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(names: &str) -> Result<Self, Self::Err> {
        let fields = names
            .split_whitespace()
            .map(Field::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(fields)
    }
}

impl TryFrom<String> for Schema {
    type Error = SchemaError;

    fn try_from(names: String) -> Result<Self, Self::Error> {
        names.parse()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Field::name).collect();
        write!(f, "{}", names.join(" "))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    schema: Schema,
}

impl Renderer {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Renders every schema field followed by a single space, [`PLACEHOLDER`] stands in for
    /// missing values. The line therefore always ends with a space and carries no newline.
    pub fn render(&self, record: &EnrichedFlowLog) -> String {
        let mut line = String::new();

        for field in self.schema.fields() {
            match field.value(record) {
                Some(value) => line.push_str(&value.to_string()),
                None => line.push_str(PLACEHOLDER),
            }
            line.push(FIELD_DELIMITER);
        }

        line
    }
}
