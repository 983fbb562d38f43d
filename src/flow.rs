use core::fmt;

use serde::Deserialize;

/// Verbatim value of a flow log column.
///
/// Collectors do not agree on the JSON type of a column, a port may arrive as a number or
/// as a numeric string and a version as a string or a number. Any JSON scalar is accepted
/// and kept as it was received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Flag(true) => write!(f, "True"),
            Self::Flag(false) => write!(f, "False"),
            Self::Unsigned(n) => write!(f, "{}", n),
            Self::Signed(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// IANA protocol number as it appears in a flow log.
///
/// Collectors emit it either as a JSON number or as a numeric string, both are accepted.
/// Any other scalar is kept in `Other` and never resolves to a code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProtocolNumber {
    Number(u64),
    Text(String),
    Other(Scalar),
}

impl ProtocolNumber {
    /// Numeric code, `None` if the value is not a valid IANA number.
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Number(n) => u8::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse::<u8>().ok(),
            Self::Other(_) => None,
        }
    }
}

impl From<u8> for ProtocolNumber {
    fn from(code: u8) -> Self {
        Self::Number(u64::from(code))
    }
}

impl fmt::Display for ProtocolNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Other(scalar) => write!(f, "{}", scalar),
        }
    }
}

/// Single flow log record, one connection observed over one time window.
///
/// Every field is optional, a missing key and an explicit JSON `null` both decode to `None`.
/// Keys that are not listed here are ignored. The composite fields `key` and `instance_crn`
/// are parsed further and must be strings, every other column is carried verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowLog {
    /// When the first byte in the flow log was captured (RFC 3339)
    pub start_time: Option<Scalar>,
    /// When the last byte in the flow log was captured (RFC 3339)
    pub end_time: Option<Scalar>,
    /// When the first byte of the whole connection was captured (RFC 3339)
    pub connection_start_time: Option<Scalar>,

    /// `I` for inbound or `O` for outbound
    pub direction: Option<Scalar>,
    /// `accepted` or `rejected`
    pub action: Option<Scalar>,

    pub initiator_ip: Option<Scalar>,
    pub target_ip: Option<Scalar>,
    pub initiator_port: Option<Scalar>,
    pub target_port: Option<Scalar>,

    pub transport_protocol: Option<ProtocolNumber>,
    pub ether_type: Option<Scalar>,

    pub was_initiated: Option<Scalar>,
    pub was_terminated: Option<Scalar>,

    /// Counters within the flow log time window
    pub bytes_from_initiator: Option<Scalar>,
    pub packets_from_initiator: Option<Scalar>,
    pub bytes_from_target: Option<Scalar>,
    pub packets_from_target: Option<Scalar>,

    /// Counters since the connection was initiated
    pub cumulative_bytes_from_initiator: Option<Scalar>,
    pub cumulative_packets_from_initiator: Option<Scalar>,
    pub cumulative_bytes_from_target: Option<Scalar>,
    pub cumulative_packets_from_target: Option<Scalar>,

    /// Collector meta fields
    pub instance_crn: Option<String>,
    pub network_interface_id: Option<Scalar>,
    pub vpc_crn: Option<Scalar>,
    pub state: Option<Scalar>,
    pub attached_endpoint_type: Option<Scalar>,
    pub version: Option<Scalar>,
    pub collector_crn: Option<Scalar>,
    pub key: Option<String>,
    #[serde(rename = "_app")]
    pub app: Option<Scalar>,
    pub capture_start_time: Option<Scalar>,
    pub capture_end_time: Option<Scalar>,
}
