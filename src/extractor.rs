//! Derivation of the fields that are embedded in composite flow log values.
//!
//! The storage `key` looks like
//! `ibm_vpc_flowlogs_v1/account=ACCT/region=us-south/vpc-id=VPC/subnet-id=ZONE%3ASUBNET/...`
//! and the `instance_crn` ends with `...:instance:INSTANCE_ID`. Positions inside both
//! of them are fixed, nothing is searched by name.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::Deserialize;

use crate::errors::{CompositeField, InputFormatError, ProtocolTableError};
use crate::flow::{FlowLog, ProtocolNumber};

const SEGMENT_DELIMITER: char = '/';
const ANNOTATION_DELIMITER: char = '=';
const IDENTIFIER_DELIMITER: char = ':';
const ESCAPED_COLON: &str = "%3A";

const ACCOUNT_SEGMENT: usize = 1;
const SUBNET_SEGMENT: usize = 4;

/// Mapping of IANA protocol numbers to their mnemonics.
///
/// When deserialized from configuration the configured entries are laid over the defaults,
/// so a deployment can add or rename protocols but never loses TCP and UDP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, String>")]
pub struct ProtocolTable(BTreeMap<u8, String>);

impl ProtocolTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u8, S)>,
        S: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(code, name)| (code, name.into()))
                .collect(),
        )
    }

    pub fn lookup(&self, number: &ProtocolNumber) -> Option<&str> {
        number
            .code()
            .and_then(|code| self.0.get(&code))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ProtocolTable {
    fn default() -> Self {
        // https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml
        Self::new([(6, "TCP"), (17, "UDP")])
    }
}

impl TryFrom<HashMap<String, String>> for ProtocolTable {
    type Error = ProtocolTableError;

    fn try_from(entries: HashMap<String, String>) -> Result<Self, Self::Error> {
        let mut table = Self::default();

        for (number, name) in entries {
            let code = number
                .trim()
                .parse::<u8>()
                .map_err(|_| ProtocolTableError::InvalidNumber(number.clone()))?;

            if name.trim().is_empty() {
                return Err(ProtocolTableError::EmptyName(code));
            }
            table.0.insert(code, name);
        }

        Ok(table)
    }
}

/// Fields that are computed from a [`FlowLog`] rather than read from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFields {
    /// `None` when the protocol number is not known
    pub protocol: Option<String>,
    pub account_id: String,
    pub subnet_id: String,
    pub instance_id: String,
}

/// Flow log together with its derived fields, the input of the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedFlowLog {
    pub flow: FlowLog,
    pub derived: DerivedFields,
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    protocols: ProtocolTable,
}

impl Extractor {
    pub fn new(protocols: ProtocolTable) -> Self {
        Self { protocols }
    }

    pub fn protocols(&self) -> &ProtocolTable {
        &self.protocols
    }

    /// Derives the protocol mnemonic and the account, subnet and instance identifiers.
    ///
    /// Fails when `key` or `instance_crn` is absent or does not have the segments the
    /// identifiers are read from. There is no partial result.
    pub fn extract(&self, flow: FlowLog) -> Result<EnrichedFlowLog, InputFormatError> {
        let key = flow.key.as_deref().ok_or(InputFormatError::Missing {
            field: CompositeField::Key,
        })?;
        let account_id = annotated_value(key, ACCOUNT_SEGMENT)?.to_string();
        let subnet_id = unescape_subnet(annotated_value(key, SUBNET_SEGMENT)?).to_string();

        let crn = flow
            .instance_crn
            .as_deref()
            .ok_or(InputFormatError::Missing {
                field: CompositeField::InstanceCrn,
            })?;
        let instance_id = instance_id(crn).to_string();

        let protocol = flow
            .transport_protocol
            .as_ref()
            .and_then(|number| self.protocols.lookup(number))
            .map(str::to_string);

        if let (None, Some(number)) = (&protocol, &flow.transport_protocol) {
            debug!("unknown transport protocol: {}", number);
        }

        debug!(
            "derived account_id: {}, subnet_id: {}, instance_id: {}, protocol: {:?}",
            account_id, subnet_id, instance_id, protocol
        );

        Ok(EnrichedFlowLog {
            flow,
            derived: DerivedFields {
                protocol,
                account_id,
                subnet_id,
                instance_id,
            },
        })
    }
}

/// Value of the `name=value` pair stored at `segment` of the storage key.
fn annotated_value(key: &str, segment: usize) -> Result<&str, InputFormatError> {
    let annotated = key
        .split(SEGMENT_DELIMITER)
        .nth(segment)
        .ok_or(InputFormatError::MissingSegment {
            field: CompositeField::Key,
            segment,
        })?;

    annotated
        .split(ANNOTATION_DELIMITER)
        .nth(1)
        .ok_or(InputFormatError::MissingValue {
            field: CompositeField::Key,
            segment,
        })
}

/// Subnet values are `ZONE%3ASUBNET`, only the part after the escaped colon is kept.
fn unescape_subnet(value: &str) -> &str {
    let escaped_colons = value.matches(ESCAPED_COLON).count();
    if escaped_colons > 1 {
        warn!(
            "subnet value [{}] carries {} escaped colons, keeping the last piece",
            value, escaped_colons
        );
    }

    value.rsplit(ESCAPED_COLON).next().unwrap_or(value)
}

fn instance_id(crn: &str) -> &str {
    let resource = crn.rsplit(SEGMENT_DELIMITER).next().unwrap_or(crn);
    resource
        .rsplit(IDENTIFIER_DELIMITER)
        .next()
        .unwrap_or(resource)
}
