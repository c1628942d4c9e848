//! Wire message model and text codec.
//!
//! The chain speaks a deliberately simplified, `|`-separated text protocol:
//!
//! ```text
//! QUERY|<id>|<domain>
//! RESPONSE|<id>|<domain>|IP|<address>
//! RESPONSE|<id>|<domain>|NS|<TLD or AUTH>:<host>:<port>
//! RESPONSE|<id>|<domain>|ERROR|<reason>
//! ```
//!
//! Closed-world assumption: domain names and error text never contain the
//! `|` separator. This is not validated; a value that violates it changes
//! the field count and the peer rejects the frame as malformed.

use crate::errors::ResolveError;
use std::fmt;
use std::str::FromStr;

/// Which kind of server a delegation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegationRole {
    Tld,
    Auth,
}

impl DelegationRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tld => "TLD",
            Self::Auth => "AUTH",
        }
    }
}

impl fmt::Display for DelegationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A referral to the next server in the chain, carried as the value of an
/// `NS` result in the `role:host:port` sub-format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub role: DelegationRole,
    pub host: String,
    pub port: u16,
}

impl Delegation {
    pub fn new(role: DelegationRole, host: impl Into<String>, port: u16) -> Self {
        Self {
            role,
            host: host.into(),
            port,
        }
    }

    /// The `host:port` form accepted by the transport layer.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Delegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.role, self.host, self.port)
    }
}

impl FromStr for Delegation {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [role, host, port] = parts.as_slice() else {
            return Err(ResolveError::MalformedMessage(format!(
                "invalid delegation '{s}'"
            )));
        };
        let role = match *role {
            "TLD" => DelegationRole::Tld,
            "AUTH" => DelegationRole::Auth,
            other => {
                return Err(ResolveError::MalformedMessage(format!(
                    "unknown delegation role '{other}'"
                )))
            }
        };
        let port = port.parse::<u16>().map_err(|_| {
            ResolveError::MalformedMessage(format!("invalid delegation port '{port}'"))
        })?;
        Ok(Delegation::new(role, *host, port))
    }
}

/// Splits a `host:port` address string from configuration or CLI flags.
pub fn split_host_port(s: &str) -> Option<(&str, u16)> {
    let (host, port_str) = s.rsplit_once(':')?;
    let port = port_str.parse::<u16>().ok()?;
    Some((host, port))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Caller-assigned correlation id, unique per caller session only.
    pub id: u64,
    pub domain: String,
}

impl Query {
    pub fn new(id: u64, domain: impl Into<String>) -> Self {
        Self {
            id,
            domain: domain.into(),
        }
    }
}

/// Exactly one of the three result variants, never more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseResult {
    Ip(String),
    Ns(Delegation),
    Error(String),
}

impl ResponseResult {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ip(_) => "IP",
            Self::Ns(_) => "NS",
            Self::Error(_) => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: u64,
    pub domain: String,
    pub result: ResponseResult,
}

impl Response {
    pub fn ip(id: u64, domain: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            domain: domain.into(),
            result: ResponseResult::Ip(address.into()),
        }
    }

    pub fn delegation(id: u64, domain: impl Into<String>, delegation: Delegation) -> Self {
        Self {
            id,
            domain: domain.into(),
            result: ResponseResult::Ns(delegation),
        }
    }

    pub fn error(id: u64, domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id,
            domain: domain.into(),
            result: ResponseResult::Error(reason.into()),
        }
    }
}

/// The unit exchanged between any two participants in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Query(Query),
    Response(Response),
}

impl Message {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Message::Query(q) => format!("QUERY|{}|{}", q.id, q.domain).into_bytes(),
            Message::Response(r) => {
                let value = match &r.result {
                    ResponseResult::Ip(address) => address.clone(),
                    ResponseResult::Ns(delegation) => delegation.to_string(),
                    ResponseResult::Error(reason) => reason.clone(),
                };
                format!(
                    "RESPONSE|{}|{}|{}|{}",
                    r.id,
                    r.domain,
                    r.result.kind(),
                    value
                )
                .into_bytes()
            }
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ResolveError> {
        let text = std::str::from_utf8(bytes).map_err(|_| {
            ResolveError::MalformedMessage("frame is not valid UTF-8".to_string())
        })?;
        let parts: Vec<&str> = text.split('|').collect();
        match parts.as_slice() {
            ["QUERY", id, domain] => Ok(Message::Query(Query {
                id: parse_id(id)?,
                domain: (*domain).to_string(),
            })),
            ["RESPONSE", id, domain, kind, value] => {
                let result = match *kind {
                    "IP" => ResponseResult::Ip((*value).to_string()),
                    "NS" => ResponseResult::Ns(value.parse()?),
                    "ERROR" => ResponseResult::Error((*value).to_string()),
                    other => {
                        return Err(ResolveError::MalformedMessage(format!(
                            "unknown result kind '{other}'"
                        )))
                    }
                };
                Ok(Message::Response(Response {
                    id: parse_id(id)?,
                    domain: (*domain).to_string(),
                    result,
                }))
            }
            ["QUERY", ..] | ["RESPONSE", ..] => Err(ResolveError::MalformedMessage(format!(
                "wrong field count for {} frame: {}",
                parts[0],
                parts.len()
            ))),
            _ => Err(ResolveError::MalformedMessage(format!(
                "unknown message type '{}'",
                parts.first().unwrap_or(&"")
            ))),
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Message::Query(q) => q.id,
            Message::Response(r) => r.id,
        }
    }

    pub fn domain(&self) -> &str {
        match self {
            Message::Query(q) => &q.domain,
            Message::Response(r) => &r.domain,
        }
    }
}

fn parse_id(s: &str) -> Result<u64, ResolveError> {
    s.parse::<u64>()
        .map_err(|_| ResolveError::MalformedMessage(format!("invalid query id '{s}'")))
}
