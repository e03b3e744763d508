//! Mapping-table configuration: parsed once before the bridge starts,
//! immutable afterwards.
//!
//! The document shape follows the YAML mapping format: one `osc_target`
//! address plus an ordered list of `mappings`, each pairing a (cc, value)
//! trigger with an ordered list of OSC actions. Action values are resolved
//! into [`OscValue`] while parsing, so the sending side never sees an
//! untyped value.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// OSC argument value, decided at parse time from the document's type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum OscValue {
    Int(i32),
    Float(f32),
    Str(String),
    Bool(bool),
}

impl OscValue {
    /// The OSC 1.0 type tag character for this value.
    #[inline]
    pub fn type_tag(&self) -> char {
        match self {
            OscValue::Int(_) => 'i',
            OscValue::Float(_) => 'f',
            OscValue::Str(_) => 's',
            OscValue::Bool(true) => 'T',
            OscValue::Bool(false) => 'F',
        }
    }
}

/// A single outbound action: destination path plus typed argument.
#[derive(Debug, Clone, PartialEq)]
pub struct OscAction {
    pub path: String,
    pub value: OscValue,
}

/// Transport scheme of an OSC destination. Only TCP is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Tcp,
}

/// Parsed OSC destination address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OscAddress {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl OscAddress {
    /// Parse `osc.tcp://host:port`. Any other scheme token is rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let rest = s.strip_prefix("osc.tcp://").ok_or_else(|| {
            Error::InvalidAddress(s.to_string(), "only the osc.tcp:// scheme is supported".into())
        })?;
        let (host, port) = rest
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidAddress(s.to_string(), "expected host:port".into()))?;
        if host.is_empty() {
            return Err(Error::InvalidAddress(s.to_string(), "empty host".into()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| Error::InvalidAddress(s.to_string(), "invalid port".into()))?;
        Ok(Self {
            scheme: Scheme::Tcp,
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for OscAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "osc.tcp://{}:{}", self.host, self.port)
    }
}

/// A configured (controller, value) trigger and its outbound actions.
///
/// Actions sit behind an `Arc` so a match can hand them to the queue
/// without allocating on the realtime path.
#[derive(Debug, Clone)]
pub struct Rule {
    pub controller: u8,
    pub trigger_value: u8,
    pub actions: Arc<[OscAction]>,
}

/// The immutable mapping table plus destination, shared read-only by the
/// realtime producer and the sender worker.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub destination: Arc<OscAddress>,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    osc_target: String,
    #[serde(default)]
    mappings: Vec<RawMapping>,
}

#[derive(Debug, Deserialize)]
struct RawMapping {
    cc: u8,
    value: u8,
    #[serde(default)]
    actions: Vec<RawAction>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    path: String,
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    value: Option<serde_yaml::Value>,
}

impl ConfigSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = fs::read_to_string(path)?;
        Self::from_yaml(&doc)
    }

    /// Parse a mapping document. Structural problems are errors; an action
    /// with an unknown type tag or a value that does not match its tag is
    /// skipped with a warning, leaving sibling actions intact.
    pub fn from_yaml(doc: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(doc)?;
        let destination = Arc::new(OscAddress::parse(&raw.osc_target)?);
        let rules = raw
            .mappings
            .into_iter()
            .map(|mapping| Rule {
                controller: mapping.cc,
                trigger_value: mapping.value,
                actions: mapping.actions.into_iter().filter_map(convert_action).collect(),
            })
            .collect();
        Ok(Self { destination, rules })
    }
}

fn convert_action(raw: RawAction) -> Option<OscAction> {
    match typed_value(&raw.tag, raw.value.as_ref()) {
        Ok(value) => Some(OscAction {
            path: raw.path,
            value,
        }),
        Err(reason) => {
            warn!(
                "skipping unusable action for {} (type '{}'): {}",
                raw.path, raw.tag, reason
            );
            None
        }
    }
}

fn typed_value(
    tag: &str,
    value: Option<&serde_yaml::Value>,
) -> std::result::Result<OscValue, String> {
    match tag {
        "i" => value
            .and_then(serde_yaml::Value::as_i64)
            .and_then(|n| i32::try_from(n).ok())
            .map(OscValue::Int)
            .ok_or_else(|| "expected a 32-bit integer value".to_string()),
        "f" => value
            .and_then(serde_yaml::Value::as_f64)
            .map(|n| OscValue::Float(n as f32))
            .ok_or_else(|| "expected a numeric value".to_string()),
        "s" => value
            .and_then(serde_yaml::Value::as_str)
            .map(|s| OscValue::Str(s.to_string()))
            .ok_or_else(|| "expected a string value".to_string()),
        // T/F carry the value in the tag itself; any `value:` field is ignored
        "T" => Ok(OscValue::Bool(true)),
        "F" => Ok(OscValue::Bool(false)),
        other => Err(format!("unsupported OSC type tag '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
osc_target: osc.tcp://127.0.0.1:22752
mappings:
  - cc: 27
    value: 127
    actions:
      - path: /Carla_Patchbay_4/0/set_active
        type: i
        value: 1
  - cc: 28
    value: 127
    actions:
      - path: /mixer/gain
        type: f
        value: 0.5
      - path: /mixer/label
        type: s
        value: vocals
      - path: /mixer/mute
        type: T
"#;

    #[test]
    fn test_parse_fixture() {
        let config = ConfigSnapshot::from_yaml(FIXTURE).unwrap();
        assert_eq!(config.destination.host, "127.0.0.1");
        assert_eq!(config.destination.port, 22752);
        assert_eq!(config.rules.len(), 2);

        let rule = &config.rules[0];
        assert_eq!(rule.controller, 27);
        assert_eq!(rule.trigger_value, 127);
        assert_eq!(rule.actions.len(), 1);
        assert_eq!(rule.actions[0].path, "/Carla_Patchbay_4/0/set_active");
        assert_eq!(rule.actions[0].value, OscValue::Int(1));

        let rule = &config.rules[1];
        assert_eq!(rule.actions.len(), 3);
        assert_eq!(rule.actions[0].value, OscValue::Float(0.5));
        assert_eq!(rule.actions[1].value, OscValue::Str("vocals".into()));
        assert_eq!(rule.actions[2].value, OscValue::Bool(true));
    }

    #[test]
    fn test_bad_action_is_skipped_not_fatal() {
        let doc = r#"
osc_target: osc.tcp://localhost:9000
mappings:
  - cc: 1
    value: 1
    actions:
      - path: /a
        type: i
        value: not-a-number
      - path: /b
        type: x
        value: 1
      - path: /c
        type: i
        value: 2
"#;
        let config = ConfigSnapshot::from_yaml(doc).unwrap();
        let rule = &config.rules[0];
        // The mismatch and the unknown tag are dropped, the sibling survives
        assert_eq!(rule.actions.len(), 1);
        assert_eq!(rule.actions[0].path, "/c");
        assert_eq!(rule.actions[0].value, OscValue::Int(2));
    }

    #[test]
    fn test_integer_accepted_for_float_tag() {
        let doc = r#"
osc_target: osc.tcp://localhost:9000
mappings:
  - cc: 1
    value: 1
    actions:
      - path: /a
        type: f
        value: 3
"#;
        let config = ConfigSnapshot::from_yaml(doc).unwrap();
        assert_eq!(config.rules[0].actions[0].value, OscValue::Float(3.0));
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        assert!(ConfigSnapshot::from_yaml("mappings: []").is_err());
        assert!(ConfigSnapshot::from_yaml(": not yaml :").is_err());
    }

    #[test]
    fn test_address_parsing() {
        let addr = OscAddress::parse("osc.tcp://192.168.1.10:4000").unwrap();
        assert_eq!(addr.scheme, Scheme::Tcp);
        assert_eq!(addr.host, "192.168.1.10");
        assert_eq!(addr.port, 4000);
        assert_eq!(addr.to_string(), "osc.tcp://192.168.1.10:4000");
    }

    #[test]
    fn test_address_rejections() {
        // UDP and bare schemes are load-time errors
        assert!(OscAddress::parse("osc.udp://localhost:9000").is_err());
        assert!(OscAddress::parse("tcp://localhost:9000").is_err());
        assert!(OscAddress::parse("osc.tcp://localhost").is_err());
        assert!(OscAddress::parse("osc.tcp://:9000").is_err());
        assert!(OscAddress::parse("osc.tcp://localhost:notaport").is_err());
        assert!(OscAddress::parse("osc.tcp://localhost:99999").is_err());
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(OscValue::Int(1).type_tag(), 'i');
        assert_eq!(OscValue::Float(1.0).type_tag(), 'f');
        assert_eq!(OscValue::Str("x".into()).type_tag(), 's');
        assert_eq!(OscValue::Bool(true).type_tag(), 'T');
        assert_eq!(OscValue::Bool(false).type_tag(), 'F');
    }
}
