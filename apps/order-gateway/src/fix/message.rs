//! Tag/value FIX messages.
//!
//! The gateway never touches framing: BodyLength (9) and CheckSum (10)
//! belong to the transport and are dropped on parse and never rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::tags::{FIX_44, header};

/// Field delimiter on the wire.
pub const SOH: char = '\u{1}';

/// Delimiter used in log output.
pub const LOG_DELIMITER: char = '|';

/// Errors parsing a rendered FIX message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixParseError {
    /// Field is not `tag=value` with a numeric tag.
    #[error("malformed field: {0:?}")]
    MalformedField(String),

    /// No MsgType (35) present.
    #[error("missing MsgType (35)")]
    MissingMsgType,
}

/// Identity of a FIX session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId {
    /// BeginString, e.g. `FIX.4.4`.
    pub begin_string: String,
    /// Our CompID.
    pub sender_comp_id: String,
    /// Counterparty CompID.
    pub target_comp_id: String,
}

impl SessionId {
    /// Create a FIX 4.4 session identity.
    #[must_use]
    pub fn new(sender_comp_id: impl Into<String>, target_comp_id: impl Into<String>) -> Self {
        Self {
            begin_string: FIX_44.to_string(),
            sender_comp_id: sender_comp_id.into(),
            target_comp_id: target_comp_id.into(),
        }
    }

    /// The same session seen from the counterparty's side.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            begin_string: self.begin_string.clone(),
            sender_comp_id: self.target_comp_id.clone(),
            target_comp_id: self.sender_comp_id.clone(),
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}->{}",
            self.begin_string, self.sender_comp_id, self.target_comp_id
        )
    }
}

/// A FIX message: BeginString and MsgType header plus ordered body fields.
///
/// Setting a tag that is already present overwrites it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixMessage {
    begin_string: String,
    msg_type: String,
    fields: Vec<(u32, String)>,
}

impl FixMessage {
    /// Create an empty FIX 4.4 message of the given type.
    #[must_use]
    pub fn new(msg_type: impl Into<String>) -> Self {
        Self {
            begin_string: FIX_44.to_string(),
            msg_type: msg_type.into(),
            fields: Vec::new(),
        }
    }

    /// BeginString.
    #[must_use]
    pub fn begin_string(&self) -> &str {
        &self.begin_string
    }

    /// MsgType.
    #[must_use]
    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    /// Set a body field.
    pub fn set(&mut self, tag: u32, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(t, _)| *t == tag) {
            Some(field) => field.1 = value,
            None => self.fields.push((tag, value)),
        }
        self
    }

    /// Builder form of [`FixMessage::set`].
    #[must_use]
    pub fn with(mut self, tag: u32, value: impl Into<String>) -> Self {
        self.set(tag, value);
        self
    }

    /// Value of a body field.
    #[must_use]
    pub fn get(&self, tag: u32) -> Option<&str> {
        self.fields
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the body carries `tag`.
    #[must_use]
    pub fn has(&self, tag: u32) -> bool {
        self.fields.iter().any(|(t, _)| *t == tag)
    }

    /// Body fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (u32, &str)> {
        self.fields.iter().map(|(t, v)| (*t, v.as_str()))
    }

    /// Render as `8=..<d>35=..<d>body..<d>`.
    #[must_use]
    pub fn render(&self, delimiter: char) -> String {
        let mut out = format!(
            "{}={}{delimiter}{}={}{delimiter}",
            header::BEGIN_STRING,
            self.begin_string,
            header::MSG_TYPE,
            self.msg_type
        );
        for (tag, value) in &self.fields {
            out.push_str(&format!("{tag}={value}{delimiter}"));
        }
        out
    }

    /// Parse a rendered message delimited by SOH or `|`.
    ///
    /// A missing BeginString defaults to FIX.4.4.
    ///
    /// # Errors
    ///
    /// Returns [`FixParseError`] if a field is malformed or MsgType is absent.
    pub fn parse(raw: &str) -> Result<Self, FixParseError> {
        let mut begin_string = None;
        let mut msg_type = None;
        let mut fields = Vec::new();

        for field in raw
            .split([SOH, LOG_DELIMITER])
            .filter(|f| !f.trim().is_empty())
        {
            let (tag, value) = field
                .split_once('=')
                .ok_or_else(|| FixParseError::MalformedField(field.to_string()))?;
            let tag: u32 = tag
                .trim()
                .parse()
                .map_err(|_| FixParseError::MalformedField(field.to_string()))?;
            match tag {
                header::BEGIN_STRING => begin_string = Some(value.to_string()),
                header::MSG_TYPE => msg_type = Some(value.to_string()),
                header::BODY_LENGTH | header::CHECK_SUM => {}
                _ => fields.push((tag, value.to_string())),
            }
        }

        Ok(Self {
            begin_string: begin_string.unwrap_or_else(|| FIX_44.to_string()),
            msg_type: msg_type.ok_or(FixParseError::MissingMsgType)?,
            fields,
        })
    }
}

impl fmt::Display for FixMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(LOG_DELIMITER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut msg = FixMessage::new("D");
        msg.set(11, "A1").set(55, "AAPL").set(11, "A2");
        assert_eq!(msg.get(11), Some("A2"));
        assert_eq!(msg.fields().map(|(t, _)| t).collect::<Vec<_>>(), vec![11, 55]);
    }

    #[test]
    fn renders_for_logs() {
        let msg = FixMessage::new("D").with(11, "A1").with(55, "AAPL");
        assert_eq!(msg.to_string(), "8=FIX.4.4|35=D|11=A1|55=AAPL|");
    }

    #[test]
    fn parses_soh_and_drops_framing() {
        let raw = "8=FIX.4.4\u{1}9=42\u{1}35=F\u{1}41=A1\u{1}11=C1\u{1}10=123\u{1}";
        let msg = FixMessage::parse(raw).unwrap();
        assert_eq!(msg.msg_type(), "F");
        assert_eq!(msg.get(41), Some("A1"));
        assert!(!msg.has(9));
        assert!(!msg.has(10));
    }

    #[test]
    fn parses_own_rendering() {
        let msg = FixMessage::new("BI").with(1, "ACC-001").with(20002, "100000.00");
        assert_eq!(FixMessage::parse(&msg.render(SOH)).unwrap(), msg);
    }

    #[test]
    fn value_may_contain_equals() {
        let msg = FixMessage::parse("35=9|58=a=b|").unwrap();
        assert_eq!(msg.get(58), Some("a=b"));
        assert_eq!(msg.begin_string(), "FIX.4.4");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            FixMessage::parse("8=FIX.4.4|11=A1|"),
            Err(FixParseError::MissingMsgType)
        );
        assert!(matches!(
            FixMessage::parse("35=D|garbage|"),
            Err(FixParseError::MalformedField(_))
        ));
        assert!(matches!(
            FixMessage::parse("35=D|x=1|"),
            Err(FixParseError::MalformedField(_))
        ));
    }

    #[test]
    fn session_id_display() {
        let session = SessionId::new("GATEWAY", "CLIENT");
        assert_eq!(session.to_string(), "FIX.4.4:GATEWAY->CLIENT");
        assert_eq!(session.reversed().to_string(), "FIX.4.4:CLIENT->GATEWAY");
    }
}
