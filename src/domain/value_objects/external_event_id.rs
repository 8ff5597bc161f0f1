use std::fmt;

pub const MAX_EVENT_ID_LEN: usize = 255;

/// Identifier assigned to a webhook event by the upstream provider (e.g. `evt_1Nq...`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExternalEventId(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalEventIdError {
    Empty,
    TooLong,
    SurroundingWhitespace,
    ControlCharacter,
}

impl ExternalEventId {
    /// Validate a raw identifier. The value is kept verbatim; nothing is trimmed or folded.
    pub fn parse(raw: &str) -> Result<Self, ExternalEventIdError> {
        if raw.is_empty() {
            return Err(ExternalEventIdError::Empty);
        }
        if raw.len() > MAX_EVENT_ID_LEN {
            return Err(ExternalEventIdError::TooLong);
        }
        if raw.trim() != raw {
            return Err(ExternalEventIdError::SurroundingWhitespace);
        }
        if raw.chars().any(char::is_control) {
            return Err(ExternalEventIdError::ControlCharacter);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExternalEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ExternalEventIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ExternalEventIdError::Empty => "event id is empty",
            ExternalEventIdError::TooLong => "event id is longer than 255 bytes",
            ExternalEventIdError::SurroundingWhitespace => "event id has surrounding whitespace",
            ExternalEventIdError::ControlCharacter => "event id contains a control character",
        };
        f.write_str(msg)
    }
}
