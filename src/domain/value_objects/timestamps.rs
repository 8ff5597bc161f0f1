use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A UTC instant. Every timestamp crossing the domain boundary is normalized to UTC.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    pub fn now_utc() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn from(dt: OffsetDateTime) -> Self {
        Self(dt.to_offset(UtcOffset::UTC))
    }

    /// Returns the inner UTC `OffsetDateTime` without consuming the wrapper.
    pub fn as_inner(&self) -> OffsetDateTime {
        self.0
    }

    /// The instant `age` before this one. Records created before it are past retention.
    /// Saturates at the earliest representable instant.
    pub fn cutoff(&self, age: Duration) -> Self {
        Self(
            self.0
                .checked_sub(age)
                .unwrap_or_else(|| PrimitiveDateTime::MIN.assume_utc()),
        )
    }

    /// Saturates at the latest representable instant.
    pub fn plus(&self, delta: Duration) -> Self {
        Self(
            self.0
                .checked_add(delta)
                .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc()),
        )
    }
}
