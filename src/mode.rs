use crate::error::NetworkError;
use crate::person::{PersonRecord, non_empty};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects which parent reference is authoritative for one computation pass.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Parent is the person who evangelized/referred this person.
    #[default]
    Evangelism,
    /// Parent is this person's leader.
    Discipleship,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Evangelism, Mode::Discipleship];

    /// Active parent reference of `record` under this mode.
    ///
    /// Empty references count as absent.
    pub fn parent_id_of<'r>(&self, record: &'r PersonRecord) -> Option<&'r str> {
        let raw = match self {
            Mode::Evangelism => record.parent_id_evangelism.as_deref(),
            Mode::Discipleship => record.parent_id_discipleship.as_deref(),
        };
        non_empty(raw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Evangelism => "evangelism",
            Mode::Discipleship => "discipleship",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "evangelism" | "evangelismo" => Ok(Mode::Evangelism),
            "discipleship" | "discipulado" => Ok(Mode::Discipleship),
            other => Err(NetworkError::invalid_argument(format!(
                "unknown mode '{}', expected 'evangelism' or 'discipleship'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_field_by_mode() {
        let record = PersonRecord::create("b", "Bia").evangelized_by("a").led_by("l");
        assert_eq!(Mode::Evangelism.parent_id_of(&record), Some("a"));
        assert_eq!(Mode::Discipleship.parent_id_of(&record), Some("l"));
    }

    #[test]
    fn empty_reference_is_absent() {
        let record = PersonRecord::create("b", "Bia").evangelized_by("  ");
        assert_eq!(Mode::Evangelism.parent_id_of(&record), None);
    }

    #[test]
    fn parses_known_modes_and_rejects_others() {
        assert_eq!("Discipleship".parse::<Mode>().unwrap(), Mode::Discipleship);
        assert_eq!("evangelismo".parse::<Mode>().unwrap(), Mode::Evangelism);
        let err = "leadership".parse::<Mode>().unwrap_err();
        assert!(matches!(err, NetworkError::InvalidArgument(_)));
    }
}
