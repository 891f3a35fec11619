use std::{fmt::Display, str::FromStr};

use crate::SepaError;

/// The ISO 20022 message definitions this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schema {
    /// pain.001.001.03, customer credit transfer initiation.
    #[default]
    Pain00100103,
    /// pain.001.001.04, customer credit transfer initiation.
    Pain00100104,
    /// pain.008.001.02, customer direct debit initiation.
    Pain00800102,
}

impl Schema {
    pub fn name(&self) -> &'static str {
        match self {
            Schema::Pain00100103 => "pain.001.001.03",
            Schema::Pain00100104 => "pain.001.001.04",
            Schema::Pain00800102 => "pain.008.001.02",
        }
    }

    /// The default namespace of the `Document` root for this schema.
    pub fn urn(&self) -> String {
        format!("urn:iso:std:iso:20022:tech:xsd:{}", self.name())
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Schema {
    type Err = SepaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pain.001.001.03" => Ok(Schema::Pain00100103),
            "pain.001.001.04" => Ok(Schema::Pain00100104),
            "pain.008.001.02" => Ok(Schema::Pain00800102),
            other => Err(SepaError::UnsupportedSchema(other.to_string())),
        }
    }
}
