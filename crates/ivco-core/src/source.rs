use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Where the figures in an envelope came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Pure computation over caller-supplied inputs.
    Local,
    /// Financial Modeling Prep statements API.
    Fmp,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Fmp => "fmp",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
