use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Verdict of a range comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Pass,
    Fail,
}

impl VerificationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl Display for VerificationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed vs expected intrinsic value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub status: VerificationStatus,
    pub computed_low: i64,
    pub computed_high: i64,
    pub expected_low: i64,
    pub expected_high: i64,
    pub diff_low: i64,
    pub diff_high: i64,
    pub tolerance: u64,
}

impl VerificationOutcome {
    pub const fn passed(&self) -> bool {
        matches!(self.status, VerificationStatus::Pass)
    }
}

/// Compare both bounds against expectations; each signed difference must be
/// within `tolerance`. A difference outside `i64` is
/// [`DomainError::Overflow`].
pub fn verify_range(
    computed_low: i64,
    computed_high: i64,
    expected_low: i64,
    expected_high: i64,
    tolerance: u64,
) -> Result<VerificationOutcome, DomainError> {
    let overflow = DomainError::Overflow {
        operation: "range difference",
    };
    let diff_low = computed_low
        .checked_sub(expected_low)
        .ok_or_else(|| overflow.clone())?;
    let diff_high = computed_high.checked_sub(expected_high).ok_or(overflow)?;
    let passed = diff_low.unsigned_abs() <= tolerance && diff_high.unsigned_abs() <= tolerance;

    Ok(VerificationOutcome {
        status: if passed {
            VerificationStatus::Pass
        } else {
            VerificationStatus::Fail
        },
        computed_low,
        computed_high,
        expected_low,
        expected_high,
        diff_low,
        diff_high,
        tolerance,
    })
}
