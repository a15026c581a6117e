//! ID categories and reset policies.

use std::fmt;
use std::str::FromStr;

use super::error::SequenceError;

/// Entity types that receive generated human-readable identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdCategory {
    /// Employee numbers.
    Employee,
    /// Payroll run identifiers.
    Payroll,
    /// Leave request identifiers.
    Leave,
    /// Expense claim identifiers.
    Expense,
    /// Shift identifiers.
    Shift,
    /// Department codes.
    DepartmentCode,
}

/// When a category's counter starts over at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetPolicy {
    /// One counter for the lifetime of the organization.
    Never,
    /// A new counter each calendar year.
    Yearly,
    /// A new counter each calendar month.
    Monthly,
}

impl IdCategory {
    /// Every category, in settings-column order.
    pub const ALL: [Self; 6] = [
        Self::Employee,
        Self::Payroll,
        Self::Leave,
        Self::Expense,
        Self::Shift,
        Self::DepartmentCode,
    ];

    /// Wire name used in URLs and in the `id_sequences.sequence_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Payroll => "payroll",
            Self::Leave => "leave",
            Self::Expense => "expense",
            Self::Shift => "shift",
            Self::DepartmentCode => "department-code",
        }
    }

    /// Built-in pattern used when the organization has not configured one.
    #[must_use]
    pub const fn default_pattern(self) -> &'static str {
        match self {
            Self::Employee => "{ORG}-EMP-{YEAR}-{SEQUENCE:5}",
            Self::Payroll => "{ORG}-PAY-{YEAR}{MONTH}-{SEQUENCE:4}",
            Self::Leave => "{ORG}-LV-{YEAR}-{SEQUENCE:5}",
            Self::Expense => "{ORG}-EXP-{YEAR}-{SEQUENCE:5}",
            Self::Shift => "{ORG}-SH-{YYYYMMDD}-{SEQUENCE:3}",
            Self::DepartmentCode => "{ORG}-DEPT-{SEQUENCE:3}",
        }
    }

    /// Reset policy applied when the pattern carries no month-level placeholder.
    #[must_use]
    pub const fn default_reset_policy(self) -> ResetPolicy {
        match self {
            Self::Employee | Self::DepartmentCode => ResetPolicy::Never,
            Self::Payroll | Self::Leave | Self::Expense | Self::Shift => ResetPolicy::Yearly,
        }
    }
}

impl fmt::Display for IdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdCategory {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "employee" => Ok(Self::Employee),
            "payroll" => Ok(Self::Payroll),
            "leave" => Ok(Self::Leave),
            "expense" => Ok(Self::Expense),
            "shift" => Ok(Self::Shift),
            "department-code" => Ok(Self::DepartmentCode),
            _ => Err(SequenceError::UnknownCategory(s.to_string())),
        }
    }
}

impl ResetPolicy {
    /// Lower-case name for API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
