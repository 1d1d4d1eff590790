//! Debt categories and their upstream descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class of marketable government security
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtCategory {
    Bills,
    Notes,
    Bonds,
    Tips,
}

impl DebtCategory {
    pub const ALL: [DebtCategory; 4] = [
        DebtCategory::Bills,
        DebtCategory::Notes,
        DebtCategory::Bonds,
        DebtCategory::Tips,
    ];

    /// Categories used by the default balance sheet (no TIPS)
    pub const MARKETABLE_NOMINAL: [DebtCategory; 3] =
        [DebtCategory::Bonds, DebtCategory::Notes, DebtCategory::Bills];

    /// Short lowercase name used in column headers and scenario files
    pub fn slug(&self) -> &'static str {
        match self {
            DebtCategory::Bills => "bills",
            DebtCategory::Notes => "notes",
            DebtCategory::Bonds => "bonds",
            DebtCategory::Tips => "tips",
        }
    }

    /// Security description used by the fiscal data provider
    /// (average interest rates and interest expense datasets)
    pub fn fiscal_data_desc(&self) -> &'static str {
        match self {
            DebtCategory::Bills => "Treasury Bills",
            DebtCategory::Notes => "Treasury Notes",
            DebtCategory::Bonds => "Treasury Bonds",
            DebtCategory::Tips => "Treasury Inflation-Protected Securities (TIPS)",
        }
    }

    /// Security description used by the securities outstanding summary
    pub fn home_treasury_desc(&self) -> &'static str {
        match self {
            DebtCategory::Bills => "Bills",
            DebtCategory::Notes => "Notes",
            DebtCategory::Bonds => "Bonds",
            DebtCategory::Tips => "Treasury Inflation-Protected Securities",
        }
    }
}

impl fmt::Display for DebtCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DebtCategory::Bills => "T-Bills",
            DebtCategory::Notes => "T-Notes",
            DebtCategory::Bonds => "T-Bonds",
            DebtCategory::Tips => "TIPS",
        };
        f.write_str(name)
    }
}

impl FromStr for DebtCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        DebtCategory::ALL
            .into_iter()
            .find(|c| {
                needle.eq_ignore_ascii_case(c.slug())
                    || needle.eq_ignore_ascii_case(&c.to_string())
                    || needle == c.fiscal_data_desc()
                    || needle == c.home_treasury_desc()
            })
            .ok_or_else(|| format!("Unknown debt category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_all_names() {
        assert_eq!("bills".parse::<DebtCategory>().unwrap(), DebtCategory::Bills);
        assert_eq!("T-Notes".parse::<DebtCategory>().unwrap(), DebtCategory::Notes);
        assert_eq!("Treasury Bonds".parse::<DebtCategory>().unwrap(), DebtCategory::Bonds);
        assert_eq!(
            "Treasury Inflation-Protected Securities".parse::<DebtCategory>().unwrap(),
            DebtCategory::Tips
        );
        assert!("Munis".parse::<DebtCategory>().is_err());
    }
}
