// SPDX-License-Identifier: Apache-2.0

//! Module result severity, `util` (no security significance) through
//! `high` (identifiable security risk).

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Util,
    Low,
    Med,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Util => "util",
            Severity::Low => "low",
            Severity::Med => "med",
            Severity::High => "high",
        }
    }

    /// Parse the `--min-sev` CLI values (`low`/`med`/`high`; `util` is
    /// not a selectable minimum since it carries no security meaning).
    pub fn parse_min_sev(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "med" => Some(Severity::Med),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_util_below_high() {
        assert!(Severity::Util < Severity::Low);
        assert!(Severity::Low < Severity::Med);
        assert!(Severity::Med < Severity::High);
    }
}
