// SPDX-License-Identifier: Apache-2.0

//! Criterion operators and the typed parameters they carry.

use bitflags::bitflags;
use secpol_model::mls::{MlsRange, RangeRelation};

/// How a string-expression name is matched. The literal placeholder
/// `"X"` stands for the current candidate element's own name and is
/// substituted at evaluation time, before matching.
#[derive(Debug, Clone)]
pub enum NameMatch {
    Exact(String),
    Glob(String),
    Regex(String),
}

impl NameMatch {
    fn text(&self) -> &str {
        match self {
            NameMatch::Exact(s) | NameMatch::Glob(s) | NameMatch::Regex(s) => s,
        }
    }

    /// Substitute the `"X"` placeholder for `subject`, if this match's
    /// text is exactly that placeholder.
    pub fn substituted(&self, subject: &str) -> NameMatch {
        if self.text() == "X" {
            let owned = subject.to_string();
            return match self {
                NameMatch::Exact(_) => NameMatch::Exact(owned),
                NameMatch::Glob(_) => NameMatch::Glob(owned),
                NameMatch::Regex(_) => NameMatch::Regex(owned),
            };
        }
        self.clone()
    }
}

bitflags! {
    /// Rule-kind bitmask parameter: AV and TE rule kinds share one mask
    /// since a `rule-type` criterion can appear on either test kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RuleKindMask: u16 {
        const ALLOW            = 1 << 0;
        const AUDITALLOW       = 1 << 1;
        const DONTAUDIT        = 1 << 2;
        const NEVERALLOW       = 1 << 3;
        const TYPE_TRANSITION  = 1 << 4;
        const TYPE_CHANGE      = 1 << 5;
        const TYPE_MEMBER      = 1 << 6;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Include,
    Exclude,
    Source,
    Target,
    SourceOrTarget,
    Default,
    Class,
    Perm,
    Type,
    RuleType,
    RangeExact,
    RangeSub,
    RangeSuper,
    RangeOverlap,
    BoolState,
}

impl Operator {
    pub fn range_relation(self) -> Option<RangeRelation> {
        match self {
            Operator::RangeExact => Some(RangeRelation::Exact),
            Operator::RangeSub => Some(RangeRelation::Sub),
            Operator::RangeSuper => Some(RangeRelation::Super),
            Operator::RangeOverlap => Some(RangeRelation::Overlap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Param {
    Names(Vec<NameMatch>),
    Number(i64),
    RuleKind(RuleKindMask),
    /// The relation to test for is derived from the criterion's
    /// [`Operator`] (`RangeExact`/`RangeSub`/`RangeSuper`/`RangeOverlap`),
    /// not carried redundantly here.
    Range(MlsRange),
    BoolState(bool),
}

/// A single criterion: an operator, its parameter, and whether the whole
/// criterion is negated.
#[derive(Debug, Clone)]
pub struct Criterion {
    pub operator: Operator,
    pub negate: bool,
    pub param: Param,
}

impl Criterion {
    pub fn new(operator: Operator, param: Param) -> Self {
        Criterion {
            operator,
            negate: false,
            param,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn apply(&self, raw: bool) -> bool {
        if self.negate {
            !raw
        } else {
            raw
        }
    }
}
