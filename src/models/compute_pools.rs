use super::base::{BaseMut, FieldSpec, Record, UnknownFields};
use super::coerce;
use crate::error::{Result, SdkError};
use crate::resources::ResourceKind;
use crate::sql::WithClause;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComputePool {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub intended_state: Option<String>,
    pub actual_state: Option<String>,
    pub error_messages: Option<String>,
    pub size: Option<String>,
    /// Seconds
    pub timeout: Option<i64>,
    pub min_units: Option<i64>,
    pub max_units: Option<i64>,
    pub auto_suspend: Option<bool>,
    pub auto_suspend_minutes: Option<i64>,
}

impl ComputePool {
    pub fn is_running(&self) -> bool {
        self.actual_state
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("running"))
    }
}

static COMPUTE_POOL_FIELDS: &[FieldSpec<ComputePool>] = &[
    FieldSpec {
        synonyms: &["intendedstate"],
        apply: |r, v| r.intended_state = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["actualstate", "state", "status"],
        apply: |r, v| r.actual_state = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["errormessages", "errormessage"],
        apply: |r, v| r.error_messages = coerce::non_empty_string(v),
    },
    FieldSpec {
        synonyms: &["size"],
        apply: |r, v| r.size = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["timeout"],
        apply: |r, v| r.timeout = coerce::integer(v),
    },
    FieldSpec {
        synonyms: &["minunits"],
        apply: |r, v| r.min_units = coerce::integer(v),
    },
    FieldSpec {
        synonyms: &["maxunits"],
        apply: |r, v| r.max_units = coerce::integer(v),
    },
    FieldSpec {
        synonyms: &["autosuspend"],
        apply: |r, v| r.auto_suspend = coerce::boolean(v),
    },
    FieldSpec {
        synonyms: &["autosuspendminutes"],
        apply: |r, v| r.auto_suspend_minutes = coerce::integer(v),
    },
];

impl Record for ComputePool {
    const KIND: ResourceKind = ResourceKind::ComputePool;
    const UNKNOWN_FIELDS: UnknownFields = UnknownFields::Drop;

    fn fields() -> &'static [FieldSpec<Self>] {
        COMPUTE_POOL_FIELDS
    }

    fn base_mut(&mut self) -> BaseMut<'_> {
        BaseMut {
            name: &mut self.name,
            created_at: &mut self.created_at,
            updated_at: &mut self.updated_at,
            owner: &mut self.owner,
            comment: &mut self.comment,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sizing fields shared by create and update
#[derive(Debug, Clone, Default, PartialEq)]
struct Sizing<'a> {
    size: Option<&'a str>,
    min_units: Option<u32>,
    max_units: Option<u32>,
    auto_suspend: Option<bool>,
    auto_suspend_minutes: Option<u32>,
}

impl Sizing<'_> {
    fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_units, self.max_units) {
            if min > max {
                return Err(SdkError::invalid(format!(
                    "min.units ({}) must not exceed max.units ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    fn write(&self, clause: &mut WithClause) {
        clause
            .set_opt("size", self.size)
            .set_opt("min.units", self.min_units)
            .set_opt("max.units", self.max_units)
            .set_opt("auto.suspend", self.auto_suspend)
            .set_opt("auto.suspend.minutes", self.auto_suspend_minutes);
    }
}

/// Parameters for `CREATE COMPUTE_POOL`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputePoolCreateParams {
    pub name: String,
    pub size: Option<String>,
    pub min_units: Option<u32>,
    pub max_units: Option<u32>,
    pub auto_suspend: Option<bool>,
    pub auto_suspend_minutes: Option<u32>,
    pub parameters: WithClause,
    pub comment: Option<String>,
}

impl ComputePoolCreateParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn units(mut self, min: u32, max: u32) -> Self {
        self.min_units = Some(min);
        self.max_units = Some(max);
        self
    }

    pub fn auto_suspend_after(mut self, minutes: u32) -> Self {
        self.auto_suspend = Some(true);
        self.auto_suspend_minutes = Some(minutes);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.set(key, value);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    fn sizing(&self) -> Sizing<'_> {
        Sizing {
            size: self.size.as_deref(),
            min_units: self.min_units,
            max_units: self.max_units,
            auto_suspend: self.auto_suspend,
            auto_suspend_minutes: self.auto_suspend_minutes,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::invalid("compute pool name must not be empty"));
        }
        self.sizing().validate()
    }

    pub fn to_with_clause(&self) -> WithClause {
        let mut clause = WithClause::new();
        self.sizing().write(&mut clause);
        clause.extend(&self.parameters);
        clause
    }
}

/// Changes for an existing compute pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputePoolUpdateParams {
    pub size: Option<String>,
    pub min_units: Option<u32>,
    pub max_units: Option<u32>,
    pub auto_suspend: Option<bool>,
    pub auto_suspend_minutes: Option<u32>,
    pub parameters: WithClause,
    pub comment: Option<String>,
}

impl ComputePoolUpdateParams {
    pub fn new() -> Self {
        Self::default()
    }

    fn sizing(&self) -> Sizing<'_> {
        Sizing {
            size: self.size.as_deref(),
            min_units: self.min_units,
            max_units: self.max_units,
            auto_suspend: self.auto_suspend,
            auto_suspend_minutes: self.auto_suspend_minutes,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.sizing().validate()
    }

    pub fn to_with_clause(&self) -> WithClause {
        let mut clause = WithClause::new();
        self.sizing().write(&mut clause);
        clause.extend(&self.parameters);
        clause
    }
}
