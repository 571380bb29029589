use crate::models::{ApiDefinition, ParamKind, ParamSpec, ParamValue, Params};
use chrono::{Days, NaiveDate};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TODAY_TOKEN: &str = "@today";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamViolation {
    #[error("{label} is required.")]
    Missing { name: String, label: String },

    #[error("{label} must be a date formatted YYYY-MM-DD.")]
    InvalidDate { name: String, label: String },

    #[error("{label} must be at least 1.")]
    InvalidNumber { name: String, label: String },

    #[error("Unknown parameter `{0}`.")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<ParamViolation>,
}

fn summarize(violations: &[ParamViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl ParamSpec {
    /// Resolves `defaultValue` against `today`. Relative tokens look like
    /// `@today`, `@today+7` or `@today-1`.
    pub fn resolved_default(&self, today: NaiveDate) -> Option<String> {
        let raw = self.default_value.as_deref()?;
        let Some(offset) = raw.strip_prefix(TODAY_TOKEN) else {
            return Some(raw.to_string());
        };

        let date = match offset {
            "" => Some(today),
            _ => match offset.parse::<i64>() {
                Ok(days) if days >= 0 => today.checked_add_days(Days::new(days.unsigned_abs())),
                Ok(days) => today.checked_sub_days(Days::new(days.unsigned_abs())),
                Err(_) => None,
            },
        };

        Some(
            date.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| raw.to_string()),
        )
    }

    fn check(&self, value: Option<&ParamValue>) -> Option<ParamViolation> {
        let value = match value {
            Some(value) if !value.is_blank() => value,
            _ if self.required => {
                return Some(ParamViolation::Missing {
                    name: self.name.clone(),
                    label: self.label.clone(),
                });
            }
            _ => return None,
        };

        match self.kind {
            ParamKind::Text => None,
            ParamKind::Date => {
                let valid = matches!(value, ParamValue::Text(text)
                    if NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).is_ok());
                (!valid).then(|| ParamViolation::InvalidDate {
                    name: self.name.clone(),
                    label: self.label.clone(),
                })
            }
            ParamKind::Number => {
                let valid = value.as_number().is_some_and(|n| n >= 1.0);
                (!valid).then(|| ParamViolation::InvalidNumber {
                    name: self.name.clone(),
                    label: self.label.clone(),
                })
            }
        }
    }
}

impl ApiDefinition {
    /// Fills every missing or blank parameter that has a default.
    pub fn with_defaults(&self, params: &Params, today: NaiveDate) -> Params {
        let mut filled = params.clone();
        for spec in &self.params {
            let missing = filled.get(&spec.name).is_none_or(ParamValue::is_blank);
            if missing {
                if let Some(default) = spec.resolved_default(today) {
                    filled.insert(spec.name.clone(), ParamValue::Text(default));
                }
            }
        }
        filled
    }

    /// Checks params against the schema, collecting every violation.
    pub fn validate(&self, params: &Params) -> Result<(), ValidationError> {
        let mut violations: Vec<ParamViolation> = self
            .params
            .iter()
            .filter_map(|spec| spec.check(params.get(&spec.name)))
            .collect();

        violations.extend(
            params
                .keys()
                .filter(|name| self.param(name).is_none())
                .map(|name| ParamViolation::Unknown(name.clone())),
        );

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}
