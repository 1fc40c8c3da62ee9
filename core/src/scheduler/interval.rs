use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::fields::parse_duration;

/// A parsed cron expression. Five-field expressions are accepted and promoted to the
/// six-field form (seconds first) the `cron` crate expects.
#[derive(Clone)]
pub struct CronSchedule {
    expr: String,
    schedule: cron::Schedule,
}

impl CronSchedule {
    pub fn parse(expr: &str) -> Result<Self, cron::error::Error> {
        let expr = expr.trim();
        let normalized = if expr.split_whitespace().count() == 5 {
            format!("0 {}", expr)
        } else {
            expr.to_string()
        };
        let schedule = cron::Schedule::from_str(&normalized)?;
        Ok(Self {
            expr: expr.to_string(),
            schedule,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }

    /// First occurrence strictly after `after`.
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(after).next()
    }
}

impl fmt::Debug for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CronSchedule").field(&self.expr).finish()
    }
}

impl PartialEq for CronSchedule {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

/// How often a stanza should run.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalSpec {
    /// No interval configured: every invocation runs the stanza.
    Always,
    /// Zero or negative is always due.
    Seconds(i64),
    Schedule(CronSchedule),
}

impl IntervalSpec {
    /// `schedule` wins over `interval` when both are set. `interval` accepts whole
    /// seconds, a duration such as `5m`, or a cron expression.
    pub fn from_params(
        interval: Option<&str>,
        schedule: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if let Some(expr) = schedule.map(str::trim).filter(|s| !s.is_empty()) {
            return CronSchedule::parse(expr)
                .map(IntervalSpec::Schedule)
                .map_err(|e| {
                    ValidationError::new(
                        "schedule",
                        format!(
                            "The value of '{}' for the 'schedule' parameter is not a valid cron expression: {}",
                            expr, e
                        ),
                    )
                });
        }

        let Some(raw) = interval.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(IntervalSpec::Always);
        };

        if let Ok(secs) = raw.parse::<i64>() {
            return Ok(IntervalSpec::Seconds(secs));
        }
        if let Ok(duration) = parse_duration(raw) {
            let secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
            return Ok(IntervalSpec::Seconds(secs));
        }
        CronSchedule::parse(raw)
            .map(IntervalSpec::Schedule)
            .map_err(|_| {
                ValidationError::new(
                    "interval",
                    format!(
                        "The value of '{}' for the 'interval' parameter is not a number of seconds, a duration or a cron expression",
                        raw
                    ),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_seconds_and_durations() {
        assert_eq!(
            IntervalSpec::from_params(Some("60"), None).unwrap(),
            IntervalSpec::Seconds(60)
        );
        assert_eq!(
            IntervalSpec::from_params(Some("-1"), None).unwrap(),
            IntervalSpec::Seconds(-1)
        );
        assert_eq!(
            IntervalSpec::from_params(Some("5m"), None).unwrap(),
            IntervalSpec::Seconds(300)
        );
    }

    #[test]
    fn missing_interval_is_always() {
        assert_eq!(IntervalSpec::from_params(None, None).unwrap(), IntervalSpec::Always);
        assert_eq!(IntervalSpec::from_params(Some("  "), Some("")).unwrap(), IntervalSpec::Always);
    }

    #[test]
    fn cron_in_interval_and_schedule_precedence() {
        match IntervalSpec::from_params(Some("*/5 * * * *"), None).unwrap() {
            IntervalSpec::Schedule(s) => assert_eq!(s.expression(), "*/5 * * * *"),
            other => panic!("expected schedule, got {other:?}"),
        }
        match IntervalSpec::from_params(Some("60"), Some("0 0 * * *")).unwrap() {
            IntervalSpec::Schedule(s) => assert_eq!(s.expression(), "0 0 * * *"),
            other => panic!("expected schedule, got {other:?}"),
        }
    }

    #[test]
    fn invalid_values_name_the_parameter() {
        let err = IntervalSpec::from_params(Some("sometimes"), None).unwrap_err();
        assert_eq!(err.field, "interval");
        let err = IntervalSpec::from_params(None, Some("not cron")).unwrap_err();
        assert_eq!(err.field, "schedule");
    }
}
