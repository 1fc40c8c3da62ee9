//! Decides whether a stanza is due for another run.

mod interval;

use chrono::{DateTime, TimeDelta, Utc};

use crate::checkpoint::CheckpointRecord;

pub use interval::{CronSchedule, IntervalSpec};

/// Scheduler for one run cycle. The wall clock is read once, when the cycle starts,
/// so every decision in the cycle sees the same instant.
#[derive(Debug, Clone, Copy)]
pub struct RunScheduler {
    now: DateTime<Utc>,
}

impl RunScheduler {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// When the stanza next becomes due. `None` means it is due now.
    pub fn next_due(
        &self,
        interval: &IntervalSpec,
        checkpoint: Option<&CheckpointRecord>,
    ) -> Option<DateTime<Utc>> {
        let last_run = checkpoint.and_then(|c| c.last_run)?;
        match interval {
            IntervalSpec::Always => None,
            IntervalSpec::Seconds(secs) if *secs <= 0 => None,
            // Too large to represent: never due again.
            IntervalSpec::Seconds(secs) => Some(
                TimeDelta::try_seconds(*secs)
                    .and_then(|delta| last_run.checked_add_signed(delta))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
            IntervalSpec::Schedule(schedule) => Some(
                schedule
                    .next_after(&last_run)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
        }
    }

    pub fn should_run(
        &self,
        stanza_name: &str,
        interval: &IntervalSpec,
        checkpoint: Option<&CheckpointRecord>,
    ) -> bool {
        let due = match self.next_due(interval, checkpoint) {
            None => true,
            Some(at) => at <= self.now,
        };
        tracing::debug!(
            target: "modinput.scheduler",
            stanza = %stanza_name,
            interval = ?interval,
            last_run = ?checkpoint.and_then(|c| c.last_run),
            now = %self.now,
            due,
            "evaluated schedule"
        );
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn ran_at(secs: i64) -> CheckpointRecord {
        CheckpointRecord {
            last_run: Some(at(secs)),
            ..CheckpointRecord::default()
        }
    }

    #[test]
    fn first_run_is_always_due() {
        let s = RunScheduler::new(at(0));
        assert!(s.should_run("a://b", &IntervalSpec::Seconds(3600), None));
        assert!(s.should_run("a://b", &IntervalSpec::Seconds(3600), Some(&CheckpointRecord::default())));
    }

    #[test]
    fn zero_and_negative_intervals_are_always_due() {
        let s = RunScheduler::new(at(0));
        let cp = ran_at(0);
        assert!(s.should_run("a://b", &IntervalSpec::Seconds(0), Some(&cp)));
        assert!(s.should_run("a://b", &IntervalSpec::Seconds(-30), Some(&cp)));
        assert!(s.should_run("a://b", &IntervalSpec::Always, Some(&cp)));
    }

    #[test]
    fn fixed_interval_boundary() {
        let cp = ran_at(0);
        let interval = IntervalSpec::Seconds(60);
        assert!(!RunScheduler::new(at(10)).should_run("a://b", &interval, Some(&cp)));
        assert!(!RunScheduler::new(at(59)).should_run("a://b", &interval, Some(&cp)));
        assert!(RunScheduler::new(at(60)).should_run("a://b", &interval, Some(&cp)));
    }

    #[test]
    fn decision_is_idempotent_within_a_cycle() {
        let s = RunScheduler::new(at(30));
        let cp = ran_at(0);
        let interval = IntervalSpec::Seconds(60);
        let first = s.should_run("a://b", &interval, Some(&cp));
        let second = s.should_run("a://b", &interval, Some(&cp));
        assert_eq!(first, second);
    }

    #[test]
    fn cron_schedule_uses_next_occurrence_after_last_run() {
        let interval = IntervalSpec::from_params(None, Some("0 * * * *")).unwrap();
        let last = Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap();
        let cp = CheckpointRecord {
            last_run: Some(last),
            ..CheckpointRecord::default()
        };

        let before = RunScheduler::new(Utc.with_ymd_and_hms(2024, 1, 1, 10, 59, 59).unwrap());
        assert!(!before.should_run("a://b", &interval, Some(&cp)));

        let after = RunScheduler::new(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());
        assert!(after.should_run("a://b", &interval, Some(&cp)));
        assert_eq!(
            after.next_due(&interval, Some(&cp)),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap())
        );
    }

    #[test]
    fn huge_interval_never_overflows() {
        let s = RunScheduler::new(at(0));
        assert!(!s.should_run("a://b", &IntervalSpec::Seconds(i64::MAX), Some(&ran_at(-10))));
    }
}
