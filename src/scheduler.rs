use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use log::{debug, error, info, warn};
use crate::cancel::CancelToken;
use crate::config::{Config, IntervalPolicy, ScheduleParameters};
use crate::forecast_csv::parse_forecast_csv;
use crate::initialization::Mgr;

/// Result of one fetch-parse-persist cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// The cycle persisted this many forecast entries
    Stored(usize),
    /// The cycle produced nothing to persist, e.g. rate limit denial
    NoData,
    /// A step failed, already logged, the next cycle is the retry
    Failed,
}

/// Runs the fetch-parse-persist loop until the token is cancelled.
///
/// The first cycle executes immediately. After each cycle the delay to the
/// next one is computed according to the configured interval policy and
/// slept through interruptibly. No cycle failure terminates the loop.
///
/// # Arguments
///
/// * 'config' - the full configuration
/// * 'mgr' - the managers performing the cycle steps
/// * 'cancel' - token observed between cycles and during sleeps
pub fn run(config: &Config, mgr: &mut Mgr, cancel: &CancelToken) {
    run_cycle(config, mgr, cancel);

    while !cancel.is_cancelled() {
        let delay = next_delay(&config.schedule, Utc::now());
        info!("next fetch at {} which is in {}", Utc::now() + delay, readable(delay));

        let slept = match delay.to_std() {
            Ok(duration) => cancel.sleep(duration),
            Err(_) => true,
        };
        if !slept {
            break;
        }

        run_cycle(config, mgr, cancel);
    }

    info!("scheduler stopped");
}

/// Executes one cycle and maps every step failure onto a logged outcome
/// instead of letting it escape the loop
///
/// # Arguments
///
/// * 'config' - the full configuration
/// * 'mgr' - the managers performing the cycle steps
/// * 'cancel' - token bounding the rate limit denial wait
fn run_cycle(config: &Config, mgr: &mut Mgr, cancel: &CancelToken) -> CycleOutcome {
    debug!("fetching pv forecast data");

    let csv = match mgr.cbase.get_forecast_csv(cancel) {
        Ok(Some(csv)) => csv,
        Ok(None) => return CycleOutcome::NoData,
        Err(e) => {
            error!("failed to fetch new photovoltaic production forecast data: {}", e);
            return CycleOutcome::Failed;
        }
    };

    let entries = match parse_forecast_csv(&csv) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("discarding malformed forecast document: {}", e);
            return CycleOutcome::Failed;
        }
    };

    if !config.database.enabled {
        info!("database disabled, discarding {} forecast entries", entries.len());
        return CycleOutcome::NoData;
    }

    match mgr.store.persist(&entries) {
        Ok(()) => {
            info!("stored {} forecast entries", entries.len());
            CycleOutcome::Stored(entries.len())
        }
        Err(e) => {
            error!("{}", e);
            CycleOutcome::Failed
        }
    }
}

/// Computes the delay until the next cycle.
///
/// The relative policy always yields the configured interval. The absolute
/// policy anchors at today's configured start hour and advances the anchor
/// by the interval until it is strictly in the future, which keeps the
/// firing times wall-clock aligned instead of drifting.
///
/// # Arguments
///
/// * 'schedule' - the schedule parameters
/// * 'now' - the current time
pub fn next_delay(schedule: &ScheduleParameters, now: DateTime<Utc>) -> TimeDelta {
    match schedule.interval_policy {
        IntervalPolicy::Relative => TimeDelta::milliseconds(schedule.interval_millis),
        IntervalPolicy::Absolute => {
            let midnight = now.duration_trunc(TimeDelta::days(1)).unwrap_or(now);
            let mut anchor = midnight + TimeDelta::hours(schedule.absolute_start_hour as i64);

            let step = TimeDelta::milliseconds(schedule.interval_millis);
            while anchor <= now {
                anchor += step;
            }

            anchor - now
        }
    }
}

/// Formats a delay as a readable days/hours/minutes/seconds string
///
/// # Arguments
///
/// * 'delay' - the delay to format
fn readable(delay: TimeDelta) -> String {
    format!(
        "{} days, {:02} hours, {:02} minutes, {:02} seconds",
        delay.num_days(),
        delay.num_hours() % 24,
        delay.num_minutes() % 60,
        delay.num_seconds() % 60,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(policy: IntervalPolicy, interval_millis: i64, start_hour: u32) -> ScheduleParameters {
        ScheduleParameters {
            interval_policy: policy,
            interval_millis,
            absolute_start_hour: start_hour,
            timeout_millis: 60_000,
            rate_limit_per_hour: 10,
        }
    }

    fn at(time: &str) -> DateTime<Utc> {
        time.parse().unwrap()
    }

    #[test]
    fn relative_policy_yields_the_configured_interval() {
        let delay = next_delay(
            &schedule(IntervalPolicy::Relative, 10_800_000, 0),
            at("2024-01-01T07:15:00Z"),
        );

        assert_eq!(delay, TimeDelta::hours(3));
    }

    #[test]
    fn absolute_policy_advances_the_anchor_past_now() {
        // anchor hour 0, three hour interval: fire times 00, 03, 06, 09, ...
        let delay = next_delay(
            &schedule(IntervalPolicy::Absolute, 10_800_000, 0),
            at("2024-01-01T07:15:00Z"),
        );

        assert_eq!(delay, TimeDelta::minutes(105));
    }

    #[test]
    fn absolute_policy_keeps_a_future_anchor_as_is() {
        let delay = next_delay(
            &schedule(IntervalPolicy::Absolute, 10_800_000, 9),
            at("2024-01-01T07:15:00Z"),
        );

        assert_eq!(delay, TimeDelta::minutes(105));
    }

    #[test]
    fn absolute_anchor_exactly_now_is_not_in_the_future() {
        let delay = next_delay(
            &schedule(IntervalPolicy::Absolute, 10_800_000, 7),
            at("2024-01-01T07:00:00Z"),
        );

        assert_eq!(delay, TimeDelta::hours(3));
    }

    #[test]
    fn absolute_policy_rolls_over_to_the_next_day() {
        let delay = next_delay(
            &schedule(IntervalPolicy::Absolute, 10_800_000, 0),
            at("2024-01-01T23:30:00Z"),
        );

        // last anchor today is 21:00, the next one is tomorrow 00:00
        assert_eq!(delay, TimeDelta::minutes(30));
    }

    #[test]
    fn readable_spells_out_the_components() {
        let delay = TimeDelta::days(1) + TimeDelta::hours(2) + TimeDelta::minutes(3) + TimeDelta::seconds(4);
        assert_eq!(readable(delay), "1 days, 02 hours, 03 minutes, 04 seconds");
    }
}
