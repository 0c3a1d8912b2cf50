//! Background scheduled tasks for the application.
//!
//! The only recurring job is the daily overdue-rental check. Call
//! `spawn_all` once during startup to launch it.

use crate::services::RentalService;
use chrono::{Duration, NaiveTime, Utc};

/// Spawn all background tasks.
///
/// Notes
/// - The overdue check fires once per day at the configured hour (UTC).
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(rental_service: RentalService, overdue_check_hour: u32) {
    {
        let svc = rental_service.clone();
        tokio::spawn(async move {
            loop {
                let wait = seconds_until_next_run(Utc::now(), overdue_check_hour);
                tokio::time::sleep(std::time::Duration::from_secs(wait)).await;
                match svc.notify_overdue_rentals().await {
                    Ok(n) if n > 0 => log::info!("Overdue rental notifications sent: {n}"),
                    Ok(_) => log::debug!("No overdue rentals found"),
                    Err(e) => log::error!("Failed to run overdue rental check: {e:?}"),
                }
            }
        });
    }
}

/// Seconds from `now` until the next occurrence of `hour:00:00` UTC.
fn seconds_until_next_run(now: chrono::DateTime<Utc>, hour: u32) -> u64 {
    let run_time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default();
    let mut next = now.date_naive().and_time(run_time).and_utc();
    if next <= now {
        next += Duration::days(1);
    }
    (next - now).num_seconds().max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn schedules_same_day_when_hour_is_ahead() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 6, 30, 0).unwrap();
        assert_eq!(seconds_until_next_run(now, 9), 2 * 3600 + 1800);
    }

    #[test]
    fn rolls_over_to_next_day_when_hour_has_passed() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap();
        assert_eq!(seconds_until_next_run(now, 9), 24 * 3600);
    }

    #[test]
    fn clamps_invalid_hours() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 22, 0, 0).unwrap();
        assert_eq!(seconds_until_next_run(now, 99), 3600);
    }
}
