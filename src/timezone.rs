use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The current UTC offset of `canonical_timezone`, or `None` if the name is unknown.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`, e.g. "Asia/Jakarta".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the timezone name is not known.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use crate::Error;

    use super::{get_local_offset, local_today};

    #[test]
    fn jakarta_is_seven_hours_ahead() {
        let offset = get_local_offset("Asia/Jakarta").unwrap();

        assert_eq!(offset.whole_hours(), 7);
    }

    #[test]
    fn utc_today_matches_system_date() {
        let before = OffsetDateTime::now_utc().date();
        let today = local_today("Etc/UTC").unwrap();
        let after = OffsetDateTime::now_utc().date();

        assert!(today == before || today == after);
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(
            local_today("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
