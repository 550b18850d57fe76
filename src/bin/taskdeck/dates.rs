//! Due-date argument parsing.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which instant of a bare calendar date to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    /// 00:00:00 in the configured offset.
    Start,
    /// 23:59:59 in the configured offset.
    End,
}

/// Parses an RFC 3339 instant or a `YYYY-MM-DD` date interpreted at
/// `boundary` in `offset`.
pub fn parse_date_input(
    input: &str,
    offset: FixedOffset,
    boundary: DayBoundary,
) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.to_utc());
    }
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .with_context(|| format!("'{input}' is neither YYYY-MM-DD nor an RFC 3339 instant"))?;
    let time = match boundary {
        DayBoundary::Start => NaiveTime::MIN,
        DayBoundary::End => NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| anyhow!("end-of-day time is invalid"))?,
    };
    date.and_time(time)
        .and_local_timezone(offset)
        .single()
        .map(|local| local.to_utc())
        .ok_or_else(|| anyhow!("'{input}' does not map to a single instant"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> eyre::Result<DateTime<Utc>> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .ok_or_else(|| eyre::eyre!("invalid test instant"))
    }

    #[rstest]
    fn bare_date_ends_the_day_in_the_offset() -> eyre::Result<()> {
        let offset = FixedOffset::west_opt(3 * 3600).ok_or_else(|| eyre::eyre!("offset"))?;
        let parsed = parse_date_input("2024-06-10", offset, DayBoundary::End)
            .map_err(|err| eyre::eyre!("{err:#}"))?;
        eyre::ensure!(parsed == utc(2024, 6, 11, 2, 59, 59)?, "got {parsed}");
        Ok(())
    }

    #[rstest]
    fn bare_date_starts_the_day_in_the_offset() -> eyre::Result<()> {
        let offset = FixedOffset::east_opt(0).ok_or_else(|| eyre::eyre!("offset"))?;
        let parsed = parse_date_input("2024-06-10", offset, DayBoundary::Start)
            .map_err(|err| eyre::eyre!("{err:#}"))?;
        eyre::ensure!(parsed == utc(2024, 6, 10, 0, 0, 0)?, "got {parsed}");
        Ok(())
    }

    #[rstest]
    fn rfc3339_ignores_the_boundary() -> eyre::Result<()> {
        let offset = FixedOffset::east_opt(0).ok_or_else(|| eyre::eyre!("offset"))?;
        let parsed = parse_date_input("2024-06-10T12:30:00+02:00", offset, DayBoundary::End)
            .map_err(|err| eyre::eyre!("{err:#}"))?;
        eyre::ensure!(parsed == utc(2024, 6, 10, 10, 30, 0)?, "got {parsed}");
        Ok(())
    }

    #[rstest]
    #[case("tomorrow")]
    #[case("2024-13-01")]
    #[case("")]
    fn rejects_unrecognised_input(#[case] input: &str) {
        let offset = FixedOffset::east_opt(0);
        assert!(offset.is_some_and(|value| {
            parse_date_input(input, value, DayBoundary::End).is_err()
        }));
    }
}
