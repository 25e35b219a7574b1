use crate::errors::{EntsoeError, Result};
use crate::models::resolution::{Resolution, SamplingInterval};
use chrono::{DateTime, Duration, Months, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;

/// Build the half-open `[start, end)` timestamp index of one TimeSeries block.
///
/// With `tz` set, the sequence is generated in that zone so calendar steps and
/// DST transitions follow local civil time; the result is always returned in
/// UTC. Minute and weekly steps are fixed durations, monthly and yearly steps
/// are calendar months anchored at `start`.
///
/// A weekly index whose timestamps carry more than one UTC offset loses its
/// trailing element: the week holding the autumn transition lasts 169 hours
/// and would otherwise yield one slot more than the block has points.
pub fn build_datetime_index<T: TimeZone>(
    start: &DateTime<T>,
    end: &DateTime<T>,
    resolution: Resolution,
    tz: Option<Tz>,
) -> Result<Vec<DateTime<Utc>>> {
    let zone = tz.unwrap_or(Tz::UTC);
    let start = start.with_timezone(&zone);
    let end = end.with_timezone(&zone);

    let mut index = generate_range(&start, &end, resolution.interval())?;

    // 必须在转换为 UTC 之前检测，此时偏移量仍是本地时区的
    if resolution == Resolution::Week && spans_dst_transition(&index) {
        index.pop();
    }

    Ok(index.into_iter().map(|d| d.with_timezone(&Utc)).collect())
}

fn generate_range(
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    interval: SamplingInterval,
) -> Result<Vec<DateTime<Tz>>> {
    let mut index = Vec::new();

    match interval.fixed_duration() {
        Some(step) => {
            let mut current = start.clone();
            while current < *end {
                index.push(current.clone());
                current = current + step;
            }
        }
        None => {
            let zone = start.timezone();
            let anchor = start.naive_local();
            let mut n: u32 = 0;
            loop {
                let naive = anchor
                    .checked_add_months(Months::new(interval.amount * n))
                    .ok_or_else(|| EntsoeError::DataError(format!("Date out of range: {} + {} months", anchor, interval.amount * n)))?;
                let current = resolve_local(&zone, naive)?;
                if current >= *end {
                    break;
                }
                index.push(current);
                n += 1;
            }
        }
    }

    Ok(index)
}

// 本地时间落在夏令时跳变的空档中时，顺延一小时
fn resolve_local(zone: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .ok_or_else(|| EntsoeError::DataError(format!("Local time {} does not exist in {}", naive, zone)))
}

fn spans_dst_transition(index: &[DateTime<Tz>]) -> bool {
    let offsets: HashSet<i32> = index
        .iter()
        .map(|d| d.offset().fix().local_minus_utc())
        .collect();
    offsets.len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn berlin(y: i32, m: u32, d: u32) -> DateTime<Tz> {
        Berlin.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_hourly_day_in_utc() {
        let index = build_datetime_index(&utc(2021, 1, 1, 0), &utc(2021, 1, 2, 0), Resolution::Minute60, None).unwrap();
        assert_eq!(index.len(), 24);
        assert_eq!(index[0], utc(2021, 1, 1, 0));
        assert_eq!(index[23], utc(2021, 1, 1, 23));
    }

    #[test]
    fn test_length_matches_span_over_interval() {
        let start = utc(2021, 6, 1, 0);
        let end = utc(2021, 6, 3, 0);
        for (res, minutes) in [
            (Resolution::Minute15, 15),
            (Resolution::Minute30, 30),
            (Resolution::Minute60, 60),
        ] {
            let index = build_datetime_index(&start, &end, res, None).unwrap();
            assert_eq!(index.len() as i64, (end - start).num_minutes() / minutes);
        }
    }

    #[test]
    fn test_end_is_exclusive() {
        let index = build_datetime_index(&utc(2021, 1, 1, 0), &utc(2021, 1, 1, 0), Resolution::Minute15, None).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_short_local_day_has_23_hours() {
        let index = build_datetime_index(&berlin(2021, 3, 28), &berlin(2021, 3, 29), Resolution::Minute60, Some(Berlin)).unwrap();
        assert_eq!(index.len(), 23);
        assert_eq!(index[0], utc(2021, 3, 27, 23));
        assert_eq!(index[22], utc(2021, 3, 28, 21));
    }

    #[test]
    fn test_weekly_trims_extra_slot_across_autumn_transition() {
        // 7 个本地周，10 月 31 日回拨一小时，总长 1177 小时
        let start = berlin(2021, 10, 4);
        let end = berlin(2021, 11, 22);

        let index = build_datetime_index(&start, &end, Resolution::Week, Some(Berlin)).unwrap();
        assert_eq!(index.len(), 7);
        assert_eq!(index[0], utc(2021, 10, 3, 22));
        assert_eq!(index[6], utc(2021, 11, 14, 22));

        // 在 UTC 中生成时没有偏移量变化，不裁剪
        let untrimmed = build_datetime_index(&start, &end, Resolution::Week, None).unwrap();
        assert_eq!(untrimmed.len(), 8);
    }

    #[test]
    fn test_weekly_without_transition_is_untouched() {
        let index = build_datetime_index(&berlin(2021, 5, 3), &berlin(2021, 6, 21), Resolution::Week, Some(Berlin)).unwrap();
        assert_eq!(index.len(), 7);
        assert_eq!(index[0], utc(2021, 5, 2, 22));
    }

    #[test]
    fn test_weekly_single_slot_across_spring_transition() {
        // 167 小时的周只能生成一个时间戳，单一偏移量，不触发裁剪
        let index = build_datetime_index(&berlin(2021, 3, 28), &berlin(2021, 4, 4), Resolution::Week, Some(Berlin)).unwrap();
        assert_eq!(index, vec![utc(2021, 3, 27, 23)]);
    }

    #[test]
    fn test_monthly_follows_local_calendar() {
        let index = build_datetime_index(&utc(2020, 12, 31, 23), &utc(2021, 12, 31, 23), Resolution::Month, Some(Berlin)).unwrap();
        assert_eq!(index.len(), 12);
        assert_eq!(index[0], utc(2020, 12, 31, 23));
        assert_eq!(index[3], utc(2021, 3, 31, 22));
        assert_eq!(index[11], utc(2021, 11, 30, 23));
    }

    #[test]
    fn test_monthly_in_utc() {
        let index = build_datetime_index(&utc(2021, 1, 1, 0), &utc(2021, 4, 1, 0), Resolution::Month, None).unwrap();
        assert_eq!(index, vec![utc(2021, 1, 1, 0), utc(2021, 2, 1, 0), utc(2021, 3, 1, 0)]);
    }

    #[test]
    fn test_yearly_is_twelve_months() {
        let index = build_datetime_index(&utc(2019, 12, 31, 23), &utc(2021, 12, 31, 23), Resolution::Year, Some(Berlin)).unwrap();
        assert_eq!(index, vec![utc(2019, 12, 31, 23), utc(2020, 12, 31, 23)]);
    }
}
