use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use crate::errors::{EntsoeError, Result};

/// API 查询参数使用的时间格式 (YYYYMMDDHHmm)
pub const PERIOD_FORMAT: &str = "%Y%m%d%H%M";

/// 字符串解析结果：带时区或不带时区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDateTime {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl ParsedDateTime {
    /// 不带时区的时间按 UTC 处理
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            ParsedDateTime::Aware(dt) => dt.with_timezone(&Utc),
            ParsedDateTime::Naive(naive) => Utc.from_utc_datetime(naive),
        }
    }
}

const AWARE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const UTC_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ"];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    PERIOD_FORMAT,
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Parse a timestamp string in the shapes ENTSOE and its callers use:
/// RFC 3339, `2021-03-27T23:00Z`, plain dates and naive date-times.
pub fn parse_datetime(s: &str) -> Result<ParsedDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedDateTime::Aware(dt));
    }
    for fmt in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(ParsedDateTime::Aware(dt));
        }
    }
    for fmt in UTC_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ParsedDateTime::Aware(Utc.from_utc_datetime(&naive).fixed_offset()));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ParsedDateTime::Naive(naive));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(ParsedDateTime::Naive(date.and_time(chrono::NaiveTime::MIN)));
        }
    }

    Err(EntsoeError::DataError(format!("Invalid datetime: {}", s)))
}

/// A value usable as `periodStart` / `periodEnd`.
///
/// Zoned values are converted to UTC before formatting; naive values are
/// formatted as they are.
pub trait PeriodBoundary {
    fn to_period_str(&self) -> Result<String>;
}

impl<Tz: TimeZone> PeriodBoundary for DateTime<Tz> {
    fn to_period_str(&self) -> Result<String> {
        Ok(self.with_timezone(&Utc).format(PERIOD_FORMAT).to_string())
    }
}

impl PeriodBoundary for NaiveDateTime {
    fn to_period_str(&self) -> Result<String> {
        Ok(self.format(PERIOD_FORMAT).to_string())
    }
}

impl PeriodBoundary for NaiveDate {
    fn to_period_str(&self) -> Result<String> {
        self.and_time(chrono::NaiveTime::MIN).to_period_str()
    }
}

impl PeriodBoundary for ParsedDateTime {
    fn to_period_str(&self) -> Result<String> {
        match self {
            ParsedDateTime::Aware(dt) => dt.to_period_str(),
            ParsedDateTime::Naive(naive) => naive.to_period_str(),
        }
    }
}

impl PeriodBoundary for str {
    fn to_period_str(&self) -> Result<String> {
        parse_datetime(self)?.to_period_str()
    }
}

impl PeriodBoundary for String {
    fn to_period_str(&self) -> Result<String> {
        self.as_str().to_period_str()
    }
}

impl<T: PeriodBoundary + ?Sized> PeriodBoundary for &T {
    fn to_period_str(&self) -> Result<String> {
        (**self).to_period_str()
    }
}

/// 格式化为 API 查询参数 (YYYYMMDDHHmm, UTC)
pub fn datetime_to_str<T: PeriodBoundary + ?Sized>(dt: &T) -> Result<String> {
    dt.to_period_str()
}

// Arrow数据转换工具
pub mod arrow_utils {
    use super::*;
    use crate::models::series::LoadSeries;
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use arrow::array::ArrayRef;
    use arrow_array::{Float64Array, TimestampMillisecondArray};
    use arrow::record_batch::RecordBatch;
    use arrow::ipc::reader::FileReader;
    use arrow::ipc::writer::FileWriter;
    use log::info;
    use std::fs::File;
    use std::io::{Cursor, Read, Seek, Write};
    use std::path::Path;
    use std::sync::Arc;

    fn series_schema() -> Schema {
        Schema::new(vec![
            Field::new("timestamp", DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())), false),
            Field::new("quantity", DataType::Float64, false),
        ])
    }

    // 将负荷序列转换为Arrow记录批次
    pub fn series_to_record_batch(series: &LoadSeries) -> Result<RecordBatch> {
        let timestamps: Vec<i64> = series.iter().map(|p| p.timestamp.timestamp_millis()).collect();
        let quantities: Vec<f64> = series.iter().map(|p| p.quantity).collect();

        let timestamp_array: ArrayRef = Arc::new(TimestampMillisecondArray::from(timestamps).with_timezone("UTC"));
        let quantity_array: ArrayRef = Arc::new(Float64Array::from(quantities));

        RecordBatch::try_new(Arc::new(series_schema()), vec![timestamp_array, quantity_array])
            .map_err(|e| EntsoeError::ArrowError(e.to_string()))
    }

    fn read_batches<R: Read + Seek>(reader: R) -> Result<LoadSeries> {
        let reader = FileReader::try_new(reader, None)
            .map_err(|e| EntsoeError::ArrowError(e.to_string()))?;

        let mut series = LoadSeries::new();

        for batch in reader {
            let batch = batch.map_err(|e| EntsoeError::ArrowError(e.to_string()))?;

            let timestamp_array = batch.column_by_name("timestamp")
                .and_then(|a| a.as_any().downcast_ref::<TimestampMillisecondArray>())
                .ok_or_else(|| EntsoeError::ArrowError("Failed to downcast timestamp column".to_string()))?;
            let quantity_array = batch.column_by_name("quantity")
                .and_then(|a| a.as_any().downcast_ref::<Float64Array>())
                .ok_or_else(|| EntsoeError::ArrowError("Failed to downcast quantity column".to_string()))?;

            for i in 0..batch.num_rows() {
                let millis = timestamp_array.value(i);
                let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
                    .ok_or_else(|| EntsoeError::ArrowError(format!("Timestamp out of range: {}", millis)))?;
                series.insert(timestamp, quantity_array.value(i));
            }
        }

        Ok(series)
    }

    fn write_batch<W: Write>(series: &LoadSeries, writer: W) -> Result<()> {
        let batch = series_to_record_batch(series)?;

        let mut writer = FileWriter::try_new(writer, &batch.schema())
            .map_err(|e| EntsoeError::ArrowError(e.to_string()))?;
        writer.write(&batch)
            .map_err(|e| EntsoeError::ArrowError(e.to_string()))?;
        writer.finish()
            .map_err(|e| EntsoeError::ArrowError(e.to_string()))?;

        Ok(())
    }

    // 将负荷序列保存到Arrow文件
    pub fn save_series_to_arrow<P: AsRef<Path>>(series: &LoadSeries, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Saving {} points to {}", series.len(), path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        write_batch(series, File::create(path)?)
    }

    // 从Arrow文件读取负荷序列
    pub fn read_series_from_arrow<P: AsRef<Path>>(path: P) -> Result<LoadSeries> {
        read_batches(File::open(path)?)
    }

    pub fn series_to_memory(series: &LoadSeries) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        write_batch(series, &mut buf)?;
        Ok(buf)
    }

    // 从内存中读取Arrow数据
    pub fn read_series_from_memory(data: &[u8]) -> Result<LoadSeries> {
        read_batches(Cursor::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;

    #[test]
    fn test_aware_inputs_agree_after_conversion() {
        let in_utc = Utc.with_ymd_and_hms(2021, 3, 27, 23, 0, 0).unwrap();
        let in_berlin = Berlin.with_ymd_and_hms(2021, 3, 28, 0, 0, 0).unwrap();

        assert_eq!(datetime_to_str(&in_utc).unwrap(), "202103272300");
        assert_eq!(datetime_to_str(&in_berlin).unwrap(), datetime_to_str(&in_utc).unwrap());
        assert_eq!(datetime_to_str("2021-03-28T00:00:00+01:00").unwrap(), "202103272300");
    }

    #[test]
    fn test_naive_inputs_are_formatted_as_is() {
        let naive = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(6, 30, 0).unwrap();
        assert_eq!(datetime_to_str(&naive).unwrap(), "202101010630");
        assert_eq!(datetime_to_str("2021-01-01").unwrap(), "202101010000");
        assert_eq!(datetime_to_str("2021-01-01 06:30").unwrap(), "202101010630");
        assert_eq!(datetime_to_str(&NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).unwrap(), "202101010000");
    }

    #[test]
    fn test_parse_entsoe_interval_boundary() {
        let parsed = parse_datetime("2021-03-27T23:00Z").unwrap();
        assert_eq!(parsed.to_utc(), Utc.with_ymd_and_hms(2021, 3, 27, 23, 0, 0).unwrap());
        assert!(matches!(parsed, ParsedDateTime::Aware(_)));
    }

    #[test]
    fn test_parse_invalid_datetime() {
        assert!(parse_datetime("yesterday").is_err());
        assert!(datetime_to_str("2021-13-45").is_err());
    }

    #[test]
    fn test_arrow_memory_round_trip() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 1, 1, 1, 0, 0).unwrap();
        let series: crate::models::series::LoadSeries = vec![(t0, 100.5), (t1, 101.25)].into_iter().collect();

        let bytes = arrow_utils::series_to_memory(&series).unwrap();
        let restored = arrow_utils::read_series_from_memory(&bytes).unwrap();
        assert_eq!(restored, series);
    }
}
