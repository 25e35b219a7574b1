use crate::models::resolution::Resolution;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::BTreeMap;

/// TimeSeries 块中的一个数据点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: i64,
    pub quantity: f64,
}

/// One `<TimeSeries>` fragment of an API response.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBlock {
    pub resolution: Resolution,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub points: Vec<Point>,
}

/// 负荷序列中的一个 (时间, 数值) 对
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LoadPoint {
    pub timestamp: DateTime<Utc>,
    pub quantity: f64,
}

/// UTC timestamp → quantity, unique and sorted by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSeries {
    values: BTreeMap<DateTime<Utc>, f64>,
}

impl LoadSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, timestamp: &DateTime<Utc>) -> Option<f64> {
        self.values.get(timestamp).copied()
    }

    /// 插入一个点；时间戳已存在时覆盖旧值并返回旧值
    pub fn insert(&mut self, timestamp: DateTime<Utc>, quantity: f64) -> Option<f64> {
        self.values.insert(timestamp, quantity)
    }

    /// 追加另一个序列（按文档顺序，后者覆盖重复时间戳）
    pub fn append(&mut self, other: LoadSeries) {
        self.values.extend(other.values);
    }

    pub fn first(&self) -> Option<LoadPoint> {
        self.values
            .iter()
            .next()
            .map(|(ts, q)| LoadPoint { timestamp: *ts, quantity: *q })
    }

    pub fn last(&self) -> Option<LoadPoint> {
        self.values
            .iter()
            .next_back()
            .map(|(ts, q)| LoadPoint { timestamp: *ts, quantity: *q })
    }

    pub fn iter(&self) -> impl Iterator<Item = LoadPoint> + '_ {
        self.values
            .iter()
            .map(|(ts, q)| LoadPoint { timestamp: *ts, quantity: *q })
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.values.keys().copied().collect()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.values.values().copied().collect()
    }
}

impl FromIterator<(DateTime<Utc>, f64)> for LoadSeries {
    fn from_iter<I: IntoIterator<Item = (DateTime<Utc>, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for LoadSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for point in self.iter() {
            seq.serialize_element(&point)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_series_is_sorted_by_timestamp() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 1, 1, 1, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap();

        let series: LoadSeries = vec![(t2, 3.0), (t0, 1.0), (t1, 2.0)].into_iter().collect();

        assert_eq!(series.timestamps(), vec![t0, t1, t2]);
        assert_eq!(series.quantities(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first().unwrap().timestamp, t0);
        assert_eq!(series.last().unwrap().quantity, 3.0);
    }

    #[test]
    fn test_append_overwrites_duplicate_timestamp() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 1, 1, 1, 0, 0).unwrap();

        let mut series: LoadSeries = vec![(t0, 1.0)].into_iter().collect();
        series.append(vec![(t0, 5.0), (t1, 2.0)].into_iter().collect());

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(&t0), Some(5.0));
    }

    #[test]
    fn test_serialize_as_point_list() {
        let t0 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let series: LoadSeries = vec![(t0, 42.5)].into_iter().collect();

        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "timestamp": "2021-01-01T00:00:00Z", "quantity": 42.5 }])
        );
    }
}
