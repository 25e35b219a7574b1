use crate::errors::{EntsoeError, Result};
use crate::models::resolution::Resolution;
use crate::models::series::{LoadSeries, Point, TimeSeriesBlock};
use crate::parser::index::build_datetime_index;
use crate::util::parse_datetime;
use chrono_tz::Tz;
use log::debug;
use roxmltree::{Document, Node, ParsingOptions};

fn is_tag(node: &Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(tag)
}

/// 查找第一个同名子孙元素并返回其文本
fn find_text<'a>(node: &Node<'a, '_>, tag: &'static str) -> Result<&'a str> {
    node.descendants()
        .skip(1)
        .find(|n| is_tag(n, tag))
        .and_then(|n| n.text())
        .map(str::trim)
        .ok_or(EntsoeError::MissingElement(tag))
}

/// All `<TimeSeries>` elements of a document, in document order.
pub fn extract_timeseries<'a, 'input>(doc: &'a Document<'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    doc.descendants().filter(|n| is_tag(n, "timeseries"))
}

pub fn parse_block(node: &Node<'_, '_>) -> Result<TimeSeriesBlock> {
    let start = parse_datetime(find_text(node, "start")?)?.to_utc();
    let end = parse_datetime(find_text(node, "end")?)?.to_utc();
    let resolution = Resolution::from_code(find_text(node, "resolution")?)?;

    let mut points = Vec::new();
    for point in node.descendants().filter(|n| is_tag(n, "point")) {
        points.push(Point {
            position: find_text(&point, "position")?.parse::<i64>()?,
            quantity: find_text(&point, "quantity")?.parse::<f64>()?,
        });
    }

    Ok(TimeSeriesBlock {
        resolution,
        start,
        end,
        points,
    })
}

/// Turn one block into a series: points are ordered by position, then the
/// positions are replaced by the block's generated timestamp index.
pub fn parse_values(block: &TimeSeriesBlock, tz: Option<Tz>) -> Result<LoadSeries> {
    let mut points = block.points.clone();
    points.sort_by_key(|p| p.position);

    let index = build_datetime_index(&block.start, &block.end, block.resolution, tz)?;
    if index.len() != points.len() {
        return Err(EntsoeError::LengthMismatch {
            points: points.len(),
            timestamps: index.len(),
        });
    }

    Ok(index
        .into_iter()
        .zip(points)
        .map(|(ts, p)| (ts, p.quantity))
        .collect())
}

/// Parse a full API response body into one merged, time-sorted series.
///
/// An empty body gives an empty series. Leading whitespace and a DOCTYPE
/// prologue are accepted. The first failing block aborts the whole response.
pub fn parse_response(xml_text: &str, tz: Option<Tz>) -> Result<LoadSeries> {
    let mut series = LoadSeries::new();
    let xml_text = xml_text.trim_start();
    if xml_text.is_empty() {
        return Ok(series);
    }

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml_text, options)?;

    let mut blocks = 0;
    for node in extract_timeseries(&doc) {
        let block = parse_block(&node)?;
        series.append(parse_values(&block, tz)?);
        blocks += 1;
    }

    debug!("解析完成: {} 个 TimeSeries 块, {} 个数据点", blocks, series.len());
    Ok(series)
}
