use entsoe_load::{country, Config, LoadService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let api_key = std::env::var("ENTSOE_API_KEY")?;
    let service = LoadService::with_client(Config::new(&api_key))?;

    // 查询德国一天的实际负荷（15 分钟分辨率）
    let germany = country("germany")?;
    let series = service
        .query_country(germany.name, "2021-03-28T00:00:00+01:00", "2021-03-29T00:00:00+02:00", None)
        .await?;

    println!("{} ({}) 数据点数量: {}", germany.name, germany.entsoe_zone, series.len());
    for point in series.iter().take(8) {
        println!("{}  {:>10.1}", point.timestamp.format("%Y-%m-%d %H:%M"), point.quantity);
    }

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!("范围: {} - {}", first.timestamp, last.timestamp);
    }

    Ok(())
}
