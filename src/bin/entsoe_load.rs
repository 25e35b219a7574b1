use entsoe_load::config::Config;
use entsoe_load::models::country::{countries, country};
use entsoe_load::models::series::LoadSeries;
use entsoe_load::parser::parse_response;
use entsoe_load::services::load_service::LoadService;
use entsoe_load::util::arrow_utils;

use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let matches = cli().get_matches();

    if let Some(matches) = matches.subcommand_matches("load") {
        run_load(matches).await?;
    } else if let Some(matches) = matches.subcommand_matches("parse") {
        let path = matches.value_of("file").unwrap_or_default();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path))?;
        let tz = match matches.value_of("timezone") {
            Some(name) => Some(name.parse::<Tz>().map_err(|e| anyhow!("invalid timezone {}: {}", name, e))?),
            None => None,
        };
        let series = parse_response(&text, tz)?;
        print_series(&series, matches)?;
    } else if let Some(matches) = matches.subcommand_matches("countries") {
        if matches.is_present("json") {
            println!("{}", serde_json::to_string_pretty(countries())?);
        } else {
            println!("{:<10} {:<6} {:<16} {:<18} {:<8}", "Country", "Code", "Timezone", "Zone", "Res");
            println!("{:-<62}", "");
            for c in countries() {
                println!("{:<10} {:<6} {:<16} {:<18} {:<8}",
                         c.name, c.country_code, c.timezone.name(), c.entsoe_zone, c.resolution);
            }
        }
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

fn cli() -> App<'static> {
    App::new("entsoe_load")
        .version(env!("CARGO_PKG_VERSION"))
        .about("ENTSOE Transparency Platform country load client")
        .subcommand(
            SubCommand::with_name("load")
                .about("Query actual total load for a country or bidding zone")
                .arg(
                    Arg::with_name("country")
                        .short('c')
                        .long("country")
                        .value_name("COUNTRY")
                        .help("Country name from the reference table (france, germany, ...)")
                        .takes_value(true)
                        .conflicts_with("zone")
                        .required_unless_present("zone"),
                )
                .arg(
                    Arg::with_name("zone")
                        .short('z')
                        .long("zone")
                        .value_name("ZONE")
                        .help("ENTSOE bidding zone code")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("start")
                        .short('s')
                        .long("start")
                        .value_name("START")
                        .help("Period start, e.g. 2021-01-01 or 2021-01-01T00:00+01:00")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("end")
                        .short('e')
                        .long("end")
                        .value_name("END")
                        .help("Period end (exclusive)")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("process-type")
                        .short('p')
                        .long("process-type")
                        .value_name("PROCESS_TYPE")
                        .help("ENTSOE process type code")
                        .takes_value(true)
                        .default_value("A16"),
                )
                .arg(
                    Arg::with_name("api-key")
                        .long("api-key")
                        .value_name("API_KEY")
                        .help("API security token (defaults to $ENTSOE_API_KEY)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("timeout")
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("HTTP request timeout")
                        .takes_value(true)
                        .default_value("30"),
                )
                .arg(
                    Arg::with_name("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Save the series to an Arrow IPC file")
                        .takes_value(true),
                )
                .arg(json_arg())
                .arg(limit_arg()),
        )
        .subcommand(
            SubCommand::with_name("parse")
                .about("Parse a saved ENTSOE XML response")
                .arg(
                    Arg::with_name("file")
                        .short('f')
                        .long("file")
                        .value_name("FILE")
                        .help("XML response file")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("timezone")
                        .short('t')
                        .long("timezone")
                        .value_name("TZ")
                        .help("IANA timezone used to build the index, e.g. Europe/Berlin")
                        .takes_value(true),
                )
                .arg(json_arg())
                .arg(limit_arg()),
        )
        .subcommand(
            SubCommand::with_name("countries")
                .about("List the country reference table")
                .arg(json_arg()),
        )
}

fn json_arg() -> Arg<'static> {
    Arg::with_name("json")
        .long("json")
        .help("Print JSON instead of a table")
        .takes_value(false)
}

fn limit_arg() -> Arg<'static> {
    Arg::with_name("limit")
        .short('l')
        .long("limit")
        .value_name("LIMIT")
        .help("Limit the number of rows to display")
        .takes_value(true)
        .default_value("10")
}

async fn run_load(matches: &ArgMatches) -> anyhow::Result<()> {
    let api_key = match matches.value_of("api-key") {
        Some(key) => key.to_string(),
        None => std::env::var("ENTSOE_API_KEY")
            .context("no API key: pass --api-key or set ENTSOE_API_KEY")?,
    };
    let timeout = matches.value_of("timeout")
        .unwrap_or("30")
        .parse::<u64>()
        .context("invalid --timeout")?;
    let start = matches.value_of("start").unwrap_or_default();
    let end = matches.value_of("end").unwrap_or_default();
    let process_type = matches.value_of("process-type");

    let config = Config::new(&api_key).with_timeout(Duration::from_secs(timeout));
    let service = LoadService::with_client(config)?;

    let series = match matches.value_of("country") {
        Some(name) => {
            let meta = country(name)?;
            info!("Country {} -> zone {} ({})", meta.name, meta.entsoe_zone, meta.timezone.name());
            service.query_country(name, start, end, process_type).await?
        }
        // clap 保证未给出 --country 时必有 --zone
        None => {
            let zone = matches.value_of("zone").unwrap_or_default();
            service.query_country_load(zone, start, end, process_type).await?
        }
    };

    if let Some(path) = matches.value_of("output") {
        arrow_utils::save_series_to_arrow(&series, path)?;
        info!("Saved {} points to {}", series.len(), path);
    }

    print_series(&series, matches)
}

fn row_limit(matches: &ArgMatches) -> anyhow::Result<usize> {
    let limit = matches.value_of("limit")
        .unwrap_or("10")
        .parse::<usize>()
        .context("invalid --limit")?;
    Ok(limit)
}

fn print_series(series: &LoadSeries, matches: &ArgMatches) -> anyhow::Result<()> {
    if matches.is_present("json") {
        println!("{}", serde_json::to_string_pretty(series)?);
        return Ok(());
    }

    let limit = row_limit(matches)?;

    println!("{:<22} {:>12}", "Timestamp (UTC)", "Quantity");
    println!("{:-<35}", "");
    for point in series.iter().take(limit) {
        println!("{:<22} {:>12.1}", point.timestamp.format("%Y-%m-%d %H:%M"), point.quantity);
    }

    if series.len() > limit {
        println!("... and {} more records", series.len() - limit);
    } else if series.is_empty() {
        println!("No data returned");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_requires_country_or_zone() {
        let result = cli().try_get_matches_from(["entsoe_load", "load", "-s", "2021-01-01", "-e", "2021-01-02"]);
        assert!(result.is_err());

        let result = cli().try_get_matches_from([
            "entsoe_load", "load", "-c", "france", "-z", "10YFR-RTE------C", "-s", "2021-01-01", "-e", "2021-01-02",
        ]);
        assert!(result.is_err());

        let matches = cli()
            .try_get_matches_from(["entsoe_load", "load", "-z", "10YFR-RTE------C", "-s", "2021-01-01", "-e", "2021-01-02"])
            .unwrap();
        let load = matches.subcommand_matches("load").unwrap();
        assert_eq!(load.value_of("zone"), Some("10YFR-RTE------C"));
        assert_eq!(load.value_of("country"), None);
    }

    #[test]
    fn test_row_limit() {
        let matches = cli().try_get_matches_from(["entsoe_load", "parse", "-f", "resp.xml"]).unwrap();
        assert_eq!(row_limit(matches.subcommand_matches("parse").unwrap()).unwrap(), 10);

        let matches = cli().try_get_matches_from(["entsoe_load", "parse", "-f", "resp.xml", "-l", "25"]).unwrap();
        assert_eq!(row_limit(matches.subcommand_matches("parse").unwrap()).unwrap(), 25);

        let matches = cli().try_get_matches_from(["entsoe_load", "parse", "-f", "resp.xml", "-l", "ten"]).unwrap();
        let err = row_limit(matches.subcommand_matches("parse").unwrap()).unwrap_err();
        assert!(err.to_string().contains("invalid --limit"));
    }
}
