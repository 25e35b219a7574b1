use crate::client::base::QueryParams;
use crate::errors::Result;
use crate::util::{datetime_to_str, PeriodBoundary};

/// Actual total load (System total load)
pub const DOCUMENT_TYPE_LOAD: &str = "A65";

/// 国家负荷查询参数；securityToken 由传输层附加
pub fn country_load_params<S, E>(
    entsoe_zone: &str,
    start: &S,
    end: &E,
    process_type: &str,
) -> Result<QueryParams>
where
    S: PeriodBoundary + ?Sized,
    E: PeriodBoundary + ?Sized,
{
    Ok(vec![
        ("documentType", DOCUMENT_TYPE_LOAD.to_string()),
        ("OutBiddingZone_Domain", entsoe_zone.to_string()),
        ("periodStart", datetime_to_str(start)?),
        ("periodEnd", datetime_to_str(end)?),
        ("ProcessType", process_type.to_string()),
    ])
}
