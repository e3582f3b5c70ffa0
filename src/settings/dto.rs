use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateGlobalSettingsRequest {
    pub marketplace_name: Option<String>,
    pub points_earn_per_currency: Option<i64>,
    pub points_redeem_value: Option<Decimal>,
}
