use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile returned by `GET {base}/user`, passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct UserProfile(pub Value);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Coupon {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub prize_amount: Option<i64>,
}

/// Body of `GET {base}/garapon`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GaraponResponse {
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

#[derive(Debug, Deserialize)]
pub struct TokenForm {
    #[serde(default)]
    pub bearer: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub white: u64,
    pub blue: u64,
    pub red: u64,
    pub gold: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub user: UserProfile,
    pub stats: TierCounts,
    pub total: u64,
    pub visitors: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisitorsResponse {
    pub visitors: usize,
}

// Any non-integer amount lands outside every tier instead of failing the payload.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}
