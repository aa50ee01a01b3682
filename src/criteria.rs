//! User-selected search criteria and the option lists the UI offers.

use serde::{Deserialize, Serialize};

/// Filters selected by the user for one search
///
/// The value is immutable per search; the UI replaces it wholesale on edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Named area to search in, used when no device coordinate is supplied
    pub area: String,
    /// Cuisine category
    pub cuisine: String,
    /// Occasion the meal is for
    pub purpose: String,
    /// Price band
    pub budget: String,
    /// Prefer the device coordinate over the named area
    pub use_location: bool,
    /// Restrict to places open at search time
    pub open_now: bool,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            area: AREAS[0].to_string(),
            cuisine: CUISINES[0].to_string(),
            purpose: PURPOSES[0].to_string(),
            budget: BUDGETS[0].to_string(),
            use_location: false,
            open_now: false,
        }
    }
}

/// Selectable Tokyo areas
pub const AREAS: &[&str] = &[
    "銀座 (Ginza)",
    "新宿 (Shinjuku)",
    "澀谷 (Shibuya)",
    "六本木 (Roppongi)",
    "表參道 (Omotesando)",
    "東京車站 (Tokyo Station)",
    "淺草 (Asakusa)",
];

/// Selectable cuisine categories
pub const CUISINES: &[&str] = &[
    "酒吧 (Bar)",
    "居酒屋 (Izakaya)",
    "壽司 (Sushi)",
    "燒肉 (Yakiniku)",
    "拉麵 (Ramen)",
    "懷石料理 (Kaiseki)",
    "義大利料理 (Italian)",
    "法式料理 (French)",
];

/// Selectable meal purposes
pub const PURPOSES: &[&str] = &[
    "情侶約會 (Date)",
    "朋友聚餐 (Friends Gathering)",
    "商務宴請 (Business)",
    "一人小酌 (Solo)",
    "家庭聚會 (Family)",
];

/// Selectable price bands
pub const BUDGETS: &[&str] = &[
    "¥1,000 ~ ¥3,000 (Casual)",
    "¥3,000 ~ ¥6,000 (Premium)",
    "¥6,000 ~ ¥10,000 (High-end)",
    "¥10,000+ (Luxury)",
];
