//! Named constants for the built-in unit symbols
//!
//! Units stay plain strings at the API boundary; these constants only spare
//! callers from typos.

// ========== Energy ==========
pub const J: &str = "J";
pub const KJ: &str = "kJ";
pub const MJ: &str = "MJ";
pub const GJ: &str = "GJ";
pub const TJ: &str = "TJ";
pub const PJ: &str = "PJ";
pub const EJ: &str = "EJ";
pub const WH: &str = "Wh";
pub const KWH: &str = "kWh";
pub const MWH: &str = "MWh";
pub const GWH: &str = "GWh";
pub const TWH: &str = "TWh";
pub const PWH: &str = "PWh";
pub const MMBTU: &str = "MMBTU";

// ========== Power ==========
pub const W: &str = "W";
pub const KW: &str = "kW";
pub const MW: &str = "MW";
pub const GW: &str = "GW";
pub const TW: &str = "TW";

// ========== Mass ==========
pub const G: &str = "g";
pub const KG: &str = "kg";
pub const T: &str = "t";
pub const MT: &str = "Mt";
pub const GT: &str = "Gt";

// ========== Volume ==========
pub const M3: &str = "m3";
pub const L: &str = "L";
pub const BARREL: &str = "barrel";

// ========== Time ==========
pub const S: &str = "s";
pub const MIN: &str = "min";
pub const H: &str = "h";
pub const A: &str = "a";

// ========== Currency ==========
pub const USD: &str = "USD";
pub const EUR: &str = "EUR";
pub const GBP: &str = "GBP";
pub const JPY: &str = "JPY";
pub const CNY: &str = "CNY";

// ========== Prices ==========
pub const USD_PER_MWH: &str = "USD/MWh";
pub const EUR_PER_MWH: &str = "EUR/MWh";
pub const USD_PER_KW: &str = "USD/kW";
pub const USD_PER_T: &str = "USD/t";
