//! Fee parameters supplied per call

use serde::{Deserialize, Serialize};

/// Fee terms for one investor. All rates are decimals (0.02 = 2%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeParameters {
    /// Annual hurdle the investor must clear before a performance fee applies
    pub hurdle_rate: f64,

    /// Annual management fee, charged regardless of performance
    pub management_fee: f64,

    /// Fraction of the return retained by the fund above the hurdle
    pub performance_fee: f64,
}

impl FeeParameters {
    pub fn new(hurdle_rate: f64, management_fee: f64, performance_fee: f64) -> Self {
        Self {
            hurdle_rate,
            management_fee,
            performance_fee,
        }
    }
}
