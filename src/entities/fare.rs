use serde::{Deserialize, Serialize};

/// Price per kilometre in euro cents.
pub const RATE_PER_KM: f64 = 153.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    pub label: String,
    pub price: i64,
    pub selected: bool,
}

impl Extra {
    fn new(label: &str, price: i64) -> Self {
        Self {
            label: label.into(),
            price,
            selected: false,
        }
    }
}

/// Optional extras offered on every ride, none selected.
pub fn default_extras() -> Vec<Extra> {
    vec![
        Extra::new("Water", 300),
        Extra::new("Champagne", 3000),
        Extra::new("Vito", 4000),
    ]
}

/// Total in minor currency units: distance at the per-km rate plus the
/// selected extras, rounded to the nearest unit.
pub fn compute_fare(distance_km: f64, extras: &[Extra]) -> i64 {
    let base = distance_km * RATE_PER_KM;
    let extras_total: i64 = extras.iter().filter(|e| e.selected).map(|e| e.price).sum();

    (base + extras_total as f64).round() as i64
}
