use serde::{Deserialize, Serialize};

/// One slice of the proportional (pie) chart beside an editable list.
///
/// The core computes these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    /// Display label of the entry
    pub name: String,

    /// Entry amount (always > 0; zero-amount entries get no slice)
    pub value: f64,

    /// Fill color
    pub color: String,
}

impl ChartSlice {
    /// This slice's share of `total`, in percent. `0.0` when `total` is not positive.
    pub fn share_percent(&self, total: f64) -> f64 {
        if total > 0.0 {
            self.value / total * 100.0
        } else {
            0.0
        }
    }
}
