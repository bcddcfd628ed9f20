// Gauge banding for the instantaneous power reading

pub const DEFAULT_GAUGE_MAX_WATTS: f64 = 4500.0;

const NORMAL_LIMIT_PCT: f64 = 60.0;
const WARNING_LIMIT_PCT: f64 = 80.0;
const FULL_SCALE_PCT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeZone {
    Normal,
    Warning,
    Critical,
    Remaining,
}

impl GaugeZone {
    pub fn label(&self) -> &'static str {
        match self {
            GaugeZone::Normal => "normal",
            GaugeZone::Warning => "warning",
            GaugeZone::Critical => "critical",
            GaugeZone::Remaining => "remaining",
        }
    }
}

/// Percentage breakdown of a reading against the gauge maximum.
///
/// Each band holds its own share of the 0..=100 scale: normal covers `[0, 60]`,
/// warning `(60, 80]`, critical `(80, 100]`. `remaining` is the complement of the
/// filled part, so the four values always add up to 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeBands {
    pub normal_pct: f64,
    pub warning_pct: f64,
    pub critical_pct: f64,
    pub remaining_pct: f64,
}

impl GaugeBands {
    /// Band a reading against `max`. Readings above `max` are clamped to a full gauge;
    /// negative, non-finite readings or a non-positive `max` leave the gauge empty.
    pub fn from_reading(reading: f64, max: f64) -> Self {
        let pct = fill_pct(reading, max);

        let normal_pct = pct.min(NORMAL_LIMIT_PCT);
        let warning_pct = if pct > NORMAL_LIMIT_PCT {
            pct.min(WARNING_LIMIT_PCT) - NORMAL_LIMIT_PCT
        } else {
            0.0
        };
        let critical_pct = if pct > WARNING_LIMIT_PCT {
            pct - WARNING_LIMIT_PCT
        } else {
            0.0
        };

        Self {
            normal_pct,
            warning_pct,
            critical_pct,
            remaining_pct: FULL_SCALE_PCT - pct,
        }
    }

    pub fn filled_pct(&self) -> f64 {
        FULL_SCALE_PCT - self.remaining_pct
    }

    pub fn zone(&self) -> GaugeZone {
        if self.critical_pct > 0.0 {
            GaugeZone::Critical
        } else if self.warning_pct > 0.0 {
            GaugeZone::Warning
        } else {
            GaugeZone::Normal
        }
    }

    /// Slices in drawing order for a semicircular gauge.
    pub fn slices(&self) -> [(GaugeZone, f64); 4] {
        [
            (GaugeZone::Normal, self.normal_pct),
            (GaugeZone::Warning, self.warning_pct),
            (GaugeZone::Critical, self.critical_pct),
            (GaugeZone::Remaining, self.remaining_pct),
        ]
    }
}

fn fill_pct(reading: f64, max: f64) -> f64 {
    if !reading.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    (reading / max * FULL_SCALE_PCT).clamp(0.0, FULL_SCALE_PCT)
}
