use serde::{Deserialize, Serialize};

pub const METRIC_COUNT: usize = 18;

/// Physical metrics carried by every tracking row, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Distance,
    RunningDistance,
    HsrDistance,
    SprintCount,
    HiDistance,
    HiCount,
    DistanceTip,
    RunningDistanceTip,
    HsrDistanceTip,
    HsrCountTip,
    SprintDistanceTip,
    SprintCountTip,
    DistanceOtip,
    RunningDistanceOtip,
    HsrDistanceOtip,
    HsrCountOtip,
    SprintDistanceOtip,
    SprintCountOtip,
}

pub const ALL_METRICS: [Metric; METRIC_COUNT] = [
    Metric::Distance,
    Metric::RunningDistance,
    Metric::HsrDistance,
    Metric::SprintCount,
    Metric::HiDistance,
    Metric::HiCount,
    Metric::DistanceTip,
    Metric::RunningDistanceTip,
    Metric::HsrDistanceTip,
    Metric::HsrCountTip,
    Metric::SprintDistanceTip,
    Metric::SprintCountTip,
    Metric::DistanceOtip,
    Metric::RunningDistanceOtip,
    Metric::HsrDistanceOtip,
    Metric::HsrCountOtip,
    Metric::SprintDistanceOtip,
    Metric::SprintCountOtip,
];

impl Metric {
    /// Column header used in the league CSVs.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Distance => "Distance",
            Metric::RunningDistance => "Running Distance",
            Metric::HsrDistance => "HSR Distance",
            Metric::SprintCount => "Sprint Count",
            Metric::HiDistance => "HI Distance",
            Metric::HiCount => "HI Count",
            Metric::DistanceTip => "Distance TIP",
            Metric::RunningDistanceTip => "Running Distance TIP",
            Metric::HsrDistanceTip => "HSR Distance TIP",
            Metric::HsrCountTip => "HSR Count TIP",
            Metric::SprintDistanceTip => "Sprint Distance TIP",
            Metric::SprintCountTip => "Sprint Count TIP",
            Metric::DistanceOtip => "Distance OTIP",
            Metric::RunningDistanceOtip => "Running Distance OTIP",
            Metric::HsrDistanceOtip => "HSR Distance OTIP",
            Metric::HsrCountOtip => "HSR Count OTIP",
            Metric::SprintDistanceOtip => "Sprint Distance OTIP",
            Metric::SprintCountOtip => "Sprint Count OTIP",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_column(raw: &str) -> Option<Metric> {
        let needle = raw.trim();
        ALL_METRICS
            .iter()
            .copied()
            .find(|m| m.column().eq_ignore_ascii_case(needle))
    }

    pub fn next(self) -> Metric {
        ALL_METRICS[(self.index() + 1) % METRIC_COUNT]
    }

    pub fn prev(self) -> Metric {
        ALL_METRICS[(self.index() + METRIC_COUNT - 1) % METRIC_COUNT]
    }

    pub fn unit(self) -> UnitPolicy {
        unit_policy(self)
    }

    /// Axis/column label including the display unit, e.g. `Distance (km)`.
    pub fn display_name(self) -> String {
        let policy = self.unit();
        if policy.suffix.is_empty() {
            self.column().to_string()
        } else {
            format!("{} ({})", self.column(), policy.suffix)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPolicy {
    pub suffix: &'static str,
    /// Stored value is divided by this for display.
    pub divisor: f64,
}

const KILOMETERS: UnitPolicy = UnitPolicy {
    suffix: "km",
    divisor: 1000.0,
};

const UNITLESS: UnitPolicy = UnitPolicy {
    suffix: "",
    divisor: 1.0,
};

/// Distance columns are stored in meters and shown in kilometers; counts pass through.
pub fn unit_policy(metric: Metric) -> UnitPolicy {
    if metric.column().contains("Distance") {
        KILOMETERS
    } else {
        UNITLESS
    }
}

/// Raw stored value to displayed value. Apply once, after reduction.
pub fn to_display(metric: Metric, raw: f64) -> f64 {
    raw / unit_policy(metric).divisor
}
