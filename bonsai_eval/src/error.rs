use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A raw value is non-positive where a positive divisor is required, or
    /// missing where an axis point is expected.
    #[error("invalid measurement for {config} at {position}: {reason}")]
    InvalidMeasurement {
        config: String,
        position: String,
        reason: &'static str,
    },
    /// A series does not have as many points as the axis it's placed on.
    #[error("{label} has {found} points but the axis has {expected}")]
    AxisMismatch {
        label: String,
        expected: usize,
        found: usize,
    },
    /// A stacked breakdown component is negative.
    #[error("component {label} is negative ({value}) at {position}")]
    NegativeComponent {
        label: String,
        position: String,
        value: f64,
    },
    #[error("panel {panel} does not exist (the chart has {panels} panels)")]
    UnknownPanel { panel: usize, panels: usize },
    #[error("ticks of panel {panel} are not monotonically non-decreasing")]
    NonMonotonicTicks { panel: usize },
    /// Line and grouped-bar series can't share a panel with stacked
    /// breakdowns.
    #[error("panel {panel} is drawn in {mode} mode")]
    ModeMismatch { panel: usize, mode: &'static str },
}

impl EvalError {
    pub(crate) fn invalid(
        config: impl Into<String>,
        position: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidMeasurement {
            config: config.into(),
            position: position.to_string(),
            reason,
        }
    }
}
