/// The label value marking an anchor or a region that is not sampled in this batch.
pub const IGNORED_LABEL: i64 = -1;

/// The label value of background samples.
pub const BACKGROUND_LABEL: i64 = 0;

/// Interpretation of an integer label produced by the target assignment.
///
/// Label tensors travel as floating point arrays. Convert each element with
/// [label_value] before classifying it, which truncates toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// `-1`: excluded from every statistic.
    Ignored,
    /// `0`
    Background,
    /// Any positive class index.
    Foreground(i64),
    /// Negative values other than `-1`. They are not ignored, but are
    /// neither foreground nor background.
    Other(i64),
}

impl LabelKind {
    pub fn from_value(value: i64) -> Self {
        match value {
            IGNORED_LABEL => Self::Ignored,
            BACKGROUND_LABEL => Self::Background,
            class if class > 0 => Self::Foreground(class),
            other => Self::Other(other),
        }
    }

    /// True for every label except `-1`.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub fn is_foreground(&self) -> bool {
        matches!(self, Self::Foreground(_))
    }

    pub fn is_background(&self) -> bool {
        matches!(self, Self::Background)
    }
}

impl From<i64> for LabelKind {
    fn from(value: i64) -> Self {
        Self::from_value(value)
    }
}

/// Convert a label tensor element into an integer label.
pub fn label_value(value: f32) -> i64 {
    value as i64
}
