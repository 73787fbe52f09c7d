use crate::model::Quality;

/// Numeric weight per quality label, used by the weighted average.
///
/// | Quality      | Weight |
/// |--------------|--------|
/// | excellent    | 1.0    |
/// | good         | 0.8    |
/// | questionable | 0.5    |
/// | poor         | 0.3    |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityWeights {
    pub excellent: f64,
    pub good: f64,
    pub questionable: f64,
    pub poor: f64,
}

impl QualityWeights {
    pub const STANDARD: QualityWeights = QualityWeights {
        excellent: 1.0,
        good: 0.8,
        questionable: 0.5,
        poor: 0.3,
    };

    pub fn weight(&self, quality: Quality) -> f64 {
        match quality {
            Quality::Excellent => self.excellent,
            Quality::Good => self.good,
            Quality::Questionable => self.questionable,
            Quality::Poor => self.poor,
        }
    }
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}
