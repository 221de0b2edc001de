mod export;
mod heatmap;
mod insights;

pub use export::{to_csv, ExportError, CSV_HEADER};
pub use heatmap::{heatmap, HeatmapEntry};
pub use insights::{
    recommendations, weakest_items, DomainAdvice, DomainRecommendation, WeakSpot,
};

use super::result::ScanResult;

impl ScanResult {
    pub fn to_csv(&self) -> Result<String, ExportError> {
        to_csv(&self.domains)
    }

    pub fn weakest_items(&self, limit: usize) -> Vec<WeakSpot> {
        weakest_items(&self.domains, limit)
    }

    pub fn recommendations(&self) -> Vec<DomainRecommendation> {
        recommendations(&self.domains)
    }
}
