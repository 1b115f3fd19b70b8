use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body for creating or editing a review.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub user_name: String,
    pub rating: i16,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub total_reviews: usize,
    pub average_rating: f64,
    /// Count per star rating; keys 1 through 5 are always present.
    pub rating_breakdown: BTreeMap<u8, usize>,
}

impl Default for ReviewSummary {
    fn default() -> Self {
        Self {
            total_reviews: 0,
            average_rating: 0.0,
            rating_breakdown: (1..=5).map(|stars| (stars, 0)).collect(),
        }
    }
}
