//! Nearby Questions Use Case
//!
//! Proximity search over open questions. Distances arrive in miles and are
//! searched in kilometres.

use std::sync::Arc;

use platform::geo::{self, GeoPoint};

use crate::application::config::InquireConfig;
use crate::domain::entity::question::Question;
use crate::domain::repository::QuestionRepository;
use crate::error::{InquireError, InquireResult};

pub struct NearbyInput {
    pub latitude: f64,
    pub longitude: f64,
    pub max_results: Option<u32>,
    pub max_distance_miles: Option<f64>,
}

pub struct NearbyQuestionsUseCase<Q>
where
    Q: QuestionRepository,
{
    question_repo: Arc<Q>,
    config: Arc<InquireConfig>,
}

impl<Q> NearbyQuestionsUseCase<Q>
where
    Q: QuestionRepository,
{
    pub fn new(question_repo: Arc<Q>, config: Arc<InquireConfig>) -> Self {
        Self {
            question_repo,
            config,
        }
    }

    pub async fn execute(&self, input: NearbyInput) -> InquireResult<Vec<Question>> {
        let center = GeoPoint::new(input.latitude, input.longitude)
            .map_err(|e| InquireError::InvalidInput(e.to_string()))?;

        let max_distance_miles = input
            .max_distance_miles
            .unwrap_or(self.config.default_max_distance_miles);
        if !max_distance_miles.is_finite() || max_distance_miles < 0.0 {
            return Err(InquireError::InvalidInput(
                "'max_distance' must be a non-negative number.".to_string(),
            ));
        }

        let max_results = self.config.effective_max_results(input.max_results);
        if max_results == 0 {
            return Ok(Vec::new());
        }

        self.question_repo
            .find_nearby(&center, max_results, geo::miles_to_km(max_distance_miles))
            .await
    }
}
