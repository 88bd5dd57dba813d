//! Seed Questions Use Case
//!
//! Development helper: scatters sample questions around a fixed point and
//! hands them to existing seed accounts.

use std::sync::Arc;

use platform::geo::GeoPoint;
use rand::Rng;

use crate::application::config::InquireConfig;
use crate::domain::entity::{question::Question, user::User};
use crate::domain::repository::{QuestionRepository, UserRepository};
use crate::domain::value_object::{email::Email, post_text::PostText};
use crate::error::{InquireError, InquireResult};

/// Apple Park, handy with the iOS simulator's default location
pub const SEED_CENTER: (f64, f64) = (37.331693, -122.030457);
/// Roughly 50 miles, in degrees
pub const SEED_SPREAD_DEGREES: f64 = 50.0 / 69.0;
pub const SEED_QUESTION_COUNT: usize = 10;

pub struct SeedQuestionsUseCase<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    question_repo: Arc<Q>,
    user_repo: Arc<U>,
    config: Arc<InquireConfig>,
}

impl<Q, U> SeedQuestionsUseCase<Q, U>
where
    Q: QuestionRepository,
    U: UserRepository,
{
    pub fn new(question_repo: Arc<Q>, user_repo: Arc<U>, config: Arc<InquireConfig>) -> Self {
        Self {
            question_repo,
            user_repo,
            config,
        }
    }

    pub async fn execute(&self) -> InquireResult<Vec<Question>> {
        let mut owners: Vec<User> = Vec::new();
        for raw in &self.config.seed_emails {
            let Ok(email) = Email::new(raw) else {
                tracing::warn!(email = %raw, "Skipping malformed seed email");
                continue;
            };
            if let Some(user) = self.user_repo.find_by_email(&email).await?.into_iter().next() {
                owners.push(user);
            }
        }

        if owners.is_empty() {
            return Err(InquireError::NoSeedUsers);
        }

        // ThreadRng is !Send; draw everything before the next await.
        let plan: Vec<(f64, f64, usize)> = {
            let mut rng = rand::rng();
            let (lat, lon) = SEED_CENTER;
            (0..SEED_QUESTION_COUNT)
                .map(|_| {
                    (
                        rng.random_range(lat - SEED_SPREAD_DEGREES..=lat + SEED_SPREAD_DEGREES),
                        rng.random_range(lon - SEED_SPREAD_DEGREES..=lon + SEED_SPREAD_DEGREES),
                        rng.random_range(0..owners.len()),
                    )
                })
                .collect()
        };

        let mut created = Vec::with_capacity(plan.len());
        for (i, (latitude, longitude, owner)) in plan.into_iter().enumerate() {
            let location = GeoPoint::new(latitude, longitude)
                .map_err(|e| InquireError::Internal(e.to_string()))?;
            let text = PostText::new("question", format!("Question {i}"))?;

            let question = Question::new(owners[owner].user_id, text, location);
            self.question_repo.create(&question).await?;
            created.push(question);
        }

        tracing::info!(count = created.len(), "Seeded sample questions");

        Ok(created)
    }
}
