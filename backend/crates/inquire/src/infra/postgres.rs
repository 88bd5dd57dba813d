//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::geo::{BoundingBox, EARTH_RADIUS_KM, GeoPoint};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{answer::Answer, question::Question, session::Session, user::User};
use crate::domain::repository::{
    AnswerRepository, QuestionRepository, SessionRepository, UserRepository,
};
use crate::domain::value_object::{
    answer_id::AnswerId, email::Email, post_text::PostText, question_id::QuestionId,
    user_id::UserId, user_password::UserPassword,
};
use crate::error::{InquireError, InquireResult};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[derive(Clone)]
pub struct PgInquireRepository {
    pool: PgPool,
}

impl PgInquireRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn cleanup_expired(&self) -> InquireResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgInquireRepository {
    async fn create(&self, user: &User) -> InquireResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                karma,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.karma)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InquireError::EmailTaken
            } else {
                InquireError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> InquireResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, karma, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> InquireResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, karma, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_user()).collect()
    }

    async fn exists_by_email(&self, email: &Email) -> InquireResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> InquireResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                karma = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.karma)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Question Repository Implementation
// ============================================================================

// Haversine distance in km from ($1, $2) with Earth radius $3.
const DISTANCE_KM_SQL: &str = r#"
    2 * $3 * ASIN(LEAST(1.0, SQRT(
        POWER(SIN(RADIANS(q.latitude - $1) / 2), 2)
        + COS(RADIANS($1)) * COS(RADIANS(q.latitude))
          * POWER(SIN(RADIANS(q.longitude - $2) / 2), 2)
    )))
"#;

const LONGITUDE_WITHIN_SQL: &str = "q.longitude BETWEEN $6 AND $7";
const LONGITUDE_WRAPPED_SQL: &str = "(q.longitude >= $6 OR q.longitude <= $7)";

impl QuestionRepository for PgInquireRepository {
    async fn create(&self, question: &Question) -> InquireResult<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (
                question_id,
                user_id,
                question,
                latitude,
                longitude,
                closed,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(question.question_id.as_uuid())
        .bind(question.user_id.as_uuid())
        .bind(question.question.as_str())
        .bind(question.location.latitude())
        .bind(question.location.longitude())
        .bind(question.closed)
        .bind(question.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, question_id: &QuestionId) -> InquireResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT question_id, user_id, question, latitude, longitude, closed, created_at
            FROM questions
            WHERE question_id = $1
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_question()).transpose()
    }

    async fn update(&self, question: &Question) -> InquireResult<()> {
        // `closed OR $3` keeps the flag monotonic.
        sqlx::query(
            r#"
            UPDATE questions SET
                question = $2,
                closed = closed OR $3
            WHERE question_id = $1
            "#,
        )
        .bind(question.question_id.as_uuid())
        .bind(question.question.as_str())
        .bind(question.closed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_nearby(
        &self,
        center: &GeoPoint,
        max_results: u32,
        max_distance_km: f64,
    ) -> InquireResult<Vec<Question>> {
        let bbox = BoundingBox::around(center, max_distance_km);
        let longitude_filter = if bbox.crosses_antimeridian() {
            LONGITUDE_WRAPPED_SQL
        } else {
            LONGITUDE_WITHIN_SQL
        };

        let sql = format!(
            r#"
            SELECT question_id, user_id, question, latitude, longitude, closed, created_at
            FROM (
                SELECT q.*, {DISTANCE_KM_SQL} AS distance_km
                FROM questions q
                WHERE NOT q.closed
                  AND q.latitude BETWEEN $4 AND $5
                  AND {longitude_filter}
            ) AS candidates
            WHERE distance_km <= $8
            ORDER BY distance_km ASC
            LIMIT $9
            "#
        );

        let rows = sqlx::query_as::<_, QuestionRow>(&sql)
            .bind(center.latitude())
            .bind(center.longitude())
            .bind(EARTH_RADIUS_KM)
            .bind(bbox.min_latitude)
            .bind(bbox.max_latitude)
            .bind(bbox.min_longitude)
            .bind(bbox.max_longitude)
            .bind(max_distance_km)
            .bind(i64::from(max_results))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_question()).collect()
    }
}

// ============================================================================
// Answer Repository Implementation
// ============================================================================

impl AnswerRepository for PgInquireRepository {
    async fn create(&self, answer: &Answer) -> InquireResult<()> {
        // The insert only happens while the question is still open.
        let inserted = sqlx::query(
            r#"
            INSERT INTO answers (
                answer_id,
                question_id,
                user_id,
                answer,
                accepted_answer,
                created_at
            )
            SELECT $1, q.question_id, $3, $4, FALSE, $5
            FROM questions q
            WHERE q.question_id = $2 AND NOT q.closed
            "#,
        )
        .bind(answer.answer_id.as_uuid())
        .bind(answer.question_id.as_uuid())
        .bind(answer.user_id.as_uuid())
        .bind(answer.answer.as_str())
        .bind(answer.created_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            return Ok(());
        }

        let closed =
            sqlx::query_scalar::<_, bool>("SELECT closed FROM questions WHERE question_id = $1")
                .bind(answer.question_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        match closed {
            None => Err(InquireError::QuestionNotFound),
            Some(_) => Err(InquireError::QuestionClosed),
        }
    }

    async fn find_by_id(&self, answer_id: &AnswerId) -> InquireResult<Option<Answer>> {
        let row = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT answer_id, question_id, user_id, answer, accepted_answer, created_at
            FROM answers
            WHERE answer_id = $1
            "#,
        )
        .bind(answer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AnswerRow::into_answer))
    }

    async fn find_by_question(&self, question_id: &QuestionId) -> InquireResult<Vec<Answer>> {
        let rows = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT answer_id, question_id, user_id, answer, accepted_answer, created_at
            FROM answers
            WHERE question_id = $1
            ORDER BY created_at ASC, answer_id ASC
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AnswerRow::into_answer).collect())
    }

    async fn update(&self, answer: &Answer) -> InquireResult<()> {
        sqlx::query(
            r#"
            UPDATE answers SET
                answer = $2,
                accepted_answer = accepted_answer OR $3
            WHERE answer_id = $1
            "#,
        )
        .bind(answer.answer_id.as_uuid())
        .bind(answer.answer.as_str())
        .bind(answer.accepted)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InquireError::AlreadyAccepted
            } else {
                InquireError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn accept(&self, answer: &Answer) -> InquireResult<()> {
        let mut tx = self.pool.begin().await?;

        // Compare-and-set: only one accept can flip an open question.
        let closed = sqlx::query(
            "UPDATE questions SET closed = TRUE WHERE question_id = $1 AND closed = FALSE",
        )
        .bind(answer.question_id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if closed == 0 {
            tx.rollback().await?;
            return Err(InquireError::AlreadyAccepted);
        }

        let author = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE answers SET accepted_answer = TRUE
            WHERE answer_id = $1 AND question_id = $2
            RETURNING user_id
            "#,
        )
        .bind(answer.answer_id.as_uuid())
        .bind(answer.question_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InquireError::AlreadyAccepted
            } else {
                InquireError::Database(e)
            }
        })?;

        let Some(author) = author else {
            tx.rollback().await?;
            return Err(InquireError::AnswerNotFound);
        };

        let awarded = sqlx::query("UPDATE users SET karma = karma + 1 WHERE user_id = $1")
            .bind(author)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if awarded != 1 {
            tx.rollback().await?;
            return Err(InquireError::Internal(format!(
                "answer {} has no author",
                answer.answer_id
            )));
        }

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgInquireRepository {
    async fn create(&self, session: &Session) -> InquireResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                user_id,
                expires_at_ms,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> InquireResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, user_id, expires_at_ms, created_at, last_activity_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn update(&self, session: &Session) -> InquireResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions SET
                expires_at_ms = $2,
                last_activity_at = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> InquireResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> InquireResult<u64> {
        self.cleanup_expired().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    karma: i32,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> InquireResult<User> {
        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            karma: self.karma,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    question_id: Uuid,
    user_id: Uuid,
    question: String,
    latitude: f64,
    longitude: f64,
    closed: bool,
    created_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self) -> InquireResult<Question> {
        let location = GeoPoint::new(self.latitude, self.longitude).map_err(|e| {
            InquireError::Internal(format!("Invalid location for {}: {e}", self.question_id))
        })?;

        Ok(Question {
            question_id: QuestionId::from_uuid(self.question_id),
            user_id: UserId::from_uuid(self.user_id),
            question: PostText::from_db(self.question),
            location,
            closed: self.closed,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    answer_id: Uuid,
    question_id: Uuid,
    user_id: Uuid,
    answer: String,
    accepted_answer: bool,
    created_at: DateTime<Utc>,
}

impl AnswerRow {
    fn into_answer(self) -> Answer {
        Answer {
            answer_id: AnswerId::from_uuid(self.answer_id),
            question_id: QuestionId::from_uuid(self.question_id),
            user_id: UserId::from_uuid(self.user_id),
            answer: PostText::from_db(self.answer),
            accepted: self.accepted_answer,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Uuid,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}
