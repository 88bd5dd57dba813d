//! HTTP Handlers
//!
//! Each handler validates its parameters with an [`Endpoint`] before doing
//! anything else and answers with the `{success, msg, ...}` envelope.

use axum::extract::{Extension, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use kernel::envelope::Envelope;
use platform::mail::MailTransport;
use std::sync::Arc;

use crate::application::config::InquireConfig;
use crate::application::{
    AcceptAnswerUseCase, AnswerInput, AnswerQuestionUseCase, AskInput, AskQuestionUseCase,
    AuthenticateInput, AuthenticateUseCase, ListAnswersUseCase, NearbyInput,
    NearbyQuestionsUseCase, RegisterInput, RegisterUseCase, SeedQuestionsUseCase, SignOutUseCase,
};
use crate::domain::repository::InquireStore;
use crate::domain::value_object::{answer_id::AnswerId, question_id::QuestionId};
use crate::error::{InquireError, InquireResult};
use crate::presentation::dto::{AnswerView, QuestionView, UserView};
use crate::presentation::middleware::CurrentUser;
use crate::presentation::request::{ApiRequest, Endpoint};

pub const LOGGED_OUT_MESSAGE: &str = "User has been logged out.";

const REGISTER: Endpoint = Endpoint::post(&["email", "password"]);
const AUTH: Endpoint = Endpoint::post(&["email", "password"]);
const ASK: Endpoint = Endpoint::post(&["question", "latitude", "longitude", "pay_key"]);
const ANSWER: Endpoint = Endpoint::post(&["question_id", "answer"]);
const ACCEPT: Endpoint = Endpoint::post(&["answer_id"]);
const ANSWERS: Endpoint = Endpoint::get(&["question_id"]);
const QUESTIONS: Endpoint = Endpoint::get(&["latitude", "longitude"]);
const RANDOMIZE: Endpoint = Endpoint::get(&[]);

/// Shared state for the API handlers
pub struct InquireAppState<R, M>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<InquireConfig>,
}

// The transport itself need not be Clone.
impl<R, M> Clone for InquireAppState<R, M>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// POST /api/register
pub async fn register<R, M>(
    State(state): State<InquireAppState<R, M>>,
    req: ApiRequest,
) -> InquireResult<Envelope>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    REGISTER.validate(&req)?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(RegisterInput {
            email: req.str("email")?.to_string(),
            password: req.str("password")?.to_string(),
        })
        .await?;

    Ok(Envelope::ok())
}

/// POST /api/auth
pub async fn auth<R, M>(
    State(state): State<InquireAppState<R, M>>,
    req: ApiRequest,
) -> InquireResult<Response>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    AUTH.validate(&req)?;

    let use_case =
        AuthenticateUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(AuthenticateInput {
            email: req.str("email")?.to_string(),
            password: req.str("password")?.to_string(),
        })
        .await?;

    let cookie = state
        .config
        .session_cookie()
        .set_cookie_header(&output.session_token)
        .map_err(|e| InquireError::Internal(format!("Invalid session cookie: {e}")))?;

    let body = Envelope::ok().with("user", UserView::from(&output.user))?;

    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

/// ANY /api/logout
///
/// Always succeeds and always clears the cookie.
pub async fn logout<R, M>(
    State(state): State<InquireAppState<R, M>>,
    headers: HeaderMap,
) -> Response
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    if let Some(token) =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name)
    {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        if let Err(e) = use_case.execute(&token).await {
            tracing::warn!(error = %e, "Failed to delete session on logout");
        }
    }

    let mut response = Envelope::ok()
        .with_message(LOGGED_OUT_MESSAGE)
        .into_response();

    match state.config.session_cookie().delete_cookie_header() {
        Ok(cookie) => {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to build cookie removal header"),
    }

    response
}

// ============================================================================
// Questions & Answers
// ============================================================================

/// POST /api/ask
pub async fn ask<R, M>(
    State(state): State<InquireAppState<R, M>>,
    Extension(current): Extension<CurrentUser>,
    req: ApiRequest,
) -> InquireResult<Envelope>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    ASK.validate(&req)?;

    let input = AskInput {
        question: req.str("question")?.to_string(),
        latitude: req.f64("latitude")?,
        longitude: req.f64("longitude")?,
        pay_key: req.str("pay_key")?.to_string(),
    };

    let use_case = AskQuestionUseCase::new(state.repo.clone(), state.repo.clone());
    let output = use_case.execute(&current.user_id, input).await?;

    Ok(Envelope::ok()
        .with("question", QuestionView::from(&output.question))?
        .with("user", UserView::from(&output.user))?)
}

/// POST /api/answer
pub async fn answer<R, M>(
    State(state): State<InquireAppState<R, M>>,
    Extension(current): Extension<CurrentUser>,
    req: ApiRequest,
) -> InquireResult<Envelope>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    ANSWER.validate(&req)?;

    let input = AnswerInput {
        question_id: req.id::<QuestionId>("question_id", InquireError::QuestionNotFound)?,
        answer: req.str("answer")?.to_string(),
    };

    let use_case = AnswerQuestionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
    );
    let answer = use_case.execute(&current.user_id, input).await?;

    Ok(Envelope::ok().with("answer", AnswerView::from(&answer))?)
}

/// POST /api/accept
pub async fn accept<R, M>(
    State(state): State<InquireAppState<R, M>>,
    Extension(current): Extension<CurrentUser>,
    req: ApiRequest,
) -> InquireResult<Envelope>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    ACCEPT.validate(&req)?;

    let answer_id = req.id::<AnswerId>("answer_id", InquireError::AnswerNotFound)?;

    let use_case = AcceptAnswerUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
    );
    use_case.execute(&current.user_id, &answer_id).await?;

    Ok(Envelope::ok())
}

/// GET /api/answers
pub async fn answers<R, M>(
    State(state): State<InquireAppState<R, M>>,
    req: ApiRequest,
) -> InquireResult<Envelope>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    ANSWERS.validate(&req)?;

    let question_id =
        req.id::<QuestionId>("question_id", InquireError::AnswersQuestionNotFound)?;

    let use_case = ListAnswersUseCase::new(state.repo.clone(), state.repo.clone());
    let answers = use_case.execute(&question_id).await?;

    let views: Vec<AnswerView> = answers.iter().map(AnswerView::from).collect();
    Ok(Envelope::ok().with("answers", views)?)
}

/// GET /api/questions
pub async fn questions<R, M>(
    State(state): State<InquireAppState<R, M>>,
    req: ApiRequest,
) -> InquireResult<Envelope>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    QUESTIONS.validate(&req)?;

    let input = NearbyInput {
        latitude: req.f64("latitude")?,
        longitude: req.f64("longitude")?,
        max_results: req.optional_count("max_results")?,
        max_distance_miles: req.optional_f64("max_distance")?,
    };

    let use_case = NearbyQuestionsUseCase::new(state.repo.clone(), state.config.clone());
    let questions = use_case.execute(input).await?;

    let views: Vec<QuestionView> = questions.iter().map(QuestionView::from).collect();
    Ok(Envelope::ok().with("questions", views)?)
}

// ============================================================================
// Debug seeding
// ============================================================================

/// GET /api/randomize
pub async fn randomize<R, M>(
    State(state): State<InquireAppState<R, M>>,
    req: ApiRequest,
) -> InquireResult<Envelope>
where
    R: InquireStore,
    M: MailTransport + Sync + 'static,
{
    RANDOMIZE.validate(&req)?;

    let use_case =
        SeedQuestionsUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let questions = use_case.execute().await?;

    let views: Vec<QuestionView> = questions.iter().map(QuestionView::from).collect();
    Ok(Envelope::ok().with("questions", views)?)
}
