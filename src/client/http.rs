use std::time::Duration;

use log::debug;
use reqwest::{Client, Response};

use crate::client::traits::{AnswerSink, QuestionSource};
use crate::logic::build_forest;
use crate::model::{CreateAnswer, KioskError, Locale, Question, SaveAnswersResponse};

/// HTTP client for the questionnaire backend.
#[derive(Debug, Clone)]
pub struct KioskClient {
    client: Client,
    base_url: String,
}

impl KioskClient {
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Result<Self, KioskError> {
        let client = Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the flat listing and nest it locally.
    pub async fn fetch_flat_questions(&self, locale: Locale) -> Result<Vec<Question>, KioskError> {
        let response = self
            .client
            .get(self.url("/v1/questions"))
            .query(&[("locale", locale.as_str()), ("layout", "flat")])
            .send()
            .await
            .map_err(transport)?;

        let flat: Vec<Question> = check_status(response)?.json().await.map_err(transport)?;
        Ok(build_forest(flat))
    }
}

fn transport(err: reqwest::Error) -> KioskError {
    KioskError::Transport(err.to_string())
}

fn check_status(response: Response) -> Result<Response, KioskError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(KioskError::Transport(format!(
            "request to {} returned {}",
            response.url(),
            status
        )))
    }
}

#[async_trait::async_trait]
impl QuestionSource for KioskClient {
    async fn fetch_questions(&self, locale: Locale) -> Result<Vec<Question>, KioskError> {
        debug!("Fetching questions for locale {}", locale);
        let response = self
            .client
            .get(self.url("/v1/questions"))
            .query(&[("locale", locale.as_str())])
            .send()
            .await
            .map_err(transport)?;

        check_status(response)?.json().await.map_err(transport)
    }
}

#[async_trait::async_trait]
impl AnswerSink for KioskClient {
    async fn save_answers(&self, answers: &[CreateAnswer]) -> Result<SaveAnswersResponse, KioskError> {
        debug!("Submitting {} answers", answers.len());
        let response = self
            .client
            .post(self.url("/v1/answers"))
            .json(answers)
            .send()
            .await
            .map_err(transport)?;

        check_status(response)?.json().await.map_err(transport)
    }
}
