use log::{error, info};

use crate::client::{AnswerSink, QuestionSource};
use crate::form::{assemble_submission, render_form, AnswerStore, FormNode, InputStrategy};
use crate::logic::find_question;
use crate::model::{
    AnswerValue, ContentType, CreateAnswer, KioskError, Locale, Question, QuestionId,
    SaveAnswersResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading(Locale),
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Saved,
    Failed,
}

/// Non-blocking notice the presentation layer shows after a load or save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoadFailed,
    SaveFailed,
    Saved,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LoadFailed => {
                "Failed to load questions. Please refresh the page or try again later."
            }
            Notice::SaveFailed => "Failed to save answers. Please try again.",
            Notice::Saved => "Your answers have been saved successfully.",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Saved)
    }
}

/// One kiosk form: active locale, loaded tree, answers, and request state.
///
/// The session is the single owner of its `AnswerStore`. Load and submit are
/// split into `begin_*`/`finish_*` halves so a caller driving requests itself
/// still gets the in-flight guards; `load` and `submit` run both halves.
#[derive(Debug)]
pub struct FormSession<C> {
    backend: C,
    locale: Locale,
    questions: Vec<Question>,
    answers: AnswerStore,
    load_state: LoadState,
    save_state: SaveState,
}

impl<C: QuestionSource + AnswerSink> FormSession<C> {
    pub fn new(backend: C) -> Self {
        Self::with_locale(backend, Locale::default())
    }

    pub fn with_locale(backend: C, locale: Locale) -> Self {
        Self {
            backend,
            locale,
            questions: Vec::new(),
            answers: AnswerStore::new(),
            load_state: LoadState::Idle,
            save_state: SaveState::Idle,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn save_state(&self) -> SaveState {
        self.save_state
    }

    pub fn is_saving(&self) -> bool {
        self.save_state == SaveState::Saving
    }

    pub fn notice(&self) -> Option<Notice> {
        if self.load_state == LoadState::Failed {
            return Some(Notice::LoadFailed);
        }
        match self.save_state {
            SaveState::Failed => Some(Notice::SaveFailed),
            SaveState::Saved => Some(Notice::Saved),
            SaveState::Idle | SaveState::Saving => None,
        }
    }

    /// Mark a load for the active locale as started.
    pub fn begin_load(&mut self) -> Result<Locale, KioskError> {
        if self.load_state == LoadState::Loading(self.locale) {
            return Err(KioskError::LoadInFlight(self.locale));
        }
        self.load_state = LoadState::Loading(self.locale);
        Ok(self.locale)
    }

    /// Replace the whole tree on success. A response that arrives after a newer
    /// request started still applies; requests are not cancelled.
    pub fn finish_load(&mut self, result: Result<Vec<Question>, KioskError>) {
        match result {
            Ok(questions) => {
                self.questions = questions;
                self.load_state = LoadState::Loaded;
            }
            Err(e) => {
                error!("Failed to load questions for {}: {}", self.locale, e);
                self.load_state = LoadState::Failed;
            }
        }
    }

    pub async fn load(&mut self) -> Result<(), KioskError> {
        let locale = self.begin_load()?;
        let result = self.backend.fetch_questions(locale).await;
        let outcome = match &result {
            Ok(_) => Ok(()),
            Err(e) => Err(e.clone()),
        };
        self.finish_load(result);
        outcome
    }

    /// Switch language and reload. Answers are keyed by id and survive the switch.
    pub async fn change_locale(&mut self, locale: Locale) -> Result<(), KioskError> {
        if locale != self.locale {
            info!("Switching form locale {} -> {}", self.locale, locale);
        }
        self.locale = locale;
        self.load().await
    }

    /// Store a value as-is, without coercion.
    pub fn set_answer(&mut self, question_id: QuestionId, value: AnswerValue) {
        self.answers.set_answer(question_id.to_string(), value);
    }

    /// Apply raw user input through the strategy the question is rendered with.
    /// Table cells are numeric or text whatever their own content says.
    pub fn input(&mut self, question_id: QuestionId, raw: &str) -> Result<(), KioskError> {
        let question = find_question(&self.questions, question_id)
            .ok_or(KioskError::UnknownQuestion(question_id))?;
        let in_table = question
            .parent_id
            .and_then(|parent_id| find_question(&self.questions, parent_id))
            .is_some_and(|parent| parent.content == Some(ContentType::Table));
        let strategy = if in_table {
            InputStrategy::for_table_cell(question)
        } else {
            InputStrategy::for_content(question.content)
                .ok_or(KioskError::NotABinding(question_id))?
        };
        let value = strategy.coerce(question, raw)?;

        self.answers.set_answer(question_id.to_string(), value);
        Ok(())
    }

    pub fn render(&self) -> Vec<FormNode> {
        render_form(&self.questions, &self.answers)
    }

    /// Assemble the batch and mark a submission as in flight.
    pub fn begin_submit(&mut self) -> Result<Vec<CreateAnswer>, KioskError> {
        if self.is_saving() {
            return Err(KioskError::SubmissionInFlight);
        }
        let payload = assemble_submission(&self.answers)?;
        self.save_state = SaveState::Saving;
        Ok(payload)
    }

    /// Record the outcome. Answers are kept after success; only `reset` clears them.
    pub fn finish_submit(
        &mut self,
        result: Result<SaveAnswersResponse, KioskError>,
    ) -> Result<SaveAnswersResponse, KioskError> {
        match &result {
            Ok(_) => {
                info!("Saved {} answers", self.answers.len());
                self.save_state = SaveState::Saved;
            }
            Err(e) => {
                error!("Failed to save answers: {}", e);
                self.save_state = SaveState::Failed;
            }
        }
        result
    }

    pub async fn submit(&mut self) -> Result<SaveAnswersResponse, KioskError> {
        let payload = self.begin_submit()?;
        let result = self.backend.save_answers(&payload).await;
        self.finish_submit(result)
    }

    /// Explicit user reset: drop all answers and any save outcome.
    pub fn reset(&mut self) {
        self.answers.clear_answers();
        if self.save_state != SaveState::Saving {
            self.save_state = SaveState::Idle;
        }
    }
}
