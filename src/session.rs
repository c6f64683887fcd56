use crate::compile::CompiledQuestion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// Feedback immediately after each answer is checked
    Study,
    /// Feedback deferred until the quiz is finished
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[default]
    Unread,
    Answered,
    Skipped,
}

/// Why a saved-progress file was rejected
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("not a valid progress document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("question index {index} out of range for a bank of {total} questions")]
    IndexOutOfRange { index: usize, total: usize },
    #[error("progress references unknown question id {id}")]
    UnknownQuestion { id: u32 },
    #[error("answer {answer} out of range for question {id} ({options} options)")]
    AnswerOutOfRange { id: u32, answer: usize, options: usize },
}

/// The whole quiz session as one serializable value.
///
/// Every transition goes through [`SessionState::apply`]; saving and loading
/// are plain serialize/deserialize of this value, with [`SessionState::validate`]
/// gating anything read from disk. The wire schema matches the progress files
/// the quiz UI exports (camelCase keys, ids as map keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub mode: QuizMode,
    pub current_question_index: usize,
    pub user_answers: BTreeMap<u32, usize>,
    pub show_explanation: BTreeMap<u32, bool>,
    pub question_status: BTreeMap<u32, QuestionStatus>,
    pub score: u32,
    pub is_completed: bool,
    pub timestamp: String,
    pub starred_questions: Vec<u32>,
}

/// One user interaction, applied atomically to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Record an answer for the current question
    SelectAnswer { answer: usize },
    /// Reveal the current question's explanation; in study mode the first
    /// reveal of a correct answer scores a point
    CheckAnswer,
    /// Mark the current question skipped and move on
    Skip,
    Next,
    Prev,
    NavigateTo { index: usize },
    ToggleStar { question_id: u32 },
    /// Complete the quiz; in test mode this computes the final score and
    /// reveals every explanation
    Finish,
    /// Reset answers, statuses and score; starred questions survive
    Restart,
}

impl SessionState {
    /// Fresh session over a bank: every question unread, nothing answered
    pub fn new(mode: QuizMode, bank: &[CompiledQuestion]) -> Self {
        Self {
            mode,
            current_question_index: 0,
            user_answers: BTreeMap::new(),
            show_explanation: BTreeMap::new(),
            question_status: bank
                .iter()
                .map(|q| (q.id, QuestionStatus::Unread))
                .collect(),
            score: 0,
            is_completed: false,
            timestamp: String::new(),
            starred_questions: Vec::new(),
        }
    }

    pub fn apply(&mut self, action: Action, bank: &[CompiledQuestion]) {
        match action {
            Action::SelectAnswer { answer } => {
                let Some(id) = self.current_question_id(bank) else {
                    return;
                };
                self.user_answers.insert(id, answer);
                self.question_status.insert(id, QuestionStatus::Answered);
            }
            Action::CheckAnswer => {
                let Some(id) = self.current_question_id(bank) else {
                    return;
                };
                let Some(&answer) = self.user_answers.get(&id) else {
                    return;
                };
                let already_shown = self.show_explanation.get(&id).copied().unwrap_or(false);
                if self.mode == QuizMode::Study
                    && !already_shown
                    && is_correct(&bank[self.current_question_index], answer)
                {
                    self.score += 1;
                }
                self.show_explanation.insert(id, true);
                self.question_status.insert(id, QuestionStatus::Answered);
            }
            Action::Skip => {
                let Some(id) = self.current_question_id(bank) else {
                    return;
                };
                let shown = self.show_explanation.get(&id).copied().unwrap_or(false);
                if shown || self.question_status.get(&id) == Some(&QuestionStatus::Answered) {
                    return;
                }
                self.question_status.insert(id, QuestionStatus::Skipped);
                self.apply(Action::Next, bank);
            }
            Action::Next => {
                if self.current_question_index + 1 < bank.len() {
                    self.current_question_index += 1;
                }
            }
            Action::Prev => {
                self.current_question_index = self.current_question_index.saturating_sub(1);
            }
            Action::NavigateTo { index } => {
                if index < bank.len() {
                    self.current_question_index = index;
                }
            }
            Action::ToggleStar { question_id } => {
                if self.starred_questions.contains(&question_id) {
                    self.starred_questions.retain(|&id| id != question_id);
                } else {
                    self.starred_questions.push(question_id);
                }
            }
            Action::Finish => {
                if self.mode == QuizMode::Test {
                    self.score = self
                        .user_answers
                        .iter()
                        .filter(|&(&id, &answer)| {
                            bank.iter()
                                .find(|q| q.id == id)
                                .is_some_and(|q| is_correct(q, answer))
                        })
                        .count() as u32;
                    for question in bank {
                        self.show_explanation.insert(question.id, true);
                    }
                }
                self.is_completed = true;
            }
            Action::Restart => {
                let starred = std::mem::take(&mut self.starred_questions);
                *self = Self::new(self.mode, bank);
                self.starred_questions = starred;
            }
        }
    }

    /// Semantic validation of a deserialized session against a bank.
    /// Serde already guarantees the required keys; this rejects anything
    /// whose indices or ids do not fit the bank.
    pub fn validate(&self, bank: &[CompiledQuestion]) -> Result<(), ProgressError> {
        if self.current_question_index >= bank.len() && !(bank.is_empty() && self.current_question_index == 0) {
            return Err(ProgressError::IndexOutOfRange {
                index: self.current_question_index,
                total: bank.len(),
            });
        }

        for (&id, &answer) in &self.user_answers {
            let question = bank
                .iter()
                .find(|q| q.id == id)
                .ok_or(ProgressError::UnknownQuestion { id })?;
            if answer >= question.options.len() {
                return Err(ProgressError::AnswerOutOfRange {
                    id,
                    answer,
                    options: question.options.len(),
                });
            }
        }

        let known = |id: &u32| bank.iter().any(|q| q.id == *id);
        for id in self
            .show_explanation
            .keys()
            .chain(self.question_status.keys())
            .chain(self.starred_questions.iter())
        {
            if !known(id) {
                return Err(ProgressError::UnknownQuestion { id: *id });
            }
        }

        Ok(())
    }

    fn current_question_id(&self, bank: &[CompiledQuestion]) -> Option<u32> {
        bank.get(self.current_question_index).map(|q| q.id)
    }
}

/// An answer counts only against a correct index that is actually valid
fn is_correct(question: &CompiledQuestion, answer: usize) -> bool {
    question
        .correct_answer
        .is_some_and(|correct| correct < question.options.len() && correct == answer)
}

/// Parse and validate a saved-progress document
pub fn load_progress(json: &str, bank: &[CompiledQuestion]) -> Result<SessionState, ProgressError> {
    let state: SessionState = serde_json::from_str(json)?;
    state.validate(bank)?;
    Ok(state)
}

/// Serialize a session the way the quiz UI saves it
pub fn save_progress(state: &SessionState) -> String {
    serde_json::to_string_pretty(state).expect("session state always serializes")
}
