use std::collections::HashMap;

use thiserror::Error;

use crate::content::{Locale, McqQuestion};

#[derive(Error, Debug, PartialEq)]
pub enum QuizError {
    #[error("cannot submit: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },

    #[error("attempt already submitted")]
    AlreadySubmitted,

    #[error("not submitted yet, no score to read")]
    NotSubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Answering,
    Submitted,
}

/// Banner severity for a score summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Perfect,
    Partial,
    Failing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
}

impl ScoreSummary {
    pub fn severity(&self) -> Severity {
        if self.score == self.total {
            Severity::Perfect
        } else if self.score * 2 >= self.total {
            Severity::Partial
        } else {
            Severity::Failing
        }
    }
}

/// Per-question display row while the attempt is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReview<'a> {
    pub question: &'a McqQuestion,
    pub chosen_option_id: Option<&'a str>,
    pub correct: bool,
    pub explanation: Option<&'a str>,
}

pub type CompletionCallback = Box<dyn FnMut(usize, usize)>;

/// One attempt over an ordered question list. Two states, Answering and
/// Submitted; submit is guarded on every question having an answer, reset
/// returns to the empty Answering state.
pub struct QuizAttempt {
    questions: Vec<McqQuestion>,
    answers: HashMap<String, String>,
    state: AttemptState,
    score: Option<usize>,
    on_complete: Option<CompletionCallback>,
}

impl QuizAttempt {
    pub fn new(questions: Vec<McqQuestion>) -> Self {
        Self {
            questions,
            answers: HashMap::new(),
            state: AttemptState::Answering,
            score: None,
            on_complete: None,
        }
    }

    pub fn with_completion(questions: Vec<McqQuestion>, callback: CompletionCallback) -> Self {
        let mut attempt = Self::new(questions);
        attempt.on_complete = Some(callback);
        attempt
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn questions(&self) -> &[McqQuestion] {
        &self.questions
    }

    pub fn chosen(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Sets or overwrites the answer for a question. Ignored once the
    /// attempt is submitted.
    pub fn select_answer(&mut self, question_id: &str, option_id: &str) {
        if self.state == AttemptState::Submitted {
            return;
        }
        self.answers
            .insert(question_id.to_string(), option_id.to_string());
    }

    /// Callers use this to enable/disable the submit action.
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn submit(&mut self) -> Result<ScoreSummary, QuizError> {
        if self.state == AttemptState::Submitted {
            return Err(QuizError::AlreadySubmitted);
        }
        if !self.is_complete() {
            return Err(QuizError::Incomplete {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }

        let score = self
            .questions
            .iter()
            .filter(|q| {
                self.answers
                    .get(&q.id)
                    .is_some_and(|chosen| *chosen == q.correct_option_id)
            })
            .count();

        self.state = AttemptState::Submitted;
        self.score = Some(score);

        let total = self.questions.len();
        if let Some(callback) = self.on_complete.as_mut() {
            callback(score, total);
        }

        Ok(ScoreSummary { score, total })
    }

    /// Stable under repeated reads until `reset`.
    pub fn score(&self) -> Result<ScoreSummary, QuizError> {
        match self.score {
            Some(score) => Ok(ScoreSummary {
                score,
                total: self.questions.len(),
            }),
            None => Err(QuizError::NotSubmitted),
        }
    }

    /// Clears answers and the submitted flag. Scores already reported to a
    /// caller are the caller's to keep.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.state = AttemptState::Answering;
        self.score = None;
    }

    /// Correct/incorrect marks for the submitted attempt. Explanations show
    /// only on incorrectly answered questions that carry one.
    pub fn review(&self, locale: Locale) -> Result<Vec<QuestionReview<'_>>, QuizError> {
        if self.state != AttemptState::Submitted {
            return Err(QuizError::NotSubmitted);
        }

        Ok(self
            .questions
            .iter()
            .map(|question| {
                let chosen = self.answers.get(&question.id).map(String::as_str);
                let correct = chosen == Some(question.correct_option_id.as_str());
                let explanation = if correct {
                    None
                } else {
                    question.explanation.as_ref().map(|e| e.get(locale))
                };
                QuestionReview {
                    question,
                    chosen_option_id: chosen,
                    correct,
                    explanation,
                }
            })
            .collect())
    }
}
