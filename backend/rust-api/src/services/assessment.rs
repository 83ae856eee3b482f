//! Competency assessment state machine.
//!
//! `Answering(q) -> Revealed(q) -> Answering(q + 1) | Complete`. Every question
//! must be answered in order; stepping back re-enters `Answering` and restores
//! the previously recorded choice. `Complete` is terminal.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::models::assessment::{
    AssessmentPhase, AssessmentResult, Question, QuestionView, RevealView,
};
use crate::utils::percent;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("Assessment requires at least one question")]
    EmptyQuestionSet,
    #[error("Option {index} is out of range for a question with {options} options")]
    OptionOutOfRange { index: usize, options: usize },
    #[error("No answer selected")]
    NoAnswerSelected,
    #[error("Answer already revealed for this question")]
    AlreadyRevealed,
    #[error("Already at the first question")]
    AtFirstQuestion,
    #[error("Assessment is already complete")]
    AlreadyComplete,
    #[error("Assessment is not complete")]
    NotComplete,
}

/// Result of a successful `submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Revealed { correct: bool },
    Advanced { question_index: usize },
    Completed(AssessmentResult),
}

#[derive(Debug, Clone)]
pub struct Assessment {
    questions: Arc<[Question]>,
    current: usize,
    selected: Option<usize>,
    answers: BTreeMap<usize, usize>,
    phase: AssessmentPhase,
}

impl Assessment {
    pub fn new(questions: Arc<[Question]>) -> Result<Self, AssessmentError> {
        if questions.is_empty() {
            return Err(AssessmentError::EmptyQuestionSet);
        }

        Ok(Self {
            questions,
            current: 0,
            selected: None,
            answers: BTreeMap::new(),
            phase: AssessmentPhase::Answering,
        })
    }

    pub fn phase(&self) -> AssessmentPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn select_answer(&mut self, index: usize) -> Result<(), AssessmentError> {
        match self.phase {
            AssessmentPhase::Answering => {}
            AssessmentPhase::Revealed => return Err(AssessmentError::AlreadyRevealed),
            AssessmentPhase::Complete => return Err(AssessmentError::AlreadyComplete),
        }

        let options = self.current_question().options.len();
        if index >= options {
            return Err(AssessmentError::OptionOutOfRange { index, options });
        }

        self.selected = Some(index);
        Ok(())
    }

    pub fn submit(&mut self) -> Result<SubmitOutcome, AssessmentError> {
        if self.phase == AssessmentPhase::Complete {
            return Err(AssessmentError::AlreadyComplete);
        }
        let selected = self.selected.ok_or(AssessmentError::NoAnswerSelected)?;

        match self.phase {
            AssessmentPhase::Answering => {
                self.answers.insert(self.current, selected);
                self.phase = AssessmentPhase::Revealed;
                Ok(SubmitOutcome::Revealed {
                    correct: selected == self.current_question().correct_answer,
                })
            }
            AssessmentPhase::Revealed if self.current + 1 < self.questions.len() => {
                self.current += 1;
                self.selected = None;
                self.phase = AssessmentPhase::Answering;
                Ok(SubmitOutcome::Advanced {
                    question_index: self.current,
                })
            }
            AssessmentPhase::Revealed => {
                self.phase = AssessmentPhase::Complete;
                Ok(SubmitOutcome::Completed(self.result()?))
            }
            AssessmentPhase::Complete => Err(AssessmentError::AlreadyComplete),
        }
    }

    pub fn go_previous(&mut self) -> Result<(), AssessmentError> {
        if self.phase == AssessmentPhase::Complete {
            return Err(AssessmentError::AlreadyComplete);
        }
        if self.current == 0 {
            return Err(AssessmentError::AtFirstQuestion);
        }

        self.current -= 1;
        self.selected = self.answers.get(&self.current).copied();
        self.phase = AssessmentPhase::Answering;
        Ok(())
    }

    pub fn correct_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|(index, answer)| self.questions[**index].correct_answer == **answer)
            .count()
    }

    pub fn score(&self) -> Result<u8, AssessmentError> {
        if self.phase != AssessmentPhase::Complete {
            return Err(AssessmentError::NotComplete);
        }
        Ok(percent(self.correct_count(), self.questions.len()))
    }

    pub fn result(&self) -> Result<AssessmentResult, AssessmentError> {
        let score = self.score()?;
        let correct_count = self.correct_count();
        Ok(AssessmentResult {
            score,
            correct_count,
            incorrect_count: self.answers.len() - correct_count,
            total_questions: self.questions.len(),
        })
    }

    pub fn progress_percent(&self) -> u8 {
        percent(self.current + 1, self.questions.len())
    }

    pub fn question_view(&self) -> Option<QuestionView> {
        if self.phase == AssessmentPhase::Complete {
            return None;
        }
        let question = self.current_question();
        Some(QuestionView {
            id: question.id.clone(),
            text: question.text.clone(),
            options: question.options.clone(),
            competency: question.competency.clone(),
        })
    }

    pub fn reveal_view(&self) -> Option<RevealView> {
        if self.phase != AssessmentPhase::Revealed {
            return None;
        }
        let question = self.current_question();
        Some(RevealView {
            correct: self.selected == Some(question.correct_answer),
            correct_answer: question.correct_answer,
            explanation: question.explanation.clone(),
        })
    }
}
