use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A multiple-choice question; `correct_answer` indexes into `options`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    pub competency: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentPhase {
    Answering,
    Revealed,
    Complete,
}

#[derive(Debug, Deserialize)]
pub struct SelectAnswerRequest {
    pub index: usize,
}

/// Question as shown to the student. Never carries the correct index.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub competency: String,
}

#[derive(Debug, Serialize)]
pub struct RevealView {
    pub correct: bool,
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AssessmentResult {
    pub score: u8,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct AssessmentView {
    pub session_id: Uuid,
    pub phase: AssessmentPhase,
    pub question_number: usize,
    pub total_questions: usize,
    pub progress_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    pub selected_answer: Option<usize>,
    pub can_go_previous: bool,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal: Option<RevealView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AssessmentResult>,
}
