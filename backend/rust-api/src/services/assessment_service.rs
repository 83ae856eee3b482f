use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::assessment::{Assessment, AssessmentError, SubmitOutcome};
use crate::metrics::{
    ANSWERS_SUBMITTED_TOTAL, ASSESSMENTS_ACTIVE, ASSESSMENTS_TOTAL, ASSESSMENT_SCORE,
};
use crate::models::assessment::{AssessmentPhase, AssessmentView, Question};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssessmentServiceError {
    #[error("Assessment session not found")]
    NotFound,
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
}

#[derive(Clone)]
struct OwnedAssessment {
    owner: Uuid,
    assessment: Arc<Mutex<Assessment>>,
}

/// In-memory assessment sessions, one state machine per run. A session lives
/// until it is closed explicitly or its owning identity session ends.
pub struct AssessmentService {
    questions: Arc<[Question]>,
    sessions: RwLock<HashMap<Uuid, OwnedAssessment>>,
}

impl AssessmentService {
    pub fn new(questions: Arc<[Question]>) -> Self {
        Self {
            questions,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn start(&self, owner: Uuid) -> Result<AssessmentView, AssessmentServiceError> {
        let assessment = Assessment::new(Arc::clone(&self.questions))?;
        let session_id = Uuid::new_v4();
        let view = build_view(session_id, &assessment);

        self.sessions.write().await.insert(
            session_id,
            OwnedAssessment {
                owner,
                assessment: Arc::new(Mutex::new(assessment)),
            },
        );

        ASSESSMENTS_TOTAL.with_label_values(&["started"]).inc();
        ASSESSMENTS_ACTIVE.inc();

        tracing::info!(
            session_id = %session_id,
            owner = %owner,
            "Assessment started"
        );

        Ok(view)
    }

    pub async fn view(
        &self,
        owner: Uuid,
        session_id: Uuid,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let assessment = self.session(owner, session_id).await?;
        let assessment = assessment.lock().await;
        Ok(build_view(session_id, &assessment))
    }

    pub async fn select_answer(
        &self,
        owner: Uuid,
        session_id: Uuid,
        index: usize,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let assessment = self.session(owner, session_id).await?;
        let mut assessment = assessment.lock().await;
        assessment.select_answer(index)?;
        Ok(build_view(session_id, &assessment))
    }

    pub async fn submit(
        &self,
        owner: Uuid,
        session_id: Uuid,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let assessment = self.session(owner, session_id).await?;
        let mut assessment = assessment.lock().await;

        match assessment.submit()? {
            SubmitOutcome::Revealed { correct } => {
                let label = if correct { "true" } else { "false" };
                ANSWERS_SUBMITTED_TOTAL.with_label_values(&[label]).inc();
                tracing::debug!(session_id = %session_id, correct, "Answer revealed");
            }
            SubmitOutcome::Advanced { question_index } => {
                tracing::debug!(session_id = %session_id, question_index, "Advanced to next question");
            }
            SubmitOutcome::Completed(result) => {
                ASSESSMENTS_TOTAL.with_label_values(&["completed"]).inc();
                ASSESSMENT_SCORE.observe(f64::from(result.score));
                tracing::info!(
                    session_id = %session_id,
                    owner = %owner,
                    score = result.score,
                    correct = result.correct_count,
                    total = result.total_questions,
                    "Assessment completed"
                );
            }
        }

        Ok(build_view(session_id, &assessment))
    }

    pub async fn go_previous(
        &self,
        owner: Uuid,
        session_id: Uuid,
    ) -> Result<AssessmentView, AssessmentServiceError> {
        let assessment = self.session(owner, session_id).await?;
        let mut assessment = assessment.lock().await;
        assessment.go_previous()?;
        Ok(build_view(session_id, &assessment))
    }

    pub async fn close(&self, owner: Uuid, session_id: Uuid) -> Result<(), AssessmentServiceError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&session_id) {
            Some(entry) if entry.owner == owner => {}
            _ => return Err(AssessmentServiceError::NotFound),
        }

        sessions.remove(&session_id);
        ASSESSMENTS_ACTIVE.dec();
        tracing::info!(session_id = %session_id, "Assessment closed");
        Ok(())
    }

    /// Drops every session owned by `owner`. Returns how many were closed.
    pub async fn close_all_for(&self, owner: Uuid) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.owner != owner);
        let closed = before - sessions.len();
        ASSESSMENTS_ACTIVE.sub(closed as i64);
        closed
    }

    pub async fn clear(&self) {
        let mut sessions = self.sessions.write().await;
        ASSESSMENTS_ACTIVE.sub(sessions.len() as i64);
        sessions.clear();
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn owners(&self) -> Vec<Uuid> {
        let mut owners: Vec<Uuid> = self
            .sessions
            .read()
            .await
            .values()
            .map(|entry| entry.owner)
            .collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }

    async fn session(
        &self,
        owner: Uuid,
        session_id: Uuid,
    ) -> Result<Arc<Mutex<Assessment>>, AssessmentServiceError> {
        match self.sessions.read().await.get(&session_id) {
            // Sessions of other owners are reported as missing.
            Some(entry) if entry.owner == owner => Ok(Arc::clone(&entry.assessment)),
            _ => Err(AssessmentServiceError::NotFound),
        }
    }
}

fn build_view(session_id: Uuid, assessment: &Assessment) -> AssessmentView {
    let phase = assessment.phase();
    let complete = phase == AssessmentPhase::Complete;

    AssessmentView {
        session_id,
        phase,
        question_number: assessment.current_index() + 1,
        total_questions: assessment.total_questions(),
        progress_percent: assessment.progress_percent(),
        question: assessment.question_view(),
        selected_answer: assessment.selected_answer(),
        can_go_previous: !complete && assessment.current_index() > 0,
        can_submit: !complete && assessment.selected_answer().is_some(),
        reveal: assessment.reveal_view(),
        result: assessment.result().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::content_service::ContentService;

    fn service() -> AssessmentService {
        AssessmentService::new(ContentService::seeded().questions())
    }

    #[tokio::test]
    async fn test_full_run_through_service() {
        let service = service();
        let owner = Uuid::new_v4();

        let view = service.start(owner).await.unwrap();
        let id = view.session_id;
        assert_eq!(view.question_number, 1);
        assert_eq!(view.total_questions, 2);
        assert!(!view.can_submit);

        service.select_answer(owner, id, 1).await.unwrap();
        let revealed = service.submit(owner, id).await.unwrap();
        assert_eq!(revealed.phase, AssessmentPhase::Revealed);
        assert!(revealed.reveal.as_ref().unwrap().correct);

        service.submit(owner, id).await.unwrap();
        service.select_answer(owner, id, 0).await.unwrap();
        service.submit(owner, id).await.unwrap();
        let done = service.submit(owner, id).await.unwrap();

        assert_eq!(done.phase, AssessmentPhase::Complete);
        assert!(done.question.is_none());
        let result = done.result.unwrap();
        assert_eq!(result.score, 50);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.incorrect_count, 1);
    }

    #[tokio::test]
    async fn test_other_users_cannot_see_session() {
        let service = service();
        let owner = Uuid::new_v4();
        let id = service.start(owner).await.unwrap().session_id;

        let intruder = Uuid::new_v4();
        assert_eq!(
            service.view(intruder, id).await.unwrap_err(),
            AssessmentServiceError::NotFound
        );
        assert_eq!(
            service.close(intruder, id).await.unwrap_err(),
            AssessmentServiceError::NotFound
        );
        assert!(service.view(owner, id).await.is_ok());
    }

    #[tokio::test]
    async fn test_close_all_for_owner() {
        let service = service();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        service.start(owner).await.unwrap();
        service.start(owner).await.unwrap();
        service.start(other).await.unwrap();

        assert_eq!(service.owners().await.len(), 2);
        assert_eq!(service.close_all_for(owner).await, 2);
        assert_eq!(service.active_sessions().await, 1);
        assert_eq!(service.owners().await, vec![other]);
    }

    #[tokio::test]
    async fn test_close_all_for_does_not_wait_on_busy_sessions() {
        let service = service();
        let busy_owner = Uuid::new_v4();
        let leaving = Uuid::new_v4();
        let busy_id = service.start(busy_owner).await.unwrap().session_id;
        service.start(leaving).await.unwrap();

        let busy = service.session(busy_owner, busy_id).await.unwrap();
        let _held = busy.lock().await;

        let closed = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            service.close_all_for(leaving),
        )
        .await
        .expect("close_all_for blocked on an unrelated session");
        assert_eq!(closed, 1);
        assert_eq!(service.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_state_machine_errors_pass_through() {
        let service = service();
        let owner = Uuid::new_v4();
        let id = service.start(owner).await.unwrap().session_id;

        assert_eq!(
            service.submit(owner, id).await.unwrap_err(),
            AssessmentServiceError::Assessment(AssessmentError::NoAnswerSelected)
        );
        assert_eq!(
            service.go_previous(owner, id).await.unwrap_err(),
            AssessmentServiceError::Assessment(AssessmentError::AtFirstQuestion)
        );
    }
}
