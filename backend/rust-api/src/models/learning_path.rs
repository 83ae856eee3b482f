use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Video,
    Article,
    Interactive,
    Assessment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ModuleType,
    pub duration: String,
    pub completed: bool,
    pub locked: bool,
    pub competency: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct LearningPathResponse {
    pub modules: Vec<LearningModule>,
    pub completed_count: usize,
    pub total: usize,
    pub progress_percent: u8,
    pub next_module: Option<LearningModule>,
}
