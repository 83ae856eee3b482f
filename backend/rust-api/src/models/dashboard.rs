use serde::Serialize;

use super::Accent;

#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub change: String,
    pub accent: Accent,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetencyProgress {
    pub name: String,
    pub progress: u8,
    pub accent: Accent,
}

/// One point of the weekly subject progress series.
#[derive(Debug, Clone, Serialize)]
pub struct DailyProgress {
    pub day: String,
    pub mathematics: u8,
    pub science: u8,
    pub language: u8,
    pub social: u8,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Assessment,
    Resource,
    Achievement,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    pub id: u32,
    pub title: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingTask {
    pub id: u32,
    pub title: String,
    pub due: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub stats: Vec<StatCard>,
    pub competencies: Vec<CompetencyProgress>,
    pub weekly_progress: Vec<DailyProgress>,
    pub recent_activity: Vec<ActivityItem>,
    pub upcoming_tasks: Vec<UpcomingTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassCompetencyAverage {
    pub competency: String,
    pub average: u8,
    pub students: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrugglingStudent {
    pub name: String,
    pub competency: String,
    pub progress: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassActivity {
    pub id: u32,
    pub student: String,
    pub action: String,
    pub score: Option<String>,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherDashboard {
    pub stats: Vec<StatCard>,
    pub class_overview: Vec<ClassCompetencyAverage>,
    pub needs_attention: Vec<StrugglingStudent>,
    pub recent_activity: Vec<ClassActivity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Student(StudentDashboard),
    Teacher(TeacherDashboard),
}
