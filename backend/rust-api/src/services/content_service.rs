use std::sync::Arc;

use crate::models::{
    assessment::Question,
    chat::QuickAction,
    learning_path::{LearningModule, LearningPathResponse, ModuleType},
    resource::{CatalogResponse, Difficulty, Resource, ResourceQuery, ResourceType},
};

use super::catalog;

/// Read-only content seeded at startup: quiz questions, resource catalog and
/// learning path. Nothing here is ever mutated.
pub struct ContentService {
    questions: Arc<[Question]>,
    resources: Vec<Resource>,
    modules: Vec<LearningModule>,
}

impl ContentService {
    pub fn seeded() -> Self {
        Self {
            questions: sample_questions().into(),
            resources: sample_resources(),
            modules: sample_learning_modules(),
        }
    }

    pub fn questions(&self) -> Arc<[Question]> {
        Arc::clone(&self.questions)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn catalog(&self, query: &ResourceQuery) -> CatalogResponse {
        let resources = catalog::filter(&self.resources, &query.search, &query.subject, &query.kind)
            .into_iter()
            .cloned()
            .collect();

        CatalogResponse {
            resources,
            total_available: self.resources.len(),
            subjects: catalog::subjects(&self.resources),
            types: catalog::types(),
        }
    }

    pub fn learning_path(&self) -> LearningPathResponse {
        let total = self.modules.len();
        let completed_count = self.modules.iter().filter(|m| m.completed).count();
        let progress_percent = if total == 0 {
            0
        } else {
            crate::utils::percent(completed_count, total)
        };
        let next_module = self
            .modules
            .iter()
            .find(|m| !m.completed && !m.locked)
            .cloned();

        LearningPathResponse {
            modules: self.modules.clone(),
            completed_count,
            total,
            progress_percent,
            next_module,
        }
    }
}

pub const CHAT_GREETING: &str = "Hello! I'm your AI Study Assistant. I can help you understand complex topics, explain concepts, and provide personalized learning guidance. What would you like to learn about today?";

pub fn quick_actions() -> Vec<QuickAction> {
    [
        ("Explain a concept", "Can you explain a difficult concept to me?"),
        ("Study strategies", "What are some effective study strategies?"),
        ("Check progress", "How am I doing with my competencies?"),
    ]
    .into_iter()
    .map(|(label, prompt)| QuickAction {
        label: label.to_string(),
        prompt: prompt.to_string(),
    })
    .collect()
}

fn sample_questions() -> Vec<Question> {
    vec![
        Question {
            id: "1".to_string(),
            text: "A farmer has 120 apples and wants to pack them equally into boxes. If each box holds 8 apples, how many boxes will he need?".to_string(),
            options: vec![
                "12 boxes".to_string(),
                "15 boxes".to_string(),
                "16 boxes".to_string(),
                "18 boxes".to_string(),
            ],
            correct_answer: 1,
            explanation: "To find the number of boxes needed, divide 120 by 8: 120 ÷ 8 = 15 boxes.".to_string(),
            competency: "Mathematical Problem Solving".to_string(),
        },
        Question {
            id: "2".to_string(),
            text: "Which of the following best demonstrates critical thinking in a science experiment?".to_string(),
            options: vec![
                "Following instructions exactly as written".to_string(),
                "Questioning unexpected results and investigating further".to_string(),
                "Recording only positive outcomes".to_string(),
                "Skipping the hypothesis step".to_string(),
            ],
            correct_answer: 1,
            explanation: "Critical thinking involves questioning results, analyzing data objectively, and investigating anomalies to understand the underlying causes.".to_string(),
            competency: "Scientific Critical Thinking".to_string(),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn resource(
    id: &str,
    title: &str,
    kind: ResourceType,
    subject: &str,
    duration: &str,
    rating: f32,
    description: &str,
    competencies: &[&str],
    difficulty: Difficulty,
    thumbnail: &str,
) -> Resource {
    Resource {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        subject: subject.to_string(),
        duration: duration.to_string(),
        rating,
        description: description.to_string(),
        competencies: competencies.iter().map(|c| c.to_string()).collect(),
        difficulty,
        thumbnail: thumbnail.to_string(),
    }
}

fn sample_resources() -> Vec<Resource> {
    vec![
        resource(
            "1",
            "Understanding Quadratic Equations",
            ResourceType::Video,
            "Mathematics",
            "18 min",
            4.8,
            "Master the fundamentals of quadratic equations with visual examples and step-by-step solutions.",
            &["Problem Solving", "Mathematical Reasoning"],
            Difficulty::Intermediate,
            "https://images.pexels.com/photos/3862132/pexels-photo-3862132.jpeg?auto=compress&cs=tinysrgb&w=400",
        ),
        resource(
            "2",
            "Scientific Method in Action",
            ResourceType::Interactive,
            "Science",
            "25 min",
            4.9,
            "Interactive simulation of conducting scientific experiments using proper methodology.",
            &["Critical Thinking", "Scientific Inquiry"],
            Difficulty::Beginner,
            "https://images.pexels.com/photos/2280549/pexels-photo-2280549.jpeg?auto=compress&cs=tinysrgb&w=400",
        ),
        resource(
            "3",
            "Effective Communication Strategies",
            ResourceType::Article,
            "Language Arts",
            "12 min",
            4.7,
            "Learn techniques for clear, persuasive, and engaging written and verbal communication.",
            &["Communication", "Critical Thinking"],
            Difficulty::Intermediate,
            "https://images.pexels.com/photos/3184418/pexels-photo-3184418.jpeg?auto=compress&cs=tinysrgb&w=400",
        ),
        resource(
            "4",
            "Historical Analysis Workshop",
            ResourceType::Interactive,
            "Social Studies",
            "35 min",
            4.6,
            "Develop skills in analyzing historical sources and drawing evidence-based conclusions.",
            &["Critical Thinking", "Historical Analysis"],
            Difficulty::Advanced,
            "https://images.pexels.com/photos/159711/books-bookstore-book-reading-159711.jpeg?auto=compress&cs=tinysrgb&w=400",
        ),
    ]
}

fn sample_learning_modules() -> Vec<LearningModule> {
    let module = |id: &str,
                  title: &str,
                  kind: ModuleType,
                  duration: &str,
                  completed: bool,
                  locked: bool,
                  description: &str| LearningModule {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        duration: duration.to_string(),
        completed,
        locked,
        competency: "Mathematical Problem Solving".to_string(),
        description: description.to_string(),
    };

    vec![
        module(
            "1",
            "Introduction to Algebraic Thinking",
            ModuleType::Video,
            "15 min",
            true,
            false,
            "Learn the fundamentals of algebraic reasoning and equation solving",
        ),
        module(
            "2",
            "Practice: Basic Equations",
            ModuleType::Interactive,
            "20 min",
            true,
            false,
            "Interactive exercises to reinforce equation solving skills",
        ),
        module(
            "3",
            "Real-World Problem Applications",
            ModuleType::Article,
            "12 min",
            false,
            false,
            "Explore how algebra applies to everyday situations and word problems",
        ),
        module(
            "4",
            "Algebra Competency Assessment",
            ModuleType::Assessment,
            "30 min",
            false,
            false,
            "Demonstrate your mastery of algebraic concepts",
        ),
        module(
            "5",
            "Advanced Equation Systems",
            ModuleType::Video,
            "25 min",
            false,
            true,
            "Tackle more complex algebraic systems and multiple variables",
        ),
    ]
}
