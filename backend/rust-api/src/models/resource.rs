use serde::{Deserialize, Serialize};

pub const ALL: &str = "All";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Video,
    Article,
    Interactive,
}

impl ResourceType {
    pub const ALL_TYPES: [ResourceType; 3] = [
        ResourceType::Video,
        ResourceType::Article,
        ResourceType::Interactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Video => "video",
            ResourceType::Article => "article",
            ResourceType::Interactive => "interactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub subject: String,
    pub duration: String,
    pub rating: f32,
    pub description: String,
    pub competencies: Vec<String>,
    pub difficulty: Difficulty,
    pub thumbnail: String,
}

/// Query string of `GET /resources`. Missing filters behave as the `All` wildcard.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "wildcard")]
    pub subject: String,
    #[serde(rename = "type", default = "wildcard")]
    pub kind: String,
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            subject: wildcard(),
            kind: wildcard(),
        }
    }
}

fn wildcard() -> String {
    ALL.to_string()
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub resources: Vec<Resource>,
    pub total_available: usize,
    pub subjects: Vec<String>,
    pub types: Vec<String>,
}
