//! Keyword-driven canned replies for the study assistant.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Math,
    Science,
    Language,
    Help,
}

#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

pub const MATH_RESPONSE: &str = "I'd be happy to help with mathematics! Whether you're working on algebra, geometry, calculus, or any other mathematical concept, I can break it down into easy-to-understand steps. What specific math topic would you like to explore?";
pub const SCIENCE_RESPONSE: &str = "Science is fascinating! I can help explain concepts in physics, chemistry, biology, and earth science. I'll use real-world examples and visual analogies to make complex scientific principles clear and engaging.";
pub const LANGUAGE_RESPONSE: &str = "Language arts encompasses reading, writing, speaking, and critical analysis. I can help you improve your writing skills, analyze literature, understand grammar concepts, or develop better communication strategies.";
pub const HELP_RESPONSE: &str = "I'm here to support your learning in multiple ways: explaining difficult concepts, providing study strategies, helping with homework, offering practice questions, and giving feedback on your progress. What subject area interests you most?";
pub const DEFAULT_RESPONSE: &str = "That's an interesting question! Let me help you explore this topic. I can break down complex concepts, provide examples, and suggest learning resources tailored to your current competency level. Could you tell me more about what specific aspect you'd like to understand better?";

/// Rules in priority order; the first rule with a matching keyword wins.
pub const DEFAULT_RULES: [KeywordRule; 4] = [
    KeywordRule {
        topic: Topic::Math,
        keywords: &["math", "algebra", "geometry"],
        response: MATH_RESPONSE,
    },
    KeywordRule {
        topic: Topic::Science,
        keywords: &["science", "physics", "chemistry"],
        response: SCIENCE_RESPONSE,
    },
    KeywordRule {
        topic: Topic::Language,
        keywords: &["english", "writing", "literature"],
        response: LANGUAGE_RESPONSE,
    },
    KeywordRule {
        topic: Topic::Help,
        keywords: &["help", "assist"],
        response: HELP_RESPONSE,
    },
];

#[derive(Debug, Clone)]
pub struct ScriptedResponder {
    rules: Vec<KeywordRule>,
    fallback: &'static str,
}

impl Default for ScriptedResponder {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec(), DEFAULT_RESPONSE)
    }
}

impl ScriptedResponder {
    pub fn new(rules: Vec<KeywordRule>, fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    /// First rule whose keywords occur as a substring of the lower-cased text.
    pub fn matching_rule(&self, text: &str) -> Option<&KeywordRule> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
    }

    pub fn topic(&self, text: &str) -> Option<Topic> {
        self.matching_rule(text).map(|rule| rule.topic)
    }

    pub fn classify(&self, text: &str) -> &'static str {
        self.matching_rule(text)
            .map(|rule| rule.response)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebra_beats_help() {
        let responder = ScriptedResponder::default();
        assert_eq!(responder.classify("Can you help with algebra?"), MATH_RESPONSE);
        assert_eq!(
            responder.topic("Can you help with algebra?"),
            Some(Topic::Math)
        );
    }

    #[test]
    fn test_unmatched_text_gets_default() {
        let responder = ScriptedResponder::default();
        assert_eq!(responder.classify("xyz nonsense"), DEFAULT_RESPONSE);
        assert_eq!(responder.topic("xyz nonsense"), None);
    }

    #[test]
    fn test_rule_order_breaks_ties() {
        let responder = ScriptedResponder::default();
        assert_eq!(
            responder.classify("physics or geometry first?"),
            MATH_RESPONSE
        );
        assert_eq!(
            responder.classify("Writing a chemistry report"),
            SCIENCE_RESPONSE
        );
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        let responder = ScriptedResponder::default();
        assert_eq!(responder.classify("MATHEMATICS homework"), MATH_RESPONSE);
        assert_eq!(responder.classify("English LITERATURE"), LANGUAGE_RESPONSE);
        assert_eq!(responder.classify("Can you assist me?"), HELP_RESPONSE);
    }

    #[test]
    fn test_quick_action_prompts() {
        let responder = ScriptedResponder::default();
        assert_eq!(
            responder.classify("Can you explain a difficult concept to me?"),
            DEFAULT_RESPONSE
        );
        assert_eq!(
            responder.classify("What are some effective study strategies?"),
            DEFAULT_RESPONSE
        );
    }

    #[test]
    fn test_custom_rules() {
        let responder = ScriptedResponder::new(
            vec![KeywordRule {
                topic: Topic::Help,
                keywords: &["hint"],
                response: "Try breaking the problem down.",
            }],
            "No idea.",
        );
        assert_eq!(responder.classify("Any HINT?"), "Try breaking the problem down.");
        assert_eq!(responder.classify("algebra"), "No idea.");
    }
}
