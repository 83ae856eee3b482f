use crate::models::resource::{Resource, ResourceType, ALL};

/// Resources whose title or description contains `search` (case-insensitive),
/// restricted to `subject` and `kind` unless those are the `All` wildcard.
/// Input order is preserved.
pub fn filter<'a>(
    resources: &'a [Resource],
    search: &str,
    subject: &str,
    kind: &str,
) -> Vec<&'a Resource> {
    let needle = search.to_lowercase();

    resources
        .iter()
        .filter(|resource| {
            let matches_search = resource.title.to_lowercase().contains(&needle)
                || resource.description.to_lowercase().contains(&needle);
            let matches_subject = subject == ALL || resource.subject == subject;
            let matches_type = kind == ALL || resource.kind.as_str() == kind;

            matches_search && matches_subject && matches_type
        })
        .collect()
}

/// `All` followed by every distinct subject in first-seen order.
pub fn subjects(resources: &[Resource]) -> Vec<String> {
    let mut subjects = vec![ALL.to_string()];
    for resource in resources {
        if !subjects.iter().any(|s| s == &resource.subject) {
            subjects.push(resource.subject.clone());
        }
    }
    subjects
}

pub fn types() -> Vec<String> {
    std::iter::once(ALL)
        .chain(ResourceType::ALL_TYPES.iter().map(ResourceType::as_str))
        .map(str::to_string)
        .collect()
}
