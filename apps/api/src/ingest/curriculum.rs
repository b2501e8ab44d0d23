//! Curriculum document → one retrieval chunk per course module.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::retrieval::{Chunk, Metadata};
use crate::skills::extractor::SkillExtractor;

/// Top-level shape of `curriculum.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Curriculum {
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_name: String,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
    /// Numeric in most documents, occasionally a string.
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
}

impl Curriculum {
    pub fn course_names(&self) -> Vec<&str> {
        self.courses.iter().map(|c| c.course_name.as_str()).collect()
    }

    /// Exact, case-sensitive lookup by course name.
    pub fn course(&self, course_name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_name == course_name)
    }
}

/// Builds one chunk per module of `course`.
///
/// Chunk text is `"{title}\n{fullDescription}"`; skills are extracted from the
/// full description.
pub async fn build_course_chunks(course: &Course, extractor: &dyn SkillExtractor) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(course.modules.len());

    for module in &course.modules {
        let skills: Vec<String> = extractor
            .extract(&module.full_description)
            .await
            .into_iter()
            .collect();

        let mut metadata = Metadata::new();
        metadata.insert("courseName".to_string(), Value::from(course.course_name.clone()));
        metadata.insert("moduleId".to_string(), module.id.clone());
        metadata.insert("moduleTitle".to_string(), Value::from(module.title.clone()));
        metadata.insert("moduleSkills".to_string(), Value::from(skills));
        metadata.insert(
            "shortDescription".to_string(),
            Value::from(module.short_description.clone()),
        );

        chunks.push(Chunk::new(
            format!("{}\n{}", module.title, module.full_description),
            metadata,
        ));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::catalog::DEFAULT_SKILL_CATALOG;
    use crate::skills::extractor::KeywordMatcher;

    const CURRICULUM_JSON: &str = r#"{
        "courses": [
            {
                "courseName": "AI Engineer",
                "modules": [
                    {
                        "id": 1,
                        "title": "Python Foundations",
                        "shortDescription": "Core Python",
                        "fullDescription": "Python, NumPy and Pandas for data work."
                    },
                    {
                        "id": 2,
                        "title": "Classical ML",
                        "shortDescription": "Regression and clustering",
                        "fullDescription": "scikit-learn models and statistics."
                    }
                ]
            },
            {
                "courseName": "Web Developer",
                "modules": [
                    {"id": "w1", "title": "React", "fullDescription": "React and TypeScript."}
                ]
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_build_course_chunks_metadata() {
        let curriculum: Curriculum = serde_json::from_str(CURRICULUM_JSON).unwrap();
        let extractor = KeywordMatcher::new(DEFAULT_SKILL_CATALOG).unwrap();

        let chunks = build_course_chunks(&curriculum.courses[0], &extractor).await;
        assert_eq!(chunks.len(), 2);

        let first = &chunks[0];
        assert_eq!(first.text, "Python Foundations\nPython, NumPy and Pandas for data work.");
        assert_eq!(first.metadata["courseName"], "AI Engineer");
        assert_eq!(first.metadata["moduleId"], 1);
        assert_eq!(first.metadata["moduleTitle"], "Python Foundations");
        assert_eq!(first.metadata["shortDescription"], "Core Python");
        assert_eq!(
            first.metadata["moduleSkills"],
            serde_json::json!(["NumPy", "Pandas", "Python"])
        );

        let web = build_course_chunks(&curriculum.courses[1], &extractor).await;
        let web = &web[0];
        assert_eq!(web.metadata["moduleId"], "w1");
        assert_eq!(web.metadata["shortDescription"], "");
    }

    #[test]
    fn test_course_lookup_is_exact() {
        let curriculum: Curriculum = serde_json::from_str(CURRICULUM_JSON).unwrap();
        assert_eq!(curriculum.course("AI Engineer").unwrap().modules.len(), 2);
        assert_eq!(curriculum.course("Web Developer").unwrap().modules.len(), 1);
        assert!(curriculum.course("ai engineer").is_none());
    }

    #[test]
    fn test_course_names() {
        let curriculum: Curriculum = serde_json::from_str(CURRICULUM_JSON).unwrap();
        assert_eq!(curriculum.course_names(), vec!["AI Engineer", "Web Developer"]);
    }

    #[test]
    fn test_empty_document_has_no_courses() {
        let curriculum: Curriculum = serde_json::from_str("{}").unwrap();
        assert!(curriculum.courses.is_empty());
    }
}
