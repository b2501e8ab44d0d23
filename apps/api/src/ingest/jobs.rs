//! Job postings → retrieval chunks and per-job skill sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::ingest::text::{chunk_text, clean_description};
use crate::ingest::IngestError;
use crate::retrieval::{Chunk, Metadata};
use crate::skills::extractor::{SkillExtractor, SkillSet};

/// A job posting as stored in `jobs.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default, deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Client-supplied fields for a new posting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
}

impl NewJob {
    /// Validates required fields and stamps id and posting time.
    pub fn into_posting(self, id: String, posted_at: DateTime<Utc>) -> Result<JobPosting, IngestError> {
        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(IngestError::InvalidArgument("Job title is required".to_string()));
        }
        let description = self.description.as_deref().map(str::trim).unwrap_or_default();
        if description.is_empty() {
            return Err(IngestError::InvalidArgument(
                "Job description is required".to_string(),
            ));
        }

        Ok(JobPosting {
            id,
            title: title.to_string(),
            description: description.to_string(),
            company: self.company.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            salary: self.salary.unwrap_or_default(),
            job_type: self
                .job_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(default_job_type),
            posted_at: Some(posted_at),
        })
    }
}

fn default_job_type() -> String {
    "Full-time".to_string()
}

// Older jobs.json files carry numeric (epoch-millis) ids.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Metadata attached to every job chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobChunkMetadata {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub extracted_skills: Vec<String>,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl JobChunkMetadata {
    pub fn into_metadata(self) -> Metadata {
        let mut m = Metadata::new();
        m.insert("jobTitle".to_string(), Value::from(self.job_title));
        m.insert("company".to_string(), Value::from(self.company));
        m.insert("location".to_string(), Value::from(self.location));
        m.insert("extractedSkills".to_string(), Value::from(self.extracted_skills));
        m.insert("chunkIndex".to_string(), Value::from(self.chunk_index));
        m.insert("totalChunks".to_string(), Value::from(self.total_chunks));
        m
    }

    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        serde_json::from_value(Value::Object(metadata.clone())).ok()
    }
}

/// Chunks for the vector index plus one skill set per job, in job order.
#[derive(Debug, Clone, Default)]
pub struct JobCorpus {
    pub chunks: Vec<Chunk>,
    pub skill_sets: Vec<SkillSet>,
}

impl JobCorpus {
    pub fn job_count(&self) -> usize {
        self.skill_sets.len()
    }
}

/// Cleans, skill-tags and chunks every posting.
///
/// Skills are extracted once per job from the full cleaned description and
/// copied onto each of that job's chunks.
pub async fn build_job_corpus(
    jobs: &[JobPosting],
    extractor: &dyn SkillExtractor,
    chunk_size: usize,
    overlap: usize,
) -> Result<JobCorpus, IngestError> {
    let mut corpus = JobCorpus::default();

    for job in jobs {
        let description = clean_description(&job.description);
        let skills = extractor.extract(&description).await;
        let pieces = chunk_text(&description, chunk_size, overlap)?;
        let total_chunks = pieces.len();
        let skill_list: Vec<String> = skills.iter().cloned().collect();

        for (chunk_index, text) in pieces.into_iter().enumerate() {
            let metadata = JobChunkMetadata {
                job_title: job.title.clone(),
                company: job.company.clone(),
                location: job.location.clone(),
                extracted_skills: skill_list.clone(),
                chunk_index,
                total_chunks,
            };
            corpus.chunks.push(Chunk::new(text, metadata.into_metadata()));
        }

        corpus.skill_sets.push(skills);
    }

    debug!(
        "Built job corpus: {} chunks from {} jobs",
        corpus.chunks.len(),
        corpus.job_count()
    );
    Ok(corpus)
}
