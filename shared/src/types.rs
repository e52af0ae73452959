use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Characters of raw text used for the summary section
pub const SUMMARY_CHARS: usize = 280;
/// Characters of raw text used for the single experience entry
pub const EXPERIENCE_CHARS: usize = 800;

// ========== EXTRACTION ==========
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSections {
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub projects: Vec<String>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
}

impl ExtractedSections {
    /// Crude fixed-length split: a summary prefix and one experience entry
    pub fn from_raw_text(raw_text: &str) -> Self {
        Self {
            summary: raw_text.chars().take(SUMMARY_CHARS).collect(),
            skills: Vec::new(),
            experience: vec![raw_text.chars().take(EXPERIENCE_CHARS).collect()],
            projects: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
        }
    }
}

/// Persisted to S3, never returned inline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub sections: ExtractedSections,
    pub raw_text: String,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub object_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReference {
    pub extraction_bucket: String,
    pub extraction_key: String,
    pub raw_text_s3_uri: String,
    pub success: bool,
}

// ========== JD ANALYSIS ==========
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdAnalysis {
    pub target_title: String,
    pub required_skills: Vec<String>,
    pub good_to_have_skills: Vec<String>,
    pub keyword_list: Vec<String>,
    pub role_alignment_points: Vec<String>,
    pub tone: String,
}

impl JdAnalysis {
    /// Fixed answer returned in offline mode
    pub fn offline_stub() -> Self {
        let strings =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            target_title: "Senior Machine Learning Engineer".to_string(),
            required_skills: strings(&["python", "mlops", "aws"]),
            good_to_have_skills: strings(&["langchain"]),
            keyword_list: strings(&["sagemaker", "pytorch"]),
            role_alignment_points: strings(&["own ml lifecycle", "deploy to production"]),
            tone: "professional".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: Option<String>,
}

// ========== TAILORED CV ==========
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalSection {
    Summary,
    CoreSkills,
    Experience,
    Projects,
    Education,
    Certifications,
}

impl CanonicalSection {
    pub const ALL: [CanonicalSection; 6] = [
        CanonicalSection::Summary,
        CanonicalSection::CoreSkills,
        CanonicalSection::Experience,
        CanonicalSection::Projects,
        CanonicalSection::Education,
        CanonicalSection::Certifications,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalSection::Summary => "summary",
            CanonicalSection::CoreSkills => "core_skills",
            CanonicalSection::Experience => "experience",
            CanonicalSection::Projects => "projects",
            CanonicalSection::Education => "education",
            CanonicalSection::Certifications => "certifications",
        }
    }

    /// Older extraction output names sections without the `core_` prefix
    pub fn legacy_alias(self) -> Option<&'static str> {
        self.as_str().strip_prefix("core_")
    }
}

/// Section name → content; always holds all six canonical keys
pub type TailoredCv = Map<String, Value>;

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub cv_sections: Option<Map<String, Value>>,
    pub jd_analysis: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub tailored_cv: TailoredCv,
}

// ========== COVER LETTER ==========
#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub tailored_cv: Option<Value>,
    pub jd_analysis: Option<Value>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: Value,
}

// ========== RENDERING ==========
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub tailored_cv: Option<Map<String, Value>>,
    pub template_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub cv_pdf_url: String,
}

/// Name used when the caller does not supply one
pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";
