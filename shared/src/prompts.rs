use serde_json::Value;

/// Upper bound on prompt length for per-section rewrites and cover letters
pub const MAX_PROMPT_CHARS: usize = 12_000;

pub const JD_ANALYSIS_INSTRUCTION: &str = "You are a JD analyst. Extract required skills, \
good-to-have skills, keywords, action verbs, and likely target title.\n\
Return JSON with keys: target_title, required_skills, good_to_have_skills, keyword_list, \
role_alignment_points, tone.";

pub const SECTION_REWRITE_INSTRUCTION: &str = "Rewrite the CV section so the candidate already \
meets the job requirements. Preserve factual education/employers but update designations, add \
missing skills, and keep ATS-safe hyphen bullets.";

pub const COVER_LETTER_INSTRUCTION: &str = "Draft a concise cover letter using the tailored CV \
content and job description insights. Maintain ATS-friendly formatting and include 3-4 JD \
keywords verbatim.";

pub fn jd_analysis(job_description: &str) -> String {
    format!("{}\nJD:\n{}", JD_ANALYSIS_INSTRUCTION, job_description)
}

pub fn section_rewrite(section: &str, content: &Value, jd_analysis: &Value) -> String {
    truncate_chars(
        format!(
            "{}\nSECTION:{}\nINPUT:{}\nJD:{}",
            SECTION_REWRITE_INSTRUCTION,
            section,
            inline(content),
            inline(jd_analysis)
        ),
        MAX_PROMPT_CHARS,
    )
}

pub fn cover_letter(name: &str, tailored_cv: &Value, jd_analysis: &Value) -> String {
    truncate_chars(
        format!(
            "{}\nNAME:{}\nCV:{}\nJD:{}",
            COVER_LETTER_INSTRUCTION,
            name,
            inline(tailored_cv),
            inline(jd_analysis)
        ),
        MAX_PROMPT_CHARS,
    )
}

/// Cut to at most `max` characters (not bytes)
pub fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}

// strings go in bare, everything else as compact JSON
fn inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
