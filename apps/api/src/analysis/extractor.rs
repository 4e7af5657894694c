//! Text Extractor — turns a raw notification's subject/body into a structured
//! `JobPosting` using heuristic pattern matching.
//!
//! Pure and total: no I/O, never fails. Absent or malformed input degrades to
//! empty fields. A smarter extraction backend can replace this module without
//! touching the pipeline as long as the `extract` signature stays stable.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Boilerplate prefix stripped from the subject when no title pattern matches.
const SUBJECT_PREFIX: &str = "New job offer: ";

/// Maximum summary length when the body yields no sentence boundaries.
const SUMMARY_FALLBACK_CHARS: usize = 500;

/// Fixed skill vocabulary scanned for in every posting, in canonical spelling.
/// Matching is word-boundary and case-insensitive (unlike the classifier,
/// which uses plain substring containment).
const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Flask",
    "Django",
    "Spring Boot",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "SQL",
    "NoSQL",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "Git",
    "CI/CD",
    "Machine Learning",
    "Deep Learning",
    "Data Science",
    "Big Data",
    "Spark",
    "Hadoop",
    "Agile",
    "Scrum",
    "DevOps",
    "Cloud",
    "REST API",
    "Microservices",
];

/// Matches an introductory phrase followed, on the same line, by a role noun.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:position of|job offer|is hiring)[^\n]*?(?:developer|engineer|data scientist|project manager|consultant|architect|manager|specialist|expert)",
    )
    .unwrap()
});

/// Boundary after the role noun: the title extends until the first of these.
static TITLE_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:at|for|with)\b|\n").unwrap());

/// `at <Capitalized token sequence>` — the capture starts with an uppercase
/// letter and may contain letters, digits, spaces, `&`, `.` and `-`. It does
/// not cross newlines.
static COMPANY_AT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?i:at)\s+([A-Z][A-Za-z0-9 &.\-]*)").unwrap());

/// Alternate company pattern, `by <Capitalized token sequence>`.
static COMPANY_BY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?i:by)\s+([A-Z][A-Za-z0-9 &.\-]*)").unwrap());

static SKILL_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SKILL_VOCABULARY
        .iter()
        .map(|skill| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(skill));
            (*skill, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Structured record derived from one inbound notification. Immutable once
/// produced; consumed by the classifier payload, the ledger and the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub skills: BTreeSet<String>,
    pub description_summary: String,
    pub raw_content: String,
}

/// Extracts a `JobPosting` from a notification's subject and body.
pub fn extract(subject: &str, body: &str) -> JobPosting {
    let scan = format!("{subject}\n{body}");

    JobPosting {
        title: extract_title(&scan, subject),
        company: extract_company(&scan),
        location: None,
        skills: extract_skills(&scan),
        description_summary: summarize(body),
        raw_content: scan,
    }
}

fn extract_title(scan: &str, subject: &str) -> String {
    if let Some(m) = TITLE_RE.find(scan) {
        let tail = &scan[m.end()..];
        let extension = match TITLE_BOUNDARY_RE.find(tail) {
            Some(boundary) => &tail[..boundary.start()],
            None => tail,
        };
        return format!("{}{}", m.as_str(), extension).trim().to_string();
    }
    subject.replace(SUBJECT_PREFIX, "").trim().to_string()
}

fn extract_company(scan: &str) -> String {
    for pattern in [&*COMPANY_AT_RE, &*COMPANY_BY_RE] {
        if let Some(captures) = pattern.captures(scan) {
            if let Some(company) = captures.get(1) {
                return company.as_str().trim().to_string();
            }
        }
    }
    String::new()
}

fn extract_skills(scan: &str) -> BTreeSet<String> {
    SKILL_RES
        .iter()
        .filter(|(_, re)| re.is_match(scan))
        .map(|(skill, _)| skill.to_string())
        .collect()
}

/// Joins the first three sentences of the body; falls back to the first
/// 500 characters when no sentence boundary is found.
fn summarize(body: &str) -> String {
    let sentences = split_sentences(body);
    if sentences.is_empty() {
        return body.chars().take(SUMMARY_FALLBACK_CHARS).collect();
    }
    sentences
        .iter()
        .take(3)
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits after `.`, `!` or `?` followed by whitespace. Hand-rolled because
/// the `regex` crate has no look-behind; only ASCII boundaries are involved so
/// byte indexing stays on char boundaries.
fn split_sentences(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?')
            && bytes.get(i + 1).is_some_and(|b| b.is_ascii_whitespace())
        {
            sentences.push(&body[start..=i]);
            let mut next = i + 1;
            while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                next += 1;
            }
            start = next;
            i = next;
            continue;
        }
        i += 1;
    }

    if start < body.len() {
        sentences.push(&body[start..]);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SUBJECT: &str = "New job offer: Full Stack Developer at TechCorp";
    const SAMPLE_BODY: &str = "We are looking for a passionate Full Stack Developer to join \
        our innovative team at TechCorp. You will work on exciting projects using React, \
        Python and Node.js. Experience with Docker and AWS would be a plus. The position \
        is based in Paris.";

    #[test]
    fn test_extract_is_deterministic() {
        let first = extract(SAMPLE_SUBJECT, SAMPLE_BODY);
        let second = extract(SAMPLE_SUBJECT, SAMPLE_BODY);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_extract_never_fails_on_empty_input() {
        let posting = extract("", "");
        assert_eq!(posting.title, "");
        assert_eq!(posting.company, "");
        assert!(posting.skills.is_empty());
        assert_eq!(posting.description_summary, "");
    }

    #[test]
    fn test_title_from_intro_phrase_stops_at_boundary() {
        let posting = extract(SAMPLE_SUBJECT, SAMPLE_BODY);
        assert!(posting.title.contains("Developer"), "got {:?}", posting.title);
        assert!(
            !posting.title.contains("TechCorp"),
            "title must stop before the boundary word: {:?}",
            posting.title
        );
    }

    #[test]
    fn test_title_is_hiring_phrase() {
        let posting = extract(
            "Opportunity",
            "TechCorp is hiring a Senior Backend Engineer for its Paris office.",
        );
        assert_eq!(posting.title, "is hiring a Senior Backend Engineer");
    }

    #[test]
    fn test_title_falls_back_to_subject_with_prefix_stripped() {
        let posting = extract("New job offer: Data Analyst", "No recognizable phrasing here");
        assert_eq!(posting.title, "Data Analyst");
    }

    #[test]
    fn test_company_from_at_pattern() {
        let posting = extract(SAMPLE_SUBJECT, SAMPLE_BODY);
        assert_eq!(posting.company, "TechCorp");
    }

    #[test]
    fn test_company_from_by_pattern() {
        let posting = extract(
            "Opening",
            "This role is offered by InnovateLab\nJoin a fast growing team.",
        );
        assert_eq!(posting.company, "InnovateLab");
    }

    #[test]
    fn test_company_absent_leaves_empty() {
        let posting = extract("Opening", "A great opportunity awaits you.");
        assert_eq!(posting.company, "");
    }

    #[test]
    fn test_company_capture_requires_uppercase_start() {
        let posting = extract("Opening", "Work at home on flexible hours\nApply now.");
        assert_eq!(posting.company, "");
    }

    #[test]
    fn test_skills_found_with_word_boundaries() {
        let posting = extract(SAMPLE_SUBJECT, SAMPLE_BODY);
        for expected in ["React", "Python", "Docker", "AWS", "Node.js"] {
            assert!(posting.skills.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_java_not_matched_inside_javascript() {
        let posting = extract("Opening", "Deep JavaScript knowledge required.");
        assert!(posting.skills.contains("JavaScript"));
        assert!(!posting.skills.contains("Java"));
    }

    #[test]
    fn test_skills_deduplicated_by_construction() {
        let posting = extract("Opening", "Python, python and more Python.");
        assert_eq!(posting.skills.iter().filter(|s| *s == "Python").count(), 1);
    }

    #[test]
    fn test_summary_takes_first_three_sentences() {
        let posting = extract(SAMPLE_SUBJECT, SAMPLE_BODY);
        assert!(posting.description_summary.starts_with("We are looking"));
        assert!(posting.description_summary.ends_with("would be a plus."));
        assert!(!posting.description_summary.contains("based in Paris"));
    }

    #[test]
    fn test_summary_falls_back_to_leading_characters() {
        let body = "a".repeat(800);
        let posting = extract("Opening", &body);
        assert_eq!(posting.description_summary.chars().count(), 500);
    }

    #[test]
    fn test_raw_content_is_subject_then_body() {
        let posting = extract("Subject line", "Body text.");
        assert_eq!(posting.raw_content, "Subject line\nBody text.");
    }

    #[test]
    fn test_split_sentences_handles_mixed_punctuation() {
        let sentences = split_sentences("First! Second? Third. Fourth");
        assert_eq!(sentences, vec!["First!", "Second?", "Third.", "Fourth"]);
    }
}
