//! Job Classifier — scores a posting's text against per-category keyword sets
//! and picks the best-scoring category.
//!
//! Scoring is plain substring containment over the lowercased text (NOT
//! word-boundary aware — this intentionally differs from the extractor's
//! skill matching). Ties resolve to the first category in declared order;
//! an all-zero score falls back to `General`.

use serde::{Deserialize, Serialize};

/// The closed set of job categories. Classification output is recomputed on
/// demand and never persisted as an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobCategory {
    WebDevelopment,
    DataScience,
    Devops,
    Mobile,
    Security,
    ProjectManagement,
    General,
}

/// Per-category keyword sets, in declaration order. The order is load-bearing:
/// the tie-break rule walks this slice front to back.
const CATEGORY_KEYWORDS: &[(JobCategory, &[&str])] = &[
    (
        JobCategory::WebDevelopment,
        &[
            "web developer",
            "frontend",
            "backend",
            "full stack",
            "react",
            "angular",
            "vue",
            "javascript",
            "html",
            "css",
        ],
    ),
    (
        JobCategory::DataScience,
        &[
            "data scientist",
            "machine learning",
            "ai",
            "artificial intelligence",
            "python",
            "r",
            "tensorflow",
            "pytorch",
        ],
    ),
    (
        JobCategory::Devops,
        &[
            "devops",
            "infrastructure",
            "cloud",
            "aws",
            "azure",
            "docker",
            "kubernetes",
            "ci/cd",
        ],
    ),
    (
        JobCategory::Mobile,
        &[
            "mobile developer",
            "android",
            "ios",
            "react native",
            "flutter",
            "swift",
            "kotlin",
        ],
    ),
    (
        JobCategory::Security,
        &[
            "cybersecurity",
            "information security",
            "pentesting",
            "ethical hacking",
        ],
    ),
    (
        JobCategory::ProjectManagement,
        &["project manager", "scrum master", "product owner", "agile"],
    ),
    (JobCategory::General, &[]),
];

impl JobCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::WebDevelopment => "web-development",
            JobCategory::DataScience => "data-science",
            JobCategory::Devops => "devops",
            JobCategory::Mobile => "mobile",
            JobCategory::Security => "security",
            JobCategory::ProjectManagement => "project-management",
            JobCategory::General => "general",
        }
    }

    /// All categories, in declaration order.
    pub fn all() -> impl Iterator<Item = JobCategory> {
        CATEGORY_KEYWORDS.iter().map(|(category, _)| *category)
    }

    /// The specialist each category routes to, surfaced by
    /// `GET /api/zapier/config`.
    pub fn specialist(&self) -> Specialist {
        match self {
            JobCategory::WebDevelopment => Specialist {
                name: "WebDev Specialist",
                endpoint: "/api/ai/webdev",
                description: "Specialist for web development roles",
            },
            JobCategory::DataScience => Specialist {
                name: "DataScience Specialist",
                endpoint: "/api/ai/datascience",
                description: "Specialist for data science and ML roles",
            },
            JobCategory::Devops => Specialist {
                name: "DevOps Specialist",
                endpoint: "/api/ai/devops",
                description: "Specialist for DevOps and infrastructure roles",
            },
            JobCategory::Mobile => Specialist {
                name: "Mobile Specialist",
                endpoint: "/api/ai/mobile",
                description: "Specialist for mobile development roles",
            },
            JobCategory::Security => Specialist {
                name: "CyberSec Specialist",
                endpoint: "/api/ai/cybersec",
                description: "Specialist for security roles",
            },
            JobCategory::ProjectManagement => Specialist {
                name: "ProjectMgmt Specialist",
                endpoint: "/api/ai/projectmgmt",
                description: "Specialist for project management roles",
            },
            JobCategory::General => Specialist {
                name: "General Specialist",
                endpoint: "/api/ai/general",
                description: "Generalist for all other roles",
            },
        }
    }
}

/// Routing target for a classified posting.
#[derive(Debug, Clone, Serialize)]
pub struct Specialist {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub description: &'static str,
}

/// Classifies a posting. Total function: always returns a category.
pub fn classify(subject: &str, body: &str) -> JobCategory {
    let mut best = JobCategory::General;
    let mut best_score = 0;

    for (category, score) in scores(subject, body) {
        if score > best_score {
            best = category;
            best_score = score;
        }
    }

    if best_score == 0 {
        return JobCategory::General;
    }
    best
}

/// Per-category keyword hit counts, in declaration order. Exposed so callers
/// (and tests) can inspect the actual counts behind a classification.
pub fn scores(subject: &str, body: &str) -> Vec<(JobCategory, usize)> {
    let content = format!("{subject} {body}").to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let score = keywords.iter().filter(|k| content.contains(*k)).count();
            (*category, score)
        })
        .collect()
}
