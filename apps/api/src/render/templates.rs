//! Fixed narrative templates filled from the profile and the posting.
//! No generative model — plain substitution into template sentences.

use crate::analysis::JobPosting;
use crate::models::profile::Profile;

/// Role name used when the posting carried no recognizable title.
const FALLBACK_ROLE: &str = "Developer";

/// Narrative professional summary for the resume's opening section.
pub fn narrative_summary(profile: &Profile, posting: &JobPosting) -> String {
    let role = if posting.title.is_empty() {
        FALLBACK_ROLE
    } else {
        posting.title.as_str()
    };
    format!(
        "Experienced developer with proven expertise in {} and a passion for innovation. \
         Able to turn complex requirements into robust, scalable software. Strongly \
         motivated by technical challenges and continuous learning, ready to make a \
         meaningful contribution to ambitious projects such as the {} role.",
        profile.skills.join(", "),
        role
    )
}

/// Skills paragraph, closing with the posting's own skill list when present.
pub fn skills_paragraph(profile: &Profile, posting: &JobPosting) -> String {
    let mut paragraph = format!(
        "In-depth command of {} across front-end and back-end work, with solid \
         database and cloud deployment practice. Quick to adopt new technologies and \
         to solve hard problems with creativity and rigor.",
        profile.skills.join(", ")
    );
    if !posting.skills.is_empty() {
        let wanted: Vec<&str> = posting.skills.iter().map(String::as_str).collect();
        paragraph.push_str(&format!(
            " Particularly interested in the {} aspects mentioned in the offer.",
            wanted.join(", ")
        ));
    }
    paragraph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract;

    #[test]
    fn test_summary_substitutes_posting_title() {
        let posting = extract("Opening", "TechCorp is hiring a Senior Backend Engineer now.");
        let summary = narrative_summary(&Profile::default(), &posting);
        assert!(summary.contains("Senior Backend Engineer"));
    }

    #[test]
    fn test_summary_falls_back_for_untitled_posting() {
        let posting = extract("", "");
        let summary = narrative_summary(&Profile::default(), &posting);
        assert!(summary.contains("the Developer role"));
    }

    #[test]
    fn test_skills_paragraph_lists_posting_skills() {
        let posting = extract("Opening", "We use React, Python and Docker daily.");
        let paragraph = skills_paragraph(&Profile::default(), &posting);
        assert!(paragraph.contains("Docker, Python, React"));
        assert!(paragraph.contains("mentioned in the offer"));
    }

    #[test]
    fn test_skills_paragraph_without_posting_skills_has_no_offer_clause() {
        let posting = extract("Opening", "Nothing technical here at all.");
        let paragraph = skills_paragraph(&Profile::default(), &posting);
        assert!(!paragraph.contains("mentioned in the offer"));
    }
}
