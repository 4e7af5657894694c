//! PDF composition for resumes — a small page composer over lopdf.
//!
//! Layout uses approximate Helvetica advance widths (em-unit table). Static
//! tables catch real overruns while tolerating borderline ambiguity of a few
//! percent of line width; the generous margins absorb the residual error.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::analysis::JobPosting;
use crate::models::profile::Profile;
use crate::render::templates::{narrative_summary, skills_paragraph};
use crate::render::RenderError;

// A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const FOOTER_Y: f32 = 30.0;

const HEADER_SIZE: f32 = 15.0;
const NAME_SIZE: f32 = 16.0;
const SECTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_OBLIQUE: &str = "F3";

/// Composes the full resume document and writes it to `output`.
pub fn compose_resume(
    profile: &Profile,
    posting: &JobPosting,
    output: &Path,
) -> Result<(), RenderError> {
    let mut composer = PageComposer::new();

    // Identity block.
    composer.centered(FONT_BOLD, NAME_SIZE, &profile.name);
    composer.space(4.0);
    composer.centered(FONT_REGULAR, BODY_SIZE, &format!("Email: {}", profile.email));
    composer.centered(FONT_REGULAR, BODY_SIZE, &format!("Phone: {}", profile.phone));
    composer.centered(
        FONT_REGULAR,
        BODY_SIZE,
        &format!("LinkedIn: {}", profile.linkedin),
    );
    composer.space(14.0);

    composer.section("Professional Summary", &narrative_summary(profile, posting));
    composer.section("Technical Skills", &skills_paragraph(profile, posting));
    composer.section("Professional Experience", &profile.experience);
    composer.section("Education", &profile.education);

    write_document(composer.finish(), output)
}

/// Accumulates text operations page by page, breaking pages on overflow and
/// stamping headers and `Page x/y` footers.
struct PageComposer {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor_y: f32,
}

impl PageComposer {
    fn new() -> Self {
        let mut composer = PageComposer {
            pages: Vec::new(),
            current: Vec::new(),
            cursor_y: PAGE_HEIGHT - MARGIN,
        };
        composer.start_page();
        composer
    }

    fn start_page(&mut self) {
        self.cursor_y = PAGE_HEIGHT - MARGIN;
        self.centered(FONT_BOLD, HEADER_SIZE, "Curriculum Vitae");
        self.space(10.0);
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.start_page();
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.cursor_y - needed < MARGIN + FOOTER_Y {
            self.break_page();
        }
    }

    fn space(&mut self, points: f32) {
        self.cursor_y -= points;
    }

    fn line(&mut self, font: &str, size: f32, x: f32, text: &str) {
        self.ensure_room(size * 1.4);
        self.cursor_y -= size * 1.4;
        push_text(&mut self.current, font, size, x, self.cursor_y, text);
    }

    fn centered(&mut self, font: &str, size: f32, text: &str) {
        let x = ((PAGE_WIDTH - text_width(text, size)) / 2.0).max(MARGIN);
        self.line(font, size, x, text);
    }

    fn section(&mut self, title: &str, body: &str) {
        self.ensure_room(SECTION_SIZE * 1.4 + BODY_SIZE * 2.8);
        self.line(FONT_BOLD, SECTION_SIZE, MARGIN, title);
        self.space(2.0);
        let max_width = PAGE_WIDTH - 2.0 * MARGIN;
        for wrapped in wrap(body, BODY_SIZE, max_width) {
            self.line(FONT_REGULAR, BODY_SIZE, MARGIN, &wrapped);
        }
        self.space(8.0);
    }

    /// Closes the last page and stamps footers now that the total is known.
    fn finish(mut self) -> Vec<Vec<Operation>> {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);

        let total = self.pages.len();
        for (index, ops) in self.pages.iter_mut().enumerate() {
            let label = format!("Page {}/{}", index + 1, total);
            let x = (PAGE_WIDTH - text_width(&label, FOOTER_SIZE)) / 2.0;
            push_text(ops, FONT_OBLIQUE, FOOTER_SIZE, x, FOOTER_Y, &label);
        }
        self.pages
    }
}

fn push_text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(sanitize(text))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// Maps text onto the Helvetica/WinAnsi repertoire: common typographic
/// characters are folded to ASCII, anything else unrepresentable is dropped.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2013}' | '\u{2014}' => Some('-'),
            '\u{00A0}' => Some(' '),
            c if c.is_ascii_graphic() || c == ' ' => Some(c),
            _ => None,
        })
        .collect()
}

/// Approximate Helvetica advance width in em units.
fn char_width_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
        'f' | 't' | 'r' | ' ' | '(' | ')' | '[' | ']' | '/' | '-' => 0.34,
        'm' | 'w' | 'M' | 'W' | '@' => 0.89,
        'A'..='Z' | '0'..='9' => 0.67,
        _ => 0.52,
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_width_em).sum::<f32>() * size
}

/// Greedy word wrap against the approximate width table. Overlong single
/// words are emitted on their own line rather than split.
fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, size) <= max_width || line.is_empty() {
            line = candidate;
        } else {
            lines.push(line);
            line = word.to_string();
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Assembles the page operation lists into a saved PDF document.
fn write_document(pages: Vec<Vec<Operation>>, output: &Path) -> Result<(), RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let font_oblique = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Oblique",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => font_regular,
            FONT_BOLD => font_bold,
            FONT_OBLIQUE => font_oblique,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    let page_count = pages.len();
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(output).map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract;

    #[test]
    fn test_wrap_respects_max_width() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let lines = wrap(text, BODY_SIZE, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, BODY_SIZE) <= 120.0 || !line.contains(' '));
        }
    }

    #[test]
    fn test_wrap_keeps_overlong_word_whole() {
        let lines = wrap("supercalifragilisticexpialidocious", BODY_SIZE, 20.0);
        assert_eq!(lines, vec!["supercalifragilisticexpialidocious"]);
    }

    #[test]
    fn test_sanitize_folds_typographic_characters() {
        assert_eq!(sanitize("\u{2018}quoted\u{2019} \u{2014} caf\u{00E9}"), "'quoted' - caf");
    }

    #[test]
    fn test_compose_writes_parseable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cv.pdf");
        let posting = extract(
            "New job offer: Full Stack Developer at TechCorp",
            "You will use React and Python. Docker and AWS are a plus.",
        );

        compose_resume(&Profile::default(), &posting, &output).unwrap();

        let reloaded = Document::load(&output).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn test_long_experience_paginates() {
        let mut profile = Profile::default();
        profile.experience = "Shipped a project. ".repeat(400);
        let posting = extract("Opening", "Python everywhere.");

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cv.pdf");
        compose_resume(&profile, &posting, &output).unwrap();

        let reloaded = Document::load(&output).unwrap();
        assert!(reloaded.get_pages().len() > 1);
    }
}
