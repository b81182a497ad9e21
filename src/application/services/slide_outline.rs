//! Slide outline built from a case-study summary.
//!
//! The summary is opaque markdown; headings open sections and list items or
//! paragraphs become bullets. Sections the summary prompt asks for are tagged
//! with a [`SectionKind`] so exporters can style them; anything else is kept
//! in document order as [`SectionKind::Other`].

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::domain::entities::CaseStudy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Title,
    Challenge,
    Approach,
    Solution,
    Outcomes,
    ExecutiveSummary,
    KeyPoints,
    Other,
}

impl SectionKind {
    fn from_heading(heading: &str) -> Self {
        let heading = heading.to_lowercase();
        if heading.contains("executive summary") {
            SectionKind::ExecutiveSummary
        } else if heading.contains("challenge") {
            SectionKind::Challenge
        } else if heading.contains("approach") {
            SectionKind::Approach
        } else if heading.contains("solution") {
            SectionKind::Solution
        } else if heading.contains("outcome") || heading.contains("result") {
            SectionKind::Outcomes
        } else if heading.contains("key point") || heading.contains("takeaway") {
            SectionKind::KeyPoints
        } else if heading.trim() == "title" {
            SectionKind::Title
        } else {
            SectionKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub kind: SectionKind,
    pub title: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideDeck {
    pub title: String,
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    pub fn from_summary(case_study: &CaseStudy, summary: &str) -> Self {
        let mut title_slide = Slide {
            kind: SectionKind::Title,
            title: case_study.title().to_string(),
            bullets: Vec::new(),
        };
        if let Some(client) = case_study.client_name() {
            title_slide.bullets.push(format!("Client: {}", client));
        }
        if let Some(industry) = case_study.industry() {
            title_slide.bullets.push(format!("Industry: {}", industry));
        }

        let mut slides = Vec::new();
        for section in parse_sections(summary) {
            match section.kind {
                SectionKind::Title => title_slide.bullets.extend(section.bullets),
                _ if section.bullets.is_empty() && section.kind == SectionKind::Other => {}
                _ => slides.push(section),
            }
        }

        let mut all = Vec::with_capacity(slides.len() + 1);
        all.push(title_slide);
        all.extend(slides);

        Self {
            title: case_study.title().to_string(),
            slides: all,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for (index, slide) in self.slides.iter().enumerate() {
            if index > 0 {
                out.push_str("\n---\n\n");
            }
            let marker = if index == 0 { "#" } else { "##" };
            out.push_str(&format!("{} {}\n", marker, slide.title));
            if !slide.bullets.is_empty() {
                out.push('\n');
                for bullet in &slide.bullets {
                    out.push_str(&format!("- {}\n", bullet));
                }
            }
        }
        out
    }
}

fn parse_sections(markdown: &str) -> Vec<Slide> {
    let mut sections: Vec<Slide> = Vec::new();
    let mut current: Option<Slide> = None;
    let mut heading: Option<(HeadingLevel, String)> = None;
    let mut item_buffers: Vec<String> = Vec::new();
    let mut paragraph: Option<String> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((level, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = heading.take() {
                    let text = collapse_whitespace(&text);
                    if let Some(section) = current.take() {
                        sections.push(section);
                    }
                    let mut kind = SectionKind::from_heading(&text);
                    // A leading top-level heading that is not a known section
                    // is the narrative's own headline.
                    if kind == SectionKind::Other
                        && level == HeadingLevel::H1
                        && sections.iter().all(|s| s.bullets.is_empty())
                    {
                        kind = SectionKind::Title;
                        current = Some(Slide {
                            kind,
                            title: text.clone(),
                            bullets: vec![text],
                        });
                        continue;
                    }
                    current = Some(Slide {
                        kind,
                        title: text,
                        bullets: Vec::new(),
                    });
                }
            }
            Event::Start(Tag::Item) => item_buffers.push(String::new()),
            Event::End(TagEnd::Item) => {
                if let Some(text) = item_buffers.pop() {
                    push_bullet(&mut current, &text);
                }
            }
            Event::Start(Tag::Paragraph) if item_buffers.is_empty() => {
                paragraph = Some(String::new());
            }
            Event::End(TagEnd::Paragraph) if item_buffers.is_empty() => {
                if let Some(text) = paragraph.take() {
                    push_bullet(&mut current, &text);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                append_text(&mut heading, &mut item_buffers, &mut paragraph, &text);
            }
            Event::SoftBreak | Event::HardBreak => {
                append_text(&mut heading, &mut item_buffers, &mut paragraph, " ");
            }
            _ => {}
        }
    }

    if let Some(section) = current.take() {
        sections.push(section);
    }
    sections
}

fn append_text(
    heading: &mut Option<(HeadingLevel, String)>,
    item_buffers: &mut [String],
    paragraph: &mut Option<String>,
    text: &str,
) {
    if let Some((_, buffer)) = heading.as_mut() {
        buffer.push_str(text);
    } else if let Some(buffer) = item_buffers.last_mut() {
        buffer.push_str(text);
    } else if let Some(buffer) = paragraph.as_mut() {
        buffer.push_str(text);
    }
}

fn push_bullet(current: &mut Option<Slide>, text: &str) {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return;
    }
    current
        .get_or_insert_with(|| Slide {
            kind: SectionKind::Other,
            title: "Overview".to_string(),
            bullets: Vec::new(),
        })
        .bullets
        .push(text);
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
