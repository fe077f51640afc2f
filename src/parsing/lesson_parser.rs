use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::ContentError;
use crate::lesson::{ContentBlock, LessonContent, Stage, StageContent, TermEntry};

const BUILTIN_LESSON: &str = include_str!("../../content/distillation.lesson.txt");

// This enum stays local to the parser's logic
#[derive(Debug, PartialEq, Clone, Copy)]
enum ParsingSection {
    None,
    Text,
    Bullets,
    Steps,
    Terms,
}

struct LineMatchers {
    marker: Regex,
    bullet: Regex,
    step: Regex,
    term: Regex,
}

impl LineMatchers {
    fn new() -> Result<Self, ContentError> {
        Ok(Self {
            marker: Regex::new(r"^([A-Z_]+)::\s*(.*)$")?,
            bullet: Regex::new(r"^[-*•]\s+(.+)$")?,
            step: Regex::new(r"^\d+[.)]\s+(.+)$")?,
            term: Regex::new(r"^([^:]+?):\s+(.+)$")?,
        })
    }
}

struct OpenStage {
    stage: Stage,
    opened_at: usize,
    content: StageContent,
    section: ParsingSection,
}

/// Parses the marker format (`STAGE::`, `TITLE::`, `TEXT::`, `BULLETS::`, ...) into lesson content.
pub fn parse_lesson_text(source_name: &str, text: &str) -> Result<LessonContent, ContentError> {
    let matchers = LineMatchers::new()?;
    let mut lesson = LessonContent { source_name: source_name.to_string(), ..Default::default() };
    let mut open: Option<OpenStage> = None;
    let mut last_line = 0;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        last_line = line_no;
        let line = raw_line.trim();

        if line.starts_with("//") {
            continue;
        }
        if line.is_empty() {
            if let Some(current) = open.as_mut() {
                if current.section == ParsingSection::Text {
                    current.section = ParsingSection::None;
                }
            }
            continue;
        }

        if line == "END_STAGE" {
            let finished = open.take().ok_or(ContentError::OutsideStage { line: line_no })?;
            lesson.stages.insert(finished.stage, finished.content);
            continue;
        }

        if let Some(caps) = matchers.marker.captures(line) {
            let marker = caps.get(1).map_or("", |m| m.as_str());
            let rest = caps.get(2).map_or("", |m| m.as_str().trim());

            if marker == "STAGE" {
                if let Some(previous) = &open {
                    return Err(ContentError::Malformed {
                        line: line_no,
                        message: format!(
                            "stage '{}' opened on line {} is missing END_STAGE",
                            previous.stage.id(),
                            previous.opened_at
                        ),
                    });
                }
                let stage = Stage::from_id(rest)
                    .ok_or_else(|| ContentError::UnknownStage { line: line_no, id: rest.to_string() })?;
                if lesson.stages.contains_key(&stage) {
                    return Err(ContentError::DuplicateStage { line: line_no, id: stage.id().to_string() });
                }
                open = Some(OpenStage {
                    stage,
                    opened_at: line_no,
                    content: StageContent::default(),
                    section: ParsingSection::None,
                });
                continue;
            }

            let current = open.as_mut().ok_or(ContentError::OutsideStage { line: line_no })?;
            current.section = ParsingSection::None;
            match marker {
                "TITLE" => current.content.title = Some(rest.to_string()),
                "HEADING" => current.content.blocks.push(ContentBlock::Heading { text: rest.to_string() }),
                "TEXT" => {
                    current.content.blocks.push(ContentBlock::Paragraph { text: rest.to_string() });
                    current.section = ParsingSection::Text;
                }
                "BULLETS" => {
                    current.content.blocks.push(ContentBlock::Bullets { items: Vec::new() });
                    current.section = ParsingSection::Bullets;
                }
                "STEPS" => {
                    current.content.blocks.push(ContentBlock::Steps { items: Vec::new() });
                    current.section = ParsingSection::Steps;
                }
                "TERMS" => {
                    current.content.blocks.push(ContentBlock::Terms { entries: Vec::new() });
                    current.section = ParsingSection::Terms;
                }
                other => {
                    return Err(ContentError::Malformed {
                        line: line_no,
                        message: format!("unknown marker '{}::'", other),
                    })
                }
            }
            continue;
        }

        let current = open.as_mut().ok_or(ContentError::OutsideStage { line: line_no })?;
        let malformed = |message: &str| ContentError::Malformed { line: line_no, message: message.to_string() };

        match (current.section, current.content.blocks.last_mut()) {
            (ParsingSection::Text, Some(ContentBlock::Paragraph { text })) => {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(line);
            }
            (ParsingSection::Bullets, Some(ContentBlock::Bullets { items })) => {
                let caps = matchers.bullet.captures(line).ok_or_else(|| malformed("expected '- item' under BULLETS::"))?;
                items.push(caps.get(1).map_or("", |m| m.as_str()).trim().to_string());
            }
            (ParsingSection::Steps, Some(ContentBlock::Steps { items })) => {
                let caps = matchers.step.captures(line).ok_or_else(|| malformed("expected '1. step' under STEPS::"))?;
                items.push(caps.get(1).map_or("", |m| m.as_str()).trim().to_string());
            }
            (ParsingSection::Terms, Some(ContentBlock::Terms { entries })) => {
                let caps = matchers.term.captures(line).ok_or_else(|| malformed("expected 'Term: definition' under TERMS::"))?;
                entries.push(TermEntry {
                    term: caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
                    definition: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
                });
            }
            _ => return Err(malformed("content line outside of a TEXT/BULLETS/STEPS/TERMS section")),
        }
    }

    if let Some(unclosed) = open {
        return Err(ContentError::Malformed {
            line: last_line,
            message: format!("stage '{}' opened on line {} is missing END_STAGE", unclosed.stage.id(), unclosed.opened_at),
        });
    }
    Ok(lesson)
}

pub fn parse_lesson_file(file_path: &Path) -> Result<LessonContent, ContentError> {
    let text = fs::read_to_string(file_path).map_err(|source| ContentError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    let name = file_path.file_name().unwrap_or_default().to_string_lossy().into_owned();
    parse_lesson_text(&name, &text)
}

/// The lesson shipped with the binary.
pub fn builtin_lesson() -> Result<LessonContent, ContentError> {
    parse_lesson_text("builtin", BUILTIN_LESSON)
}
