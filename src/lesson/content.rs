use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::stage::Stage;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { text: String },
    Paragraph { text: String },
    Bullets { items: Vec<String> },
    Steps { items: Vec<String> },
    Terms { entries: Vec<TermEntry> },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TermEntry {
    pub term: String,
    pub definition: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StageContent {
    pub title: Option<String>,
    pub blocks: Vec<ContentBlock>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LessonContent {
    pub source_name: String,
    pub stages: BTreeMap<Stage, StageContent>,
}

impl LessonContent {
    pub fn stage(&self, stage: Stage) -> Option<&StageContent> {
        self.stages.get(&stage)
    }

    pub fn title(&self, stage: Stage) -> &str {
        self.stages
            .get(&stage)
            .and_then(|content| content.title.as_deref())
            .unwrap_or_else(|| stage.default_title())
    }
}
