use egui::{Color32, RichText};

use crate::lesson::{ContentBlock, StageContent};

pub fn render_stage_content(ui: &mut egui::Ui, content: Option<&StageContent>) {
    let Some(content) = content else {
        ui.label(RichText::new("No lesson content for this stage.").italics().color(Color32::GRAY));
        return;
    };
    for block in &content.blocks {
        render_block(ui, block);
        ui.add_space(4.0);
    }
}

fn render_block(ui: &mut egui::Ui, block: &ContentBlock) {
    match block {
        ContentBlock::Heading { text } => {
            ui.add_space(4.0);
            ui.label(RichText::new(text).strong().size(16.0));
        }
        ContentBlock::Paragraph { text } => {
            ui.label(text);
        }
        ContentBlock::Bullets { items } => {
            for item in items {
                ui.horizontal_wrapped(|ui| {
                    ui.label("•");
                    ui.label(item);
                });
            }
        }
        ContentBlock::Steps { items } => {
            for (index, item) in items.iter().enumerate() {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("{}.", index + 1)).strong());
                    ui.label(item);
                });
            }
        }
        ContentBlock::Terms { entries } => {
            for entry in entries {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("{}:", entry.term)).strong());
                    ui.label(&entry.definition);
                });
            }
        }
    }
}
