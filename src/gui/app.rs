use eframe::App;
use egui::{Color32, RichText};
use std::time::Instant;

use super::apparatus::{draw_apparatus, ApparatusState};
use super::content_pane::render_stage_content;
use crate::lesson::{CompletionState, Stage};
use crate::simulation::core_algo::classify_window;
use crate::simulation::{HeatIntensity, Hypothesis, RunState, Verdict};
use crate::wizard::WizardShell;

// Collected while drawing, applied once the frame's borrows end.
#[derive(Debug, Clone, Copy)]
enum UiAction {
    SelectStage(Stage),
    Next,
    Previous,
    SetHypothesis(Hypothesis),
    ToggleCooling,
    SetHeat(HeatIntensity),
    Start,
    Stop,
}

pub struct DistillationApp {
    shell: WizardShell,
    startup_notes: Vec<String>,
}

impl DistillationApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, shell: WizardShell, startup_notes: Vec<String>) -> Self {
        Self { shell, startup_notes }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SelectStage(stage) => self.shell.select_stage(stage),
            UiAction::Next => self.shell.next(),
            UiAction::Previous => self.shell.previous(),
            UiAction::SetHypothesis(hypothesis) => {
                self.shell.set_hypothesis(hypothesis);
            }
            UiAction::ToggleCooling => {
                self.shell.toggle_cooling();
            }
            UiAction::SetHeat(heat) => {
                self.shell.set_heat_intensity(heat);
            }
            UiAction::Start => {
                self.shell.start_experiment();
            }
            UiAction::Stop => {
                self.shell.stop_experiment();
            }
        }
    }

    fn render_stage_list(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        for (index, stage) in Stage::ALL.iter().copied().enumerate() {
            let state = self.shell.completion_state(stage);
            let marker = match state {
                CompletionState::Completed => "✔".to_string(),
                _ => format!("{}", index + 1),
            };
            let text = format!("{}  {}", marker, self.shell.stage_title(stage));
            let text = match state {
                CompletionState::Completed => RichText::new(text).color(Color32::from_rgb(22, 163, 74)),
                CompletionState::Active => RichText::new(text).strong(),
                CompletionState::Pending => RichText::new(text).color(Color32::GRAY),
            };
            if ui.selectable_label(state == CompletionState::Active, text).clicked() {
                actions.push(UiAction::SelectStage(stage));
            }
        }
    }

    fn render_hypothesis_stage(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let locked = self.shell.hypothesis_locked();
        ui.add_enabled_ui(!locked, |ui| {
            for option in Hypothesis::ALL {
                let selected = self.shell.hypothesis() == Some(option);
                if ui.radio(selected, option.label()).clicked() && !selected {
                    actions.push(UiAction::SetHypothesis(option));
                }
            }
        });
        if locked {
            ui.label(RichText::new("The experiment has finished; start a new run to change your prediction.").italics());
        }
    }

    fn render_experiment_stage(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let sim = self.shell.simulator();
        let config = sim.config();

        ui.group(|ui| {
            ui.heading("Distillation apparatus");
            draw_apparatus(
                ui,
                &ApparatusState {
                    temperature: sim.temperature(),
                    volume_ml: sim.volume_ml(),
                    receiver_capacity_ml: config.receiver_capacity_ml,
                    cooling: sim.cooling_enabled(),
                    heat: sim.heat_intensity().value(),
                    window: classify_window(config, sim.temperature()),
                    cycle: sim.history().len(),
                },
            );
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let cooling_text = if sim.cooling_enabled() { "Cooling On" } else { "Cooling Off" };
            if ui.button(cooling_text).clicked() {
                actions.push(UiAction::ToggleCooling);
            }

            ui.label("Heat intensity");
            let mut heat = i64::from(sim.heat_intensity().value());
            if ui.add(egui::Slider::new(&mut heat, 0..=100).suffix("%")).changed() {
                actions.push(UiAction::SetHeat(HeatIntensity::saturating(heat)));
            }

            let start_text = if sim.is_running() { "Experiment running..." } else { "Start Experiment" };
            if ui.add_enabled(!sim.is_running(), egui::Button::new(start_text)).clicked() {
                actions.push(UiAction::Start);
            }
            if ui.add_enabled(sim.is_running(), egui::Button::new("Stop")).clicked() {
                actions.push(UiAction::Stop);
            }
        });

        ui.add_space(6.0);
        ui.columns(3, |columns| {
            columns[0].label("Temperature");
            columns[0].label(RichText::new(format!("{:.1} °C", sim.temperature())).strong().color(Color32::from_rgb(220, 38, 38)));
            columns[1].label("Collected volume");
            columns[1].label(RichText::new(format!("{:.1} mL", sim.volume_ml())).strong().color(Color32::from_rgb(37, 99, 235)));
            columns[2].label("Cooling");
            let (text, color) = if sim.cooling_enabled() {
                ("On", Color32::from_rgb(21, 128, 61))
            } else {
                ("Off", Color32::GRAY)
            };
            columns[2].label(RichText::new(text).strong().color(color));
        });

        let status = match sim.state() {
            RunState::Idle => "Not started.".to_string(),
            RunState::Running => format!("Running: {} / {} s", sim.elapsed(), config.tick_budget),
            RunState::Finished => format!("Finished after {} s.", sim.elapsed()),
            RunState::Cancelled => format!("Stopped early at {} s.", sim.elapsed()),
        };
        ui.label(status);
    }

    fn render_observation_stage(&self, ui: &mut egui::Ui) {
        let rows = self.shell.observation_rows();
        if rows.is_empty() {
            ui.label("No readings yet. Run the experiment first.");
            return;
        }
        egui::Grid::new("observation_grid").striped(true).num_columns(5).show(ui, |ui| {
            for header in ["Time (s)", "Temperature (°C)", "Drop rate", "Volume (mL)", "Observation"] {
                ui.label(RichText::new(header).strong());
            }
            ui.end_row();
            for sample in rows {
                ui.label(sample.tick.to_string());
                ui.label(format!("{:.1}", sample.temperature));
                ui.label(format!("{} drops/s", sample.drop_rate));
                ui.label(format!("{:.1}", sample.volume_ml));
                ui.label(sample.observation.label());
                ui.end_row();
            }
        });
    }

    fn render_analysis_stage(&self, ui: &mut egui::Ui) {
        let summary = self.shell.analysis();
        let config = self.shell.config();
        ui.columns(2, |columns| {
            columns[0].label(
                RichText::new(format!(
                    "Ethanol phase ({:.0}-{:.0} °C)",
                    config.ethanol_window.min, config.ethanol_window.max
                ))
                .strong(),
            );
            columns[0].label(format!("Collected volume: {:.1} mL", summary.ethanol_volume_ml));
            columns[1].label(RichText::new(format!("Water phase (>{:.0} °C)", config.water_window_min)).strong());
            columns[1].label(format!("Collected volume: {:.1} mL", summary.water_volume_ml));
        });

        if let Some(hypothesis) = summary.hypothesis {
            ui.add_space(8.0);
            let (headline, color) = match summary.verdict {
                Verdict::Correct => (
                    "Well done! Your hypothesis is correct. Ethanol distilled first because of its lower boiling point.",
                    Color32::from_rgb(21, 128, 61),
                ),
                Verdict::Incorrect => (
                    "Your hypothesis is incorrect. Ethanol distilled first because of its lower boiling point.",
                    Color32::from_rgb(185, 28, 28),
                ),
            };
            ui.group(|ui| {
                ui.label(RichText::new(format!("Hypothesis check: {}", hypothesis.label())).strong());
                ui.label(RichText::new(headline).color(color));
            });
        }
    }
}

impl App for DistillationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(wait) = self.shell.pump(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        let mut actions: Vec<UiAction> = Vec::new();
        let stage = self.shell.current_stage();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.separator();
                ui.label(RichText::new("Simple Distillation: Separating an Ethanol and Water Mixture").strong());
            });
        });

        egui::TopBottomPanel::bottom("nav_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.add_enabled(!self.shell.navigator().is_first(), egui::Button::new("◀ Back")).clicked() {
                    actions.push(UiAction::Previous);
                }
                let (position, count) = self.shell.progress_label();
                ui.label(format!("{} / {}", position, count));
                if ui.add_enabled(!self.shell.navigator().is_last(), egui::Button::new("Continue ▶")).clicked() {
                    actions.push(UiAction::Next);
                }
            });
        });

        egui::SidePanel::left("stage_panel").min_width(200.0).default_width(240.0).show(ctx, |ui| {
            ui.heading("Lesson");
            ui.separator();
            self.render_stage_list(ui, &mut actions);
            if !self.startup_notes.is_empty() {
                ui.separator();
                ui.collapsing("Startup notes", |ui| {
                    for note in &self.startup_notes {
                        ui.colored_label(Color32::from_rgb(202, 138, 4), note);
                    }
                });
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().id_source("stage_scroll").auto_shrink([false, false]).show(ui, |ui| {
                ui.heading(self.shell.stage_title(stage));
                ui.separator();
                render_stage_content(ui, self.shell.stage_content(stage));
                ui.add_space(8.0);
                match stage {
                    Stage::Hypothesis => self.render_hypothesis_stage(ui, &mut actions),
                    Stage::Experiment => self.render_experiment_stage(ui, &mut actions),
                    Stage::Observation => self.render_observation_stage(ui),
                    Stage::Analysis => self.render_analysis_stage(ui),
                    _ => {}
                }
            });
        });

        for action in actions {
            self.apply(action);
        }
        // A run started by this frame's actions needs its first deadline scheduled.
        if let Some(wait) = self.shell.simulator().time_until_next_tick(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
