//*** START FILE: src/main.rs ***//
use clap::{Parser, Subcommand};
use eframe::{egui, NativeOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use distillation_lab_gui::config::{self, LabConfig};
use distillation_lab_gui::error::ConfigError;
use distillation_lab_gui::gui::DistillationApp;
use distillation_lab_gui::headless::{format_report, run_headless, HeadlessArgs};
use distillation_lab_gui::lesson::LessonContent;
use distillation_lab_gui::parsing::{builtin_lesson, parse_lesson_file};
use distillation_lab_gui::simulation::{HeatIntensity, Hypothesis};
use distillation_lab_gui::WizardShell;

#[derive(Parser, Debug)]
#[command(name = "distillation-lab", about = "Interactive simple distillation lesson")]
struct Cli {
    /// Lab configuration file (TOML).
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Lesson content file; overrides `content_file` from the configuration.
    #[arg(long)]
    content: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the lesson window (default).
    Gui,
    /// Run one experiment without a window and print the readings.
    Simulate {
        /// Burner setting, 0-100.
        #[arg(long, default_value = "50", value_parser = parse_heat)]
        heat: HeatIntensity,
        #[arg(long)]
        no_cooling: bool,
        /// ethanol-first, water-first or mixed.
        #[arg(long, value_parser = parse_hypothesis)]
        hypothesis: Option<Hypothesis>,
        #[arg(long)]
        json: bool,
    },
    /// Parse a lesson content file and print it as JSON.
    CheckContent { path: PathBuf },
}

fn parse_heat(raw: &str) -> Result<HeatIntensity, String> {
    let value: i64 = raw.trim().parse().map_err(|e| format!("'{}' is not a number: {}", raw, e))?;
    HeatIntensity::new(value).map_err(|e| e.to_string())
}

fn parse_hypothesis(raw: &str) -> Result<Hypothesis, String> {
    Hypothesis::from_id(raw).ok_or_else(|| format!("unknown hypothesis '{}'", raw))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

fn load_config(path: &Path, notes: &mut Vec<String>) -> LabConfig {
    match config::load_config_from_file(path) {
        Ok(loaded) => {
            info!(path = %path.display(), "configuration loaded");
            loaded
        }
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "no configuration file, using defaults");
            LabConfig::default()
        }
        Err(err) => {
            error!(error = %err, "configuration rejected, using defaults");
            notes.push(format!("Config: {}", err));
            LabConfig::default()
        }
    }
}

fn load_lesson(path: Option<&Path>, notes: &mut Vec<String>) -> LessonContent {
    if let Some(path) = path {
        match parse_lesson_file(path) {
            Ok(lesson) => {
                info!(path = %path.display(), stages = lesson.stages.len(), "lesson content loaded");
                return lesson;
            }
            Err(err) => {
                error!(error = %err, "lesson content rejected, using built-in lesson");
                notes.push(format!("Lesson: {}", err));
            }
        }
    }
    builtin_lesson().unwrap_or_else(|err| {
        error!(error = %err, "built-in lesson failed to parse");
        notes.push(format!("Built-in lesson: {}", err));
        LessonContent::default()
    })
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mut notes: Vec<String> = Vec::new();
    let lab_config = load_config(&cli.config, &mut notes);

    match cli.command.unwrap_or(Command::Gui) {
        Command::Simulate { heat, no_cooling, hypothesis, json } => {
            let report = run_headless(&lab_config, &HeadlessArgs { heat, cooling: !no_cooling, hypothesis });
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(err) => {
                        error!(error = %err, "failed to serialize report");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{}", format_report(&report));
            }
            ExitCode::SUCCESS
        }
        Command::CheckContent { path } => match parse_lesson_file(&path) {
            Ok(lesson) => match serde_json::to_string_pretty(&lesson) {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(error = %err, "failed to serialize lesson");
                    ExitCode::FAILURE
                }
            },
            Err(err) => {
                error!(error = %err, path = %path.display(), "lesson content is invalid");
                ExitCode::FAILURE
            }
        },
        Command::Gui => {
            let content_path = cli.content.or_else(|| lab_config.content_file.clone());
            let lesson = load_lesson(content_path.as_deref(), &mut notes);
            let shell = WizardShell::new(lab_config, lesson);

            let options = NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([1200.0, 820.0])
                    .with_min_inner_size([900.0, 600.0]),
                ..Default::default()
            };
            let result = eframe::run_native(
                "Simple Distillation Lab",
                options,
                Box::new(move |cc| Box::new(DistillationApp::new(cc, shell, notes))),
            );
            match result {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    error!(error = %err, "window closed with an error");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
//*** END FILE: src/main.rs ***//
