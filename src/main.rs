//*** START FILE: src/main.rs ***//
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::{egui, NativeOptions};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lingo_reader::config::{self, Config};
use lingo_reader::dictionary::TranslationTable;
use lingo_reader::parsing::lesson_parser::load_lesson_file;
use lingo_reader::parsing::{parse_lesson_text, BUNDLED_LESSON};
use lingo_reader::reader::{paginate, FixedAdvanceMeasurer};
use lingo_reader::Lesson;

use crate::app::ReaderApp;

#[derive(Parser, Debug)]
#[command(name = "lingo-reader", about = "Paginated foreign-language reader")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Plain-text lesson to read instead of the configured or bundled one
    #[arg(long)]
    lesson: Option<PathBuf>,

    /// Print the parsed lesson as JSON and exit
    #[arg(long)]
    dump_json: bool,

    /// Paginate headlessly at WIDTHxHEIGHT and print the pages
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_viewport)]
    paginate: Option<egui::Vec2>,
}

fn parse_viewport(s: &str) -> Result<egui::Vec2, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: f32 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
    let h: f32 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;
    Ok(egui::vec2(w, h))
}

fn load_lesson(cli: &Cli, config: &Config) -> Result<Lesson> {
    let translations = match &config.translations_path {
        Some(path) => TranslationTable::load_file(path)?,
        None => TranslationTable::bundled().context("bundled translations are invalid")?,
    };
    match cli.lesson.as_ref().or(config.lesson_path.as_ref()) {
        Some(path) => Ok(load_lesson_file(path, &translations)?),
        None => parse_lesson_text(BUNDLED_LESSON, &translations).context("bundled lesson is invalid"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::load_or_default(&cli.config)?;
    let lesson = load_lesson(&cli, &config)?;

    if cli.dump_json {
        println!("{}", serde_json::to_string_pretty(&lesson)?);
        return Ok(());
    }

    if let Some(viewport) = cli.paginate {
        let pages = paginate(lesson.words(), viewport, &config.layout, &FixedAdvanceMeasurer::default());
        for (index, page) in pages.iter().enumerate() {
            let text: Vec<&str> = page.words.iter().map(|w| w.text.as_str()).collect();
            println!("page {} [{}..{}): {}", index + 1, page.first_order, page.end_order(), text.join(" "));
        }
        return Ok(());
    }

    info!(title = lesson.title(), "starting reader window");
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([360.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Lingo Reader",
        options,
        Box::new(move |cc| Box::new(ReaderApp::new(cc, lesson, &config))),
    )
    .map_err(|e| anyhow!("window failed: {}", e))
}

//*** END FILE: src/main.rs ***//
