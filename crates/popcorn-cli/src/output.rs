use clap::ValueEnum;
use comfy_table::{Cell, Table};
use movie_search_models::{MovieDetails, SearchResult, WatchedRecord};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", "✓".green().to_string(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&json!({ "type": "info", "message": msg.as_ref() })),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "error", "message": msg.as_ref() })),
        }
    }

    fn message(&self, kind: &str, symbol: String, msg: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", symbol, msg),
            _ => self.print_json(&json!({ "type": kind, "message": msg })),
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            _ => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }

    /// Prompt text; printed without a newline regardless of format
    pub fn prompt(&self, msg: impl AsRef<str>) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        print!("{}", msg.as_ref());
        io::stdout().flush()
    }

    pub fn results(&self, results: &[SearchResult]) {
        if self.format != OutputFormat::Human {
            self.json(&json!({ "type": "results", "results": results }));
            return;
        }
        if self.quiet {
            return;
        }

        let mut table = styled_table(vec!["#", "Title", "Year", "IMDb ID", "Poster"]);
        for (index, movie) in results.iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&movie.title),
                Cell::new(&movie.year),
                Cell::new(&movie.id),
                Cell::new(if movie.has_poster() { "yes" } else { "-" }),
            ]);
        }
        println!("{}", table);
    }

    pub fn watched(&self, records: &[WatchedRecord]) {
        if self.format != OutputFormat::Human {
            self.json(&json!({ "type": "watched", "watched": records }));
            return;
        }
        if self.quiet {
            return;
        }
        if records.is_empty() {
            println!("{}", "No watched movies yet".dimmed());
            return;
        }

        let mut table = styled_table(vec!["Title", "Year", "Runtime", "IMDb", "You", "IMDb ID"]);
        for record in records {
            table.add_row(vec![
                Cell::new(&record.title),
                Cell::new(&record.year),
                Cell::new(format!("{} min", record.runtime)),
                Cell::new(format!("⭐ {:.1}", record.imdb_rating)),
                Cell::new(format!("🌟 {:.1}", record.user_rating)),
                Cell::new(&record.id),
            ]);
        }
        println!("{}", table);
    }

    pub fn details(&self, details: &MovieDetails, user_rating: Option<f32>) {
        if self.format != OutputFormat::Human {
            self.json(&json!({ "type": "details", "details": details, "user_rating": user_rating }));
            return;
        }
        if self.quiet {
            return;
        }

        let mut table = Table::new();
        table.set_header(vec![
            Cell::new(format!("{} ({})", details.title, details.year))
                .fg(comfy_table::Color::Cyan)
                .add_attribute(comfy_table::Attribute::Bold),
        ]);
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
        for (label, value) in [
            ("Released", &details.released),
            ("Runtime", &details.runtime),
            ("Genre", &details.genre),
            ("IMDb rating", &details.imdb_rating),
            ("Director", &details.director),
            ("Starring", &details.actors),
            ("Plot", &details.plot),
        ] {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
        println!("{}", table);

        match user_rating {
            Some(rating) => println!("You rated this movie {} ⭐", format!("{:.1}", rating).bright_yellow()),
            None => println!("{}", "Rate it with: add <0-10>".dimmed()),
        }
    }
}

fn styled_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(comfy_table::Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}
