use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use mrad_calculator::form::{self, FormInput};
use mrad_calculator::{calculate_mrad_adjustments, CalibrationProfile};

#[derive(Parser)]
#[command(name = "mrad-cli")]
#[command(author = "Ballistics Engine Team")]
#[command(version = "0.1.0")]
#[command(about = "Range table MRAD sight adjustment calculator", long_about = None)]
struct Cli {
    /// Calibration profile (TOML). Defaults to the built-in L129A1 table
    #[arg(short = 'p', long, global = true)]
    profile: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate sight adjustments for one target
    Calculate {
        /// Target distance (meters)
        #[arg(short = 'd', long, allow_hyphen_values = true)]
        distance: String,

        /// Wind speed (m/s)
        #[arg(short = 'w', long, default_value = "0", allow_hyphen_values = true)]
        wind_speed: String,

        /// Crosswind angle (0, 20, 45 or 90 degrees)
        #[arg(short = 'a', long, default_value = "0", allow_hyphen_values = true)]
        angle: String,

        /// Output format
        #[arg(short = 'o', long, default_value = "text")]
        output: CalculateOutput,
    },

    /// Interactive form: prompt for distance, wind speed and angle
    Form,

    /// Print the range table
    Table {
        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: TableOutput,
    },

    /// Display calibration profile information
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CalculateOutput {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableOutput {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Serialize)]
struct TableRow {
    distance: u32,
    vertical_mrad: f64,
    horizontal_mrad: f64,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "mrad_calculator=debug" } else { "mrad_calculator=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(io::stderr)
        .init();

    let profile = CalibrationProfile::load_or_builtin(cli.profile.as_deref())?;

    match cli.command {
        Commands::Calculate { distance, wind_speed, angle, output } => {
            let input = FormInput::new(&distance, &wind_speed, &angle);
            return calculate(&profile, &input, output);
        }

        Commands::Form => run_form(&profile)?,

        Commands::Table { output } => display_table(&profile, output)?,

        Commands::Info => display_info(&profile),
    }

    Ok(ExitCode::SUCCESS)
}

fn calculate(
    profile: &CalibrationProfile,
    input: &FormInput,
    output: CalculateOutput,
) -> Result<ExitCode, Box<dyn Error>> {
    match output {
        CalculateOutput::Text => {
            let out = form::evaluate(profile, input);
            for line in out.lines().iter().filter(|l| !l.is_empty()) {
                println!("{}", line);
            }
            Ok(if out.is_error() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }

        CalculateOutput::Json => match form::solve(profile, input) {
            Ok(result) => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                let body = serde_json::json!({
                    "error": form::error_message(&e),
                    "detail": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

fn run_form(profile: &CalibrationProfile) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("=== {} ===", profile.name);
    println!("Leave the distance empty or type 'q' to quit.");

    loop {
        println!();
        let Some(distance) = prompt(&mut lines, "Target Distance (meters): ")? else { break };
        let distance = distance.trim().to_string();
        if distance.is_empty() || distance.eq_ignore_ascii_case("q") || distance.eq_ignore_ascii_case("quit") {
            break;
        }

        let Some(wind_speed) = prompt(&mut lines, "Wind Speed (m/s): ")? else { break };
        let Some(angle) = prompt(&mut lines, "Crosswind Angle (0, 20, 45, 90 degrees): ")? else { break };

        let out = form::evaluate(profile, &FormInput::new(&distance, &wind_speed, &angle));
        for line in out.lines().iter().filter(|l| !l.is_empty()) {
            println!("{}", line);
        }
    }

    Ok(())
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    lines.next().transpose()
}

fn table_rows(profile: &CalibrationProfile) -> Result<Vec<TableRow>, Box<dyn Error>> {
    profile
        .table
        .rows()
        .iter()
        .map(|(distance, _)| -> Result<TableRow, Box<dyn Error>> {
            let adj = calculate_mrad_adjustments(
                &profile.table,
                *distance as f64,
                profile.range_policy,
                profile.horizontal_divisor,
                profile.decimals,
            )?;
            Ok(TableRow {
                distance: *distance,
                vertical_mrad: adj.vertical,
                horizontal_mrad: adj.horizontal,
            })
        })
        .collect()
}

fn display_table(profile: &CalibrationProfile, format: TableOutput) -> Result<(), Box<dyn Error>> {
    let rows = table_rows(profile)?;
    let d = profile.decimals as usize;

    match format {
        TableOutput::Table => {
            println!("┌──────────┬──────────┬──────────┐");
            println!("│ Dist (m) │ Vert MRAD│ Horz MRAD│");
            println!("├──────────┼──────────┼──────────┤");
            for row in &rows {
                println!("│ {:>8} │ {:>8.*} │ {:>8.*} │",
                    row.distance, d, row.vertical_mrad, d, row.horizontal_mrad);
            }
            println!("└──────────┴──────────┴──────────┘");
        },

        TableOutput::Csv => {
            println!("distance,vertical_mrad,horizontal_mrad");
            for row in &rows {
                println!("{},{:.*},{:.*}", row.distance, d, row.vertical_mrad, d, row.horizontal_mrad);
            }
        },

        TableOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        },
    }

    Ok(())
}

fn display_info(profile: &CalibrationProfile) {
    println!("╔════════════════════════════════════════╗");
    println!("║      MRAD CALCULATOR v0.1.0            ║");
    println!("╠════════════════════════════════════════╣");
    for line in wrap_words(&profile.name, 38) {
        println!("║ {:<38} ║", line);
    }
    println!("╠════════════════════════════════════════╣");
    println!("║ Range:             {:>5} - {:<5} m     ║", profile.table.min_distance(), profile.table.max_distance());
    println!("║ Table rows:        {:>8}            ║", profile.table.len());
    println!("║ Out of range:      {:>8}            ║", profile.range_policy);
    println!("║ Horizontal divisor:{:>8.2}            ║", profile.horizontal_divisor);
    println!("║ Vertical / 10 m:   {:>8.2} MRAD       ║", profile.vertical_per_10m);
    println!("║ Horizontal / 10 m: {:>8.2} MRAD       ║", profile.horizontal_per_10m);
    println!("║ Wind MRAD factor:  {:>8.2}            ║", profile.wind_mrad_factor);
    println!("╠════════════════════════════════════════╣");
    println!("║ CROSSWIND COEFFICIENTS                 ║");
    for (angle, coefficient) in profile.wind_coefficients.iter() {
        println!("║ {:>3}°:              {:>8.2}            ║", angle.degrees(), coefficient);
    }
    println!("╚════════════════════════════════════════╝");
}

/// Greedy word wrap; a single word longer than `width` is split.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() { 0 } else { current.chars().count() + 1 };
        if needed + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
