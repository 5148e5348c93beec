// This file is part of Legible.
//
// Copyright (c) 2026  Legible contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use legible::{
    GeneratedPassword, GenerationOptions, Generator, KdfCost, Keystream, REFERENCE_YEAR,
    StrengthLevel, analyze, calculate_strength, derive_seed,
};
use serde_json::json;
use tracing::{Level, debug};

#[derive(Parser)]
#[command(
    name = "legible",
    version,
    author,
    about = "Readable password generator built on Spanish phonotactics"
)]
struct Cli {
    #[arg(short, long, value_enum, default_value = "random")]
    mode: Mode,

    /// Exact length of every generated password
    #[arg(short, long, default_value_t = legible::generator::DEFAULT_LENGTH)]
    length: usize,

    /// How many passwords to generate
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..=100)
    )]
    count: u16,

    #[arg(long)]
    no_uppercase: bool,

    #[arg(long)]
    no_lowercase: bool,

    #[arg(long)]
    no_numbers: bool,

    #[arg(long)]
    symbols: bool,

    /// Scatter capitals instead of capitalizing the first letter
    #[arg(long)]
    random_caps: bool,

    /// Prefer consonant clusters and syllable fragments
    #[arg(long)]
    complex: bool,

    /// Append a grammatical word ending
    #[arg(long)]
    endings: bool,

    /// Follow a consonant/vowel rhythm pattern
    #[arg(long)]
    rhythm: bool,

    /// Argon2id cost in derived mode
    #[arg(short, long, value_enum, default_value = "standard")]
    security: SecurityLevel,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,

    /// Print passwords only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Mode {
    Random,
    Derived,
    Analyze,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum SecurityLevel {
    Standard,
    Paranoid,
}

impl From<SecurityLevel> for KdfCost {
    fn from(level: SecurityLevel) -> Self {
        match level {
            SecurityLevel::Standard => KdfCost::STANDARD,
            SecurityLevel::Paranoid => KdfCost::PARANOID,
        }
    }
}

impl Cli {
    fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            target_length: self.length,
            use_complex_syllables: self.complex,
            capitalize_first: !self.random_caps,
            add_endings: self.endings,
            use_rhythm: self.rhythm,
            include_uppercase: !self.no_uppercase,
            include_lowercase: !self.no_lowercase,
            include_numbers: !self.no_numbers,
            include_symbols: self.symbols,
        }
    }

    fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let display = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet || cli.json,
    };

    match cli.mode {
        Mode::Random => run_random(&cli, &display),
        Mode::Derived => run_derived(&cli, &display),
        Mode::Analyze => run_analyze(&cli, &display),
    }
}

fn run_random(cli: &Cli, display: &ui::DisplayOptions) -> Result<()> {
    let options = cli.generation_options();
    options.validate()?;

    let mut rng = Keystream::from_os();
    let generator = Generator::new();
    let batch = generate_batch(&generator, &options, cli.count, &mut rng)?;

    emit(cli, &options, &ui::Source::Os, &batch, display)
}

fn run_derived(cli: &Cli, display: &ui::DisplayOptions) -> Result<()> {
    let options = cli.generation_options();
    options.validate()?;

    let master = ui::prompt_secret("Master secret")?;
    let labels = ui::prompt_labels()?;
    let cost = KdfCost::from(cli.security);

    debug!(labels = labels.len(), memory_mib = cost.memory_mib(), "deriving seed");

    let (seed, elapsed) = ui::show_progress(display.unicode_support, "Deriving...", || {
        derive_seed(master.as_bytes(), &labels, cost)
    })?;

    let mut rng = Keystream::new(&seed);
    let generator = Generator::new().with_year(REFERENCE_YEAR);
    let batch = generate_batch(&generator, &options, cli.count, &mut rng)?;

    let source = ui::Source::Derived {
        cost,
        labels: labels.len(),
        master_bytes: master.len(),
        elapsed,
    };

    emit(cli, &options, &source, &batch, display)
}

fn run_analyze(cli: &Cli, display: &ui::DisplayOptions) -> Result<()> {
    let password = ui::prompt_secret("Password")?;

    let strength_score = calculate_strength(&password);
    let analysis = analyze(&password, &password);

    if cli.json {
        let report = json!({
            "strengthScore": strength_score,
            "strengthLevel": StrengthLevel::from_score(strength_score),
            "analysis": analysis,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if cli.quiet {
        println!("{}", strength_score);
    } else {
        println!();
        ui::display_analysis(strength_score, &analysis, None, display);
    }

    Ok(())
}

fn generate_batch(
    generator: &Generator<'_>,
    options: &GenerationOptions,
    count: u16,
    rng: &mut Keystream,
) -> Result<Vec<GeneratedPassword>> {
    (0..count)
        .map(|_| generator.generate(options, &mut *rng))
        .collect()
}

fn emit(
    cli: &Cli,
    options: &GenerationOptions,
    source: &ui::Source,
    batch: &[GeneratedPassword],
    display: &ui::DisplayOptions,
) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(batch)?);
        return Ok(());
    }

    if !display.quiet {
        println!();
    }

    for (index, generated) in batch.iter().enumerate() {
        ui::display_generated(index, generated, display);
    }

    ui::display_settings(options, source, display);

    Ok(())
}
