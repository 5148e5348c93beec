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

use anyhow::{Context, Result};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use legible::{GeneratedPassword, GenerationOptions, KdfCost, PhoneticAnalysis, StrengthLevel};
use rpassword::read_password;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const MAX_SECRET_BYTES: usize = 1024 * 1024;
pub const MAX_LABEL_BYTES: usize = 4096;
pub const MAX_LABELS_COUNT: usize = 16;

pub const MIN_MASTER_BYTES: usize = 16;

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

/// Where the randomness behind a batch came from.
pub enum Source {
    Os,
    Derived {
        cost: KdfCost,
        labels: usize,
        master_bytes: usize,
        elapsed: Duration,
    },
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

fn status_style(ok: bool, options: &DisplayOptions) -> Style {
    match (options.color_support, ok) {
        (false, _) => Style::new(),
        (true, true) => Style::new().green(),
        (true, false) => Style::new().yellow(),
    }
}

fn strength_style(level: StrengthLevel, options: &DisplayOptions) -> Style {
    if !options.color_support {
        return Style::new();
    }
    match level {
        StrengthLevel::VeryStrong | StrengthLevel::Strong => Style::new().green(),
        StrengthLevel::Medium => Style::new().yellow(),
        StrengthLevel::Weak => Style::new().red(),
    }
}

fn normalize_input(s: &str, input_name: &str) -> Result<String> {
    let normalized: String = s.trim().nfc().collect();

    let control_positions: Vec<String> = normalized
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos.to_string())
        .collect();

    if !control_positions.is_empty() {
        anyhow::bail!(
            "{} contains {} control character(s) at position(s): {}",
            input_name,
            control_positions.len(),
            control_positions.join(", ")
        );
    }

    Ok(normalized)
}

/// Reads a line without echo, trimmed and NFC-normalized.
pub fn prompt_secret(input_name: &str) -> Result<Zeroizing<String>> {
    print!("In [0]: ");
    io::stdout().flush()?;

    let raw = Zeroizing::new(
        read_password().with_context(|| format!("Failed to read {}", input_name.to_lowercase()))?,
    );

    if raw.is_empty() {
        anyhow::bail!("{} cannot be empty", input_name);
    }

    let normalized = Zeroizing::new(normalize_input(&raw, input_name)?);
    if normalized.len() > MAX_SECRET_BYTES {
        anyhow::bail!(
            "{} too long ({} bytes, maximum is {})",
            input_name,
            normalized.len(),
            MAX_SECRET_BYTES
        );
    }

    Ok(normalized)
}

/// Reads context labels until an empty line.
pub fn prompt_labels() -> Result<Vec<Zeroizing<String>>> {
    let mut labels = Vec::new();
    let mut index = 1;

    loop {
        if index > MAX_LABELS_COUNT {
            anyhow::bail!("Too many labels ({} maximum allowed)", MAX_LABELS_COUNT);
        }

        print!("In [{}]: ", index);
        io::stdout().flush()?;

        let mut input = Zeroizing::new(String::new());
        io::stdin().read_line(&mut input)?;

        if input.trim().is_empty() {
            break;
        }

        let normalized = normalize_input(&input, &format!("Label {}", index))?;
        if normalized.len() > MAX_LABEL_BYTES {
            anyhow::bail!(
                "Label {} too long ({} bytes, maximum is {})",
                index,
                normalized.len(),
                MAX_LABEL_BYTES
            );
        }

        labels.push(Zeroizing::new(normalized));
        index += 1;
    }

    if labels.is_empty() {
        anyhow::bail!("At least one label is required");
    }

    Ok(labels)
}

pub fn show_progress<F, T>(
    unicode_support: bool,
    message: &'static str,
    f: F,
) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    let term = Term::stdout();
    term.hide_cursor().ok();

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    if unicode_support {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]));
    } else {
        pb.set_style(style.tick_chars("-\\|/-"));
    }

    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

pub fn display_generated(index: usize, generated: &GeneratedPassword, options: &DisplayOptions) {
    if options.quiet {
        println!("{}", generated.password);
        return;
    }

    println!("Out[{}]:\n{}\n", index, generated.password);
    display_analysis(
        generated.strength_score,
        &generated.analysis,
        Some(generated.readable_stem.as_str()),
        options,
    );
    println!();
}

pub fn display_analysis(
    strength_score: u8,
    analysis: &PhoneticAnalysis,
    stem: Option<&str>,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    let level = StrengthLevel::from_score(strength_score);
    let strong = level >= StrengthLevel::Strong;
    let strength_style = strength_style(level, options);

    let memorable = analysis.memorability_level >= legible::MemorabilityLevel::High;
    let memorable_style = status_style(memorable, options);
    let speakable_style = status_style(analysis.pronounceable, options);

    println!("Analysis:");
    println!(
        "  ├─ Strength   {} {}/100 ({})",
        strength_style.apply_to(format!("[{}]", if strong { check_ok } else { check_warn })),
        strength_style.apply_to(strength_score),
        strength_style.apply_to(level)
    );
    println!(
        "  ├─ Memorable  {} {}",
        memorable_style.apply_to(format!("[{}]", if memorable { check_ok } else { check_warn })),
        memorable_style.apply_to(analysis.memorability_level)
    );
    println!(
        "  ├─ Speakable  {} {}",
        speakable_style.apply_to(format!(
            "[{}]",
            if analysis.pronounceable { check_ok } else { check_warn }
        )),
        if analysis.pronounceable { "yes" } else { "no" }
    );
    println!("  ├─ Syllables  {}", analysis.syllable_count);
    if let Some(stem) = stem {
        let stem_len = stem.chars().count();
        println!(
            "  ├─ Stem       {} {}",
            stem_len,
            plural(stem_len, "char", "chars")
        );
    }
    println!(
        "  └─ Length     {} {}",
        analysis.length,
        plural(analysis.length, "char", "chars")
    );
}

pub fn describe_charset(options: &GenerationOptions) -> String {
    let mut classes = Vec::new();
    if options.include_uppercase {
        classes.push("upper");
    }
    if options.include_lowercase || !options.include_uppercase {
        classes.push("lower");
    }
    if options.include_numbers {
        classes.push("digits");
    }
    if options.include_symbols {
        classes.push("symbols");
    }
    classes.join(", ")
}

pub fn describe_stem(options: &GenerationOptions) -> String {
    let mut traits = Vec::new();
    if options.use_rhythm {
        traits.push("rhythmic");
    }
    if options.use_complex_syllables {
        traits.push("complex syllables");
    }
    if options.add_endings {
        traits.push("endings");
    }
    if traits.is_empty() {
        "traditional".to_string()
    } else {
        traits.join(", ")
    }
}

pub fn display_settings(options: &GenerationOptions, source: &Source, display: &DisplayOptions) {
    if display.quiet {
        return;
    }

    let (check_ok, check_warn) = get_status_symbols(display.unicode_support);

    println!("Settings:");
    println!(
        "  ├─ Length     {} {}",
        options.target_length,
        plural(options.target_length, "char", "chars")
    );
    println!("  ├─ Charset    {}", describe_charset(options));
    println!("  ├─ Stem       {}", describe_stem(options));
    println!(
        "  ├─ Capitals   {}",
        match (options.include_uppercase, options.capitalize_first) {
            (false, _) => "none",
            (true, true) => "first letter",
            (true, false) => "random",
        }
    );

    match source {
        Source::Os => {
            println!("  └─ Source     ChaCha20 keystream (OS key)");
        }
        Source::Derived {
            cost,
            labels,
            master_bytes,
            elapsed,
        } => {
            let master_secure = *master_bytes >= MIN_MASTER_BYTES;
            let master_style = status_style(master_secure, display);
            println!(
                "  ├─ Master     {} {} {}",
                master_style.apply_to(format!(
                    "[{}]",
                    if master_secure { check_ok } else { check_warn }
                )),
                master_style.apply_to(master_bytes),
                plural(*master_bytes, "byte", "bytes")
            );
            println!(
                "  ├─ Labels     {} {}",
                labels,
                plural(*labels, "label", "labels")
            );
            println!(
                "  ├─ KDF        Argon2id (m={} MiB, t={}, p={})",
                cost.memory_mib(),
                cost.iterations,
                cost.parallelism
            );
            println!("  └─ Time       {:.1}s", elapsed.as_secs_f64());
        }
    }
}
