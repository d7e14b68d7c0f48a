use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use unitcheck_core::{CheckResult, Circle, FailureCause, UnitConversion, Validator};

use crate::rules::RuleFile;

#[derive(Args, Debug)]
#[command(about = "Validate a conversion rule file")]
pub struct CheckArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Rule file (TOML)
    pub file: PathBuf,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let conversions = RuleFile::from_file(&args.file)?
        .into_conversions()
        .with_context(|| format!("Invalid rule in {}", args.file.display()))?;

    let mut validator = Validator::new(conversions);
    let checked = validator.conversions().len();
    let result = validator.run();

    match args.format {
        OutputFormat::Human => print_human_readable(checked, result),
        OutputFormat::Json => print_json(result)?,
    }

    if !result.is_successful() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_human_readable(checked: usize, result: &CheckResult) {
    match result.failure_cause() {
        FailureCause::None => {
            println!(
                "{}: {} checked, no problems found",
                "OK".green().bold(),
                count(checked, "conversion")
            );
        }
        FailureCause::Ambiguous => {
            let groups =
                result.ambiguous_text_groups().count() + result.ambiguous_regex_groups().count();
            println!(
                "{}: {}",
                "AMBIGUOUS".red().bold(),
                count(groups, "conflicting rule group")
            );
            for (key, group) in result.ambiguous_text_groups() {
                println!("  {}", key.to_string().bold());
                print_group(group);
            }
            for (unit, group) in result.ambiguous_regex_groups() {
                println!("  {}", format!("regex rules [{unit}]").bold());
                print_group(group);
            }
        }
        FailureCause::Circle => {
            println!(
                "{}: {}",
                "CIRCLE".red().bold(),
                count(result.circles().len(), "circular chain")
            );
            for (i, circle) in result.circles().iter().enumerate() {
                println!("  {}. {circle}", i + 1);
            }
        }
    }
}

pub(crate) fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn print_group(group: &[UnitConversion]) {
    for conversion in group {
        println!("    {conversion}");
    }
}

#[derive(Serialize)]
struct Report<'a> {
    successful: bool,
    failure_cause: FailureCause,
    ambiguous_text: Vec<TextGroup<'a>>,
    ambiguous_regex: Vec<RegexGroup<'a>>,
    circles: &'a [Circle],
}

#[derive(Serialize)]
struct TextGroup<'a> {
    ingredient: &'a str,
    source_unit: &'a str,
    conversions: &'a [UnitConversion],
}

#[derive(Serialize)]
struct RegexGroup<'a> {
    source_unit: &'a str,
    conversions: &'a [UnitConversion],
}

fn print_json(result: &CheckResult) -> Result<()> {
    let report = Report {
        successful: result.is_successful(),
        failure_cause: result.failure_cause(),
        ambiguous_text: result
            .ambiguous_text_groups()
            .map(|(key, conversions)| TextGroup {
                ingredient: &key.ingredient,
                source_unit: &key.source_unit,
                conversions,
            })
            .collect(),
        ambiguous_regex: result
            .ambiguous_regex_groups()
            .map(|(source_unit, conversions)| RegexGroup {
                source_unit,
                conversions,
            })
            .collect(),
        circles: result.circles(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    Ok(())
}
