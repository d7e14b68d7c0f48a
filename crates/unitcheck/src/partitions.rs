use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use unitcheck_core::ConversionPartitioner;

use crate::check::count;
use crate::rules::RuleFile;

#[derive(Args, Debug)]
#[command(about = "Print every partition with its rules and chain graph")]
pub struct PartitionsArgs {
    /// Rule file (TOML)
    pub file: PathBuf,
}

pub fn execute(args: PartitionsArgs) -> Result<()> {
    let conversions = RuleFile::from_file(&args.file)?
        .into_conversions()
        .with_context(|| format!("Invalid rule in {}", args.file.display()))?;

    let partitioner = ConversionPartitioner::new(&conversions);
    for (i, partition) in partitioner.partitions().iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} ({})",
            partition.label().to_string().blue().bold(),
            count(partition.conversions().len(), "conversion")
        );
        for (vertex, conversion) in partition.conversions().iter().enumerate() {
            println!("  {vertex}: {conversion}");
        }
        println!("{}", partition.graph());
    }
    Ok(())
}
