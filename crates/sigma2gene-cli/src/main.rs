use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use sigma2gene_convert::translate_rule;
use sigma2gene_parser::{SourceDocument, SourceRule, find_rule_files, parse_file};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nLicense GPLv3: This program comes with ABSOLUTELY NO WARRANTY.",
    "\nThis is free software, and you are welcome to redistribute it under certain conditions.",
);

/// Convert Sigma detection rules into Gene rules.
///
/// Converted rules are written to stdout, one JSON object per line.
/// Diagnostics (skipped rules, parse warnings, the final summary) go to
/// stderr, so stdout can be piped straight into the engine's rule store.
#[derive(Parser)]
#[command(name = "sigma2gene", version, long_version = LONG_VERSION)]
struct Cli {
    /// Sigma rule files or directories (crawled recursively for .yml/.yaml)
    #[arg(required = true)]
    rules: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let mut driver = Driver::default();

    for path in &cli.rules {
        let files = match find_rule_files(path) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                continue;
            }
        };
        if files.is_empty() {
            eprintln!("No rule files found under {}", path.display());
            continue;
        }
        for file in files {
            driver.convert_file(&file);
        }
    }

    eprintln!(
        "Converted {} rules, skipped {}.",
        driver.converted, driver.skipped
    );
}

// ---------------------------------------------------------------------------
// Run driver
// ---------------------------------------------------------------------------

/// State carried across the whole run: output-name dedup plus counters.
#[derive(Default)]
struct Driver {
    seen_names: HashSet<String>,
    converted: u64,
    skipped: u64,
}

impl Driver {
    fn convert_file(&mut self, path: &Path) {
        let set = match parse_file(path) {
            Ok(set) => set,
            Err(e) => {
                eprintln!("Error parsing {}: {e}", path.display());
                return;
            }
        };
        for err in &set.errors {
            eprintln!("Warning in {}: {err}", path.display());
        }

        // A skeleton applies to every later rule in the same file until a new
        // `action: global` document replaces it; it never crosses files.
        let mut skeleton: Option<SourceRule> = None;
        for doc in set.documents {
            match doc {
                SourceDocument::Global(rule) => skeleton = Some(rule),
                SourceDocument::Rule(rule) => {
                    self.convert_rule(&rule, skeleton.as_ref(), path);
                }
            }
        }
    }

    fn convert_rule(&mut self, rule: &SourceRule, skeleton: Option<&SourceRule>, path: &Path) {
        match translate_rule(rule, skeleton, Some(path)) {
            Ok(mut gene) => {
                gene.name = self.dedup_name(gene.name);
                match serde_json::to_string(&gene) {
                    Ok(line) => println!("{line}"),
                    Err(e) => {
                        eprintln!("JSON serialization error for {}: {e}", path.display());
                        process::exit(1);
                    }
                }
                self.seen_names.insert(gene.name);
                self.converted += 1;
            }
            Err(e) => {
                let title = skeleton
                    .and_then(|s| s.title.as_deref())
                    .or(rule.title.as_deref())
                    .unwrap_or("<untitled>");
                eprintln!("Rule skipped {} -> {title}: {e}", path.display());
                self.skipped += 1;
            }
        }
    }

    /// First free name: `X`, then `X#2`, `X#3`, …
    fn dedup_name(&self, name: String) -> String {
        if !self.seen_names.contains(&name) {
            return name;
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{name}#{n}");
            if !self.seen_names.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
