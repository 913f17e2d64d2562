//! Aqua Inspect CLI - Examine AquaTree files
//!
//! This CLI tool validates an AquaTree JSON file, prints its canonical
//! chain order, and classifies it against known workflow templates.
//!
//! Usage:
//!     aqua-inspect tree.aqua.json
//!     aqua-inspect --templates aqua_sign,identity_claim tree.aqua.json
//!     aqua-inspect --json tree.aqua.json

use clap::Parser;
use std::path::PathBuf;

use aqua_core::{
    classify_workflow, file_name, genesis_hash, last_revision_hash, ordered_hashes,
    validate_aqua_tree, AquaTree, TreeValidation, WorkflowClassification,
};

#[derive(Parser, Debug)]
#[command(name = "aqua-inspect")]
#[command(about = "Validate, order and classify AquaTree files")]
#[command(version)]
struct Args {
    /// Path to the AquaTree JSON file
    tree: PathBuf,

    /// Known workflow template names, comma-separated
    #[arg(short, long, value_delimiter = ',')]
    templates: Vec<String>,

    /// Show a single revision by hash and exit
    #[arg(long)]
    revision: Option<String>,

    /// Output as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Skip the strict validity check when loading
    #[arg(long)]
    lenient: bool,
}

fn main() {
    let args = Args::parse();

    let tree = match load_tree(&args.tree, args.lenient) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error loading tree: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(hash) = &args.revision {
        match tree.require_revision(hash) {
            Ok(revision) => {
                println!("{}", serde_json::to_string_pretty(revision).unwrap_or_default());
                return;
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let validation = validate_aqua_tree(&tree);
    let classification = classify_workflow(&tree, &args.templates);

    if args.json {
        output_json(&tree, &validation, &classification);
    } else {
        output_text(&tree, &validation, &classification, &args.templates);
    }
}

fn load_tree(path: &PathBuf, lenient: bool) -> Result<AquaTree, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    if lenient {
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse tree JSON: {}", e))
    } else {
        AquaTree::parse(&content).map_err(|e| e.to_string())
    }
}

fn output_json(
    tree: &AquaTree,
    validation: &TreeValidation,
    classification: &WorkflowClassification,
) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        valid: bool,
        reason: &'a str,
        revision_count: usize,
        genesis_hash: Option<&'a str>,
        latest_revision_hash: Option<String>,
        file_name: Option<&'a str>,
        ordered_hashes: Vec<String>,
        is_workflow: bool,
        workflow: &'a str,
    }

    let output = JsonOutput {
        valid: validation.is_valid,
        reason: &validation.reason,
        revision_count: tree.len(),
        genesis_hash: genesis_hash(tree),
        latest_revision_hash: last_revision_hash(tree),
        file_name: file_name(tree),
        ordered_hashes: ordered_hashes(tree),
        is_workflow: classification.is_workflow,
        workflow: &classification.workflow,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_default()
    );
}

fn output_text(
    tree: &AquaTree,
    validation: &TreeValidation,
    classification: &WorkflowClassification,
    templates: &[String],
) {
    println!(
        "Validation: {} ({})",
        if validation.is_valid { "VALID" } else { "INVALID" },
        validation.reason
    );
    println!("Revisions:  {}", tree.len());
    println!("File name:  {}", file_name(tree).unwrap_or("-"));
    println!("Genesis:    {}", genesis_hash(tree).unwrap_or("-"));
    println!(
        "Latest:     {}",
        last_revision_hash(tree).as_deref().unwrap_or("-")
    );

    println!("\nChain order:");
    for (index, hash) in ordered_hashes(tree).iter().enumerate() {
        let kind = tree
            .revision(hash)
            .and_then(|revision| revision.revision_type.clone())
            .unwrap_or_else(|| "?".to_string());
        let timestamp = tree
            .revision(hash)
            .and_then(|revision| revision.local_timestamp.clone())
            .unwrap_or_default();
        println!("  {:>3}  {:<10} {}  {}", index, kind, hash, timestamp);
    }

    if !templates.is_empty() {
        if classification.is_workflow {
            println!("\nWorkflow:   {}", classification.workflow);
        } else {
            println!("\nWorkflow:   none (checked {} templates)", templates.len());
        }
    }
}
