//! Node listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use voltage_core::patch::{CATALOG, node_info};

use crate::patches::DemoPatch;

#[derive(Args)]
pub struct NodesArgs {
    /// Show details for a specific node type
    #[arg(value_name = "NODE")]
    node: Option<String>,
}

pub fn run(args: NodesArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.node {
        let info = node_info(&name.to_ascii_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown node: {}", name))?;

        println!("{}", info.name);
        println!("{}", "=".repeat(info.name.len()));
        println!();
        println!("{}", info.description);
        println!();
        if info.inputs.is_empty() {
            println!("No inputs.");
        } else {
            println!("Inputs (the first drives the output buffer):");
            for input in info.inputs {
                println!("  {input}");
            }
        }
        return Ok(());
    }

    println!("Available Nodes");
    println!("===============");
    println!();
    println!("  {:8}  {:24}  {}", "Name", "Inputs", "Description");
    println!("  {:8}  {:24}  {}", "----", "------", "-----------");
    for info in CATALOG {
        println!(
            "  {:8}  {:24}  {}",
            info.name,
            info.inputs.join(", "),
            info.description
        );
    }

    println!();
    println!("Demo patches:");
    for patch in DemoPatch::ALL {
        println!("  voltage render {} {}.wav", patch.name(), patch.name());
    }
    Ok(())
}
