//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use cadenza_config::lookup_param;
use cadenza_core::{ParamDescriptor, ParamKind};
use cadenza_synth::{DESCRIPTORS, ParamId};
use clap::Args;

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for a single parameter id
    #[arg(value_name = "ID")]
    param: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.param {
        let id = lookup_param(id)?;
        print_details(id);
        return Ok(());
    }

    println!("Synth Parameters");
    println!("================");
    println!();
    println!("  {:20}  {:24}  {:18}  {}", "ID", "Name", "Range", "Default");
    println!("  {:20}  {:24}  {:18}  {}", "--", "----", "-----", "-------");
    for desc in &DESCRIPTORS {
        println!(
            "  {:20}  {:24}  {:18}  {}",
            desc.string_id,
            desc.name,
            range_text(desc),
            value_text(desc, desc.default)
        );
    }
    println!();
    println!("Use 'cadenza params <id>' for option lists.");
    println!("Set values with: cadenza render out.wav --set filter_freq=800");

    Ok(())
}

fn print_details(id: ParamId) {
    let desc = id.descriptor();
    println!("{}", desc.name);
    println!("{}", "=".repeat(desc.name.len()));
    println!();
    println!("  id:       {}", desc.string_id);
    println!("  kind:     {}", kind_text(desc.kind));
    println!("  range:    {}", range_text(desc));
    println!("  default:  {}", value_text(desc, desc.default));

    if let Some(options) = desc.options() {
        println!();
        println!("Options:");
        for (index, label) in options.iter().enumerate() {
            println!("  {index:3}  {label}");
        }
    }
}

fn kind_text(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Float => "float",
        ParamKind::Int => "integer",
        ParamKind::Bool => "toggle",
        ParamKind::Choice(_) => "choice",
    }
}

fn range_text(desc: &ParamDescriptor) -> String {
    match desc.kind {
        ParamKind::Bool => "off/on".to_string(),
        ParamKind::Choice(options) => format!("0..{}", options.len().saturating_sub(1)),
        ParamKind::Int => format!("{}..{}", desc.min, desc.max),
        ParamKind::Float => format!("{}..{}", desc.min, desc.max),
    }
}

fn value_text(desc: &ParamDescriptor, value: f32) -> String {
    match desc.kind {
        ParamKind::Bool => if value >= 0.5 { "on" } else { "off" }.to_string(),
        ParamKind::Choice(_) => desc
            .option_label(value)
            .map_or_else(|| value.to_string(), str::to_string),
        _ => value.to_string(),
    }
}
