//! Patch validation command.

use clap::Args;

use super::common::load_patch;

#[derive(Args)]
pub struct CheckArgs {
    /// Factory patch name or patch file
    #[arg(value_name = "PATCH")]
    patch: String,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let patch = load_patch(&args.patch)?;
    let values = patch.validate()?;

    println!("{}: OK", patch.name);
    if let Some(description) = &patch.description {
        println!("  {description}");
    }
    println!("  {} parameter(s) set", values.len());
    for (id, value) in values {
        println!("    {:20} = {}", id.string_id(), value);
    }

    Ok(())
}
