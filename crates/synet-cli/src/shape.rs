//! # Shape Subcommand
//!
//! Prints the registry shape of one credential type, or with
//! `--json-schema` the generated JSON Schema for the full credential.

use anyhow::{Context, Result};
use clap::Args;
use synet_schema::credential_schema;
use synet_vc::{shape_for, SubjectShape};

/// Arguments for `synet shape`.
#[derive(Args, Debug)]
pub struct ShapeArgs {
    /// Credential type tag, e.g. `GatewayAuthorizationCredential`.
    #[arg(value_name = "TAG")]
    pub tag: String,

    /// Print the JSON Schema instead of the field table.
    #[arg(long)]
    pub json_schema: bool,

    /// Print the shape as JSON.
    #[arg(long, conflicts_with = "json_schema")]
    pub json: bool,
}

/// Render a shape as an aligned text table.
pub fn render_table(shape: &SubjectShape) -> String {
    let width = shape
        .fields
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or_default();
    let mut out = format!(
        "{} ({} family)\n",
        shape.credential_type,
        shape.credential_type.family()
    );
    for f in &shape.fields {
        let presence = if f.required { "required" } else { "optional" };
        out.push_str(&format!(
            "  {:<width$}  {presence}  {}\n",
            f.name,
            f.kind.describe()
        ));
    }
    out
}

/// Execute `synet shape`.
pub fn run_shape(args: &ShapeArgs) -> Result<u8> {
    let shape = shape_for(&args.tag).with_context(|| format!("cannot show shape of {:?}", args.tag))?;

    if args.json_schema {
        let schema = credential_schema(shape.credential_type);
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(shape)?);
    } else {
        print!("{}", render_table(shape));
    }
    Ok(0)
}
