//! Schema command - print the expected filer input format

use crate::core::FilerInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the input record
    JsonSchema,
    /// Field names, kinds and descriptions
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => self.print_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(FilerInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) -> anyhow::Result<()> {
        println!("Filer Input Fields");
        println!("==================");
        println!();
        for field in FilerInput::input_fields() {
            println!("{:30} ({:5})  {}", field.name, field.kind, field.description);
            if !field.aliases.is_empty() {
                println!("{:30}          also accepted as: {}", "", field.aliases.join(", "));
            }
        }
        println!();
        println!("Money fields accept free text such as \"$1,234.50\"; blank or invalid values count as zero.");
        Ok(())
    }
}
