use anyhow::bail;
use serde::Serialize;
use serde_json::Value;
use topo_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::{TextOutput, output};

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SchemaResponse {
    Names { schemas: Vec<&'static str> },
    Schema(Value),
}

impl TextOutput for SchemaResponse {
    fn text(&self) -> String {
        match self {
            Self::Names { schemas } => schemas.join("\n"),
            Self::Schema(schema) => {
                serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string())
            }
        }
    }
}

/// Handle `topo schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    let response = match args.name.as_deref() {
        None => SchemaResponse::Names {
            schemas: registry.list(),
        },
        Some(name) => match registry.get(name) {
            Some(schema) => SchemaResponse::Schema(schema.clone()),
            None => bail!(
                "unknown schema '{name}' (available: {})",
                registry.list().join(", ")
            ),
        },
    };
    output(&response, flags.format)
}
