use serde::Serialize;

use crate::cli::OutputFormat;

/// Plain-text rendering of a command response.
pub trait TextOutput {
    fn text(&self) -> String;
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + TextOutput>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(value.text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + TextOutput>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{}", rendered.trim_end_matches('\n'));
    Ok(())
}
