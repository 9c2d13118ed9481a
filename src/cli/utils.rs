use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "success": true, "message": message });
            if let (Some(Value::Object(extra)), Some(fields)) = (data, response.as_object_mut()) {
                fields.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an API document: pretty JSON, or the given text rendering
pub fn output_document<T: Serialize>(output_format: OutputFormat, document: &T, text: String) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(document)?),
        OutputFormat::Text => println!("{}", text),
    }
    Ok(())
}

/// Password from the flag, else `TWIT_PASSWORD`
pub fn resolve_password(password: Option<String>) -> anyhow::Result<String> {
    match password.or_else(|| std::env::var("TWIT_PASSWORD").ok()) {
        Some(p) => Ok(p),
        None => Err(anyhow::anyhow!("Password required: pass --password or set TWIT_PASSWORD")),
    }
}
