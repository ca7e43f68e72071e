//! Methods command implementation.

use lhadec_lzhuf::LzhMethod;
use serde::Serialize;

/// One row of the method table.
#[derive(Debug, Serialize)]
struct MethodInfo {
    signature: String,
    name: &'static str,
    description: &'static str,
    dictionary_bits: u8,
    window_size: usize,
    supported: bool,
}

impl From<LzhMethod> for MethodInfo {
    fn from(method: LzhMethod) -> Self {
        Self {
            signature: String::from_utf8_lossy(method.id()).into_owned(),
            name: method.name(),
            description: method.description(),
            dictionary_bits: method.dictionary_bits(),
            window_size: method.window_size(),
            supported: method.is_supported(),
        }
    }
}

pub fn cmd_methods(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<MethodInfo> = LzhMethod::ALL.into_iter().map(MethodInfo::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<7} {:>6} {:>9}  Description",
        "Method", "Window", "Supported"
    );
    println!("{}", "-".repeat(60));
    for row in &rows {
        let window = if row.window_size > 0 {
            format!("{}K", row.window_size / 1024)
        } else {
            "-".to_string()
        };
        println!(
            "{:<7} {:>6} {:>9}  {}",
            row.signature,
            window,
            if row.supported { "yes" } else { "no" },
            row.description
        );
    }

    Ok(())
}
