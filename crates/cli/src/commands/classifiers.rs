use anyhow::{Context, Result};
use classify_core::config::AppConfig;

/// List the effective classifier set, in evaluation order.
pub fn list_classifiers_command(config: &AppConfig, json: bool) -> Result<()> {
    let set = config.classifier_set().context("Invalid classifier configuration")?;
    let definitions = set.definitions();

    if json {
        let serialized = serde_json::to_string_pretty(&definitions)
            .context("Failed to serialize classifiers to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Classifiers ({}):", definitions.len());
    for def in definitions {
        let limit = def.read_limit.map(|l| format!("{l} bytes")).unwrap_or_else(|| "-".into());
        println!("  - {} [read limit: {}]", def.class, limit);
        for pattern in &def.file_patterns {
            println!("      file:     {pattern}");
        }
        for pattern in &def.evidence_patterns {
            println!("      evidence: {pattern}");
        }
    }

    Ok(())
}
