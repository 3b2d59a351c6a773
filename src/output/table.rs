use crate::model::ScanResult;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct DependencyRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "License")]
    license: String,
    #[tabled(rename = "Errors")]
    errors: String,
}

pub fn print_table(result: &ScanResult) -> Result<()> {
    let rows = dependency_rows(result);

    if rows.is_empty() {
        println!("No dependencies found.");
    } else {
        println!("Found {} dependencies:", rows.len());
        println!();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    for report in result.sources.iter().filter(|s| s.error.is_some()) {
        println!();
        println!(
            "{} failed: {}",
            report.full_type,
            report.error.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}

fn dependency_rows(result: &ScanResult) -> Vec<DependencyRow> {
    result
        .sources
        .iter()
        .flat_map(|report| {
            report.dependencies.iter().map(|d| DependencyRow {
                source: report.full_type.clone(),
                name: truncate(&d.name, 40),
                version: d.version.clone().unwrap_or_else(|| "-".to_string()),
                license: d.metadata.license.clone().unwrap_or_else(|| "-".to_string()),
                errors: d.errors.join("; "),
            })
        })
        .collect()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
