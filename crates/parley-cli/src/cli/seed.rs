//! `parley seed-db`: create the demo company database.

use std::path::Path;

use console::style;

use parley_infra::sqlite::seed::seed_demo_database;

pub async fn seed_db(path: &Path, json: bool) -> anyhow::Result<()> {
    let summary = seed_demo_database(path).await?;

    if json {
        let out = serde_json::json!({
            "path": path.display().to_string(),
            "departments": summary.departments,
            "employees": summary.employees,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} Demo database written to {}",
            style("✓").green().bold(),
            style(path.display()).cyan()
        );
        println!(
            "  {}",
            style(format!(
                "{} departments, {} employees",
                summary.departments, summary.employees
            ))
            .dim()
        );
        println!();
    }
    Ok(())
}
