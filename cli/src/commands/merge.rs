use std::path::Path;

use anyhow::Result;

use larder_core::catalog::{MergeSummary, merge_recipes_file, merge_views_file};

pub(crate) fn cmd_merge_recipes(file: &Path, dest: &Path, json: bool) -> Result<()> {
    let summary = merge_recipes_file(file, dest)?;
    print_summary(&summary, dest, json);
    Ok(())
}

pub(crate) fn cmd_merge_views(file: &Path, dest: &Path, json: bool) -> Result<()> {
    let summary = merge_views_file(file, dest)?;
    print_summary(&summary, dest, json);
    Ok(())
}

fn print_summary(summary: &MergeSummary, dest: &Path, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "added": summary.added,
                "updated": summary.updated,
                "total": summary.total,
                "dest": dest.display().to_string(),
            })
        );
    } else {
        let added = summary.added;
        let updated = summary.updated;
        let total = summary.total;
        let dest = dest.display();
        println!("Done. Added: {added}, Updated: {updated}, Total: {total} -> {dest}");
    }
}
