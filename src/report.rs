use std::fmt::{self, Write};

use crate::models::{BatchResult, CollectionRef, Outcome};

const RULE_WIDTH: usize = 60;

/// Human readable account of a finished batch.
pub fn render(collection: &CollectionRef, result: &BatchResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_report(&mut out, collection, result).expect("writing to a String");
    out
}

fn write_report(out: &mut String, collection: &CollectionRef, result: &BatchResult) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "Creating {} issues for {collection}...\n", result.attempted())?;

    for (i, entry) in result.entries().iter().enumerate() {
        let n = i + 1;
        writeln!(out, "Creating issue {n}: {}...", entry.payload.title)?;
        match &entry.outcome {
            Outcome::Created(record) => {
                writeln!(out, "✓ Issue #{} created: {}", record.number, record.url)?
            }
            Outcome::Failed(e) => match e.status() {
                Some(status) => writeln!(
                    out,
                    "✗ Failed to create issue {n} (status {status}): {}",
                    e.message()
                )?,
                None => writeln!(out, "✗ Failed to create issue {n}: {}", e.message())?,
            },
        }
        out.push('\n');
    }

    writeln!(out, "{rule}")?;
    writeln!(out, "{}/{} created", result.created(), result.attempted())?;
    writeln!(out, "{rule}\n")?;

    writeln!(out, "Created issues:")?;
    for (payload, record) in result.created_records() {
        writeln!(out, "  - #{}: {}", record.number, payload.title)?;
        writeln!(out, "    {}", record.url)?;
    }

    Ok(())
}
