use clap::Args;
use realty::catalog::{CatalogSummary, PropertyCatalogImporter};
use realty::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CatalogCheckArgs {
    /// Catalog CSV with one property per row
    pub(crate) path: PathBuf,
    /// Exit with an error when any row is rejected
    #[arg(long)]
    pub(crate) strict: bool,
}

pub(crate) fn run_catalog_check(args: CatalogCheckArgs) -> Result<(), AppError> {
    let CatalogCheckArgs { path, strict } = args;
    let import = PropertyCatalogImporter::from_path(&path)?;
    let summary = import.summary();

    println!("Catalog check: {}", path.display());
    render_summary(&summary);

    if !import.rejected.is_empty() {
        println!("\nRejected rows");
        for row in &import.rejected {
            println!("- line {}: {}", row.line, row.reason);
        }
    }

    if strict {
        import.into_properties()?;
    }
    Ok(())
}

fn render_summary(summary: &CatalogSummary) {
    println!(
        "Rows: {} accepted, {} rejected",
        summary.accepted, summary.rejected
    );

    match summary.price_range {
        Some((low, high)) => println!("Price range (INR): {low} - {high}"),
        None => println!("Price range (INR): n/a"),
    }

    if summary.by_type.is_empty() {
        println!("\nProperty types: none");
    } else {
        println!("\nProperty types");
        for (property_type, count) in &summary.by_type {
            println!("- {property_type}: {count}");
        }
    }
}
