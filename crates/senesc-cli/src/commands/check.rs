use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use senescwheat::core::io::tables::{self, TableAudit};
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    info!("Auditing input tables {:?} and {:?}", &args.roots, &args.elements);

    let roots_audit = tables::audit_roots_table(&args.roots)?;
    let elements_audit = tables::audit_elements_table(&args.elements)?;

    print_audit("Roots table", &roots_audit);
    print_audit("Elements table", &elements_audit);

    let total_problems = roots_audit.problems.len() + elements_audit.problems.len();
    if total_problems > 0 {
        return Err(CliError::Validation(format!(
            "{} invalid record(s) across both tables",
            total_problems
        )));
    }

    println!("✓ All records are valid.");
    Ok(())
}

fn print_audit(label: &str, audit: &TableAudit) {
    println!(
        "{}: {} valid record(s), {} problem(s).",
        label,
        audit.valid,
        audit.problems.len()
    );
    for problem in &audit.problems {
        println!("  {}: {}", problem.id, problem.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const ROOTS_HEADER: &str = "plant,axis,mstruct,Nstruct,cytokinins,amino_acids,sucrose";
    const ELEMENTS_HEADER: &str = "plant,axis,metamer,organ,element,green_area,proteins,mstruct,\
                                   max_proteins,Nstruct,nitrates,amino_acids,starch,fructan,\
                                   cytokinins,sucrose,is_growing";

    fn write_tables(dir: &Path, roots_row: &str, elements_row: &str) -> CheckArgs {
        let roots = dir.join("roots.csv");
        let elements = dir.join("elements.csv");
        fs::write(&roots, format!("{ROOTS_HEADER}\n{roots_row}\n")).unwrap();
        fs::write(&elements, format!("{ELEMENTS_HEADER}\n{elements_row}\n")).unwrap();
        CheckArgs { roots, elements }
    }

    #[test]
    fn check_command_accepts_clean_tables() {
        let dir = tempdir().unwrap();
        let args = write_tables(
            dir.path(),
            "1,MS,0.52,0.01,13.0,240.0,190.0",
            "1,MS,5,blade,LeafElement1,1e-3,400.0,0.1,110.0,0.002,25.0,60.0,40.0,30.0,15.0,80.0,False",
        );

        assert!(run(args).is_ok());
    }

    #[test]
    fn check_command_reports_problems_with_a_validation_error() {
        let dir = tempdir().unwrap();
        let args = write_tables(
            dir.path(),
            "1,MS,-0.52,0.01,13.0,240.0,190.0",
            "1,MS,5,blade,LeafElement1,1e-3,400.0,0.1,110.0,0.002,25.0,60.0,40.0,30.0,15.0,80.0,maybe",
        );

        let result = run(args);

        match result {
            Err(CliError::Validation(message)) => {
                assert!(message.contains("2 invalid record(s)"));
            }
            other => panic!("Expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn check_command_propagates_missing_file_errors() {
        let args = CheckArgs {
            roots: PathBuf::from("does_not_exist.csv"),
            elements: PathBuf::from("also_missing.csv"),
        };

        assert!(matches!(run(args), Err(CliError::Table(_))));
    }
}
