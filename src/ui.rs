//! Terminal output for the command line.
//!
//! Formatting is kept separate from printing so the summary lines can be
//! tested without a terminal.

use console::style;

use crate::release::{ProjectOutcome, ProjectReport, RunReport};

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// One plain summary line per project
pub fn format_project(report: &ProjectReport) -> String {
    match &report.result {
        Ok(ProjectOutcome::Released {
            previous,
            version,
            tag,
        }) => format!("{}: released {} -> {} ({})", report.name, previous, version, tag),
        Ok(ProjectOutcome::Unchanged { version }) => {
            format!("{}: unchanged at {}", report.name, version)
        }
        Ok(ProjectOutcome::Planned {
            current,
            next,
            bump,
            ..
        }) => format!("{}: would release {} -> {} ({})", report.name, current, next, bump),
        Err(e) => format!("{}: failed: {}", report.name, e),
    }
}

/// Print the run summary, including planned release notes for dry runs
pub fn display_report(report: &RunReport) {
    if report.projects.is_empty() {
        display_status("No sub-projects found");
        return;
    }

    println!("\n{}", style("Release summary:").bold());
    for project in &report.projects {
        let line = format_project(project);
        match &project.result {
            Ok(ProjectOutcome::Released { .. }) => display_success(&line),
            Ok(ProjectOutcome::Unchanged { .. }) => println!("  {}", style(line).dim()),
            Ok(ProjectOutcome::Planned { notes, .. }) => {
                display_status(&line);
                for note in notes.lines() {
                    println!("    {}", note);
                }
            }
            Err(_) => display_error(&line),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        println!(
            "\n{}",
            style(format!("{} of {} sub-projects failed", failed, report.projects.len())).red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bump;
    use crate::error::ReleaserError;
    use semver::Version;

    #[test]
    fn test_format_released() {
        let report = ProjectReport {
            name: "nginx".to_string(),
            result: Ok(ProjectOutcome::Released {
                previous: Version::new(1, 0, 0),
                version: Version::new(1, 1, 0),
                tag: "nginx-1.1.0".to_string(),
            }),
        };
        assert_eq!(format_project(&report), "nginx: released 1.0.0 -> 1.1.0 (nginx-1.1.0)");
    }

    #[test]
    fn test_format_planned() {
        let report = ProjectReport {
            name: "redis".to_string(),
            result: Ok(ProjectOutcome::Planned {
                current: Version::new(0, 1, 0),
                next: Version::new(1, 0, 0),
                bump: Bump::Major,
                notes: String::new(),
            }),
        };
        assert_eq!(format_project(&report), "redis: would release 0.1.0 -> 1.0.0 (major)");
    }

    #[test]
    fn test_format_failed() {
        let report = ProjectReport {
            name: "api".to_string(),
            result: Err(ReleaserError::remote("rejected")),
        };
        assert_eq!(
            format_project(&report),
            "api: failed: Remote operation failed: rejected"
        );
    }
}
