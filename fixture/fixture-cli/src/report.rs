//! Console output: banner, per-item lines and the closing summary.

use std::env;
use std::time::Duration;

use fixture_tag::{BatchReport, Level, Reporter};
use owo_colors::OwoColorize;

/// Prints batch progress in colour.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{}", message.cyan()),
            Level::Success => println!("  {} {message}", "✓".green()),
            Level::Warn => println!("  {} {}", "⚠".yellow(), message.yellow()),
            Level::Error => println!("  {} {}", "✗".red(), message.red()),
        }
    }
}

pub fn print_banner() {
    println!();
    println!("{}", "Fixture Creator".bold());
    println!("{}", "===============".bold());
    println!();
}

pub fn print_summary(report: &BatchReport, elapsed: Duration) {
    println!();
    let tally = format!("{}/{} fixtures created", report.succeeded(), report.attempted);
    if report.all_succeeded() {
        println!("{}", tally.green().bold());
    } else {
        println!("{}", tally.yellow().bold());
        for failure in &report.failures {
            println!("  {} {} ({})", "✗".red(), failure.identifier, failure.kind);
        }
    }
    println!("{} {}", "Output:".dimmed(), report.output_dir.display());
    if let Some(creator) = creator(|key| env::var(key).ok()) {
        println!("{} {creator}", "Created by".dimmed());
    }
    println!("{} {:.1}s", "Elapsed:".dimmed(), elapsed.as_secs_f64());
}

/// `user@domain`, `user`, or nothing, from the usual environment variables.
fn creator(var: impl Fn(&str) -> Option<String>) -> Option<String> {
    let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());
    let user = non_empty("USERNAME").or_else(|| non_empty("USER"))?;
    Some(match non_empty("USERDOMAIN").or_else(|| non_empty("HOSTNAME")) {
        Some(domain) => format!("{user}@{domain}"),
        None => user,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn creator_variants() {
        assert_eq!(creator(env_of(&[("USER", "dana"), ("HOSTNAME", "lab")])).unwrap(), "dana@lab");
        assert_eq!(
            creator(env_of(&[("USERNAME", "kim"), ("USER", "x"), ("USERDOMAIN", "CLINIC")])).unwrap(),
            "kim@CLINIC"
        );
        assert_eq!(creator(env_of(&[("USER", "solo")])).unwrap(), "solo");
        assert!(creator(env_of(&[("HOSTNAME", "lab")])).is_none());
        assert!(creator(env_of(&[("USER", "  ")])).is_none());
    }
}
