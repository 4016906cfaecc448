use photoreg::{ArtifactOutcome, ArtifactStatus, RunOutcome};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.paint(s, BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.paint(s, DIM)
        }
    }
}

pub fn print_run(outcome: &RunOutcome, dry_run: bool, color: bool) {
    let palette = ansi::Palette::new(color);
    let title = if dry_run { "Photolysis registry (dry run)" } else { "Photolysis registry" };
    println!("\n{}", palette.bold(palette.paint(title, ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Registry ━━━", ansi::GRAY));
    println!("  reactions: {}", palette.paint(outcome.registry.len().to_string(), ansi::GREEN));
    if let (Some(policy), Some(active)) = (outcome.policy, outcome.active) {
        println!(
            "  active:    {} {}",
            palette.paint(active.to_string(), ansi::GREEN),
            palette.dim(format!("(policy {policy:?})"))
        );
    }

    println!("\n{}", palette.paint("━━━ Artifacts ━━━", ansi::GRAY));
    if outcome.artifacts.is_empty() {
        println!("{}", palette.dim("  Nothing selected or configured"));
    }
    for artifact in &outcome.artifacts {
        println!("  {}", fmt_artifact(artifact, &palette));
    }

    println!("\n{}", palette.paint("━━━ Warnings ━━━", ansi::GRAY));
    if outcome.warnings.is_empty() {
        println!("{}", palette.dim("  none"));
    } else {
        let missing = outcome.warnings.missing_labels().len();
        println!(
            "  {} {}",
            palette.paint(format!("{} warning(s)", outcome.warnings.len()), ansi::YELLOW),
            palette.dim(format!("({missing} registry lookup miss(es))"))
        );
        for warning in &outcome.warnings {
            println!("    {} {}", palette.paint("•", ansi::YELLOW), warning);
        }
    }
    println!();
}

fn fmt_artifact(artifact: &ArtifactOutcome, palette: &ansi::Palette) -> String {
    let (mark, color) = match &artifact.status {
        ArtifactStatus::Written => ("✓ written", ansi::GREEN),
        ArtifactStatus::Assembled => ("✓ assembled", ansi::GREEN),
        ArtifactStatus::Failed(_) => ("✗ failed", ansi::RED),
    };
    let detail = match &artifact.status {
        ArtifactStatus::Failed(reason) => palette.paint(reason, ansi::RED),
        _ => palette.dim(&artifact.detail),
    };
    format!(
        "{:<8} {} {} {}",
        palette.paint(artifact.kind.name(), ansi::CYAN),
        palette.paint(mark, color),
        artifact.target.display(),
        detail
    )
}
