use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn banner(subtitle: &str) {
    println!(
        "\n{}  {}\n",
        style("playloop").cyan().bold(),
        style(subtitle).dim()
    );
}

pub fn check() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}

pub fn rule() {
    println!("{}", style("─".repeat(60)).dim());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_under_a_minute_show_tenths() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
    }

    #[test]
    fn longer_durations_show_minutes() {
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
