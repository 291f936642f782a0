//! # Terminal Output
//!
//! Color handling for the command-line tool. Whether to style output is
//! decided once from the `--color` flag and the environment:
//!
//! - `--color=always|never` wins outright.
//! - In `auto` mode, `NO_COLOR` (any value) and `CLICOLOR=0` disable color,
//!   `CLICOLOR_FORCE=1` forces it, `TERM=dumb` disables it, and otherwise the
//!   terminal's own capabilities decide.

use std::env;

use console::style;

/// Output configuration shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub use_color: bool,
}

/// How a piece of text should stand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Success,
    Warning,
    Muted,
}

impl OutputConfig {
    /// Resolve `--color` (`always`, `never` or `auto`) against the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_ascii_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => color_from_env(),
        };
        Self { use_color }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// `text` styled for `tone`, or unchanged when color is off.
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let styled = style(text).force_styling(true);
        match tone {
            Tone::Heading => styled.bold(),
            Tone::Success => styled.green(),
            Tone::Warning => styled.yellow().bold(),
            Tone::Muted => styled.dim(),
        }
        .to_string()
    }

    /// `fancy` when color is on, `plain` otherwise.
    pub fn symbol<'a>(&self, fancy: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            fancy
        } else {
            plain
        }
    }
}

fn color_from_env() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0") {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_explicit_flags() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
        assert!(!OutputConfig::from_env_and_flag("never").use_color);
    }

    #[test]
    #[serial]
    fn test_no_color_disables_auto() {
        env::set_var("NO_COLOR", "");
        let config = OutputConfig::from_env_and_flag("auto");
        env::remove_var("NO_COLOR");
        assert!(!config.use_color);
    }

    #[test]
    #[serial]
    fn test_always_overrides_no_color() {
        env::set_var("NO_COLOR", "1");
        let config = OutputConfig::from_env_and_flag("always");
        env::remove_var("NO_COLOR");
        assert!(config.use_color);
    }

    #[test]
    fn test_paint_plain_is_identity() {
        let config = OutputConfig::plain();
        assert_eq!(config.paint("Jane Doe", Tone::Heading), "Jane Doe");
        assert_eq!(config.symbol("✔", "ok"), "ok");
    }

    #[test]
    fn test_paint_colored_wraps_in_escapes() {
        let config = OutputConfig { use_color: true };
        let painted = config.paint("Jane Doe", Tone::Success);
        assert!(painted.contains("Jane Doe"));
        assert!(painted.starts_with("\u{1b}["));
        assert_eq!(config.symbol("✔", "ok"), "✔");
    }
}
