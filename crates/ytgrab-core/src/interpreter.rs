//! Downloader output interpretation.
//!
//! Each line the downloader prints is recorded on the job transcript and then
//! run through an ordered list of rules. The first rule that matches decides
//! the effect on the job; lines no rule matches only update the transcript.
//!
//! New progress formats are added as rules rather than by changing the
//! reader loop.

use std::sync::LazyLock;

use regex::Regex;

use crate::job::Job;

/// `[download]  42.5% of 10.00MiB at 1.2MiB/s ETA 00:07`
static DOWNLOAD_PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[download\]\s+(\d+(?:\.\d+)?)%").expect("download progress pattern is valid")
});

/// Case-sensitive markers printed by the merge and post-processing steps.
const CONVERSION_MARKERS: &[&str] = &["[ffmpeg]", "[Merger]"];

/// Case-insensitive keyword signalling conversion activity.
const CONVERSION_KEYWORD: &str = "conversion";

/// State change requested by one line of output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEffect {
    /// Download progress in percent, as printed.
    DownloadProgress(f64),
    /// Merge or conversion work started or is ongoing.
    Converting,
}

/// A named matcher from a line to an effect.
#[derive(Debug, Clone, Copy)]
pub struct LineRule {
    /// Short identifier, used in debug logs.
    pub name: &'static str,
    /// Returns the effect if the line matches this rule.
    pub matcher: fn(&str) -> Option<LineEffect>,
}

impl LineRule {
    /// Create a rule.
    pub const fn new(name: &'static str, matcher: fn(&str) -> Option<LineEffect>) -> Self {
        Self { name, matcher }
    }
}

/// Ordered, first-match-wins rule list.
#[derive(Debug, Clone)]
pub struct LineInterpreter {
    rules: Vec<LineRule>,
}

impl LineInterpreter {
    /// Rules for the downloader's `--newline` output: download percentage
    /// first, then merge/conversion markers.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                LineRule::new("download-progress", match_download_progress),
                LineRule::new("conversion", match_conversion),
            ],
        }
    }

    /// Append a rule after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: LineRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    /// Effect of `line`, from the first matching rule.
    pub fn interpret(&self, line: &str) -> Option<LineEffect> {
        self.rules.iter().find_map(|rule| {
            let effect = (rule.matcher)(line)?;
            tracing::trace!(target: "ytgrab.interpreter", rule = rule.name, ?effect, "Line matched");
            Some(effect)
        })
    }

    /// Record one raw output line on `job` and apply its effect.
    ///
    /// Carriage returns are dropped and the line is trimmed; blank lines are
    /// ignored. Every other line is appended to the transcript and becomes
    /// the job message before it is interpreted.
    pub fn feed(&self, job: &Job, raw: &str) -> Option<LineEffect> {
        let cleaned = raw.replace('\r', "");
        let line = cleaned.trim();
        if line.is_empty() {
            return None;
        }

        if !job.append_log(line) {
            return None;
        }

        let effect = self.interpret(line)?;
        job.apply(effect);
        Some(effect)
    }
}

impl Default for LineInterpreter {
    fn default() -> Self {
        Self::standard()
    }
}

fn match_download_progress(line: &str) -> Option<LineEffect> {
    let captures = DOWNLOAD_PROGRESS.captures(line)?;
    let pct = captures.get(1)?.as_str().parse::<f64>().ok()?;
    Some(LineEffect::DownloadProgress(pct))
}

fn match_conversion(line: &str) -> Option<LineEffect> {
    let marked = CONVERSION_MARKERS.iter().any(|marker| line.contains(marker))
        || line.to_lowercase().contains(CONVERSION_KEYWORD);
    marked.then_some(LineEffect::Converting)
}
