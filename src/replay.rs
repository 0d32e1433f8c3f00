//! Sample replay from a file or stdin
//!
//! Line-oriented sample source for the monitor binary: one `key,value`
//! (or whitespace-separated `key value`) pair per line. Feeds parsed
//! samples into a channel for the processing task.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};

use crossbeam_channel::Sender;
use tracing::debug;

use crate::channel::Sample;
use crate::config::Config;

/// Replays recorded samples through the registry.
pub struct SampleReplay {
    config: Config,
}

impl SampleReplay {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Read samples from a file (or stdin when the name is `-`) and send
    /// them in delivery order. Malformed lines are skipped with a debug
    /// log, not treated as fatal.
    pub fn process_file(&self, filename: &str, tx: &Sender<Sample>) -> std::io::Result<()> {
        loop {
            let file: Box<dyn Read> = if filename == "-" {
                Box::new(std::io::stdin())
            } else {
                Box::new(File::open(filename)?)
            };

            for line in BufReader::new(file).lines() {
                let line = line?;
                match parse_sample_line(&line) {
                    Some(sample) => {
                        if tx.send(sample).is_err() {
                            // Processor gone, stop reading.
                            return Ok(());
                        }
                    }
                    None => {
                        if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
                            debug!("skipping malformed sample line: {line:?}");
                        }
                    }
                }
            }

            if !self.config.loop_file || filename == "-" {
                return Ok(());
            }
            debug!("looping file");
        }
    }
}

/// Parse one replay line. Accepts `key,value` or `key value`; blank lines
/// and `#` comments yield `None`.
pub fn parse_sample_line(line: &str) -> Option<Sample> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = match line.split_once(',') {
        Some((key, value)) => (key, value),
        None => line.split_once(char::is_whitespace)?,
    };

    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value: f64 = value.trim().parse().ok()?;
    Some(Sample::new(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        let sample = parse_sample_line("V1.mag,57.3").unwrap();
        assert_eq!(sample.key, "V1.mag");
        assert_eq!(sample.value, 57.3);
    }

    #[test]
    fn test_parse_whitespace_separated() {
        let sample = parse_sample_line("V1.ang\t-179.5").unwrap();
        assert_eq!(sample.key, "V1.ang");
        assert_eq!(sample.value, -179.5);
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        assert!(parse_sample_line("").is_none());
        assert!(parse_sample_line("   ").is_none());
        assert!(parse_sample_line("# header").is_none());
    }

    #[test]
    fn test_malformed_lines_rejected() {
        assert!(parse_sample_line("novalue").is_none());
        assert!(parse_sample_line("key,not-a-number").is_none());
        assert!(parse_sample_line(",5.0").is_none());
    }
}
