//! Configuration and command-line argument parsing for the monitor binary

use std::env;

use crate::window::DEFAULT_WINDOW_CAPACITY;

#[derive(Debug, Clone)]
pub struct Config {
    /// Channel definitions file (registry snapshot JSON)
    pub channels_file: Option<String>,

    // Input
    pub sample_file: Option<String>,
    pub loop_file: bool,

    // Processing
    /// Window capacity for channels declared with --channel
    pub capacity: usize,
    /// Ad-hoc channel definitions from the command line: (type, input key)
    pub adhoc_channels: Vec<(String, String)>,
    /// Include raw windows and cycle counts in snapshots
    pub verbose_state: bool,

    // Output
    pub snapshot_file: Option<String>,
    pub interactive: bool,
    pub interactive_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channels_file: None,
            sample_file: None,
            loop_file: false,
            capacity: DEFAULT_WINDOW_CAPACITY,
            adhoc_channels: Vec::new(),
            verbose_state: false,
            snapshot_file: None,
            interactive: false,
            interactive_rows: 15,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut config = Config::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--channels" => {
                    i += 1;
                    config.channels_file = args.get(i).cloned();
                }
                "--ifile" => {
                    i += 1;
                    config.sample_file = args.get(i).cloned();
                }
                "--loop" => config.loop_file = true,
                "--capacity" => {
                    i += 1;
                    config.capacity = args
                        .get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(DEFAULT_WINDOW_CAPACITY);
                }
                "--channel" => {
                    // --channel mag:V1.mag or --channel ang:V1.ang
                    i += 1;
                    if let Some(spec) = args.get(i) {
                        if let Some((kind, key)) = spec.split_once(':') {
                            config
                                .adhoc_channels
                                .push((kind.to_string(), key.to_string()));
                        } else {
                            eprintln!("Invalid --channel spec: {spec}");
                            print_help();
                            std::process::exit(1);
                        }
                    }
                }
                "--verbose-state" => config.verbose_state = true,
                "--snapshot" => {
                    i += 1;
                    config.snapshot_file = args.get(i).cloned();
                }
                "--interactive" => config.interactive = true,
                "--interactive-rows" => {
                    i += 1;
                    config.interactive_rows =
                        args.get(i).and_then(|s| s.parse().ok()).unwrap_or(15);
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown option: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"phasorwatch - rolling SNR monitor for phasor measurement channels

Usage: phasorwatch [OPTIONS]

Options:
  --channels <file>      Load channel definitions from a snapshot file
  --channel <t>:<key>    Add an ad-hoc channel; t is 'mag' or 'ang'
                         (output key defaults to <key>.snr)
  --capacity <N>         Window size for ad-hoc channels (default: 30)
  --ifile <filename>     Read samples from file (use '-' for stdin);
                         one 'key,value' or 'key value' pair per line
  --loop                 With --ifile, read the same file in a loop
  --interactive          Refresh per-channel statistics on screen
  --interactive-rows <N> Max rows in interactive mode (default: 15)
  --verbose-state        Persist raw windows and unwrap cycle counts
  --snapshot <file>      Write a registry snapshot when input ends
  --help                 Show this help
"#
    );
}
