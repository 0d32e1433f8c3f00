//! phasorwatch: rolling SNR monitor for phasor measurement channels
//!
//! Replays recorded samples (or stdin) through a channel registry and
//! reports per-channel windowed statistics.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::RwLock;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use phasorwatch::channel::Sample;
use phasorwatch::config::Config;
use phasorwatch::registry::ChannelRegistry;
use phasorwatch::replay::SampleReplay;
use phasorwatch::stats::ChannelType;
use phasorwatch::{Channel, persist};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_args();

    // Initialize logging only if not in interactive mode
    if !config.interactive {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
        info!("phasorwatch starting...");
        info!("Configuration: {:?}", config);
    }

    let registry = build_registry(&config)?;
    let registry = Arc::new(RwLock::new(registry));

    // Channel for replayed samples
    let (sample_tx, sample_rx): (Sender<Sample>, Receiver<Sample>) = bounded(1024);

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        // Routing task
        let registry_for_processor = Arc::clone(&registry);
        let processor_handle = tokio::spawn(async move {
            process_samples(sample_rx, registry_for_processor).await;
        });

        let display_handle = if config.interactive {
            let registry = Arc::clone(&registry);
            let rows = config.interactive_rows;
            Some(tokio::spawn(async move {
                interactive_display(registry, rows).await;
            }))
        } else {
            None
        };

        // Sample acquisition
        if let Some(ref filename) = config.sample_file {
            if !config.interactive {
                info!("Reading samples from: {}", filename);
            }
            let replay = SampleReplay::new(config.clone());
            if let Err(e) = replay.process_file(filename, &sample_tx) {
                if !config.interactive {
                    error!("Error processing sample file: {}", e);
                }
            }
        } else if !config.interactive {
            info!("No --ifile given, reading samples from stdin");
            let replay = SampleReplay::new(config.clone());
            if let Err(e) = replay.process_file("-", &sample_tx) {
                error!("Error reading stdin: {}", e);
            }
        }

        // Close the stream so the routing task drains and exits
        drop(sample_tx);
        processor_handle.await.ok();

        if config.interactive {
            println!("\nReplay complete. Press Ctrl+C to exit...");
            tokio::signal::ctrl_c().await.ok();
        }

        if let Some(h) = display_handle {
            h.abort();
        }
    });

    // Final report and optional snapshot
    let registry = registry.read();
    if !config.interactive {
        print_report(&registry);
    }
    if let Some(ref path) = config.snapshot_file {
        persist::save_to_path(&registry, path)?;
        if !config.interactive {
            info!("Snapshot written to {}", path);
        }
    }

    Ok(())
}

/// Build the registry from the channels file and/or ad-hoc definitions.
fn build_registry(config: &Config) -> Result<ChannelRegistry, Box<dyn std::error::Error>> {
    let mut registry = match config.channels_file {
        Some(ref path) => persist::load_from_path(path)?,
        None => ChannelRegistry::new(),
    };

    for (kind, key) in &config.adhoc_channels {
        let channel_type = match kind.as_str() {
            "mag" => ChannelType::Magnitude,
            "ang" => ChannelType::Angle,
            other => return Err(format!("unknown channel type: {other}").into()),
        };
        registry.add_channel(Channel::new(
            channel_type,
            key.clone(),
            format!("{key}.snr"),
            config.capacity,
        ));
    }

    registry.initialize()?;
    if config.verbose_state {
        registry.enable_verbose_serialization();
    }

    if registry.is_empty() {
        eprintln!("No channels configured; use --channels or --channel");
        std::process::exit(1);
    }

    Ok(registry)
}

async fn process_samples(rx: Receiver<Sample>, registry: Arc<RwLock<ChannelRegistry>>) {
    while let Ok(mut sample) = rx.recv() {
        let mut registry = registry.write();
        registry.route(&mut sample);
    }
}

async fn interactive_display(registry: Arc<RwLock<ChannelRegistry>>, max_rows: usize) {
    let refresh_interval = Duration::from_millis(250);

    loop {
        tokio::time::sleep(refresh_interval).await;

        // Clear screen and move cursor to top
        print!("\x1B[2J\x1B[H");
        let _ = io::stdout().flush();

        const BOLD: &str = "\x1B[1m";
        const RESET: &str = "\x1B[0m";

        println!(
            "{BOLD}{:<20} {:<5} {:>5} {:>12} {:>12} {:>10}{RESET}",
            "Key", "Type", "N", "Mean", "StdDev", "SNR dB"
        );
        println!("{}", "-".repeat(70));

        let registry = registry.read();
        for channel in registry.channels().iter().take(max_rows) {
            let stats = channel.stats();
            println!(
                "{:<20} {:<5} {:>5} {:>12} {:>12} {:>10}",
                channel.input_key(),
                match channel.channel_type() {
                    ChannelType::Magnitude => "mag",
                    ChannelType::Angle => "ang",
                },
                format!("{}/{}", channel.fill(), channel.capacity()),
                format!("{:.4}", stats.mean),
                format!("{:.4}", stats.stddev),
                format!("{:.2}", stats.snr_db),
            );
        }

        println!("{}", "-".repeat(70));
        println!("Channels: {} | Ctrl+C to exit", registry.len());

        io::stdout().flush().ok();
    }
}

fn print_report(registry: &ChannelRegistry) {
    for channel in registry.channels() {
        let stats = channel.stats();
        println!(
            "{} -> {}: n={} mean={:.6} stddev={:.6} snr={:.4} dB{}",
            channel.input_key(),
            channel.output_key(),
            channel.fill(),
            stats.mean,
            stats.stddev,
            stats.snr_db,
            match channel.cycles() {
                Some(cycles) => format!(" cycles={cycles}"),
                None => String::new(),
            },
        );
    }
}
