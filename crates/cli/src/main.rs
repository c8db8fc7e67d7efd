mod logging;
mod serve;
mod simulator;

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use stoplight_core::{LightConfig, TrafficLight};
use stoplight_service::Settings;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Traffic light simulator.
#[derive(Parser)]
#[command(name = "stoplight", version, about = "Traffic light simulator")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate a traffic light in the terminal, prompting for missing durations
    Run {
        /// Seconds the light stays green
        #[arg(long, allow_negative_numbers = true)]
        green: Option<i64>,
        /// Seconds the light stays yellow
        #[arg(long, allow_negative_numbers = true)]
        yellow: Option<i64>,
        /// Seconds the light stays red
        #[arg(long, allow_negative_numbers = true)]
        red: Option<i64>,
        /// Show a single cycle and exit
        #[arg(long, conflicts_with = "repeat")]
        once: bool,
        /// Cycle until q or Ctrl+C
        #[arg(long)]
        repeat: bool,
        /// Milliseconds per tick (default: STOPLIGHT_TICK_MS or 1000)
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// Print the color a light shows after a number of ticks
    Color {
        /// Seconds the light stays green
        #[arg(long, allow_negative_numbers = true)]
        green: i64,
        /// Seconds the light stays yellow
        #[arg(long, allow_negative_numbers = true)]
        yellow: i64,
        /// Seconds the light stays red
        #[arg(long, allow_negative_numbers = true)]
        red: i64,
        /// Ticks elapsed since the light started
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        signal_count: i64,
    },

    /// Start the HTTP JSON API server
    Serve {
        /// Address to bind (default: STOPLIGHT_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: STOPLIGHT_PORT or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut settings = Settings::from_env();
    logging::init(&settings.log_filter);

    match cli.command {
        Commands::Run {
            green,
            yellow,
            red,
            once,
            repeat,
            tick_ms,
        } => {
            if let Some(ms) = tick_ms {
                settings.tick_interval = Duration::from_millis(ms);
            }
            let repeat = match (once, repeat) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            };
            simulator::cmd_run(
                simulator::RunOptions {
                    green,
                    yellow,
                    red,
                    repeat,
                    tick: settings.tick_interval,
                },
                cli.output,
                cli.quiet,
            );
        }
        Commands::Color {
            green,
            yellow,
            red,
            signal_count,
        } => {
            cmd_color(green, yellow, red, signal_count, cli.output, cli.quiet);
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    report_error(
                        &format!("failed to create tokio runtime: {}", e),
                        cli.output,
                        cli.quiet,
                    );
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(settings, cli.quiet)) {
                report_error(&format!("Server error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        }
    }
}

fn cmd_color(
    green: i64,
    yellow: i64,
    red: i64,
    signal_count: i64,
    output: OutputFormat,
    quiet: bool,
) {
    let config = LightConfig::new(green, yellow, red).with_signal_count(signal_count);
    let light = match TrafficLight::new(&config) {
        Ok(light) => light,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };
    let color = match light.color() {
        Ok(color) => color,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Text => println!("{}", color),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "color": color,
                "signal_count": light.signal_count(),
                "total_time": light.total_time(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            );
        }
    }
}

/// Report an error in the requested output format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
