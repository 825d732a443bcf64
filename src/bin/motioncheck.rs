//! Motioncheck CLI - replay telemetry against a monitored condition
//!
//! Commands:
//! - replay: Drive a named condition (with duration debounce) over an
//!   NDJSON stream of telemetry frames, one frame per tick
//! - schema: Describe the frame input format

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use motioncheck::condition::ConditionArgs;
use motioncheck::session::StepMonitor;
use motioncheck::types::{Arm, Finger, Position, SpreadCase, TelemetryFrame};
use motioncheck::{DurationMonitor, MonitorError, ENGINE_VERSION};

/// Motioncheck - completion monitoring for exercise instruction telemetry
#[derive(Parser)]
#[command(name = "motioncheck")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Replay telemetry frames against a monitored condition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a condition over an NDJSON frame stream (one frame per tick)
    Replay {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Condition name (e.g. CheckSeated, CheckOpenPalm, CheckElbowBend)
        #[arg(short, long)]
        condition: String,

        /// Limb side selector: left, right or both
        #[arg(long)]
        arm: Option<String>,

        /// Digit selector: thumb, index, middle, ring or pinky
        #[arg(long)]
        finger: Option<String>,

        /// Second digit, for pair and touch checks
        #[arg(long)]
        second_finger: Option<String>,

        /// Spread or adducted, for between-finger checks
        #[arg(long)]
        case: Option<String>,

        /// Angle threshold in degrees (condition default when omitted)
        #[arg(long)]
        threshold_deg: Option<f64>,

        /// Distance threshold in meters (condition default when omitted)
        #[arg(long)]
        distance_m: Option<f64>,

        /// Object position as "x,y,z" meters, for object-touch checks
        #[arg(long)]
        object: Option<String>,

        /// Required hold duration in seconds (0 = first qualifying tick)
        #[arg(long, default_value = "0")]
        duration_secs: u32,

        /// Polling cadence the stream was captured at
        #[arg(long, default_value = "10")]
        tick_rate_hz: u32,
    },

    /// Describe the frame input format
    Schema {
        /// Print a default frame as a JSON template
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(completed) => {
            if completed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool, ReplayError> {
    match cli.command {
        Commands::Replay {
            input,
            condition,
            arm,
            finger,
            second_finger,
            case,
            threshold_deg,
            distance_m,
            object,
            duration_secs,
            tick_rate_hz,
        } => cmd_replay(
            &input,
            &condition,
            ConditionFlags {
                arm,
                finger,
                second_finger,
                case,
                threshold_deg,
                distance_m,
                object,
            },
            duration_secs,
            tick_rate_hz,
        ),
        Commands::Schema { json } => {
            cmd_schema(json)?;
            Ok(true)
        }
    }
}

struct ConditionFlags {
    arm: Option<String>,
    finger: Option<String>,
    second_finger: Option<String>,
    case: Option<String>,
    threshold_deg: Option<f64>,
    distance_m: Option<f64>,
    object: Option<String>,
}

impl ConditionFlags {
    fn into_args(self) -> Result<ConditionArgs, ReplayError> {
        Ok(ConditionArgs {
            arm: self.arm.as_deref().map(Arm::parse).transpose()?,
            finger: self.finger.as_deref().map(Finger::parse).transpose()?,
            second_finger: self
                .second_finger
                .as_deref()
                .map(Finger::parse)
                .transpose()?,
            case: self.case.as_deref().map(SpreadCase::parse).transpose()?,
            threshold_deg: self.threshold_deg,
            distance_m: self.distance_m,
            object: self.object.as_deref().map(parse_position).transpose()?,
        })
    }
}

fn parse_position(text: &str) -> Result<Position, ReplayError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ReplayError::BadPosition(text.to_string()));
    }
    let mut coords = [0.0f64; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| ReplayError::BadPosition(text.to_string()))?;
    }
    Ok(Position::new(coords[0], coords[1], coords[2]))
}

fn cmd_replay(
    input: &PathBuf,
    condition_name: &str,
    flags: ConditionFlags,
    duration_secs: u32,
    tick_rate_hz: u32,
) -> Result<bool, ReplayError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let args = flags.into_args()?;
    let monitor = if duration_secs == 0 {
        DurationMonitor::immediate(motioncheck::Condition::named(condition_name, args)?)
    } else {
        DurationMonitor::with_tick_rate(
            motioncheck::Condition::named(condition_name, args)?,
            duration_secs,
            tick_rate_hz,
        )
    };
    let mut step = StepMonitor::with_tick_rate(condition_name, monitor, tick_rate_hz);

    let interactive = atty::is(atty::Stream::Stdout);
    let mut tick = 0u64;

    for line in input_data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let frame: TelemetryFrame = serde_json::from_str(trimmed)
            .map_err(|e| ReplayError::ParseFrame(tick + 1, e.to_string()))?;

        tick += 1;
        let completed = step.poll(Some(&frame));
        if interactive {
            println!(
                "tick {:>5}  t={:>7.1}s  completed={}",
                tick,
                tick as f64 / tick_rate_hz as f64,
                completed
            );
        }
        if completed {
            break;
        }
    }

    let outcome = step.outcome();
    if interactive {
        println!(
            "{} after {:.1}s ({} frames)",
            if outcome.completed { "COMPLETED" } else { "NOT COMPLETED" },
            outcome.time_taken_secs,
            tick
        );
    } else {
        println!("{}", serde_json::to_string(&outcome)?);
    }

    Ok(outcome.completed)
}

fn cmd_schema(json: bool) -> Result<(), ReplayError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&TelemetryFrame::default())?);
        return Ok(());
    }

    println!("Replay input: newline-delimited JSON, one telemetry frame per tick");
    println!();
    println!("Each frame carries:");
    println!("- hip_flexion, trunk_tilt: body angles in degrees");
    println!("- mouth: facial reference position {{ x, y, z }} in meters");
    println!("- left / right: per-arm telemetry:");
    println!("  - elbow_angle, wrist_supination: degrees");
    println!("  - palm: position in meters");
    println!("  - hand: per-digit joint flexion (thumb: ip/cmc; others:");
    println!("    mcp/pip/dip), adjacent-pair abduction angles, and");
    println!("    fingertip positions");
    println!();
    println!("Use --json for a zeroed frame to fill in as a template.");
    Ok(())
}

// Error types

#[derive(Debug)]
enum ReplayError {
    Io(io::Error),
    Monitor(MonitorError),
    Json(serde_json::Error),
    ParseFrame(u64, String),
    BadPosition(String),
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        ReplayError::Io(e)
    }
}

impl From<MonitorError> for ReplayError {
    fn from(e: MonitorError) -> Self {
        ReplayError::Monitor(e)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        ReplayError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        match e {
            ReplayError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ReplayError::Monitor(e) => CliError {
                code: "CONDITION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the condition name and its arguments".to_string()),
            },
            ReplayError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ReplayError::ParseFrame(tick, msg) => CliError {
                code: "FRAME_ERROR".to_string(),
                message: format!("Failed to parse frame {}: {}", tick, msg),
                hint: Some("Run 'motioncheck schema --json' for a template".to_string()),
            },
            ReplayError::BadPosition(text) => CliError {
                code: "POSITION_ERROR".to_string(),
                message: format!("Cannot parse position '{}'", text),
                hint: Some("Expected three comma-separated meters, e.g. 0.4,0.9,0.2".to_string()),
            },
        }
    }
}
