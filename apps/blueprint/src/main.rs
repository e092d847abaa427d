use bodygraph::centers::Center;
use bodygraph::gates::gate_line;
use bodygraph::western::sign_position;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Settings file (defaults to $BODYGRAPH_CONFIG or configs/bodygraph.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a blueprint from a request JSON file (stdin when omitted)
    Chart {
        input: Option<PathBuf>,
        #[arg(long)]
        compact: bool,
    },
    /// Show sign, gate and line for an ecliptic longitude
    Gate {
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Print the effective settings as JSON
    Settings,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => bodygraph_config::load_settings_from(path)?,
        None => bodygraph_config::load_settings()?,
    };
    match &settings.source {
        Some(path) => log::info!("Using settings from {}", path.display()),
        None => log::info!("Using built-in settings"),
    }

    match args.command {
        Command::Chart { input, compact } => {
            let body = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text)?;
                    text
                }
            };

            let (status, response) = bodygraph::handle_request(&body, &settings.blueprint, None);
            if status != 200 {
                log::warn!(
                    "Chart request returned {}: {}",
                    status,
                    response.error.as_deref().unwrap_or("unknown error")
                );
            }
            let json = if compact {
                serde_json::to_string(&response)?
            } else {
                serde_json::to_string_pretty(&response)?
            };
            println!("{}", json);
            if status != 200 {
                anyhow::bail!("request failed with status {}", status);
            }
        }
        Command::Gate { longitude } => {
            let gl = gate_line(longitude, settings.blueprint.wheel_alignment);
            let center = Center::of_gate(gl.gate)
                .map(|c| c.name())
                .unwrap_or("?");
            println!("{}  gate {}  ({})", sign_position(longitude), gl, center);
        }
        Command::Settings => {
            let effective = serde_json::json!({
                "source": settings.source.as_ref().map(|p| p.display().to_string()),
                "chart": settings.blueprint,
                "jobs": settings.jobs,
            });
            println!("{}", serde_json::to_string_pretty(&effective)?);
        }
    }
    Ok(())
}
