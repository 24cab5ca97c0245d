use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use directories::UserDirs;
use survey_flightplan::{loaders::kmz::kmz_plan_name, Flightplan, PlannerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Read, edit and write survey flight plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a plan, apply edits and write .mavlink and .flightplan.json files
    Convert(ConvertArgs),
    /// Print a short summary of a plan
    Inspect(InputArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InputFormat {
    Mavlink,
    Kmz,
    Json,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input file
    input: PathBuf,

    /// Input format, guessed from the file extension if omitted
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Plan name for kmz input, defaults to the file name
    #[arg(long)]
    name: Option<String>,

    /// JSON file with planner defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Waypoint radius in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Altitude in meters above the launch point, overrides the config file
    #[arg(long)]
    altitude: Option<f64>,

    /// Bearing in degrees for every waypoint
    #[arg(long, conflicts_with = "bearing_to_center")]
    bearing: Option<f64>,

    /// Face every waypoint towards the center of the route
    #[arg(long)]
    bearing_to_center: bool,

    /// Insert a waypoint every <STEP> meters, overrides the config file
    #[arg(long)]
    step: Option<f64>,

    /// Cruise speed in m/s
    #[arg(long)]
    velocity: Option<f64>,

    /// Hold time at each waypoint in seconds
    #[arg(long)]
    hold_time: Option<f64>,

    /// Output directory, defaults to <Documents>/Flightplans
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Also write a .geojson file
    #[arg(long)]
    geojson: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("survey_flightplan=info,flightplan=info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Convert(args) => convert(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn guess_format(path: &Path) -> Result<InputFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    Ok(match ext.as_str() {
        "mavlink" | "waypoints" | "txt" => InputFormat::Mavlink,
        "kmz" | "kml" => InputFormat::Kmz,
        "json" => InputFormat::Json,
        _ => bail!("Cannot tell the format of {}, pass --format", path.display()),
    })
}

fn load_config(args: &InputArgs) -> Result<PlannerConfig> {
    match &args.config {
        Some(path) => PlannerConfig::try_new_from_file(path),
        None => Ok(PlannerConfig::default()),
    }
}

fn load_plan(args: &InputArgs, config: &PlannerConfig) -> Result<Flightplan> {
    let format = match args.format {
        Some(format) => format,
        None => guess_format(&args.input)?,
    };
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read {}", args.input.display()))?;

    let plan = match format {
        InputFormat::Mavlink => Flightplan::from_mavlink(&content).context("Could not parse mavlink content")?,
        InputFormat::Json => Flightplan::from_json(&content).context("Could not parse json content")?,
        InputFormat::Kmz => {
            let name = args.name.clone().unwrap_or_else(|| kmz_plan_name(&args.input));
            Flightplan::from_kmz(&content, &name, config.bearing, config.waypoint_radius)
                .context("Could not parse kmz content")?
        }
    };

    tracing::info!(name = plan.name(), waypoints = plan.num_waypoints(), ?format, "Loaded flight plan");
    Ok(plan)
}

fn default_out_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|d| d.join("Flightplans")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn convert(args: ConvertArgs) -> Result<()> {
    let mut config = load_config(&args.input)?;
    if let Some(velocity) = args.velocity {
        config.mission.velocity = velocity;
    }
    if let Some(hold_time) = args.hold_time {
        config.mission.hold_time = hold_time;
    }
    if args.altitude.is_some() {
        config.altitude = args.altitude;
    }
    if args.step.is_some() {
        config.waypoint_distance = args.step;
    }

    let mut plan = load_plan(&args.input, &config)?;
    if let Some(name) = &args.input.name {
        plan.set_name(name)?;
    }

    if let Some(radius) = args.radius {
        plan.set_waypoint_radius(radius)?;
    }
    if let Some(bearing) = args.bearing {
        plan.set_bearing(bearing)?;
    }
    if args.bearing_to_center {
        plan.set_bearing_to_center()?;
    }
    config.apply_edits(&mut plan)?;
    if let Some(step) = config.waypoint_distance {
        tracing::info!(waypoints = plan.num_waypoints(), step, "Added intermediate waypoints");
    }

    if !plan.is_valid() {
        bail!("Flight plan {:?} is not valid", plan.name());
    }
    plan.update_mavlink(&config.mission)?;

    let out_dir = args.out_dir.unwrap_or_else(default_out_dir);
    fs::create_dir_all(&out_dir).with_context(|| format!("Could not create {}", out_dir.display()))?;

    write_file(&out_dir.join(plan.mavlink_file_name()), plan.mavlink().unwrap_or_default())?;
    write_file(&out_dir.join(plan.json_file_name()), &plan.to_json()?)?;
    if args.geojson {
        let geojson = serde_json::to_string_pretty(&plan.to_geojson())?;
        write_file(&out_dir.join(plan.geojson_file_name()), &geojson)?;
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Could not write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote file");
    Ok(())
}

fn inspect(args: InputArgs) -> Result<()> {
    let config = load_config(&args)?;
    let plan = load_plan(&args, &config)?;

    println!("name:               {}", plan.name());
    println!("valid:              {}", plan.is_valid());
    println!("waypoints:          {}", plan.num_waypoints());
    println!("points of interest: {}", plan.points_of_interest().len());
    println!("route length:       {:.1} m", plan.route_length_m());
    if let Some(wp) = plan.take_off_position() {
        println!("take-off:           {:.6}, {:.6} @ {:.1} m", wp.latitude, wp.longitude, wp.altitude);
    }
    if let Some(wp) = plan.touch_down_position() {
        println!("touch-down:         {:.6}, {:.6} @ {:.1} m", wp.latitude, wp.longitude, wp.altitude);
    }

    Ok(())
}
