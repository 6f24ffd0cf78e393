use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use spacetime_diagram::config::{self, Config};
use spacetime_diagram::export::{export_csv, export_png, observed_rows};
use spacetime_diagram::relativity::{set_speed_of_light, speed_of_light, SpeedOfLight};
use spacetime_diagram::render::DiagramView;
use spacetime_diagram::{store, tui, ObjectList, ObserverFrame, SpacetimeEntity};

const DEFAULT_DIAGRAM: &str = "spacetime.diagram";

/// Build and explore special-relativity spacetime diagrams
#[derive(Parser)]
#[command(name = "spacetime-diagram", version)]
#[command(about = "Place events and travellers in spacetime and watch them change between reference frames")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Diagram file (overrides the config file setting).
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Speed of light used in every transform.
    #[arg(short = 'c', long, global = true, value_enum)]
    speed_of_light: Option<SpeedOfLight>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Explore the diagram interactively
    Tui,
    /// Print every object as seen by an observer
    #[command(allow_negative_numbers = true)]
    Show {
        /// Observer velocity as a fraction of c.
        #[arg(short, long, default_value_t = 0.0)]
        beta: f64,
    },
    /// Add an event at rest-frame coordinates
    #[command(allow_negative_numbers = true)]
    AddEvent { name: String, t: f64, x: f64 },
    /// Add a traveller passing through (t, x) at the given velocity
    #[command(allow_negative_numbers = true)]
    AddTraveller {
        name: String,
        velocity: f64,
        t: f64,
        x: f64,
    },
    /// Edit an object as seen by an observer
    #[command(allow_negative_numbers = true)]
    Set {
        /// Position of the object in the list, starting at 0.
        index: usize,
        /// Observer velocity the new values are given in.
        #[arg(short, long, default_value_t = 0.0)]
        beta: f64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        x: Option<f64>,
        #[arg(long)]
        t: Option<f64>,
        /// New observed velocity (travellers only).
        #[arg(long)]
        velocity: Option<f64>,
    },
    /// Remove an object from the diagram
    Remove { index: usize },
    /// Export the diagram as an image, or as a CSV table of observed coordinates
    #[command(allow_negative_numbers = true)]
    Export {
        /// Output file; `.csv` writes the coordinate table, anything else an image.
        output: PathBuf,
        #[arg(short, long, default_value_t = 0.0)]
        beta: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        light_cone: bool,
        #[arg(long)]
        no_labels: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    set_speed_of_light(cli.speed_of_light.unwrap_or(config.physics.speed_of_light));

    let path = cli
        .file
        .clone()
        .or_else(|| config.files.diagram.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIAGRAM));
    let view = DiagramView::from(&config.view);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let objects = open(&path)?;
            let mut app = tui::App::new(objects, view, path);
            tui::start(&mut app)?;
        }
        Commands::Show { beta } => show(&open(&path)?, beta)?,
        Commands::AddEvent { name, t, x } => {
            let mut objects = open(&path)?;
            objects.push(SpacetimeEntity::event(name, t, x));
            store::save(&path, &objects)?;
        }
        Commands::AddTraveller { name, velocity, t, x } => {
            let mut objects = open(&path)?;
            let traveller = SpacetimeEntity::traveller(name, velocity, t, x)
                .context("cannot add traveller")?;
            objects.push(traveller);
            store::save(&path, &objects)?;
        }
        Commands::Set {
            index,
            beta,
            name,
            x,
            t,
            velocity,
        } => {
            let mut objects = open(&path)?;
            let frame = ObserverFrame::new(beta)?;
            let count = objects.len();
            let Some(object) = objects.get_mut(index) else {
                bail!("no object at index {index} ({count} in diagram)");
            };
            if let Some(name) = name {
                object.set_name(name);
            }
            match (x, t) {
                (Some(x), Some(t)) => object.set_position(&frame, x, t),
                (Some(x), None) => object.set_x(&frame, x),
                (None, Some(t)) => object.set_t(&frame, t),
                (None, None) => {}
            }
            if let Some(velocity) = velocity {
                let name = object.name().to_string();
                let Some(traveller) = object.as_traveller_mut() else {
                    bail!("'{name}' is an event and has no velocity");
                };
                traveller
                    .set_beta(&frame, velocity)
                    .with_context(|| format!("cannot change velocity of '{name}'"))?;
            }
            store::save(&path, &objects)?;
        }
        Commands::Remove { index } => {
            let mut objects = open(&path)?;
            let count = objects.len();
            let Some(removed) = objects.remove(index) else {
                bail!("no object at index {index} ({count} in diagram)");
            };
            println!("Removed {} '{}'", removed.kind(), removed.name());
            store::save(&path, &objects)?;
        }
        Commands::Export {
            output,
            beta,
            width,
            height,
            light_cone,
            no_labels,
        } => {
            let objects = open(&path)?;
            let frame = ObserverFrame::new(beta)?;
            if output.extension().is_some_and(|ext| ext == "csv") {
                export_csv(&output, &objects, &frame)?;
            } else {
                let mut view = DiagramView {
                    light_cone: view.light_cone || light_cone,
                    labels: view.labels && !no_labels,
                    ..view
                };
                if width.is_some() || height.is_some() {
                    view.resize(width.unwrap_or(view.width), height.unwrap_or(view.height));
                }
                export_png(&output, &objects, &frame, &view)?;
            }
            println!("✅ Diagram exported to {}", output.display());
        }
    }

    Ok(())
}

/// Load the diagram, or start an empty one if the file does not exist yet.
fn open(path: &Path) -> Result<ObjectList> {
    if !path.exists() {
        log::info!("{} not found, starting an empty diagram", path.display());
        return Ok(ObjectList::new());
    }
    store::load(path).with_context(|| format!("opening {}", path.display()))
}

fn show(objects: &ObjectList, beta: f64) -> Result<()> {
    let frame = ObserverFrame::new(beta)?;
    println!("Observer speed {:+.3}c, {}", frame.beta(), speed_of_light());
    println!(
        "{:>3}  {:<16} {:<9} {:>12} {:>12} {:>8} {:>12}",
        "#", "name", "kind", "x", "t", "beta", "x@t=0"
    );
    for (i, row) in observed_rows(objects, &frame).iter().enumerate() {
        let beta = row.beta.map_or_else(String::new, |b| format!("{b:+.4}"));
        let intercept = row.x_intercept.map_or_else(String::new, |x| format!("{x:.4}"));
        println!(
            "{:>3}  {:<16} {:<9} {:>12.4} {:>12.4} {:>8} {:>12}",
            i, row.name, row.kind, row.x, row.t, beta, intercept
        );
    }
    Ok(())
}
