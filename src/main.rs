use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;

use orthograph::graph::io::{load_txt, save_graphml};
use orthograph::sat::VarisatOracle;
use orthograph::{compute_stats, make_orthogonal_drawing, DrawingConfig, LayoutError, ShapeConfig};

/// Compute an orthogonal grid drawing of an undirected graph.
#[derive(FromArgs)]
struct Args {
    /// input graph in txt format
    #[argh(option)]
    input: PathBuf,

    /// write the drawing as json
    #[argh(option)]
    output_json: Option<PathBuf>,

    /// write the drawing as graphml
    #[argh(option)]
    output_graphml: Option<PathBuf>,

    /// seed the shape search from system entropy instead of a fixed seed
    #[argh(switch)]
    randomize: bool,

    /// print drawing statistics
    #[argh(switch)]
    stats: bool,
}

fn run(args: &Args) -> Result<(), LayoutError> {
    let graph = load_txt(&args.input)?;
    let config = DrawingConfig {
        shape: ShapeConfig {
            randomize: args.randomize,
            ..ShapeConfig::default()
        },
        ..DrawingConfig::default()
    };
    let drawing = make_orthogonal_drawing(&graph, &VarisatOracle::new(), &config, None)?;
    if let Some(path) = &args.output_json {
        drawing.save_json(path)?;
    }
    if let Some(path) = &args.output_graphml {
        save_graphml(&drawing.graph, &drawing.attributes, path)?;
    }
    if args.stats {
        let stats = compute_stats(&drawing);
        println!("Area: {}", stats.area);
        println!("Crossings: {}", stats.crossings);
        println!("Bends: {}", stats.bends);
        println!("Total edge length: {}", stats.total_edge_length);
        println!("Max edge length: {}", stats.max_edge_length);
        println!("Edge length stddev: {}", stats.edge_length_stddev);
        println!("Max bends per edge: {}", stats.max_bends_per_edge);
        println!("Bends stddev: {}", stats.bends_stddev);
        println!("Initial number of cycles: {}", drawing.initial_cycle_count);
        println!("Number of added cycles: {}", drawing.added_cycle_count);
        println!("Number of useless bends: {}", drawing.removed_bend_count);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            match error {
                LayoutError::Io(_) | LayoutError::InvalidInput(_) => ExitCode::from(1),
                LayoutError::NotConnected => ExitCode::from(2),
                LayoutError::SatOracleFailure(_) | LayoutError::PipelineDivergence { .. } => {
                    ExitCode::from(3)
                }
            }
        }
    }
}
