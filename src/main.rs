use std::io::Read;

use clap::{Parser, ValueEnum};
use diagrams::{Direction, diagram, graph_parser};

#[derive(Parser)]
#[command(name = "diagrams", about = "Render flowchart scripts as Graphviz DOT")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Write `<name>.dot` into this directory instead of printing to stdout
    #[arg(long, short = 'o', value_name = "DIR")]
    out_dir: Option<std::path::PathBuf>,

    /// Graph name, also used as the output file stem
    #[arg(long, short = 'n', default_value = "diagram")]
    name: String,

    /// Override the direction declared in the script
    #[arg(long, short = 'd', value_enum)]
    direction: Option<DirectionArg>,

    /// Title shown above the diagram
    #[arg(long, short = 'l')]
    label: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Tb,
    Bt,
    Lr,
    Rl,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Tb => Direction::TopToBottom,
            DirectionArg::Bt => Direction::BottomToTop,
            DirectionArg::Lr => Direction::LeftToRight,
            DirectionArg::Rl => Direction::RightToLeft,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    if let Err(e) = run(&cli, &input) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, input: &str) -> diagrams::Result<()> {
    let mut opts = vec![diagram::name(&cli.name), diagram::filename(&cli.name)];
    if let Some(d) = cli.direction {
        opts.push(diagram::direction(d.into()));
    }
    if let Some(label) = &cli.label {
        opts.push(diagram::label(label));
    }

    let d = graph_parser::parse_graph(input)?.into_diagram(&opts);
    match &cli.out_dir {
        Some(dir) => {
            let path = d.render(dir)?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", d.to_dot()?),
    }
    Ok(())
}
