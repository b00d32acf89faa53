use clap::{Parser, Subcommand};
use lecture_site::{assemble, config, output};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "lecture-site")]
#[command(about = "Static site builder for lecture notes")]
#[command(long_about = "\
Static site builder for lecture notes

Every Lecture* directory under the source root becomes one HTML page,
converted with pandoc. In-class exercises and their solutions become
companion pages, recorded in lectures/resources.json.

Source structure:

  source/raw/
  ├── config.toml                  # Site config (optional)
  ├── img/                         # Images → copied to lectures/img/
  ├── Lecture1/
  │   └── l1_template.tex          # Primary document (highest score)
  └── Lecture3/
      ├── main.tex                 # Primary document
      ├── in-class-exercise.tex    # → Lecture3_exercise.html
      └── in-class-exercise-solution.tex
                                   # → Lecture3_exercise_solutions.html

Primary selection (highest score wins, ties by file name):
  main +60, lecture<N> +40, l<N> +35, notes +20, template +10,
  add-on -60, companion -100

Run 'lecture-site check' to see how each directory is classified.
Run 'lecture-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source root containing Lecture* directories
    #[arg(long, default_value = "source/raw", global = true)]
    src: PathBuf,

    /// Output root; pages go to <out>/lectures, the stylesheet to <out>/assets
    #[arg(long, default_value = ".", global = true)]
    out: PathBuf,

    /// Also write <out>/index.html listing every lecture page
    #[arg(long, global = true)]
    write_index: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site (default)
    Build,
    /// Scan and classify the source root without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            println!(
                "==> Building {} \u{2192} {}",
                cli.src.display(),
                cli.out.display()
            );
            let report = assemble::build(&cli.src, &cli.out, cli.write_index)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.out.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.src.display());
            let (_, plans) = assemble::check(&cli.src)?;
            output::print_check_output(&plans);
            println!("==> Source is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
