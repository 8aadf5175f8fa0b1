use clap::Parser;
use imgconst::{config, generate, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "imgconst")]
#[command(about = "Generate typed Dart constants for a Flutter project's image assets")]
#[command(long_about = "\
Generate typed Dart constants for a Flutter project's image assets

Reads the asset directories declared under flutter.assets in pubspec.yaml,
finds the images inside them and writes one Dart class per folder, plus an
index that re-exports them all.

Project structure:

  my_app/
  ├── pubspec.yaml                 # flutter.assets: [assets/]
  ├── imgconst.toml                # Generator options (optional)
  ├── assets/
  │   ├── logo.png                 # → AppImages.logo
  │   ├── icons/
  │   │   └── home.png             # → IconsImages.home
  │   └── backgrounds/
  │       └── splash.jpg           # → BackgroundsImages.splash
  └── lib/generated/images/        # Output (default)
      ├── images.dart              # Index: import this one
      ├── app_images.dart
      ├── icons_images.dart
      └── backgrounds_images.dart

Every run regenerates every file. Output is deterministic: only the
'Generated at:' header line changes between runs over the same assets.

Run 'imgconst --gen-config' to print a documented imgconst.toml.")]
#[command(version = imgconst::generator_version())]
struct Cli {
    /// Output directory, relative to the project root [default: from
    /// imgconst.toml, else lib/generated/images]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Project root containing pubspec.yaml
    #[arg(long, default_value = ".")]
    project: PathBuf,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Print a stock imgconst.toml with all options documented
    #[arg(long)]
    gen_config: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let summary = generate::generate(&cli.project, cli.output.as_deref())?;

    if cli.json {
        for line in output::format_warnings(&summary.warnings) {
            eprintln!("{}", line);
        }
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_summary(&summary, &cli.project);
    }

    Ok(())
}
