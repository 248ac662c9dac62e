use clap::Parser;
use cypress_synth::cli::commands::{cmd_generate, cmd_inspect, cmd_sections};
use cypress_synth::cli::config::{Cli, Commands, load_config, resolve_ollama};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    // Resolve Ollama settings: CLI > config > defaults
    let ollama = resolve_ollama(&cli, &config);

    match &cli.command {
        Commands::Generate {
            input,
            output_dir,
            enricher,
        } => {
            let output_dir = output_dir.as_deref().unwrap_or(&config.generate.output_dir);
            let enricher = enricher.as_deref().unwrap_or(&config.generate.enricher);
            let summary = cmd_generate(input, output_dir, enricher, &config, &ollama)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Inspect { input } => {
            let rows = cmd_inspect(input, &config)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Sections => {
            print!("{}", cmd_sections());
        }
    }

    Ok(())
}
