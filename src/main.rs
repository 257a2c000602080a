use std::path::Path;

use clap::Parser;
use raf::cli::{Args, Command};
use raf::output::{display_dry_run, display_new_names, display_undo_result, display_warnings};
use raf::progress::{should_use_colors, Progress};
use raf::{
    logging, parse_property, parse_template, rename_all, resolve_inputs, template_stats, undo,
    AppError, Property, RenameOptions, UndoOptions,
};
use tracing::{debug, error, info};

fn main() {
    let args = Args::parse();

    logging::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut progress = Progress::new_with_ui(args.verbose > 0, should_use_colors());

    match &args.command {
        Some(Command::Undo { directory, dry }) => run_undo(directory, *dry, &mut progress),
        None => run_rename(&args, &mut progress),
    }
}

fn run_rename(args: &Args, progress: &mut Progress) -> Result<(), AppError> {
    // Step 1: Validate configuration before touching any file
    let template = args.output.clone().unwrap_or_default();
    if template.is_empty() {
        return Err(AppError::EmptyTemplate);
    }

    let tokens = parse_template(&template).map_err(|source| AppError::InvalidTemplate {
        template: template.clone(),
        source,
    })?;

    let properties = args
        .props
        .iter()
        .map(|declaration| {
            parse_property(declaration).map_err(|source| AppError::InvalidProperty {
                declaration: declaration.clone(),
                source,
            })
        })
        .collect::<Result<Vec<Property>, AppError>>()?;

    let stats = template_stats(&tokens);
    info!(
        "Template uses {} properties ({} declared by the user), {} declared",
        stats.properties,
        stats.custom_properties,
        properties.len()
    );

    // Step 2: Resolve inputs
    let batch = resolve_inputs(&args.files)?;
    info!("Renaming {} files in {:?}", batch.len(), batch.directory);
    for file in &batch.files {
        debug!("  {:?}", file.path);
    }

    // Step 3: Name, preview or apply, persist
    let options = RenameOptions {
        dry_run: args.dry,
        persist_log: args.save_log,
    };

    let result = match rename_all(&properties, &tokens, &batch, &options, progress) {
        Ok(result) => result,
        Err(failure) => {
            display_new_names(&failure.completed, &mut std::io::stdout())
                .map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))?;
            return Err(failure.into());
        }
    };

    if args.dry {
        display_dry_run(&result, &mut std::io::stdout())
            .map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))?;
    } else {
        display_new_names(&result.entries, &mut std::io::stdout())
            .map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))?;
        display_warnings(&result.entries, &mut std::io::stderr())
            .map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))?;
    }

    Ok(())
}

fn run_undo(directory: &Path, dry: bool, progress: &mut Progress) -> Result<(), AppError> {
    info!("Undo mode: {:?}", directory);

    let options = UndoOptions { dry_run: dry };
    let result = undo(directory, &options, progress)?;

    display_undo_result(&result, &mut std::io::stdout())
        .map_err(|e| AppError::Other(format!("Failed to display output: {}", e)))?;

    Ok(())
}
