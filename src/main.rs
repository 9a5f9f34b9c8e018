use clap::Parser;
use std::process;
use varthumb::{Cli, OutputFormatter, OutputMode, Source, UserFriendlyError, VarThumb, VarThumbError};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    setup_logging(&cli);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match VarThumb::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    let source = match cli.source.as_ref().map(Source::from_path) {
        Some(Ok(source)) => source,
        Some(Err(e)) => {
            app.handle_error(&e);
            return 1;
        }
        None => {
            app.output_formatter().error("No source archive or directory given");
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cli, &app, &source);
    }

    match app.run_with_output(&source, &cli.output_directory(), cli.grid) {
        Ok(summary) => {
            if summary.has_errors() {
                2 // Completed with reported issues
            } else {
                0
            }
        }
        Err(e) => {
            app.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "varthumb.toml".to_string());

    match VarThumb::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  varthumb <source> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, app: &VarThumb, source: &Source) -> i32 {
    let formatter = app.output_formatter();

    formatter.warning("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    formatter.info("Configuration that would be used:");
    let config = app.config();
    formatter.info(&format!("  Archive suffix: {}", config.scan.archive_suffix()));
    formatter.info(&format!("  Naming policy: {}", config.extract.naming));
    formatter.info(&format!("  Creator separator: {}", config.grouping.separator_char()));
    formatter.info(&format!(
        "  Montages: {}",
        if config.montage.enabled && source.is_directory() {
            "enabled"
        } else {
            "disabled"
        }
    ));
    formatter.info(&format!("  Montage DPI: {}", config.montage.dpi));
    formatter.info(&format!(
        "  Output directory: {}",
        cli.output_directory().display()
    ));

    formatter.print_separator();

    let outcome = match app.plan(source) {
        Ok(outcome) => outcome,
        Err(e) => {
            app.handle_error(&e);
            return 1;
        }
    };

    for error in &outcome.errors {
        formatter.warning(error);
    }

    formatter.success(&format!(
        "{} archive(s) would be processed",
        outcome.archives.len()
    ));
    for archive in &outcome.archives {
        formatter.success(&format!("  {}", archive.display()));
    }

    formatter.info("Run without --dry-run to perform the extraction");
    0
}

fn print_startup_error(error: &VarThumbError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    let default_filter = if cli.quiet {
        "varthumb=error"
    } else {
        match cli.verbosity_level() {
            0 => "varthumb=warn",
            1 => "varthumb=info",
            2 => "varthumb=debug",
            _ => "varthumb=trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use varthumb::Config;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "varthumb",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[montage]"));
    }

    #[test]
    fn test_dry_run_mode() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("alice.hub.var"), b"zip").unwrap();

        let app = VarThumb::new(Config::default(), OutputMode::Plain, 0, true);
        let cli = Cli::try_parse_from(["varthumb", temp_dir.path().to_str().unwrap(), "--dry-run"])
            .unwrap();
        let source = Source::from_path(temp_dir.path()).unwrap();

        assert_eq!(handle_dry_run(&cli, &app, &source), 0);
        assert!(!temp_dir.path().join("thumbnails").exists());
    }

    #[test]
    fn test_dry_run_with_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let app = VarThumb::new(Config::default(), OutputMode::Plain, 0, true);
        let cli = Cli::try_parse_from(["varthumb", "gone", "--dry-run"]).unwrap();

        let source = Source::Directory(temp_dir.path().join("gone"));
        assert_eq!(handle_dry_run(&cli, &app, &source), 1);
    }
}
