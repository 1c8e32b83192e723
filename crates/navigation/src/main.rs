//! Navigation compiler CLI.
//!
//! Compiles menu and breadcrumb configuration into construction plans.

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use navigation_compiler::{
    build_artifact, compile_file, write_artifact, write_artifact_file, CompileError,
    CompileOptions, CompileWarning,
};
use navigation_telemetry::{LogFormat, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(name = "navigation", about = "Navigation tree compiler", version)]
struct Cli {
    /// Log level (RUST_LOG takes precedence).
    #[arg(long, global = true, env = "NAVIGATION_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (pretty or json).
    #[arg(long, global = true, env = "NAVIGATION_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a navigation configuration into a plan artifact.
    Compile {
        /// Configuration file (YAML or JSON).
        #[arg(short, long)]
        config: String,

        /// Output path for the plan (stdout if omitted).
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Validate navigation configuration(s) without writing a plan.
    Validate {
        /// Configuration file(s) (YAML or JSON).
        #[arg(short, long, required = true, num_args = 1..)]
        config: Vec<String>,

        /// Output format (text or json).
        #[arg(long, default_value = "text")]
        format: String,

        #[command(flatten)]
        plan: PlanArgs,
    },
}

/// Options shaping the compiled plan.
#[derive(Args, Debug)]
struct PlanArgs {
    /// Prefix of plan-entry keys.
    #[arg(long, default_value = "navigation")]
    namespace: String,

    /// Tag name used to register menu aliases.
    #[arg(long, default_value = "navigation.menu")]
    alias_tag: String,

    /// Accept unknown item keys and pass them through as attributes.
    #[arg(long)]
    lenient: bool,
}

impl PlanArgs {
    fn options(&self) -> CompileOptions {
        CompileOptions {
            namespace: self.namespace.clone(),
            alias_tag: self.alias_tag.clone(),
            strict_items: !self.lenient,
            ..CompileOptions::default()
        }
    }
}

#[derive(serde::Serialize)]
struct ValidationResult {
    file: String,
    valid: bool,
    errors: Vec<ValidationIssue>,
    warnings: Vec<CompileWarning>,
}

#[derive(serde::Serialize)]
struct ValidationIssue {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

impl ValidationIssue {
    fn from_error(error: &CompileError, file: &str) -> Self {
        let location = match error {
            CompileError::Validation { location, .. } => format!("{}:{}", file, location),
            _ => file.to_string(),
        };

        Self {
            code: error.code().unwrap_or("E2000").to_string(),
            message: error.to_string(),
            location: Some(location),
        }
    }
}

/// Run the validate command.
fn run_validate(configs: &[String], output_format: &str, options: &CompileOptions) -> ExitCode {
    let mut results = Vec::new();

    for config in configs {
        let path = Path::new(config);

        let result = if !path.exists() {
            ValidationResult {
                file: config.clone(),
                valid: false,
                errors: vec![ValidationIssue {
                    code: "E2000".to_string(),
                    message: format!("file not found: {}", config),
                    location: None,
                }],
                warnings: Vec::new(),
            }
        } else {
            match compile_file(path, options) {
                Ok(compiled) => ValidationResult {
                    file: config.clone(),
                    valid: true,
                    errors: Vec::new(),
                    warnings: compiled.warnings,
                },
                Err(e) => ValidationResult {
                    file: config.clone(),
                    valid: false,
                    errors: vec![ValidationIssue::from_error(&e, config)],
                    warnings: Vec::new(),
                },
            }
        };

        results.push(result);
    }

    let invalid = results.iter().filter(|r| !r.valid).count();

    if output_format == "json" {
        let output = serde_json::json!({
            "results": results,
            "summary": {
                "total": results.len(),
                "valid": results.len() - invalid,
                "invalid": invalid,
            }
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to render results: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        for result in &results {
            if result.valid && result.warnings.is_empty() {
                eprintln!("✓ {} is valid", result.file);
            } else if result.valid {
                eprintln!(
                    "✓ {} is valid (with {} warning(s))",
                    result.file,
                    result.warnings.len()
                );
            } else {
                eprintln!("✗ {} has {} error(s)", result.file, result.errors.len());
            }

            for err in &result.errors {
                match &err.location {
                    Some(loc) => eprintln!("  {} [{}]: {}", err.code, loc, err.message),
                    None => eprintln!("  {}: {}", err.code, err.message),
                }
            }

            for warn in &result.warnings {
                print_warning(warn);
            }
        }

        eprintln!();
        eprintln!(
            "validated {} config(s): {} valid, {} invalid",
            results.len(),
            results.len() - invalid,
            invalid
        );
    }

    if invalid > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the compile command.
fn run_compile(config: &str, output: Option<&str>, options: &CompileOptions) -> ExitCode {
    let config_path = Path::new(config);
    if !config_path.exists() {
        eprintln!("error: config file not found: {}", config);
        return ExitCode::from(1);
    }

    let (artifact, warnings) = match build_artifact(config_path, options) {
        Ok(built) => built,
        Err(e) => {
            navigation_telemetry::log_compile_failed!(config = %config, error = %e);
            eprintln!("error: compilation failed: {}", e);
            return ExitCode::from(1);
        }
    };

    for warning in &warnings {
        print_warning(warning);
    }

    navigation_telemetry::log_compiled!(
        config = %config,
        entries = artifact.entries.len(),
        warnings = warnings.len()
    );

    let written = match output {
        Some(output) => write_artifact_file(&artifact, Path::new(output)),
        None => write_artifact(&artifact, io::stdout().lock()),
    };

    match written {
        Ok(()) => {
            if let Some(output) = output {
                navigation_telemetry::log_artifact_written!(path = %output);
                eprintln!(
                    "compiled {} to {} ({} entries)",
                    config,
                    output,
                    artifact.entries.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write plan: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_warning(warning: &CompileWarning) {
    match &warning.location {
        Some(loc) => eprintln!("  {} [{}]: {} (warning)", warning.code, loc, warning.message),
        None => eprintln!("  {}: {} (warning)", warning.code, warning.message),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(log_format) = LogFormat::parse(&cli.log_format) else {
        eprintln!("error: invalid log format: {} (expected pretty or json)", cli.log_format);
        return ExitCode::from(2);
    };
    let telemetry = TelemetryConfig::new()
        .with_log_level(&cli.log_level)
        .with_log_format(log_format);
    if let Err(e) = navigation_telemetry::init_logging(&telemetry) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }
    navigation_telemetry::log_startup!(
        service = %telemetry.service_name,
        version = env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Commands::Compile {
            config,
            output,
            plan,
        } => run_compile(&config, output.as_deref(), &plan.options()),
        Commands::Validate {
            config,
            format,
            plan,
        } => run_validate(&config, &format, &plan.options()),
    }
}
