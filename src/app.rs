use std::io::Write;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::field::EventRecord;
use crate::mask::{MaskConfig, PhoneMask};
use crate::output::{self, OutputFormat};
use crate::script::{self, Action, StepRecord};
use crate::template::{DEFAULT_PLACEHOLDER, DEFAULT_TEMPLATE};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn log_step(record: &StepRecord) {
    let mut line = format!(
        "{}{}{} step {} {} -> \"{}\" ({})",
        "[".bold().white(),
        "DBG".bold().cyan(),
        "]".bold().white(),
        record.step,
        record.action,
        record.value,
        record.state.as_str()
    );
    if record.suppressed {
        line.push_str(&format!(" {}", "suppressed".yellow()));
    }
    eprintln!("{line}");
    for event in &record.events {
        eprintln!("{}", format_event(event));
    }
}

fn format_event(event: &EventRecord) -> String {
    let kind = match event.key_code {
        Some(code) => format!("{} {code}", event.kind.as_str()),
        None => event.kind.as_str().to_string(),
    };
    let mut line = format!("      {} \"{}\" -> \"{}\"", kind.cyan(), event.before, event.after);
    if event.suppressed {
        line.push_str(&format!(" {}", "cancel".yellow()));
    }
    line
}

#[derive(Debug)]
struct RunConfig {
    verbose: u8,
    no_color: bool,
    mask: PhoneMask,
    template_source: String,
    actions: Vec<Action>,
    output_path: Option<String>,
    output_format: OutputFormat,
}

fn resolve_template(args: &CliArgs, cfg: &ConfigFile) -> Result<(String, String), String> {
    let lookup = |name: &str| {
        config::resolve_preset(name, cfg.presets.as_ref()).ok_or_else(|| {
            format!(
                "unknown preset '{name}' (available: {})",
                config::preset_names(cfg.presets.as_ref()).join(", ")
            )
        })
    };

    if let Some(template) = args.template.as_deref() {
        return Ok((template.to_string(), "--template".to_string()));
    }
    if let Some(name) = args.preset.as_deref() {
        return Ok((lookup(name)?, format!("preset {name}")));
    }
    if let Some(template) = cfg.template.as_deref() {
        return Ok((template.to_string(), "config".to_string()));
    }
    if let Some(name) = cfg.preset.as_deref() {
        return Ok((lookup(name)?, format!("preset {name} (config)")));
    }
    Ok((DEFAULT_TEMPLATE.to_string(), "default".to_string()))
}

fn load_actions(args: &CliArgs, cfg: &ConfigFile) -> Result<Vec<Action>, String> {
    if let Some(digits) = args.digits.as_deref() {
        return Ok(vec![
            Action::Focus,
            Action::Type(digits.trim().to_string()),
            Action::Blur,
        ]);
    }
    let source = if let Some(raw) = args.script.as_deref() {
        raw.to_string()
    } else if let Some(path) = args.script_file.as_deref() {
        let path = config::expand_tilde(path);
        std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read script file '{}': {e}", path.display()))?
    } else if let Some(raw) = cfg.script.as_deref() {
        raw.to_string()
    } else {
        return Err(
            "no keystroke script given (use --script, --script-file or --digits)".to_string(),
        );
    };
    script::parse_script(&source).map_err(|e| format!("invalid script: {e}"))
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let (template, template_source) = resolve_template(&args, &cfg)?;
    let placeholder = args
        .placeholder
        .or(cfg.placeholder)
        .unwrap_or(DEFAULT_PLACEHOLDER);
    let derived = MaskConfig::for_template_with(&template, placeholder);
    let mask_config = MaskConfig {
        protected_len: args
            .protected_len
            .or(cfg.protected_len)
            .unwrap_or(derived.protected_len),
        min_len: args.min_len.or(cfg.min_len).unwrap_or(derived.min_len),
        ..derived
    };
    let mask = PhoneMask::new(mask_config).map_err(|e| format!("invalid mask: {e}"))?;

    let actions = load_actions(&args, &cfg)?;

    let output_path = args.output.or(cfg.output);
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or xml"))?,
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        verbose: args.verbose,
        no_color,
        mask,
        template_source,
        actions,
        output_path,
        output_format,
    })
}

fn run(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    if run.verbose > 0 {
        let template = run.mask.template();
        format_kv_line(
            "Template",
            &format!("\"{}\" ({})", template.as_str(), run.template_source),
        );
        format_kv_line("Capacity", &run.mask.capacity().to_string());
        format_kv_line("Protected", &run.mask.protected_len().to_string());
        format_kv_line("Min length", &run.mask.min_len().to_string());
        format_kv_line("Steps", &run.actions.len().to_string());
        format_kv_line("Output", run.output_path.as_deref().unwrap_or("stdout"));
        eprintln!();
    }

    let records = script::run_script(&run.mask, &run.actions);
    if run.verbose > 1 {
        for record in records.iter() {
            log_step(record);
        }
        eprintln!();
    }

    let colorize = !run.no_color && run.output_path.is_none();
    let rendered = output::render(&records, run.output_format, colorize);

    match run.output_path.as_deref() {
        Some(path) => {
            let path = config::expand_tilde(path);
            std::fs::write(&path, rendered)
                .map_err(|e| format!("failed to write output '{}': {e}", path.display()))?;
            if run.verbose > 0 {
                format_kv_line("Written", &path.display().to_string());
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&rendered)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("failed to write output: {e}"))?;
        }
    }
    Ok(())
}

fn list_presets(cfg: &ConfigFile) {
    for name in config::preset_names(cfg.presets.as_ref()) {
        let template = config::resolve_preset(&name, cfg.presets.as_ref()).unwrap_or_default();
        println!("{:<6} {}", name, template);
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));

    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "unable to determine a config path".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!(":: Config    : {}", path.display());
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    if args.list_presets {
        list_presets(&cfg);
        return Ok(());
    }

    let run_config = build_run_config(args, cfg)?;
    run(run_config)
}
