use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.script.is_some() && args.script_file.is_some() {
        return Err("use either --script or --script-file, not both".to_string());
    }
    if args.digits.is_some() && (args.script.is_some() || args.script_file.is_some()) {
        return Err("--digits cannot be combined with a script".to_string());
    }
    if let Some(raw) = args.digits.as_deref() {
        if raw.trim().is_empty() {
            return Err("invalid --digits, expected at least one character".to_string());
        }
    }
    if let Some(raw) = args.template.as_deref() {
        if raw.is_empty() {
            return Err("invalid --template, expected a non-empty pattern".to_string());
        }
        let placeholder = args
            .placeholder
            .unwrap_or(crate::template::DEFAULT_PLACEHOLDER);
        if let (Some(min), Some(first)) = (args.min_len, raw.chars().position(|c| c == placeholder))
        {
            if min > first + 1 {
                return Err(format!(
                    "invalid --min-len {min}, must be at most {} for template '{raw}'",
                    first + 1
                ));
            }
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or xml"
            ));
        }
    }
    if let (Some(protected), Some(min)) = (args.protected_len, args.min_len) {
        if min < protected {
            return Err(format!(
                "invalid --min-len {min}, must not be below --protected-len {protected}"
            ));
        }
    }
    Ok(())
}
