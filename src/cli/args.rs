use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "phonemask",
    version,
    about = "incremental phone-number input masking",
    long_about = "Phonemask replays keystroke scripts against a phone-number input mask and shows the value the field holds after every step.\n\nExamples:\n  phonemask -d 9123456789\n  phonemask -s \"focus; type 912; bs 2; blur\"\n  phonemask -p us -s \"focus; paste 2125551234\" --output-format json\n  phonemask -t \"+7 (___) ___-__-__\" -S ./script.txt\n\nScripts are steps separated by ';' or newlines: focus, blur, type <text>, paste <text>, bs [n], del [n], cursor <n>, home, end."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the trace to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Trace format (text, json or xml)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 't',
        long = "tpl",
        visible_alias = "template",
        value_name = "TEMPLATE",
        help_heading = "Mask",
        help = "Mask template, '_' marks a digit slot (overrides --preset)."
    )]
    pub template: Option<String>,

    #[arg(
        short = 'p',
        long = "pr",
        visible_alias = "preset",
        value_name = "NAME",
        help_heading = "Mask",
        help = "Named template (ru, us, de, uk or one from the config file)."
    )]
    pub preset: Option<String>,

    #[arg(
        long = "ph",
        visible_alias = "placeholder",
        value_name = "CHAR",
        help_heading = "Mask",
        help = "Placeholder character used by the template."
    )]
    pub placeholder: Option<char>,

    #[arg(
        long = "pl",
        visible_alias = "protected-len",
        value_name = "N",
        help_heading = "Mask",
        help = "Cursor positions below N cannot delete (derived from the template by default)."
    )]
    pub protected_len: Option<usize>,

    #[arg(
        long = "ml",
        visible_alias = "min-len",
        value_name = "N",
        help_heading = "Mask",
        help = "Values shorter than N are cleared on blur (derived from the template by default)."
    )]
    pub min_len: Option<usize>,

    #[arg(
        short = 's',
        long = "sc",
        visible_alias = "script",
        value_name = "SCRIPT",
        help_heading = "Input",
        help = "Keystroke script to replay."
    )]
    pub script: Option<String>,

    #[arg(
        short = 'S',
        long = "sf",
        visible_alias = "script-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "Load the keystroke script from a file."
    )]
    pub script_file: Option<String>,

    #[arg(
        short = 'd',
        long = "dg",
        visible_alias = "digits",
        value_name = "DIGITS",
        help_heading = "Input",
        help = "Shortcut for the script 'focus; type DIGITS; blur'."
    )]
    pub digits: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.phonemask/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "lp",
        visible_alias = "list-presets",
        help_heading = "Mask",
        help = "List available presets and exit."
    )]
    pub list_presets: bool,
}
