use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use autofmt::{LeafRef, LeafSeq, Spec, builtin_spec, generate, init_tracing, render_ready};
use autofmt_config::{AutofmtConfig, Separator};

#[derive(Parser)]
#[command(name = "autofmt", about = "Log template synthesis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the uniform template for COUNT values
    Uniform {
        #[arg(short = 'n', long)]
        count: usize,
        /// Slot separator (single character)
        #[arg(short, long, default_value_t = Separator::default())]
        sep: Separator,
    },
    /// Print the type-aware template for a list of leaf type names
    Synth {
        /// Leaf type names, e.g. `f32 i32 Point`
        #[arg(required = true)]
        types: Vec<String>,
        /// Slot separator; overrides `template.separator`
        #[arg(short, long)]
        sep: Option<Separator>,
        /// Slot bound; overrides `template.max_args`
        #[arg(long)]
        max_args: Option<usize>,
        /// Path to autofmt.toml config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Log VALUES through the uniform template
    Emit {
        /// Path to autofmt.toml config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = EmitLevel::Info)]
        level: EmitLevel,
        values: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmitLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Uniform { count, sep } => {
            let template = generate(count, sep.as_char()).map_err(|f| anyhow::anyhow!("{f}"))?;
            println!("{template}");
        }
        Commands::Synth {
            types,
            sep,
            max_args,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            println!("{}", synth_template(&config, &types, sep, max_args)?);
        }
        Commands::Emit {
            config,
            level,
            values,
        } => {
            let (config, base_dir) = match config {
                Some(path) => {
                    let config_path = path
                        .canonicalize()
                        .map_err(|e| anyhow::anyhow!("config path '{}': {e}", path.display()))?;
                    let base_dir = config_path
                        .parent()
                        .map(Path::to_path_buf)
                        .ok_or_else(|| anyhow::anyhow!("config path has no parent directory"))?;
                    (AutofmtConfig::load(&config_path)?, base_dir)
                }
                None => (AutofmtConfig::default(), std::env::current_dir()?),
            };
            let _guard = init_tracing(&config.logging, &base_dir)?;
            let message = render_values(&values, config.template.separator)?;
            match level {
                EmitLevel::Trace => tracing::trace!("{message}"),
                EmitLevel::Debug => tracing::debug!("{message}"),
                EmitLevel::Info => tracing::info!("{message}"),
                EmitLevel::Warn => tracing::warn!("{message}"),
                EmitLevel::Error => tracing::error!("{message}"),
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AutofmtConfig> {
    match path {
        Some(path) => AutofmtConfig::load(path),
        None => Ok(AutofmtConfig::default()),
    }
}

/// Template for `types` under the config's rules. Unknown names fall back to
/// the plain placeholder.
fn synth_template(
    config: &AutofmtConfig,
    types: &[String],
    sep: Option<Separator>,
    max_args: Option<usize>,
) -> Result<String> {
    let mut template_config = config.template.clone();
    if let Some(sep) = sep {
        template_config.separator = sep;
    }
    if let Some(max_args) = max_args {
        template_config.max_args = max_args;
    }
    let synth = template_config.synthesizer()?;

    let rules = synth.rules();
    let leaves: LeafSeq<'_> = types
        .iter()
        .map(|name| rules.resolve_name(name, builtin_spec(name).unwrap_or(Spec::Generic)))
        .collect();
    let template = synth
        .synthesize(&leaves, template_config.separator.as_char())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(template.to_string())
}

fn render_values(values: &[String], sep: Separator) -> Result<String> {
    let template = generate(values.len(), sep.as_char()).map_err(|f| anyhow::anyhow!("{f}"))?;
    let leaves: Vec<LeafRef<'_>> = values.iter().map(|v| LeafRef::from(v.as_str())).collect();
    render_ready(&template, &leaves).map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn synth_uses_builtin_rules() {
        let config = AutofmtConfig::default();
        let out = synth_template(&config, &names(&["f32", "i32", "f32", "f32"]), None, None).unwrap();
        assert_eq!(out, "{:.2} {} {:.2} {:.2}");
    }

    #[test]
    fn synth_applies_config_rules_and_overrides() {
        let config: AutofmtConfig = "[template]\nseparator = \"|\"\n[template.rules]\nPoint = \"struct:{}\"\n"
            .parse()
            .unwrap();
        let out = synth_template(&config, &names(&["Point", "u8", "geo::Point"]), None, None).unwrap();
        assert_eq!(out, "struct:{}|{}|struct:{}");

        let sep = Some(",".parse().unwrap());
        let out = synth_template(&config, &names(&["Point", "f64"]), sep, None).unwrap();
        assert_eq!(out, "struct:{},{:.2}");
    }

    #[test]
    fn synth_enforces_bound() {
        let config = AutofmtConfig::default();
        assert!(synth_template(&config, &names(&["u8", "u8", "u8"]), None, Some(2)).is_err());
        let too_many = vec!["u8".to_string(); 21];
        assert!(synth_template(&config, &too_many, None, None).is_err());
    }

    #[test]
    fn render_values_joins_with_separator() {
        let sep = "|".parse().unwrap();
        assert_eq!(render_values(&names(&["a", "b", "c"]), sep).unwrap(), "a|b|c");
        assert_eq!(render_values(&[], sep).unwrap(), "");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["autofmt", "uniform", "--count", "3", "--sep", ","]).unwrap();
        assert!(matches!(cli.command, Commands::Uniform { count: 3, sep } if sep.as_char() == ','));

        let cli = Cli::try_parse_from(["autofmt", "emit", "--level", "warn", "x", "y"]).unwrap();
        assert!(matches!(cli.command, Commands::Emit { level: EmitLevel::Warn, ref values, .. } if values.len() == 2));

        assert!(Cli::try_parse_from(["autofmt", "uniform", "--count", "2", "--sep", "{"]).is_err());
        assert!(Cli::try_parse_from(["autofmt", "synth"]).is_err());
    }
}
