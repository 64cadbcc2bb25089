use autofmt_core::{MAX_ARGS, check_fragment};

use crate::autofmt::AutofmtConfig;

/// Internal validation, called automatically during `AutofmtConfig::from_str` / `load`.
pub(crate) fn validate(config: &AutofmtConfig) -> anyhow::Result<()> {
    // template.max_args in 1..=MAX_ARGS
    let max_args = config.template.max_args;
    if max_args == 0 || max_args > MAX_ARGS {
        anyhow::bail!("template.max_args must be in 1..={MAX_ARGS}, got {max_args}");
    }

    // each rule fragment holds exactly one implicit slot
    for (type_name, fragment) in &config.template.rules {
        if type_name.trim().is_empty() {
            anyhow::bail!("template.rules: empty type name");
        }
        if let Err(e) = check_fragment(fragment) {
            anyhow::bail!("template.rules.{type_name}: fragment {fragment:?} {e}");
        }
    }

    // logging.level must be non-empty
    if config.logging.level.trim().is_empty() {
        anyhow::bail!("logging.level must not be empty");
    }

    // logging.max_files, when set, keeps at least one file
    if config.logging.max_files == Some(0) {
        anyhow::bail!("logging.max_files must be at least 1");
    }

    Ok(())
}
