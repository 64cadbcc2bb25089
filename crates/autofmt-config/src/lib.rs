pub mod autofmt;
pub mod logging;
pub mod template;
pub mod types;
mod validate;

pub use autofmt::AutofmtConfig;
pub use logging::{LogFormat, LoggingConfig, Rotation};
pub use template::TemplateConfig;
pub use types::Separator;
