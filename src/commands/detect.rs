use crate::cli::DeclarationArgs;
use crate::Config;
use anyhow::Result;

pub fn execute(config: &Config, declaration: &DeclarationArgs) -> Result<()> {
    let detected = config.resolver().detect(&declaration.request())?;

    let version = if detected.spec.is_latest() {
        "(latest)"
    } else {
        detected.spec.version_prefix.as_str()
    };

    println!("engine:  {}", detected.spec.engine);
    println!("version: {version}");
    println!("source:  {}", detected.source);

    Ok(())
}
