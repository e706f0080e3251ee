use anyhow::Context;

use objview::{AppConfig, ModelList};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let models = ModelList::from_dir(&dir)
        .with_context(|| format!("scanning {dir} for models"))?;
    log::info!("found {} models in {dir}", models.len());

    objview::run(AppConfig::new(), models)?;
    Ok(())
}
