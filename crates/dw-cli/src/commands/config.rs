use std::path::Path;

pub fn run(config: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(config)?.sanitized();
    println!("{}", super::to_json(&config)?);
    Ok(())
}
