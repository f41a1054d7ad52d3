use anyhow::Result;
use owo_colors::OwoColorize;
use whereabouts_core::config::BoardConfig;
use whereabouts_core::consent::ConsentStore;

pub fn run(config: &BoardConfig) -> Result<()> {
    let config_path = BoardConfig::config_path()?;
    let consent = ConsentStore::open_default()?;

    println!("{}", "Paths".bold());
    println!("  Config:         {}", config_path.display());
    println!("  Notifications:  {}", consent.path().display());

    println!();
    println!("{}", "Settings".bold());
    println!("  Server:    {}", config.server_url);
    println!("  Timezone:  {}", config.timezone);
    println!("  Reconnect: {}", config.reconnect_delay);
    if config.presets.is_empty() {
        println!("  Presets:   {}", "(none)".dimmed());
    } else {
        println!("  Presets:   {}", config.presets.join(", "));
    }
    println!("  Consent:   {}", consent.load());

    Ok(())
}
