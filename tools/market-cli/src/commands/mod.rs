//! CLI command implementations.

pub mod cart;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product identifier.
    #[arg(long)]
    pub id: String,

    /// Product title.
    #[arg(long)]
    pub title: String,

    /// Product image URL.
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Unit price.
    #[arg(long, value_parser = parse_price)]
    pub price: f64,
}

/// Parse a price, rejecting NaN and infinity.
fn parse_price(raw: &str) -> Result<f64, String> {
    let price: f64 = raw
        .parse()
        .map_err(|e| format!("invalid price '{}': {}", raw, e))?;
    if !price.is_finite() {
        return Err(format!("price must be a finite number, got '{}'", raw));
    }
    Ok(price)
}

/// Arguments for the increment and decrement commands.
#[derive(Args)]
pub struct QuantityArgs {
    /// Product identifier.
    pub id: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// File to create; a `.json` name writes JSON.
        #[arg(long, default_value = "market.toml")]
        file: String,
    },
    /// Print where the configuration and cart data live.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("19.9"), Ok(19.9));
        assert_eq!(parse_price("10"), Ok(10.0));
    }

    #[test]
    fn test_parse_price_rejects_non_finite() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert!(parse_price(raw).is_err(), "{} should be rejected", raw);
        }
        assert!(parse_price("ten").is_err());
    }
}
