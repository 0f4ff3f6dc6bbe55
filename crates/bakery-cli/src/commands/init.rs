use anyhow::{bail, Context, Result};
use bakery_core::{Config, Currency, Money};
use dialoguer::{Input, Select};
use std::fs;
use std::path::Path;

#[derive(Debug)]
struct InitConfig {
    shop_name: String,
    currency: Currency,
    history_limit: usize,
    min_amount: Money,
    max_amount: Money,
    tax_rate_percent: u32,
}

pub fn execute(force: bool) -> Result<()> {
    let config_path = Config::config_path();

    if config_path.exists() && !force {
        bail!(
            "configuration already exists: {}\nUse --force to overwrite it.",
            config_path.display()
        );
    }

    if force && config_path.exists() {
        println!("Overwriting the existing configuration.\n");
    }

    println!("Welcome! Let's set up your bakery.\n");

    let config = prompt_configuration()?;
    write_config(&config_path, &config)?;

    println!("\nConfiguration saved: {}", config_path.display());
    println!("Run `bakery shop open` to start taking orders.");

    Ok(())
}

fn prompt_configuration() -> Result<InitConfig> {
    let shop_name: String = Input::new()
        .with_prompt("Shop name")
        .default("Bakery".to_string())
        .interact_text()?;

    let currencies = Currency::all();
    let currency_index = Select::new()
        .with_prompt("Currency")
        .items(&currencies.iter().map(Currency::code).collect::<Vec<_>>())
        .default(0)
        .interact()?;

    let history_limit: usize = Input::new()
        .with_prompt("Sessions shown by `shop history`")
        .default(5)
        .validate_with(|input: &usize| {
            if *input >= 1 && *input <= 100 {
                Ok(())
            } else {
                Err("The limit must be between 1 and 100")
            }
        })
        .interact_text()?;

    let min_amount = prompt_amount("Smallest accepted payment", "1.00")?;
    let max_amount = prompt_amount("Largest accepted payment", "10000.00")?;
    if min_amount > max_amount {
        bail!("the smallest payment cannot exceed the largest");
    }

    let tax_rate_percent: u32 = Input::new()
        .with_prompt("VAT rate (%)")
        .default(19)
        .validate_with(|input: &u32| {
            if *input <= 100 {
                Ok(())
            } else {
                Err("The rate must be between 0 and 100")
            }
        })
        .interact_text()?;

    Ok(InitConfig {
        shop_name,
        currency: currencies[currency_index],
        history_limit,
        min_amount,
        max_amount,
        tax_rate_percent,
    })
}

fn prompt_amount(prompt: &str, default: &str) -> Result<Money> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|input: &String| {
            input
                .parse::<Money>()
                .map(|_| ())
                .map_err(|error| error.to_string())
        })
        .interact_text()?;

    raw.parse::<Money>().context("invalid amount")
}

fn render_config(config: &InitConfig) -> String {
    format!(
        r#"[shop]
name = "{}"
currency = "{}"
history_limit = {}

[payment]
min_amount = {}
max_amount = {}
tax_rate_percent = {}
"#,
        config.shop_name.replace('\\', "\\\\").replace('"', "\\\""),
        config.currency.code(),
        config.history_limit,
        config.min_amount.minor_units(),
        config.max_amount.minor_units(),
        config.tax_rate_percent
    )
}

fn write_config(path: &Path, config: &InitConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("cannot create configuration directory")?;
    }

    fs::write(path, render_config(config)).context("cannot write configuration file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_parses_back() {
        let init = InitConfig {
            shop_name: "Brutăria \"Bunicii\"".to_string(),
            currency: Currency::Eur,
            history_limit: 8,
            min_amount: Money::from_major(2),
            max_amount: Money::from_major(500),
            tax_rate_percent: 9,
        };

        let config: Config = toml::from_str(&render_config(&init)).unwrap();

        assert_eq!(config.shop.name, "Brutăria \"Bunicii\"");
        assert_eq!(config.shop.currency, Currency::Eur);
        assert_eq!(config.shop.history_limit, 8);
        assert_eq!(config.payment.min_amount, Money::from_major(2));
        assert_eq!(config.payment.max_amount, Money::from_major(500));
        assert_eq!(config.payment.tax_rate_percent, 9);
    }
}
