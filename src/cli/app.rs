use super::commands::account::AccountCommands;
use super::commands::address::AddressCommands;
use super::commands::catalog::CatalogCommands;
use super::commands::config::ConfigCommands;
use super::commands::orders::OrdersArgs;
use super::commands::sell::SellArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "resale-cli")]
#[command(about = "Get a price for a used device and book its pickup")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse categories, brands, models and variants
    Catalog(CatalogCommands),
    /// Answer the condition questionnaire for a model and get a quote
    Sell(SellArgs),
    /// Sign in, sign up and manage your profile
    Account(AccountCommands),
    /// Manage saved pickup addresses
    Address(AddressCommands),
    /// Show your sale orders
    Orders(OrdersArgs),
    /// Inspect the configuration
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::account::AccountSubcommands;
    use crate::cli::commands::catalog::CatalogSubcommands;
    use clap::CommandFactory;

    #[test]
    fn test_command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_models_with_search() {
        let cli = Cli::try_parse_from(["resale-cli", "catalog", "models", "3", "1", "--search", "galaxy"]).unwrap();
        match cli.command {
            Commands::Catalog(CatalogCommands {
                command: CatalogSubcommands::Models { brand, category, search },
            }) => {
                assert_eq!(brand, "3");
                assert_eq!(category, "1");
                assert_eq!(search.as_deref(), Some("galaxy"));
            }
            _ => panic!("expected catalog models"),
        }
    }

    #[test]
    fn test_parse_account_and_sell() {
        let cli = Cli::try_parse_from(["resale-cli", "account", "login", "--email", "a@b.co"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Account(AccountCommands { command: AccountSubcommands::Login { email: Some(_) } })
        ));

        let cli = Cli::try_parse_from(["resale-cli", "sell", "101"]).unwrap();
        assert!(matches!(cli.command, Commands::Sell(SellArgs { ref model_id }) if model_id == "101"));

        assert!(Cli::try_parse_from(["resale-cli", "sell"]).is_err());
    }
}
