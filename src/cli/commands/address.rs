use super::AppContext;
use crate::api::models::{Address, AddressType, AddressUpdate, Id, NewAddress};
use crate::cli::ui::{prompt_confirmation, prompt_text, select_index, with_spinner};
use crate::validation::validate_address;
use anyhow::{Result, anyhow};
use clap::{Args, Subcommand, ValueEnum};
use colored::*;

#[derive(Args)]
pub struct AddressCommands {
    #[command(subcommand)]
    pub command: AddressSubcommands,
}

#[derive(Subcommand)]
pub enum AddressSubcommands {
    /// List saved addresses
    List,
    /// Save a new address
    Add {
        /// Full address; prompted for when omitted
        address: Option<String>,
        #[arg(short = 't', long = "type", value_enum, default_value_t = Kind::Home)]
        kind: Kind,
        /// Make it the default pickup address
        #[arg(short, long)]
        default: bool,
    },
    /// Change a saved address
    Edit {
        /// Address id
        id: String,
    },
    /// Make an address the default
    Default {
        /// Address id
        id: String,
    },
    /// Delete an address
    Delete {
        /// Address id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Home,
    Work,
    Other,
}

impl From<Kind> for AddressType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Home => AddressType::Home,
            Kind::Work => AddressType::Work,
            Kind::Other => AddressType::Other,
        }
    }
}

pub async fn address_command(args: AddressCommands, ctx: &AppContext) -> Result<()> {
    match args.command {
        AddressSubcommands::List => list(ctx).await,
        AddressSubcommands::Add { address, kind, default } => add(ctx, address, kind.into(), default).await,
        AddressSubcommands::Edit { id } => edit(ctx, &Id::parse(&id)).await,
        AddressSubcommands::Default { id } => {
            let ack = with_spinner("Updating default address...", ctx.client.set_default_address(&Id::parse(&id))).await?;
            done(ack.message.as_deref(), "Default address updated");
            Ok(())
        }
        AddressSubcommands::Delete { id, force } => {
            if !force && !prompt_confirmation(&format!("Delete address {}?", id), false)? {
                return Ok(());
            }
            let ack = with_spinner("Deleting address...", ctx.client.delete_address(&Id::parse(&id))).await?;
            done(ack.message.as_deref(), "Address deleted");
            Ok(())
        }
    }
}

fn done(message: Option<&str>, fallback: &str) {
    println!("  {} {}", "✓".bright_green().bold(), message.unwrap_or(fallback));
}

async fn list(ctx: &AppContext) -> Result<()> {
    let user = ctx.require_user()?;
    let addresses = with_spinner("Loading addresses...", ctx.client.addresses(&user.id)).await?;

    if addresses.is_empty() {
        println!("  {}", "No saved addresses".bright_yellow());
        println!("  {}", "Add one with: resale-cli address add".dimmed());
        return Ok(());
    }

    println!();
    println!("  {}", "Saved addresses".bright_white().bold());
    for address in &addresses {
        print_address(address);
    }
    println!();
    Ok(())
}

fn print_address(address: &Address) {
    let marker = if address.is_default.0 {
        " default".bright_green().bold()
    } else {
        "".normal()
    };
    println!(
        "  {} {:<6} {:<6} {}{}",
        "•".bright_green(),
        address.id.to_string().bright_black(),
        address.address_type.label().bright_blue(),
        address.full_address,
        marker
    );
}

async fn add(ctx: &AppContext, address: Option<String>, address_type: AddressType, is_default: bool) -> Result<()> {
    let user = ctx.require_user()?;
    let address = match address {
        Some(address) => address,
        None => prompt_text("Full address", None)?,
    };
    let full_address = validate_address(&address)?;

    let request = NewAddress {
        userid: user.id.clone(),
        full_address,
        address_type,
        is_default,
    };
    let ack = with_spinner("Saving address...", ctx.client.create_address(&request)).await?;
    done(ack.message.as_deref(), "Address saved");
    Ok(())
}

async fn edit(ctx: &AppContext, id: &Id) -> Result<()> {
    let user = ctx.require_user()?;
    let addresses = with_spinner("Loading addresses...", ctx.client.addresses(&user.id)).await?;
    let existing = addresses
        .iter()
        .find(|a| &a.id == id)
        .ok_or_else(|| anyhow!("No saved address with id {}", id))?;

    let full_address = validate_address(&prompt_text("Full address", Some(existing.full_address.as_str()))?)?;

    let kinds = [AddressType::Home, AddressType::Work, AddressType::Other];
    let labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
    let current = kinds.iter().position(|k| *k == existing.address_type).unwrap_or(0);
    let address_type = kinds[select_index("Type", &labels, current)?];

    let request = AddressUpdate {
        address_id: existing.id.clone(),
        full_address,
        address_type,
        is_default: existing.is_default.0,
    };
    let ack = with_spinner("Saving address...", ctx.client.update_address(&request)).await?;
    done(ack.message.as_deref(), "Address updated");
    Ok(())
}
