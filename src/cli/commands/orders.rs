use super::AppContext;
use crate::api::models::{Order, OrderStage};
use crate::cli::ui::with_spinner;
use anyhow::{Result, anyhow};
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct OrdersArgs {
    /// Look up orders for this email instead of the signed-in account
    #[arg(long)]
    pub email: Option<String>,
}

pub async fn orders_command(args: OrdersArgs, ctx: &AppContext) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => ctx
            .session
            .current_user()
            .map(|user| user.email.clone())
            .ok_or_else(|| anyhow!("Sign in or pass --email to see orders"))?,
    };

    let orders = with_spinner("Loading orders...", ctx.client.orders(&email)).await?;
    if orders.is_empty() {
        println!("  {}", format!("No orders for {}", email).bright_yellow());
        return Ok(());
    }

    println!();
    println!("  {} {}", "Orders for".bright_white().bold(), email.bright_yellow());
    for order in &orders {
        print_order(order);
    }
    println!();
    Ok(())
}

fn print_order(order: &Order) {
    let stage = order.stage();
    let badge = match stage {
        OrderStage::Pending => stage.label().bright_yellow(),
        OrderStage::PickUp => stage.label().bright_blue(),
        OrderStage::Completed => stage.label().bright_green(),
        OrderStage::Unknown => stage.label().dimmed(),
    };

    println!(
        "  {} {:<8} {} {}",
        "•".bright_green(),
        format!("#{}", order.id).bright_black(),
        order.product_name.bright_white().bold(),
        format!("[{}]", badge)
    );
    let category = order.category_name.as_deref().unwrap_or_default();
    match order.stage_date() {
        Some(date) => println!("    {} · {} {}", category.dimmed(), stage.title(), date.dimmed()),
        None => println!("    {} · {}", category.dimmed(), stage.title()),
    }
}
