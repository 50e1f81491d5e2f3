use super::AppContext;
use crate::cli::ui::{prompt_confirmation, prompt_password, prompt_text, require_terminal, with_spinner};
use crate::session::SessionStatus;
use crate::validation::{ProfileForm, SignInForm, SignUpForm, validate_otp};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;

#[derive(Args)]
pub struct AccountCommands {
    #[command(subcommand)]
    pub command: AccountSubcommands,
}

#[derive(Subcommand)]
pub enum AccountSubcommands {
    /// Sign in with email and password
    Login {
        /// Account email; prompted for when omitted
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Sign out and forget the stored profile
    Logout,
    /// Continue as a guest without signing in
    Skip,
    /// Show who is signed in
    Status,
    /// Create an account (confirmed with an emailed code)
    Signup,
    /// Edit your profile
    Profile,
}

pub async fn account_command(args: AccountCommands, ctx: &mut AppContext) -> Result<()> {
    match args.command {
        AccountSubcommands::Login { email } => login(ctx, email).await,
        AccountSubcommands::Logout => logout(ctx).await,
        AccountSubcommands::Skip => {
            ctx.session.skip().await?;
            println!("  {} Continuing as a guest", "✓".bright_green().bold());
            Ok(())
        }
        AccountSubcommands::Status => {
            status(ctx);
            Ok(())
        }
        AccountSubcommands::Signup => signup(ctx).await,
        AccountSubcommands::Profile => profile(ctx).await,
    }
}

fn fail(message: impl std::fmt::Display) {
    println!("  {} {}", "✗".bright_red().bold(), message.to_string().bright_red());
}

async fn login(ctx: &mut AppContext, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_text("Email", None)?,
    };
    let form = SignInForm {
        email,
        password: prompt_password("Password")?,
    };
    let request = match form.validate() {
        Ok(request) => request,
        Err(err) => {
            fail(err);
            return Ok(());
        }
    };

    ctx.session.set_loading(true);
    let result = with_spinner("Signing in...", ctx.client.login(&request.email, &request.password)).await;
    ctx.session.set_loading(false);

    match result {
        Ok(user) => {
            let name = user.display_name();
            ctx.session.login(user).await?;
            println!("  {} Welcome, {}", "✓".bright_green().bold(), name.bright_yellow().bold());
        }
        Err(err) => {
            log::warn!("Login failed: {}", err);
            fail(format!("Login failed: {}", err));
        }
    }
    Ok(())
}

async fn logout(ctx: &mut AppContext) -> Result<()> {
    if ctx.session.session().status() == SessionStatus::SignedIn
        && !prompt_confirmation("Sign out?", false)?
    {
        return Ok(());
    }
    ctx.session.logout().await?;
    println!("  {} Signed out", "✓".bright_green().bold());
    Ok(())
}

fn status(ctx: &AppContext) {
    println!();
    match ctx.session.session().status() {
        SessionStatus::SignedIn => {
            if let Some(user) = ctx.session.current_user() {
                println!("  {} {}", "Signed in as".bright_white(), user.display_name().bright_yellow().bold());
                println!("  {} {}", "Email:".dimmed(), user.email);
                if let Some(phone) = &user.contact_number {
                    println!("  {} {}", "Phone:".dimmed(), phone);
                }
                if let Some(pincode) = &user.pincode {
                    println!("  {} {}", "Pincode:".dimmed(), pincode);
                }
            }
        }
        SessionStatus::Guest => println!("  {}", "Browsing as a guest".bright_yellow()),
        SessionStatus::SignedOut => println!("  {}", "Not signed in".bright_yellow()),
    }
    if let Some(path) = ctx.session.store().location() {
        println!("  {} {}", "Store:".dimmed(), path.display().to_string().dimmed());
    }
    println!();
}

async fn signup(ctx: &mut AppContext) -> Result<()> {
    require_terminal("account signup")?;

    let form = SignUpForm {
        first_name: prompt_text("First name", None)?,
        last_name: prompt_text("Last name", None)?,
        email: prompt_text("Email", None)?,
        phone: prompt_text("Phone number", None)?,
        address: prompt_text("Address", None)?,
        city: prompt_text("City", None)?,
        pincode: prompt_text("Pincode", None)?,
        password: prompt_password("Password")?,
        confirm_password: prompt_password("Confirm password")?,
    };
    let mut user = match form.validate() {
        Ok(user) => user,
        Err(err) => {
            fail(err);
            return Ok(());
        }
    };

    if let Err(err) = with_spinner("Sending verification code...", ctx.client.verify_new_email(&user.email)).await {
        fail(format!("Could not send a code to {}: {}", user.email, err));
        return Ok(());
    }
    println!("  {} A 6-digit code was sent to {}", "✓".bright_green().bold(), user.email.bright_yellow());

    let otp = loop {
        match validate_otp(&prompt_text("Verification code", None)?) {
            Ok(otp) => break otp,
            Err(err) => fail(err),
        }
    };
    user.otp = Some(otp);

    match with_spinner("Creating account...", ctx.client.add_user(&user)).await {
        Ok(ack) => {
            println!(
                "  {} {}",
                "✓".bright_green().bold(),
                ack.message.as_deref().unwrap_or("Account created")
            );
            println!("  {}", "Sign in with 'resale-cli account login'.".dimmed());
        }
        Err(err) => fail(format!("Sign up failed: {}", err)),
    }
    Ok(())
}

async fn profile(ctx: &mut AppContext) -> Result<()> {
    require_terminal("account profile")?;
    let user = ctx.require_user()?.clone();

    let current = ProfileForm::from_profile(&user);
    let form = ProfileForm {
        first_name: prompt_text("First name", Some(current.first_name.as_str()))?,
        last_name: prompt_text("Last name", Some(current.last_name.as_str()))?,
        email: prompt_text("Email", Some(current.email.as_str()))?,
        phone: prompt_text("Phone number", Some(current.phone.as_str()))?,
        pincode: prompt_text("Pincode", Some(current.pincode.as_str()))?,
    };
    let update = match form.validate() {
        Ok(update) => update,
        Err(err) => {
            fail(err);
            return Ok(());
        }
    };

    with_spinner("Saving profile...", ctx.client.update_user(&user.id, &update)).await?;
    ctx.session.update_profile(&update).await?;
    println!("  {} Profile updated", "✓".bright_green().bold());
    Ok(())
}
