//! `sell`: variant choice, condition questionnaire, quote and pickup booking

use super::AppContext;
use super::catalog::print_product;
use crate::api::models::{Id, UserProfile};
use crate::catalog::{ProductDetails, Variant, VariantPicker};
use crate::checkout::{LeadRequest, PaymentMode, PickupAddress, PickupSchedule};
use crate::cli::ui::{prompt_confirmation, prompt_text, require_terminal, select_index, with_spinner};
use crate::questionnaire::{FlowState, Question, QuestionType, QuestionnaireSession, Screen, Step};
use crate::quote::CompletedQuote;
use crate::services::{PricingService, QuestionnaireService};
use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use dialoguer::MultiSelect;

const BACK: &str = "← Back";

#[derive(Args)]
pub struct SellArgs {
    /// Model id, as listed by `catalog models`
    pub model_id: String,
}

pub async fn sell_command(args: SellArgs, ctx: &AppContext) -> Result<()> {
    require_terminal("sell")?;

    let model_id = Id::parse(&args.model_id);
    let product = with_spinner("Loading product...", ctx.client.product_details(&model_id)).await?;
    print_product(&product);

    let Some(variant) = pick_variant(&product)? else {
        println!("  {}", "No variant selected".bright_yellow());
        return Ok(());
    };
    let selection = product.selection(variant);
    println!("  Selling {}", selection.headline().bright_white().bold());

    let mut session = QuestionnaireSession::new(&ctx.client, model_id, selection);
    if !load_questions(&mut session).await? {
        session.dispose();
        return Ok(());
    }

    let Some(quote) = answer_questions(&mut session).await? else {
        println!("  {}", "Quote cancelled".dimmed());
        return Ok(());
    };

    println!();
    println!(
        "  {} {} {}",
        "✓".bright_green().bold(),
        "Your device is worth".bright_white(),
        format!("₹{}", quote.quote.price).bright_green().bold()
    );
    println!();

    match ctx.session.current_user() {
        Some(user) => {
            if prompt_confirmation("Schedule a free pickup?", true)? {
                book_pickup(ctx, user, &quote).await?;
            }
        }
        None => println!(
            "  {}",
            "Sign in with 'resale-cli account login' to schedule a pickup.".dimmed()
        ),
    }
    Ok(())
}

/// RAM then storage; products without those specs pick the variant by name
fn pick_variant(product: &ProductDetails) -> Result<Option<&Variant>> {
    if product.variants.is_empty() {
        bail!("{} has no variants to sell", product.product_name);
    }

    let mut picker = VariantPicker::new(product);
    let rams = picker.ram_options();
    if rams.is_empty() {
        let names: Vec<&str> = product.variants.iter().map(|v| v.variant_name.as_str()).collect();
        let index = select_index("Variant", &names, 0)?;
        return Ok(product.variants.get(index));
    }

    loop {
        let ram = rams[select_index("RAM", &rams, 0)?];
        picker.select_ram(ram);

        let mut storages: Vec<&str> = picker.storage_options();
        storages.push(BACK);
        let choice = select_index("Storage", &storages, 0)?;
        if storages[choice] == BACK {
            continue;
        }
        picker.select_storage(storages[choice]);

        if let Some(variant) = picker.variant() {
            return Ok(Some(variant));
        }
    }
}

/// Fetch the questionnaire, offering a retry on network failures
///
/// Returns false when the user gives up.
async fn load_questions<S>(session: &mut QuestionnaireSession<S>) -> Result<bool>
where
    S: QuestionnaireService + PricingService,
{
    loop {
        match with_spinner("Loading questions...", session.load()).await {
            Ok(()) => return Ok(true),
            Err(err) => {
                println!("  {} {}", "✗".bright_red().bold(), err.to_string().bright_red());
                if !err.is_retryable() || !prompt_confirmation("Try again?", true)? {
                    return Ok(false);
                }
            }
        }
    }
}

enum Navigation {
    Next,
    Back,
}

/// Walk the screens until a quote arrives or the user backs out of the first one
async fn answer_questions<S>(session: &mut QuestionnaireSession<S>) -> Result<Option<CompletedQuote>>
where
    S: QuestionnaireService + PricingService,
{
    loop {
        if let Some(err) = session.controller().last_error() {
            println!("  {} {}", "✗".bright_red().bold(), err.to_string().bright_red());
        }

        let navigation = match session.controller().current_screen().cloned() {
            Some(screen) => answer_screen(session, &screen)?,
            None if matches!(session.state(), FlowState::NoQuestions { .. }) => {
                println!("  {}", "No condition questions for this model.".dimmed());
                navigate(session.controller().last_error().is_some(), true)?
            }
            None => bail!("Questionnaire is not available"),
        };

        let step = match navigation {
            Navigation::Back => session.go_back(),
            Navigation::Next => {
                let pricing = session.controller().is_last_screen();
                let retry = session.controller().last_error().is_some();
                let missing: Vec<String> = session
                    .controller()
                    .missing_required()
                    .iter()
                    .map(|q| q.text.clone())
                    .collect();

                let step = match (pricing, retry) {
                    (true, true) => with_spinner("Calculating your price...", session.submit_for_pricing()).await,
                    (true, false) => with_spinner("Calculating your price...", session.advance()).await,
                    (false, _) => session.advance().await,
                };
                if step == Step::Blocked {
                    println!("  {}", "Please answer all required questions:".bright_yellow());
                    for text in missing {
                        println!("    {} {}", "•".bright_yellow(), text);
                    }
                }
                step
            }
        };

        match step {
            Step::Quoted(_) => return Ok(session.controller().completed().cloned()),
            Step::Exit => return Ok(None),
            Step::Screen(_) | Step::Blocked | Step::PricingFailed(_) | Step::Ignored => {}
        }
    }
}

/// Ask every question on `screen`, then where to go next
fn answer_screen<S>(session: &mut QuestionnaireSession<S>, screen: &Screen) -> Result<Navigation>
where
    S: QuestionnaireService + PricingService,
{
    let controller = session.controller();
    let (current, total) = controller.position().unwrap_or((1, 1));
    let last = controller.is_last_screen();
    let retry = controller.last_error().is_some();

    println!();
    println!(
        "  {} {}",
        format!("{} of {}", current, total).bright_cyan().bold(),
        screen.title.as_deref().unwrap_or_default().bright_white().bold()
    );
    if let Some(description) = &screen.description {
        println!("  {}", description.dimmed());
    }

    for question in &screen.questions {
        if question.options.is_empty() {
            log::warn!("Question {} has no options; not asked", question.id);
            continue;
        }
        match question.kind {
            QuestionType::SingleSelect => ask_single(session, question)?,
            QuestionType::MultiSelect => ask_multiple(session, question)?,
        }
    }

    navigate(retry, last)
}

fn navigate(retry: bool, last: bool) -> Result<Navigation> {
    let next = match (last, retry) {
        (true, true) => "Retry quote",
        (true, false) => "Get quote",
        (false, _) => "Next",
    };
    let choice = select_index("Continue", &[next, BACK], 0)?;
    Ok(if choice == 0 { Navigation::Next } else { Navigation::Back })
}

fn prompt_for(question: &Question) -> String {
    if question.required {
        format!("{} *", question.text)
    } else {
        question.text.clone()
    }
}

fn option_label(name: &str, description: Option<&str>) -> String {
    match description {
        Some(description) => format!("{} - {}", name, description),
        None => name.to_string(),
    }
}

/// What an entry of a single-select menu does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingleChoice {
    Pick(usize),
    Skip,
    Clear,
}

/// Entries shown for a single-select question
///
/// Optional questions end with "Skip" while unanswered (preselected, so Enter records
/// nothing) or "Clear answer" once answered.
#[derive(Debug)]
struct SingleMenu {
    labels: Vec<String>,
    choices: Vec<SingleChoice>,
    default: usize,
}

impl SingleMenu {
    fn for_question(question: &Question, selected: Option<usize>) -> Self {
        let mut labels: Vec<String> = question
            .options
            .iter()
            .map(|o| option_label(&o.name, o.short_description.as_deref()))
            .collect();
        let mut choices: Vec<SingleChoice> = (0..labels.len()).map(SingleChoice::Pick).collect();

        if !question.required {
            let (label, choice) = match selected {
                Some(_) => ("Clear answer", SingleChoice::Clear),
                None => ("Skip", SingleChoice::Skip),
            };
            labels.push(label.to_string());
            choices.push(choice);
        }

        let default = match selected {
            Some(index) => index,
            None if !question.required => choices.len() - 1,
            None => 0,
        };
        Self { labels, choices, default }
    }
}

fn ask_single<S>(session: &mut QuestionnaireSession<S>, question: &Question) -> Result<()>
where
    S: QuestionnaireService + PricingService,
{
    let selected = question
        .options
        .iter()
        .position(|o| session.controller().is_option_selected(&question.id, &o.id));
    let menu = SingleMenu::for_question(question, selected);

    let index = select_index(&prompt_for(question), &menu.labels, menu.default)?;
    match menu.choices[index] {
        SingleChoice::Pick(index) if selected != Some(index) => {
            session.select_option(&question.id, &question.options[index].id);
        }
        SingleChoice::Pick(_) | SingleChoice::Skip => {}
        SingleChoice::Clear => {
            session.clear_answer(&question.id);
        }
    }
    Ok(())
}

fn ask_multiple<S>(session: &mut QuestionnaireSession<S>, question: &Question) -> Result<()>
where
    S: QuestionnaireService + PricingService,
{
    let labels: Vec<String> = question
        .options
        .iter()
        .map(|o| option_label(&o.name, o.short_description.as_deref()))
        .collect();
    let checked: Vec<bool> = question
        .options
        .iter()
        .map(|o| session.controller().is_option_selected(&question.id, &o.id))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt(format!("{} (space to toggle)", prompt_for(question)))
        .items(&labels)
        .defaults(&checked)
        .interact()?;

    // Selecting a multi-select option toggles it
    for (index, option) in question.options.iter().enumerate() {
        if chosen.contains(&index) != checked[index] {
            session.select_option(&question.id, &option.id);
        }
    }
    Ok(())
}

async fn book_pickup(ctx: &AppContext, user: &UserProfile, quote: &CompletedQuote) -> Result<()> {
    let address = pick_address(ctx, user).await?;
    let schedule = prompt_schedule()?;

    let modes: Vec<&str> = PaymentMode::ALL.iter().map(|m| m.label()).collect();
    let payment_mode = PaymentMode::ALL[select_index("Payment mode", &modes, 0)?];

    let lead = LeadRequest::build(Some(user), Some(address), &schedule, payment_mode, quote)?;

    println!();
    println!("  {}", "Pickup summary".bright_white().bold());
    println!("  Device:  {}", quote.selection.headline());
    println!("  Price:   {}", format!("₹{}", quote.quote.price).bright_green());
    println!("  When:    {}", schedule.display());
    println!("  Payment: {}", payment_mode);
    println!();

    if !prompt_confirmation("Confirm pickup?", true)? {
        println!("  {}", "Pickup not booked".dimmed());
        return Ok(());
    }

    let ack = with_spinner("Booking pickup...", ctx.client.submit_lead(&user.id, &lead)).await?;
    println!(
        "  {} {}",
        "✓".bright_green().bold(),
        ack.message.as_deref().unwrap_or("Pickup booked")
    );
    println!("  {}", "Track it with 'resale-cli orders'.".dimmed());
    Ok(())
}

async fn pick_address(ctx: &AppContext, user: &UserProfile) -> Result<PickupAddress> {
    let addresses = with_spinner("Loading addresses...", ctx.client.addresses(&user.id)).await?;

    let mut labels: Vec<String> = addresses
        .iter()
        .map(|a| format!("{}: {}", a.address_type.label(), a.full_address))
        .collect();
    labels.push("Use current location".to_string());
    let default = addresses.iter().position(|a| a.is_default.0).unwrap_or(0);

    let index = select_index("Pickup address", &labels, default)?;
    Ok(match addresses.get(index) {
        Some(address) => PickupAddress::Saved(address.id.clone()),
        None => PickupAddress::CurrentLocation,
    })
}

/// Re-prompts until the date and window are acceptable
fn prompt_schedule() -> Result<PickupSchedule> {
    let today = chrono::Local::now().date_naive();
    let default_date = today.format("%Y-%m-%d").to_string();

    loop {
        let date = prompt_text("Pickup date (YYYY-MM-DD)", Some(default_date.as_str()))?;
        let start = prompt_text("From (HH:MM)", Some("10:00"))?;
        let end = prompt_text("To (HH:MM)", Some("12:00"))?;

        match PickupSchedule::parse(&date, &start, &end, today) {
            Ok(schedule) => return Ok(schedule),
            Err(err) => println!("  {} {}", "✗".bright_red().bold(), err.to_string().bright_red()),
        }
    }
}
