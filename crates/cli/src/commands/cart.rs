//! Cart commands.
//!
//! The cart is stored under the configured data directory and survives
//! between invocations.

use harafish_storefront::cart::{AddOutcome, CartLedger};
use harafish_storefront::checkout::ReservationDesk;
use harafish_storefront::error::StorefrontError;
use harafish_storefront::storage::FileStorage;

use super::{CommandError, Context, parse_id};

fn ledger(ctx: &Context) -> CartLedger<&FileStorage> {
    CartLedger::load(&ctx.storage)
}

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    let cart = ledger(ctx);
    if cart.is_empty() {
        println!("The cart is empty");
        return;
    }
    for entry in cart.entries() {
        println!(
            "{:<22} {} x{} = {} EGP",
            entry.book_id,
            entry.title,
            entry.quantity,
            entry.line_total().display(),
        );
    }
    println!("{} item(s), total {} EGP", cart.item_count(), cart.total().display());
}

/// Add a book by id.
#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, raw_id: &str) -> Result<(), CommandError> {
    let id = parse_id(raw_id)?;
    let book = ctx
        .catalog
        .fetch_book(id.as_str())
        .await?
        .ok_or(StorefrontError::NotFound(id))?;

    let mut cart = ledger(ctx);
    match cart.add(&book)? {
        AddOutcome::Added => println!("Added \"{}\" to the cart", book.title),
        AddOutcome::AlreadyPresent => println!("\"{}\" is already in the cart", book.title),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn remove(ctx: &Context, raw_id: &str) -> Result<(), CommandError> {
    let id = parse_id(raw_id)?;
    if !ledger(ctx).remove(&id) {
        println!("{id} is not in the cart");
    }
    Ok(())
}

pub fn set_quantity(ctx: &Context, raw_id: &str, quantity: i64) -> Result<(), CommandError> {
    let id = parse_id(raw_id)?;
    ledger(ctx).update_quantity(&id, quantity)?;
    Ok(())
}

pub fn clear(ctx: &Context) {
    ledger(ctx).clear();
}

/// Print the WhatsApp reservation link for the whole cart.
#[allow(clippy::print_stdout)]
pub fn checkout(ctx: &Context) -> Result<(), CommandError> {
    let cart = ledger(ctx);
    let desk = ReservationDesk::from_config(&ctx.config);
    println!("{}", desk.cart_link(&cart)?);
    Ok(())
}
