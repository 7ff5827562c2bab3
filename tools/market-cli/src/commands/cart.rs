//! Cart commands.

use anyhow::{Context as _, Result};
use market_cart::{CartStore, Product, ProductId};

use super::{AddArgs, QuantityArgs};
use crate::context::Context;
use crate::output::phase_badge;

/// Show the cart.
pub async fn list(ctx: &Context) -> Result<()> {
    let store = ctx.open_cart().await?;

    ctx.output.header("Cart");
    if ctx.output.is_verbose() {
        ctx.output.kv("key", &store.config().storage_key);
        ctx.output.kv("status", &phase_badge(&store.phase()));
    }
    ctx.output.cart(&store.products());

    finish(store).await
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_cart().await?;
    let product = Product::new(args.id, args.title, args.image_url, args.price);
    let id = product.id.clone();

    if store.add_to_cart(product) {
        ctx.output.success(&format!("Added {}", id));
    } else {
        ctx.output.warn(&format!("Quantity of {} is already at its maximum", id));
    }
    ctx.output.cart(&store.products());

    finish(store).await
}

/// Add one unit of a product already in the cart.
pub async fn increment(args: QuantityArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_cart().await?;
    let id = ProductId::new(args.id);

    if store.increment(&id) {
        let quantity = store.products().get(&id).map_or(0, |i| i.quantity);
        ctx.output.success(&format!("{} x{}", id, quantity));
    } else {
        ctx.output.warn(&format!("{} is not in the cart", id));
    }
    ctx.output.cart(&store.products());

    finish(store).await
}

/// Remove one unit of a product.
pub async fn decrement(args: QuantityArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_cart().await?;
    let id = ProductId::new(args.id);

    if store.decrement(&id) {
        match store.products().get(&id) {
            Some(item) => ctx.output.success(&format!("{} x{}", id, item.quantity)),
            None => ctx.output.success(&format!("Removed {}", id)),
        }
    } else {
        ctx.output.warn(&format!("{} is not in the cart", id));
    }
    ctx.output.cart(&store.products());

    finish(store).await
}

async fn finish(store: CartStore) -> Result<()> {
    store.shutdown().await.context("Failed to save cart")
}
