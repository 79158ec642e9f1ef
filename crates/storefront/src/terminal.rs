//! Interactive terminal front end.
//!
//! Reads one command per line, runs it to completion, then prints the
//! affected view. Input and output go through a shared [`Console`] so the
//! checkout confirmation can block on the same input stream as the command
//! loop.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use shop_core::{CartItemId, ParseIdError, ProductId};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::notifier::Notifier;
use crate::state::Storefront;
use crate::view::{CartView, ProductListView};

const HELP: &str = "\
Commands:
  products          Show the product list
  cart              Show the cart
  add <productId>   Add one unit of a product to the cart
  remove <itemId>   Remove a line item from the cart
  checkout          Place an order for the cart
  refresh           Reload products and cart
  help              Show this help
  quit              Exit
";

const ORDER_PLACED: &str = "Order placed successfully! Press Enter to continue.";

/// A parsed terminal command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Products,
    Cart,
    Add(ProductId),
    Remove(CartItemId),
    Checkout,
    Refresh,
    Help,
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("'{0}' needs an id")]
    MissingId(&'static str),
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next();

        match name.as_str() {
            "products" | "p" => Ok(Self::Products),
            "cart" | "c" => Ok(Self::Cart),
            "add" | "a" => Ok(Self::Add(
                arg.ok_or(ParseCommandError::MissingId("add"))?.parse()?,
            )),
            "remove" | "rm" => Ok(Self::Remove(
                arg.ok_or(ParseCommandError::MissingId("remove"))?.parse()?,
            )),
            "checkout" => Ok(Self::Checkout),
            "refresh" | "r" => Ok(Self::Refresh),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown(name)),
        }
    }
}

// =============================================================================
// Console
// =============================================================================

/// Line-oriented input and output shared by the command loop and notifier.
#[derive(Debug)]
pub struct Console<R, W> {
    input: tokio::sync::Mutex<R>,
    output: Mutex<W>,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a console over an input reader and output writer.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: tokio::sync::Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Read one line without its terminator. Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying reader.
    pub async fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Write text and flush.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub fn write(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        output.write_all(text.as_bytes())?;
        output.flush()
    }

    /// Consume the console, returning the output writer.
    pub fn into_output(self) -> W {
        self.output
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Notifier that shows the checkout confirmation on the console and waits
/// for the user to press Enter.
#[derive(Debug)]
pub struct ConsoleNotifier<R, W> {
    console: Arc<Console<R, W>>,
}

impl<R, W> ConsoleNotifier<R, W> {
    /// Create a notifier sharing a console with the command loop.
    #[must_use]
    pub const fn new(console: Arc<Console<R, W>>) -> Self {
        Self { console }
    }
}

impl<R, W> Notifier for ConsoleNotifier<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn order_placed(&self) {
        if let Err(e) = self.console.write(&format!("{ORDER_PLACED}\n")) {
            tracing::warn!(error = %e, "Failed to show order confirmation");
            return;
        }
        if let Err(e) = self.console.read_line().await {
            tracing::warn!(error = %e, "Failed to read order confirmation");
        }
    }
}

// =============================================================================
// Command Loop
// =============================================================================

/// Run the command loop until `quit` or end of input.
///
/// The storefront should already hold initial state; the loop starts by
/// printing both views.
///
/// # Errors
///
/// Returns an I/O error if the console cannot be read or written.
pub async fn run<N, R, W>(storefront: &Storefront<N>, console: &Console<R, W>) -> io::Result<()>
where
    N: Notifier,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    show_products(storefront, console).await?;
    show_cart(storefront, console).await?;
    console.write("Type 'help' for commands.\n")?;

    loop {
        console.write("> ")?;
        let Some(line) = console.read_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                console.write(&format!("{e}\n{HELP}"))?;
                continue;
            }
        };

        tracing::debug!(?command, "Running command");

        match command {
            Command::Products => show_products(storefront, console).await?,
            Command::Cart => show_cart(storefront, console).await?,
            Command::Add(product_id) => {
                storefront.add_to_cart(product_id).await;
                show_cart(storefront, console).await?;
            }
            Command::Remove(item_id) => {
                storefront.remove_from_cart(item_id).await;
                show_cart(storefront, console).await?;
            }
            Command::Checkout => {
                storefront.checkout().await;
                show_cart(storefront, console).await?;
            }
            Command::Refresh => {
                storefront.refresh().await;
                show_products(storefront, console).await?;
                show_cart(storefront, console).await?;
            }
            Command::Help => console.write(HELP)?,
            Command::Quit => break,
        }
    }

    Ok(())
}

async fn show_products<N, R, W>(
    storefront: &Storefront<N>,
    console: &Console<R, W>,
) -> io::Result<()>
where
    N: Notifier,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    let products = storefront.products().await;
    console.write(&ProductListView::from(products.as_slice()).to_string())
}

async fn show_cart<N, R, W>(storefront: &Storefront<N>, console: &Console<R, W>) -> io::Result<()>
where
    N: Notifier,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    let (cart, products) = tokio::join!(storefront.cart(), storefront.products());
    console.write(&CartView::new(&cart, &products).to_string())
}
