pub mod format;

use crate::errors::StoreError;
use crate::storefront::StorefrontService;
use anyhow::Context;
use std::io::{BufRead, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListCatalog,
    SubmitOrder,
    SortCatalog,
    ShowQueue,
    ProcessOrders,
    ShowLedger,
    Recommend,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::ListCatalog),
            "2" => Ok(Self::SubmitOrder),
            "3" => Ok(Self::SortCatalog),
            "4" => Ok(Self::ShowQueue),
            "5" => Ok(Self::ProcessOrders),
            "6" => Ok(Self::ShowLedger),
            "7" => Ok(Self::Recommend),
            "8" => Ok(Self::Exit),
            other => Err(StoreError::UnknownMenuChoice(other.to_string())),
        }
    }
}

/// Any integer parses; integers no bundle can carry are reported as not found.
pub fn parse_bundle_id(raw: &str) -> Result<u32, StoreError> {
    let raw = raw.trim();
    let value = raw
        .parse::<i64>()
        .map_err(|_| StoreError::MalformedBundleId(raw.to_string()))?;
    u32::try_from(value).map_err(|_| StoreError::BundleNotFound(value))
}

/// Interactive menu over any line source and sink.
pub struct Menu<'a, R, W> {
    store: &'a mut StorefrontService,
    store_name: &'a str,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut StorefrontService, store_name: &'a str, input: R, out: W) -> Self {
        Self {
            store,
            store_name,
            input,
            out,
        }
    }

    /// Runs until the exit option or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Choose an option (1-8): ")? else {
                break;
            };

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    tracing::warn!("{}", e);
                    writeln!(self.out, "Invalid choice!")?;
                    continue;
                }
            };

            if !self.dispatch(choice)? {
                break;
            }
        }

        writeln!(self.out, "Thank you for topping up at {} :)", self.store_name)?;
        self.out.flush()?;
        Ok(())
    }

    /// Returns false once the loop should stop.
    fn dispatch(&mut self, choice: MenuChoice) -> anyhow::Result<bool> {
        match choice {
            MenuChoice::ListCatalog => self.print_catalog()?,
            MenuChoice::SubmitOrder => return self.submit_order(),
            MenuChoice::SortCatalog => {
                self.store.sort_catalog();
                writeln!(self.out, "Bundles sorted by price!")?;
                self.print_catalog()?;
            }
            MenuChoice::ShowQueue => self.print_queue()?,
            MenuChoice::ProcessOrders => self.process_orders()?,
            MenuChoice::ShowLedger => self.print_ledger()?,
            MenuChoice::Recommend => return self.recommend(),
            MenuChoice::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn submit_order(&mut self) -> anyhow::Result<bool> {
        let Some(customer_id) = self.prompt("Enter customer ID (9-10 digits): ")? else {
            return Ok(false);
        };
        self.print_catalog()?;
        let Some(raw) = self.prompt("Choose bundle ID: ")? else {
            return Ok(false);
        };

        let result = parse_bundle_id(&raw)
            .and_then(|bundle_id| self.store.submit_order(&customer_id, bundle_id));

        match result {
            Ok(order) => writeln!(
                self.out,
                "Order queued! {} units will be credited to ID {}",
                order.bundle.quantity, order.customer_id
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn recommend(&mut self) -> anyhow::Result<bool> {
        self.print_catalog()?;
        let Some(raw) = self.prompt("Enter a bundle ID to see recommendations: ")? else {
            return Ok(false);
        };

        let bundle_id = match parse_bundle_id(&raw) {
            Ok(id) => id,
            Err(StoreError::BundleNotFound(_)) => {
                writeln!(self.out, "No recommendations for this bundle")?;
                return Ok(true);
            }
            Err(e) => {
                self.report(&e)?;
                return Ok(true);
            }
        };

        let recommendations = self.store.recommend_for(bundle_id);
        if recommendations.is_empty() {
            writeln!(self.out, "No recommendations for this bundle")?;
            return Ok(true);
        }

        writeln!(self.out, "\nSimilar bundles:")?;
        for bundle in recommendations {
            writeln!(
                self.out,
                "- {} units ({})",
                bundle.quantity,
                format::currency(bundle.price)
            )?;
        }
        Ok(true)
    }

    fn process_orders(&mut self) -> anyhow::Result<()> {
        if self.store.queue().is_empty() {
            writeln!(self.out, "No orders to process")?;
            return Ok(());
        }

        let out = &mut self.out;
        let mut write_result = Ok(());
        let processed = self.store.process_orders(|order| {
            if write_result.is_ok() {
                write_result = writeln!(
                    out,
                    "Processing {} units for ID {}",
                    order.bundle.quantity, order.customer_id
                );
            }
        });
        write_result?;

        writeln!(self.out, "\nProcessed {} orders!", processed)?;
        Ok(())
    }

    fn print_menu(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "\n=== Top Up via ID - {} ===", self.store_name)?;
        writeln!(self.out, "1. List bundles")?;
        writeln!(self.out, "2. Top up")?;
        writeln!(self.out, "3. Sort bundles by price")?;
        writeln!(self.out, "4. Show order queue")?;
        writeln!(self.out, "5. Process all orders")?;
        writeln!(self.out, "6. Show purchase history")?;
        writeln!(self.out, "7. Show bundle recommendations")?;
        writeln!(self.out, "8. Exit")?;
        Ok(())
    }

    fn print_catalog(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "\nBundles:")?;
        writeln!(self.out, "ID  | Quantity      | Price")?;
        writeln!(self.out, "{}", "-".repeat(30))?;
        for bundle in self.store.catalog().list_all() {
            writeln!(
                self.out,
                "{:<3} | {:>13} | {}",
                bundle.id,
                bundle.quantity,
                format::currency(bundle.price)
            )?;
        }
        Ok(())
    }

    fn print_queue(&mut self) -> anyhow::Result<()> {
        let queue = self.store.queue();
        if queue.is_empty() {
            writeln!(self.out, "No orders in the queue")?;
            return Ok(());
        }

        writeln!(self.out, "\nOrder queue:")?;
        writeln!(self.out, "Customer ID | Quantity      | Price | Time")?;
        writeln!(self.out, "{}", "-".repeat(60))?;
        for order in queue.iter() {
            writeln!(
                self.out,
                "{} | {:>13} | {} | {}",
                order.customer_id,
                order.bundle.quantity,
                format::currency(order.bundle.price),
                order.submitted_at.format("%H:%M:%S")
            )?;
        }
        Ok(())
    }

    fn print_ledger(&mut self) -> anyhow::Result<()> {
        if self.store.ledger().is_empty() {
            writeln!(self.out, "No purchase history")?;
            return Ok(());
        }

        writeln!(self.out, "\nPurchase history:")?;
        for entry in self.store.ledger().traverse_in_order() {
            writeln!(
                self.out,
                "Customer ID: {}, Total spent: {}",
                entry.customer_id,
                format::currency(entry.total_spent)
            )?;
        }
        Ok(())
    }

    fn report(&mut self, error: &StoreError) -> anyhow::Result<()> {
        writeln!(self.out, "{}", error)?;
        Ok(())
    }

    /// Writes `text`, then reads one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
