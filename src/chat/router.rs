// Answers a classified message.
//
// Availability and price answers come from whatever inventory source the
// router was built with; the other two intents are fixed text.

use crate::chat::classifier::Intent;
use crate::db::CarInventoryRow;
use crate::error::Result;
use std::fmt::Write;
use std::future::Future;

pub const RESERVATION_PROMPT: &str =
    "To make a reservation, please provide: your name, email, desired car, and rental dates.";

pub const HELP_TEXT: &str =
    "I'm here to help you rent a car. You can ask about available cars, prices, or make a reservation.";

/// Where the router looks up cars
pub trait InventorySource: Send + Sync {
    /// Cars currently marked available
    fn available_cars(&self) -> impl Future<Output = Result<Vec<CarInventoryRow>>> + Send;
}

pub struct IntentRouter<S> {
    source: S,
}

impl<S: InventorySource> IntentRouter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Produce the reply text for an intent.
    ///
    /// The message is accepted for future slot extraction; none of the
    /// current intents read it.
    pub async fn route(&self, intent: Intent, _message: &str) -> Result<String> {
        match intent {
            Intent::CheckAvailability => {
                let cars = self.source.available_cars().await?;
                Ok(render_availability(&cars))
            }
            Intent::CheckPrice => {
                let cars = self.source.available_cars().await?;
                Ok(render_prices(&cars))
            }
            Intent::MakeReservation => Ok(RESERVATION_PROMPT.to_string()),
            Intent::Unknown => Ok(HELP_TEXT.to_string()),
        }
    }
}

fn render_availability(cars: &[CarInventoryRow]) -> String {
    let mut out = String::from("Available cars:\n");
    for car in cars {
        let _ = writeln!(out, "{} {} {}", car.year, car.make, car.model);
    }
    out
}

fn render_prices(cars: &[CarInventoryRow]) -> String {
    let mut out = String::from("Rental rates per day:\n");
    for car in cars {
        let _ = writeln!(
            out,
            "{} {}: ${}/day",
            car.make,
            car.model,
            format_price(car.price_per_day)
        );
    }
    out
}

/// Shortest exact decimal, always with a fractional part: 45 -> "45.0"
fn format_price(price: f64) -> String {
    let s = price.to_string();
    if s.contains('.') || !price.is_finite() {
        s
    } else {
        format!("{}.0", s)
    }
}
