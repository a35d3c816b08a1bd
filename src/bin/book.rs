use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use taxiluxe::booking::{BookingState, HistoryView, PaymentOutcome, RideBookingFlow};
use taxiluxe::client::ApiClient;
use taxiluxe::config::ClientConfig;
use taxiluxe::external::stripe::StripePaymentSheet;

const USAGE: &str = "usage: book <pickup> <dropoff> [extra...] | book history";

fn ask(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }

    matches!(line.trim(), "y" | "Y" | "yes")
}

fn format_amount(amount: i64, currency: &str) -> String {
    format!("{:.2} {}", amount as f64 / 100.0, currency.to_uppercase())
}

async fn print_history(api: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = HistoryView::fetch(api).await?;

    if view.is_empty() {
        println!("no rides yet");
        return Ok(());
    }

    loop {
        for record in view.visible() {
            println!(
                "{}  {}  {}  {}",
                record.created_at.format("%Y-%m-%d %H:%M"),
                record.id,
                format_amount(record.amount, &record.currency),
                record.status
            );
        }

        if !view.has_more() || !ask("show more?") {
            return Ok(());
        }

        view.show_more();
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let config = ClientConfig::from_env()?;
    let api = ApiClient::new(&config.api_url);

    let args: Vec<String> = env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("history") {
        return print_history(&api).await;
    }

    let (pickup, dropoff, extras) = match args.as_slice() {
        [pickup, dropoff, extras @ ..] => (pickup, dropoff, extras),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let sheet = StripePaymentSheet::new(
        &config.stripe_api_base,
        &config.stripe_publishable_key,
        &config.test_payment_method,
        Arc::new(|summary: &str| {
            let prompt = format!("{}?", summary);
            tokio::task::block_in_place(|| ask(&prompt))
        }),
    );

    let mut flow = RideBookingFlow::new(
        Arc::new(api),
        Arc::new(sheet),
        &config.merchant_display_name,
        &config.currency,
    );

    flow.enter_addresses(pickup, dropoff)?;

    let quote = flow.request_quote().await?;
    println!("{:.1} km, {}", quote.distance_km, quote.duration_text);

    for wanted in extras {
        let index = flow
            .extras()
            .iter()
            .position(|extra| extra.label.eq_ignore_ascii_case(wanted));

        match index {
            Some(index) => flow.toggle_extra(index)?,
            None => eprintln!("unknown extra {:?}, ignoring", wanted),
        }
    }

    let amount = flow.confirm_amount()?;
    println!("total: {}", format_amount(amount, flow.currency()));

    match flow.pay().await? {
        PaymentOutcome::Confirmed => println!("payment confirmed, your driver is on the way"),
        PaymentOutcome::UserCanceled => println!("payment canceled"),
        PaymentOutcome::Failed(reason) => println!("payment failed: {}", reason),
    }

    if let BookingState::PaymentFailed(_) = flow.state() {
        std::process::exit(1);
    }

    Ok(())
}
