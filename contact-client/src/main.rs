use contact_client::{ContactApi, Field, FormController, HttpContactApi, Phase, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use std::{
    env,
    error::Error,
    io::{self, Write},
};

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, label: &str) -> Result<String, Box<dyn Error>> {
    print!("{label}: ");
    io::stdout().flush()?;
    Ok(input.next_line().await?.ok_or("input closed")?)
}

/// Asks for a field until it passes validation. Moving on from a field is the
/// terminal's version of the field losing focus.
async fn fill_field(
    controller: &FormController<impl ContactApi>,
    input: &mut Input,
    field: Field,
    label: &str,
) -> Result<(), Box<dyn Error>> {
    loop {
        let value = prompt(input, label).await?;
        controller.edit(field, value);
        match controller.blur(field) {
            Some(e) => println!("  ! {e}"),
            None => return Ok(()),
        }
    }
}

const FIELDS: [(Field, &str); 3] = [
    (Field::Name, "Name (optional)"),
    (Field::Email, "Email"),
    (Field::Message, "Message"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let addr =
        env::var("CONTACT_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8001".to_string());
    let api = HttpContactApi::new(&addr)?;
    println!("Contact form, sending to {}\n", api.endpoint());

    let controller = FormController::new(api);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    for (field, label) in FIELDS {
        fill_field(&controller, &mut input, field, label).await?;
    }

    loop {
        println!("\nSending...");
        match controller.submit().await {
            SubmitOutcome::Sent => {
                println!("\nMessage Sent Successfully!");
                println!("Thank you for reaching out. I'll get back to you as soon as possible.");

                let mut state = controller.subscribe();
                state.wait_for(|s| s.phase() != Phase::Success).await?;
                return Ok(());
            }
            SubmitOutcome::Failed(notice) => {
                println!("\n{notice}");
                controller.acknowledge_notice();

                let answer = prompt(&mut input, "Try again? [y/N]").await?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    return Ok(());
                }
            }
            SubmitOutcome::Invalid => {
                let errors = controller.snapshot().errors;
                for (field, label) in FIELDS {
                    if let Some(e) = errors.get(field) {
                        println!("  ! {e}");
                        fill_field(&controller, &mut input, field, label).await?;
                    }
                }
            }
            SubmitOutcome::Busy => {
                let mut state = controller.subscribe();
                state.wait_for(|s| !s.submitting).await?;
            }
        }
    }
}
