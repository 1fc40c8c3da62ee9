//! `heartbeat`: a minimal modular input. Each run emits `count` events carrying a
//! sequence number that survives between runs in the checkpoint.

use std::sync::Arc;

use async_trait::async_trait;
use modinput_core::api::{
    Event, Field, FieldKind, InputError, ModularInput, RunContext, Scheme, SchemeError,
    EXIT_CONFIG,
};

struct Heartbeat;

#[async_trait]
impl ModularInput for Heartbeat {
    async fn run(&self, ctx: RunContext<'_>) -> Result<Vec<Event>, InputError> {
        let beat = ctx.checkpoint.get::<u64>("beat").unwrap_or(0) + 1;
        ctx.checkpoint
            .set("beat", beat)
            .map_err(|e| InputError::Failed(e.into()))?;

        let message = ctx.params.get_str("message").unwrap_or("alive");
        let count = ctx.params.get_int("count").unwrap_or(1);
        Ok((0..count)
            .map(|seq| {
                Event::new(format!("beat={beat} seq={seq} message={message}")).with_time(ctx.now)
            })
            .collect())
    }
}

fn scheme() -> Result<Scheme, SchemeError> {
    Scheme::builder("Heartbeat", "Emits a heartbeat event on every run")
        .field(
            Field::new(
                "message",
                "Message",
                "Text carried by each event",
                FieldKind::String,
            )?
            .optional(),
        )
        .field(
            Field::new(
                "count",
                "Count",
                "Events per run",
                FieldKind::Integer {
                    min: Some(1),
                    max: Some(100),
                },
            )?
            .optional(),
        )
        .build()
}

fn main() {
    let scheme = match scheme() {
        Ok(scheme) => scheme,
        Err(e) => {
            eprintln!("heartbeat: {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };
    std::process::exit(modinput_cli::run_main(scheme, Arc::new(Heartbeat)));
}
