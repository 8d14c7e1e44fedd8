use std::time::Duration;
use tokio_emitter::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("Testing tokio-emitter...\n");

    let emitter = EventEmitter::new();

    emitter.on(
        ERROR,
        Listener::from_fn(|args| {
            println!("⚠️  Error: {}", args[0]);
        }),
    )?;

    emitter.on(
        NEW_LISTENER,
        Listener::from_fn(|args| {
            println!("➕ Listener added for '{}'", args[0]);
        }),
    )?;

    // Exact listeners
    let greeter = emitter.on(
        "greeting",
        Listener::from_fn(|args| {
            println!("📨 Received: {}", args[0]);
        }),
    )?;

    emitter.once(
        "greeting",
        Listener::from_fn(|args| {
            println!("📨 Received once: {}", args[0]);
        }),
    )?;

    // Pattern listeners get the emitted name first
    emitter.on(
        "sensors/+/temperature",
        Listener::from_fn(|args| {
            println!("🌡️  {} = {}", args[0], args[1]);
        }),
    )?;

    // Async listener; its failure comes back as an `error` event
    emitter.on(
        "upload",
        Listener::from_async(|args| {
            let file = args[0].to_string();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(Error::handler(format!("failed to upload {}", file)))
            }
        }),
    )?;

    println!("\nEmitting events...");
    emitter.emit("greeting", &[Arg::from("Hello!")])?;
    emitter.emit("greeting", &[Arg::from("World!")])?;
    emitter.emit("sensors/kitchen/temperature", &[Arg::from("21.5")])?;
    emitter.emit("sensors/attic/humidity", &[Arg::from("40%")])?;
    emitter.emit("upload", &[Arg::from("report.pdf")])?;

    // Wait a bit for the upload to fail
    tokio::time::sleep(Duration::from_millis(100)).await;

    emitter.remove_listener("greeting", &greeter)?;
    println!("\nHandled after removal: {}", emitter.emit("greeting", &[])?);

    println!("\n{}", emitter.stats());
    Ok(())
}
