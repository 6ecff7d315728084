//! Gallery Ring
//!
//! Entry point for the gallery viewer.

use anyhow::Context;
use gallery_ring::app::GalleryApp;
use gallery_ring::gallery::Collection;
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Gallery starting...");

    let collection = Collection::builtin().context("Invalid built-in collection")?;

    // Create event loop and run application
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = GalleryApp::new(collection);

    event_loop
        .run_app(&mut app)
        .context("Event loop error")?;

    log::info!("Gallery exiting");
    Ok(())
}
