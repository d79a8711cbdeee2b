//! Particle Field entry point
//!
//! On the web the field is mounted behind the page content and lives until
//! `unmount_particle_field()` is called. Natively it runs a headless session
//! and logs a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_field {
    use std::cell::RefCell;

    use particle_field::consts::CANVAS_ELEMENT_ID;
    use particle_field::platform::web::WebHost;
    use particle_field::{FieldSettings, MountedField, RenderBackend, mount};

    thread_local! {
        static FIELD: RefCell<Option<MountedField<WebHost>>> = const { RefCell::new(None) };
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Particle field starting...");

        let settings = FieldSettings::load();
        let mut host = match WebHost::new(CANVAS_ELEMENT_ID, settings.backend) {
            Ok(host) => host,
            Err(e) => {
                log::debug!("No web host: {e:#}");
                return;
            }
        };
        if settings.backend == RenderBackend::WebGpu {
            host.prepare_gpu().await;
        }

        let Some(field) = mount(&mut host, &settings) else {
            return;
        };
        // Replacing an earlier instance unmounts it
        FIELD.with(|slot| *slot.borrow_mut() = Some(field));
    }

    pub fn unmount() {
        let field = FIELD.with(|slot| slot.borrow_mut().take());
        if let Some(field) = field {
            field.unmount();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_field::run().await;
}

/// Tear the ambient layer down; later calls are no-ops
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount_particle_field() {
    wasm_field::unmount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use particle_field::platform::Viewport;
    use particle_field::platform::headless::HeadlessHost;
    use particle_field::{FieldSettings, mount};

    env_logger::init();
    log::info!("Particle field (native) starting...");

    let mut args = std::env::args().skip(1);
    let ticks: u64 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid tick count {arg:?}"))?,
        None => 600,
    };
    let settings = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings from {path}"))?;
            FieldSettings::from_json(&json)?
        }
        None => FieldSettings::load(),
    };

    let viewport = Viewport::new(1280, 720);
    let mut host = HeadlessHost::new(viewport);
    let frames = host.frames();
    let Some(field) = mount(&mut host, &settings) else {
        log::warn!("Headless host offered no surface");
        return Ok(());
    };

    for tick in 0..ticks {
        if tick == ticks / 2 {
            host.resize(Viewport::new(viewport.width / 2, viewport.height / 2));
        }
        frames.pump();
    }

    log::info!(
        "{} ticks, {} particle steps, {} wall reflections, {} links in the last frame",
        field.ticks(),
        field.steps(),
        field.reflections(),
        field.links_last_frame()
    );
    field.unmount();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
