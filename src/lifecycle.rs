//! Mount/unmount binding of the particle field
//!
//! `mount` acquires the surface, spawns the store, subscribes to resizes and
//! starts the frame loop. Dropping (or `unmount`ing) the returned handle
//! cancels the loop first and only then releases the resize subscription, so
//! nothing writes to the surface after teardown begins.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::platform::{self, Host, Viewport};
use crate::renderer::{ProximityRenderer, Surface};
use crate::scheduler::{FrameScheduler, SchedulerState};
use crate::settings::FieldSettings;
use crate::sim::{FieldState, Particle, SurfaceState, tick};

/// Simulation plus the surface it draws on
struct Field<S: Surface> {
    state: FieldState,
    renderer: ProximityRenderer,
    surface: S,
    links_last_frame: usize,
    reflections: u64,
}

impl<S: Surface> Field<S> {
    /// One tick: update every particle, then draw
    fn frame(&mut self) {
        let stats = tick(&mut self.state);
        self.reflections += stats.reflections as u64;
        self.links_last_frame =
            self.renderer
                .render(&mut self.surface, self.state.store.as_slice(), &self.state.surface);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.surface.resize(viewport.width, viewport.height);
        self.state
            .resize(viewport.width as f32, viewport.height as f32);
        log::debug!("Field resized to {}x{}", viewport.width, viewport.height);
    }
}

/// A running field. Dropping it unmounts.
pub struct MountedField<H: Host> {
    scheduler: FrameScheduler<H::Frames>,
    field: Rc<RefCell<Field<H::Surface>>>,
    resize: Option<H::Subscription>,
}

/// Bring the field up on `host`.
///
/// Returns `None`, having started nothing, when the host has no drawing
/// surface. Settings that fail validation are replaced by the defaults
/// (keeping the seed and backend).
pub fn mount<H: Host>(host: &mut H, settings: &FieldSettings) -> Option<MountedField<H>> {
    let fallback;
    let settings = match settings.validate() {
        Ok(()) => settings,
        Err(e) => {
            log::warn!("Invalid field settings ({e:#}), using defaults");
            fallback = FieldSettings {
                seed: settings.seed,
                backend: settings.backend,
                ..FieldSettings::default()
            };
            &fallback
        }
    };

    let Some(mut surface) = host.acquire_surface() else {
        log::debug!("Drawing surface unavailable, particle field not mounted");
        return None;
    };

    let viewport = host.viewport();
    surface.resize(viewport.width, viewport.height);

    let seed = settings.seed.unwrap_or_else(platform::clock_seed);
    let state = FieldState::new(
        seed,
        SurfaceState::new(viewport.width as f32, viewport.height as f32),
        &settings.spawn_params(),
    );
    log::info!(
        "Particle field mounted: {} particles, {}x{}, seed {}",
        state.store.len(),
        viewport.width,
        viewport.height,
        seed
    );

    let field = Rc::new(RefCell::new(Field {
        state,
        renderer: ProximityRenderer::from_settings(settings),
        surface,
        links_last_frame: 0,
        reflections: 0,
    }));

    let weak: Weak<RefCell<Field<H::Surface>>> = Rc::downgrade(&field);
    let resize = host.subscribe_resize(Box::new(move |viewport| {
        if let Some(field) = weak.upgrade() {
            field.borrow_mut().resize(viewport);
        }
    }));

    let scheduler = FrameScheduler::new(host.frame_source());
    let weak = Rc::downgrade(&field);
    scheduler.start(move |_timestamp| {
        if let Some(field) = weak.upgrade() {
            field.borrow_mut().frame();
        }
    });

    Some(MountedField {
        scheduler,
        field,
        resize: Some(resize),
    })
}

impl<H: Host> MountedField<H> {
    /// Tear down: no frame runs and no resize is observed after this
    pub fn unmount(self) {
        drop(self);
    }

    /// Completed ticks
    pub fn ticks(&self) -> u64 {
        self.field.borrow().state.time_ticks
    }

    /// Total particle steps taken
    pub fn steps(&self) -> u64 {
        self.field.borrow().state.particle_steps
    }

    pub fn seed(&self) -> u64 {
        self.field.borrow().state.seed
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.field.borrow().state.surface
    }

    pub fn particles(&self) -> Ref<'_, [Particle]> {
        Ref::map(self.field.borrow(), |field| field.state.store.as_slice())
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn links_last_frame(&self) -> usize {
        self.field.borrow().links_last_frame
    }

    /// Wall reflections since mount
    pub fn reflections(&self) -> u64 {
        self.field.borrow().reflections
    }
}

impl<H: Host> Drop for MountedField<H> {
    fn drop(&mut self) {
        self.scheduler.cancel();
        self.resize.take();
        log::info!("Particle field unmounted after {} ticks", self.ticks());
    }
}
