//! Browser bindings: drive the choreography machines from
//! `requestAnimationFrame` and paint canvases from `DrawCmd`s.
mod listeners;
mod render;
mod surface;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use catalog::{BUILTIN, DomainId, InMemorySessionStore, SessionError, SessionStore};
use choreography::{
    ChoreographyConfig, IntroGate, IntroPhase, LoaderSnapshot, MotionPreference, ParallaxRig,
    ProgressLoader, ResolvedConfig, ScrollIndicator, SplitLoader, SplitSnapshot,
    pointer_from_viewport,
};
use foundation::math::Vec2;
use foundation::time::Time;
use painter::ParticleField;
use runtime::{FrameClock, Scheduler, Timeline};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

use crate::surface::{PainterKind, Surface};

static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

const INTRO: &str = "intro";
const LOADER: &str = "loader";
const SPLIT: &str = "split";

/// `sessionStorage` when the page has one, otherwise a per-load map.
#[derive(Debug)]
enum SiteSession {
    #[cfg(target_arch = "wasm32")]
    Browser(catalog::BrowserSessionStore),
    Memory(InMemorySessionStore),
}

impl SiteSession {
    #[cfg(target_arch = "wasm32")]
    fn new() -> Self {
        match catalog::BrowserSessionStore::new() {
            Ok(s) => SiteSession::Browser(s),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
                SiteSession::Memory(InMemorySessionStore::new())
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn new() -> Self {
        SiteSession::Memory(InMemorySessionStore::new())
    }
}

impl SessionStore for SiteSession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match self {
            #[cfg(target_arch = "wasm32")]
            SiteSession::Browser(s) => s.get(key),
            SiteSession::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        match self {
            #[cfg(target_arch = "wasm32")]
            SiteSession::Browser(s) => s.set(key, value),
            SiteSession::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<bool, SessionError> {
        match self {
            #[cfg(target_arch = "wasm32")]
            SiteSession::Browser(s) => s.remove(key),
            SiteSession::Memory(s) => s.remove(key),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct LoaderView {
    #[serde(flatten)]
    snapshot: LoaderSnapshot,
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct SplitView {
    #[serde(flatten)]
    snapshot: SplitSnapshot,
    message: Option<String>,
}

struct AppState {
    config: ResolvedConfig,
    motion: MotionPreference,
    frames: FrameClock,
    scheduler: Scheduler,
    gate: Rc<RefCell<IntroGate<SiteSession>>>,
    intro_phase: Rc<Cell<Option<IntroPhase>>>,
    loader_view: Rc<RefCell<Option<LoaderView>>>,
    split_view: Rc<RefCell<Option<SplitView>>>,
    indicator: ScrollIndicator,
    parallax: ParallaxRig,
    surfaces: BTreeMap<String, Surface>,
}

impl AppState {
    fn new(config: ResolvedConfig) -> Self {
        let indicator = ScrollIndicator::new(config.indicator.clone(), config.ranges.clone());
        let parallax = config.parallax.clone();
        Self {
            config,
            motion: MotionPreference::Full,
            frames: FrameClock::new(),
            scheduler: Scheduler::new(),
            gate: Rc::new(RefCell::new(IntroGate::new(SiteSession::new()))),
            intro_phase: Rc::new(Cell::new(None)),
            loader_view: Rc::new(RefCell::new(None)),
            split_view: Rc::new(RefCell::new(None)),
            indicator,
            parallax,
            surfaces: BTreeMap::new(),
        }
    }

    fn start_intro(&mut self, now: Time, on_done: impl FnOnce() + 'static) -> bool {
        let _ = self.scheduler.remove(INTRO);
        let Some(mut intro) = IntroGate::begin(&self.gate, self.config.intro, on_done) else {
            self.intro_phase.set(Some(IntroPhase::Done));
            return false;
        };
        let mirror = Rc::clone(&self.intro_phase);
        intro.subscribe(move |p| mirror.set(Some(*p)));
        intro.start(now);
        self.scheduler.add(INTRO, Box::new(intro));
        true
    }

    fn stop_intro(&mut self) -> bool {
        let stopped = self.scheduler.remove(INTRO).is_some();
        if stopped {
            self.intro_phase.set(None);
        }
        stopped
    }

    fn apply_motion(&mut self) {
        self.indicator.set_motion(self.motion);
        self.parallax.set_motion(self.motion);
    }
}

#[derive(Default)]
struct FrameLoop {
    callback: Option<Closure<dyn FnMut(f64)>>,
    handle: Option<i32>,
    running: bool,
}

thread_local! {
    static STATE: RefCell<Option<AppState>> = const { RefCell::new(None) };
    static LOOP: RefCell<FrameLoop> = RefCell::new(FrameLoop::default());
    // Completion callbacks run after STATE is released so JS may call back in.
    static PENDING: RefCell<Vec<js_sys::Function>> = const { RefCell::new(Vec::new()) };
}

/// Runs `f` against the app state, creating it with default config on first
/// use. Returns `R::default()` during thread teardown.
fn with_app<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
    R: Default,
{
    STATE
        .try_with(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_none() {
                match ChoreographyConfig::default().validate() {
                    Ok(cfg) => *slot = Some(AppState::new(cfg)),
                    Err(e) => {
                        web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
                        return R::default();
                    }
                }
            }
            slot.as_mut().map(f).unwrap_or_default()
        })
        .unwrap_or_default()
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.to_string();
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let raw = serde_json::to_string(value).map_err(js_err)?;
    js_sys::JSON::parse(&raw)
}

fn now() -> Time {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| Time::from_millis_f64(p.now()))
        .unwrap_or(Time::ZERO)
}

fn device_pixel_ratio() -> f64 {
    web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

fn parse_domain(domain: &str) -> Result<DomainId, JsValue> {
    domain.parse::<DomainId>().map_err(js_err)
}

fn queue_callback(f: js_sys::Function) -> impl FnMut() + 'static {
    move || {
        let f = f.clone();
        let _ = PENDING.try_with(|p| p.borrow_mut().push(f));
    }
}

fn run_pending() {
    let pending = PENDING
        .try_with(|p| std::mem::take(&mut *p.borrow_mut()))
        .unwrap_or_default();
    for f in pending {
        if let Err(e) = f.call0(&JsValue::NULL) {
            web_sys::console::error_1(&e);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    Ok(())
}

/// Replaces the tunables. Running machines keep their old timings.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let resolved = ChoreographyConfig::from_json(json)
        .and_then(|c| c.validate())
        .map_err(js_err)?;
    with_app(|s| {
        s.indicator = ScrollIndicator::new(resolved.indicator.clone(), resolved.ranges.clone());
        s.parallax = resolved.parallax.clone();
        s.config = resolved;
        s.apply_motion();
    });
    Ok(())
}

#[wasm_bindgen]
pub fn set_reduced_motion(reduced: bool) {
    with_app(|s| {
        s.motion = MotionPreference::from_reduced_flag(reduced);
        s.apply_motion();
    });
}

#[wasm_bindgen]
pub fn domain_catalog() -> Result<JsValue, JsValue> {
    let raw = BUILTIN.to_json_pretty().map_err(js_err)?;
    js_sys::JSON::parse(&raw)
}

// ---- intro ----

/// Starts the splash unless it already played this session. Returns
/// whether it will play; `on_done` fires when it finishes.
#[wasm_bindgen]
pub fn start_intro(on_done: js_sys::Function) -> bool {
    let at = now();
    with_app(|s| s.start_intro(at, queue_callback(on_done)))
}

#[wasm_bindgen]
pub fn intro_phase() -> Option<String> {
    with_app(|s| s.intro_phase.get().map(|p| p.as_str().to_string()))
}

/// Cancels a running intro; `intro_phase()` reads `None` afterwards.
#[wasm_bindgen]
pub fn stop_intro() -> bool {
    with_app(|s| s.stop_intro())
}

// ---- loaders ----

#[wasm_bindgen]
pub fn start_loader(domain: &str, on_complete: js_sys::Function) -> Result<(), JsValue> {
    let domain = parse_domain(domain)?;
    with_app(|s| {
        let _ = s.scheduler.remove(LOADER);
        let messages = BUILTIN.loader_messages(domain).to_vec();
        let mut loader = ProgressLoader::new(s.config.loader, messages.clone())
            .on_complete(queue_callback(on_complete));
        let view = Rc::clone(&s.loader_view);
        loader.subscribe(move |snap| {
            *view.borrow_mut() = Some(LoaderView {
                snapshot: *snap,
                message: messages.get(snap.message_index).cloned(),
            });
        });
        loader.start(now());
        s.scheduler.add(LOADER, Box::new(loader));
    });
    Ok(())
}

#[wasm_bindgen]
pub fn loader_state() -> Result<JsValue, JsValue> {
    let view = with_app(|s| s.loader_view.borrow().clone());
    to_js(&view)
}

#[wasm_bindgen]
pub fn stop_loader() -> bool {
    with_app(|s| s.scheduler.remove(LOADER).is_some())
}

#[wasm_bindgen]
pub fn start_split_loader(domain: &str, on_complete: js_sys::Function) -> Result<(), JsValue> {
    let domain = parse_domain(domain)?;
    with_app(|s| {
        let _ = s.scheduler.remove(SPLIT);
        let messages = BUILTIN.loader_messages(domain).to_vec();
        let mut split = SplitLoader::new(s.config.split, messages.clone())
            .on_complete(queue_callback(on_complete));
        let view = Rc::clone(&s.split_view);
        split.subscribe(move |snap| {
            *view.borrow_mut() = Some(SplitView {
                snapshot: *snap,
                message: messages.get(snap.message_index).cloned(),
            });
        });
        split.start(now());
        s.scheduler.add(SPLIT, Box::new(split));
    });
    Ok(())
}

#[wasm_bindgen]
pub fn split_state() -> Result<JsValue, JsValue> {
    let view = with_app(|s| s.split_view.borrow().clone());
    to_js(&view)
}

#[wasm_bindgen]
pub fn stop_split_loader() -> bool {
    with_app(|s| s.scheduler.remove(SPLIT).is_some())
}

// ---- scroll ----

/// Feeds a scroll-progress sample and returns the indicator state.
#[wasm_bindgen]
pub fn set_scroll_progress(progress: f64) -> Result<JsValue, JsValue> {
    let state = with_app(|s| Some(s.indicator.update(progress)));
    to_js(&state)
}

#[wasm_bindgen]
pub fn resolve_domain(progress: f64) -> String {
    with_app(|s| s.config.ranges.resolve(progress).as_str().to_string())
}

/// Offsets for each parallax layer given a viewport pointer position.
#[wasm_bindgen]
pub fn parallax_offsets(progress: f64, client_x: f64, client_y: f64) -> Result<JsValue, JsValue> {
    let viewport = web_sys::window()
        .map(|w| {
            let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            Vec2::new(dim(w.inner_width()), dim(w.inner_height()))
        })
        .unwrap_or_default();
    let pointer = pointer_from_viewport(Vec2::new(client_x, client_y), viewport);
    let offsets = with_app(|s| s.parallax.offsets(progress, pointer));
    to_js(&offsets)
}

// ---- particles ----

/// Flat `[x, y, z, ...]` positions `elapsed_s` into the animation.
#[wasm_bindgen]
pub fn particle_positions(domain: &str, reduced_quality: bool, elapsed_s: f64) -> Result<js_sys::Float64Array, JsValue> {
    let field = ParticleField::new(parse_domain(domain)?, reduced_quality);
    let flat: Vec<f64> = field
        .positions_at(elapsed_s)
        .into_iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .collect();
    Ok(js_sys::Float64Array::from(flat.as_slice()))
}

// ---- painters ----

fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{id}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not a canvas")))
}

fn with_surface(id: &str, f: impl FnOnce(&mut Surface) -> Result<(), JsValue>) {
    let result = with_app(|s| s.surfaces.get_mut(id).map(f));
    if let Some(Err(e)) = result {
        web_sys::console::error_1(&e);
    }
}

/// Binds a painter (`glow`, `brush` or `pixel`) to a canvas. Re-attaching
/// an id replaces the previous painter and its listeners.
#[wasm_bindgen]
pub fn attach_painter(canvas_id: &str, kind: &str) -> Result<(), JsValue> {
    let kind = PainterKind::parse(kind)?;
    let canvas = canvas_by_id(canvas_id)?;
    detach_painter(canvas_id);

    let mut surface = Surface::new(canvas.clone(), kind)?;
    surface.sync_size(device_pixel_ratio())?;

    let id = canvas_id.to_string();
    let move_id = id.clone();
    surface.listeners.add(canvas.as_ref(), "mousemove", move |ev| {
        let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
            return;
        };
        let client = Vec2::new(f64::from(ev.client_x()), f64::from(ev.client_y()));
        with_surface(&move_id, |sf| sf.pointer_move(client, now()));
    })?;
    let leave_id = id.clone();
    surface.listeners.add(canvas.as_ref(), "mouseleave", move |_| {
        with_surface(&leave_id, |sf| {
            sf.pointer_leave();
            Ok(())
        });
    })?;
    if let Some(window) = web_sys::window() {
        let resize_id = id.clone();
        surface.listeners.add(window.as_ref(), "resize", move |_| {
            with_surface(&resize_id, |sf| sf.sync_size(device_pixel_ratio()));
        })?;
    }

    with_app(|s| {
        s.surfaces.insert(id, surface);
    });
    Ok(())
}

/// Removes the painter and all of its listeners. Safe to call twice.
#[wasm_bindgen]
pub fn detach_painter(canvas_id: &str) -> bool {
    // Dropping the surface outside the state borrow unregisters listeners.
    let removed = with_app(|s| s.surfaces.remove(canvas_id));
    removed.is_some()
}

#[wasm_bindgen]
pub fn set_painter_domain(canvas_id: &str, domain: &str) -> Result<(), JsValue> {
    let domain = parse_domain(domain)?;
    with_surface(canvas_id, |sf| {
        sf.recolor(domain);
        Ok(())
    });
    Ok(())
}

#[wasm_bindgen]
pub fn painter_live_marks(canvas_id: &str) -> u32 {
    with_app(|s| s.surfaces.get(canvas_id).map(|sf| sf.live_marks() as u32))
        .unwrap_or(0)
}

// ---- frame loop ----

fn frame(host_ms: f64) {
    with_app(|s| {
        let f = s.frames.tick_ms(host_ms);
        s.scheduler.run_frame(f);
        for (id, surface) in s.surfaces.iter_mut() {
            if let Err(e) = surface.paint(f.time) {
                web_sys::console::error_2(&JsValue::from_str(id), &e);
            }
        }
    });
    run_pending();
}

fn request_frame(lp: &mut FrameLoop) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(cb) = lp.callback.as_ref() {
        lp.handle = window.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
    }
}

/// Starts the shared `requestAnimationFrame` loop. Idempotent.
#[wasm_bindgen]
pub fn start_loop() {
    let _ = LOOP.try_with(|cell| {
        let mut lp = cell.borrow_mut();
        if lp.running {
            return;
        }
        lp.running = true;
        if lp.callback.is_none() {
            let cb = Closure::wrap(Box::new(|ts: f64| {
                let _ = LOOP.try_with(|cell| cell.borrow_mut().handle = None);
                frame(ts);
                let _ = LOOP.try_with(|cell| {
                    let mut lp = cell.borrow_mut();
                    // A callback run by `frame` may already have restarted the loop.
                    if lp.running && lp.handle.is_none() {
                        request_frame(&mut lp);
                    }
                });
            }) as Box<dyn FnMut(f64)>);
            lp.callback = Some(cb);
        }
        request_frame(&mut lp);
    });
}

/// Cancels the pending frame. The closure stays allocated for reuse so a
/// frame may stop the loop from inside a callback.
#[wasm_bindgen]
pub fn stop_loop() {
    let _ = LOOP.try_with(|cell| {
        let mut lp = cell.borrow_mut();
        lp.running = false;
        if let (Some(handle), Some(window)) = (lp.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    });
}

/// Stops the loop and every machine, and unregisters every listener.
/// Safe to call repeatedly.
#[wasm_bindgen]
pub fn teardown() {
    stop_loop();
    let surfaces = with_app(|s| {
        s.scheduler.stop_all();
        s.scheduler = Scheduler::new();
        s.frames.reset();
        std::mem::take(&mut s.surfaces)
    });
    drop(surfaces);
    let _ = PENDING.try_with(|p| p.borrow_mut().clear());
}
