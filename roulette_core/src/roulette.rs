use crate::{
    clock::Clock,
    config::RouletteConfig,
    engine::{SpinEngine, SpinListener, SpinOutcome, SpinTrigger},
    error::RouletteResult,
    history::{HistoryEntry, HistoryStore},
    items::WheelItems,
    palette::{Hsl, PaletteGenerator},
    rng::RandomSource,
    scheduler::{FrameScheduler, FrameToken},
};
use tracing::debug;

/// A wheel session: items, their colors, the spin engine, and the result
/// log, kept consistent with each other.
///
/// The palette is derived state. It is regenerated when the number of items
/// changes and left alone otherwise.
pub struct Roulette<C: Clock, S: FrameScheduler, R: RandomSource> {
    items: WheelItems,
    palette: Vec<Hsl>,
    generator: PaletteGenerator,
    palette_rng: R,
    engine: SpinEngine<C, S, R>,
    history: HistoryStore,
}

impl<C: Clock, S: FrameScheduler, R: RandomSource> Roulette<C, S, R> {
    /// `spin_rng` feeds durations and offsets, `palette_rng` feeds colors.
    /// Keeping them apart means recoloring never shifts spin results.
    pub fn new(
        items: WheelItems,
        config: RouletteConfig,
        clock: C,
        scheduler: S,
        spin_rng: R,
        mut palette_rng: R,
    ) -> Self {
        let generator = PaletteGenerator::new(config.palette);
        let palette = generator.generate(items.len(), &mut palette_rng);
        Self {
            items,
            palette,
            generator,
            palette_rng,
            engine: SpinEngine::new(clock, scheduler, spin_rng, config.spin),
            history: HistoryStore::with_capacity(config.history.capacity),
        }
    }

    /// Replaces the items. The palette is regenerated only if the count
    /// changed. Ignored while a spin is running, since the running episode
    /// resolves against the count it started with.
    pub fn set_items(&mut self, items: WheelItems) -> bool {
        if self.engine.is_spinning() {
            debug!("items changed mid-spin, ignoring");
            return false;
        }
        if items.len() != self.items.len() {
            self.palette = self.generator.generate(items.len(), &mut self.palette_rng);
        }
        self.items = items;
        true
    }

    pub fn spin(&mut self) -> RouletteResult<SpinTrigger> {
        self.engine.spin(self.items.len())
    }

    /// Forwards a frame to the engine and records the winner when the spin
    /// settles.
    pub fn on_frame(&mut self, token: FrameToken) -> Option<(SpinOutcome, &HistoryEntry)> {
        let outcome = self.engine.on_frame(token)?;
        let item = self.items[outcome.index].clone();
        Some((outcome, self.history.push(item)))
    }

    pub fn subscribe(&mut self, listener: impl SpinListener + 'static) {
        self.engine.subscribe(listener);
    }

    pub fn teardown(&mut self) {
        self.engine.teardown();
    }

    pub fn items(&self) -> &WheelItems {
        &self.items
    }

    pub fn palette(&self) -> &[Hsl] {
        &self.palette
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn rotation(&self) -> f64 {
        self.engine.rotation()
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    /// Wedge currently under the pointer.
    pub fn index_under_pointer(&self) -> usize {
        crate::resolver::resolve(self.rotation(), self.items.len()).unwrap_or(0)
    }

    pub fn item_under_pointer(&self) -> &str {
        &self.items[self.index_under_pointer()]
    }

    pub fn engine(&self) -> &SpinEngine<C, S, R> {
        &self.engine
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.engine.scheduler_mut()
    }
}
