//! Santa Drop entry point
//!
//! The browser build starts from `platform::web::start` and is driven by the
//! page's engine. Natively this plays a headless round with an auto-player.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use santa_drop::platform::HeadlessEngine;
    use santa_drop::sim::ItemKind;
    use santa_drop::{Layout, RoundController, RoundEvent, Tuning};

    /// 60 fps frame
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Presents become clickable once they fall past this fraction of the screen
    const CLICK_LINE: f32 = 0.6;
    /// Per-frame chance the auto-player reacts to a clickable present
    const REACTION_CHANCE: f64 = 0.08;

    /// Headless round plus a simple auto-player
    pub struct Demo {
        controller: RoundController<HeadlessEngine>,
        player: Pcg32,
        frames: u64,
    }

    impl Demo {
        pub fn new(seed: u64) -> Self {
            let tuning = Tuning::default();
            let engine = HeadlessEngine::new(tuning.world.clone());
            Self {
                controller: RoundController::new(engine, tuning, Layout::Desktop, seed),
                player: Pcg32::seed_from_u64(seed ^ 0x5A17A),
                frames: 0,
            }
        }

        /// Play until the round ends or `max_frames` pass. Returns the score.
        pub fn run(&mut self, max_frames: u64) -> u64 {
            while self.frames < max_frames && !self.controller.is_game_over() {
                self.frame();
            }
            self.controller.score()
        }

        pub fn frames(&self) -> u64 {
            self.frames
        }

        fn frame(&mut self) {
            self.frames += 1;
            self.controller.update();

            let fires = self.controller.engine_mut().advance_timer(FRAME_MS);
            for _ in 0..fires {
                self.controller.drop_tick();
            }

            let pairs = self.controller.engine_mut().step();
            self.controller.collision_start(&pairs);

            self.auto_click();
            self.report();
        }

        /// Click the lowest present past the line, sometimes
        fn auto_click(&mut self) {
            let line = self.controller.tuning().world.height * CLICK_LINE;
            let target = self
                .controller
                .engine()
                .bodies()
                .filter(|(_, b)| b.kind == ItemKind::Present && b.pos.y >= line)
                .max_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
                .map(|(_, b)| b.pos);

            let Some(pos) = target else {
                return;
            };
            if !self.player.random_bool(REACTION_CHANCE) {
                return;
            }
            // Clicks land on whatever is on top, reindeer included
            if let Some(id) = self.controller.engine().hit_test(pos) {
                self.controller.pointer_down(id);
            }
        }

        fn report(&mut self) {
            for event in self.controller.drain_events() {
                match event {
                    RoundEvent::Dropped { id, kind } => {
                        log::debug!("frame {}: dropped {:?} #{}", self.frames, kind, id)
                    }
                    RoundEvent::Scored { points, total } => {
                        log::info!("frame {}: +{} (score {})", self.frames, points, total)
                    }
                    RoundEvent::DifficultyUp { present_odds } => {
                        log::info!("frame {}: drops now 1 in {}", self.frames, present_odds)
                    }
                    RoundEvent::GameOver { score } => {
                        log::info!("frame {}: game over, score {}", self.frames, score)
                    }
                    RoundEvent::Restarted => {}
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| parse_arg(&s, "seed"))
        .unwrap_or_else(clock_seed);
    let max_frames = args
        .next()
        .and_then(|s| parse_arg(&s, "max_frames"))
        .unwrap_or(60 * 60 * 5);

    log::info!("Santa Drop (headless) starting with seed: {}", seed);
    let mut demo = demo::Demo::new(seed);
    let score = demo.run(max_frames);
    println!("seed {seed}: score {score} after {} frames", demo.frames());
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_arg(raw: &str, name: &str) -> Option<u64> {
    match raw.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Ignoring {name} {raw:?}: {e}");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
