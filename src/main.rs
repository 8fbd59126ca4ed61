//! Small Game headless runner
//!
//! Drives the simulation without a canvas: the player chases the target and
//! shoots, and the runner keeps score the way the browser game does.
//!
//! Usage: `small-game [settings.json] [ticks]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Small Game (native) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use glam::Vec2;
    use small_game::Settings;
    use small_game::consts::*;
    use small_game::sim::{EntityKind, GameEvent, GameState, TickInput, tick};

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
        None => Settings::load(),
    };
    let ticks: u32 = match args.next() {
        Some(n) => n.parse()?,
        None => 3600,
    };

    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    log::info!("Seed {}, {} ticks", seed, ticks);

    let mut state = GameState::new(settings, seed)?;
    let mut score: i64 = 0;

    for _ in 0..ticks {
        let direction = match (state.find(EntityKind::Player), state.find(EntityKind::Target)) {
            (Some(player), Some(target)) => {
                let delta = target.body.shape.center() - player.body.shape.center();
                // Dead zone so the player does not jitter around the target axis
                Vec2::new(
                    if delta.x.abs() > 4.0 { delta.x.signum() } else { 0.0 },
                    if delta.y.abs() > 4.0 { delta.y.signum() } else { 0.0 },
                )
            }
            _ => Vec2::ZERO,
        };
        let input = TickInput {
            direction,
            fire: true,
        };
        tick(&mut state, &input, SIM_DT);

        let mut respawn = false;
        for event in state.drain_events() {
            if let GameEvent::Collision {
                source_tag,
                target_tag,
                ..
            } = event
            {
                match (source_tag.as_str(), target_tag.as_str()) {
                    (TAG_PLAYER, TAG_TARGET) => {
                        score += 1;
                        respawn = true;
                    }
                    (TAG_PLAYER, TAG_OBSTACLE) => {
                        score -= 1;
                        respawn = true;
                    }
                    (TAG_BULLET, other) => log::debug!("Bullet hit {}", other),
                    _ => {}
                }
            }
        }

        if respawn {
            log::info!("Score: {}", score);
            state.reset()?;
        }
    }

    println!("Final score after {:.1}s: {}", state.time, score);
    Ok(())
}
