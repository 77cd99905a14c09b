//! Spawn Pool entry point
//!
//! Runs a headless arena session: the player circles the platform, enemies
//! chase it and get knocked off, powerups get picked up. Spawning, reuse and
//! despawning all go through the library.
//!
//! Usage: `spawn-pool [config.json] [seconds]`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec3;

use spawn_pool::consts::*;
use spawn_pool::{
    BelowHeight, Category, SpawnConfig, SpawnCoordinator, SpawnEvent, SpawnTimer,
};

/// Half extent of the physical platform; beyond this there is no floor
const PLATFORM_HALF: f32 = 10.0;
const GRAVITY: f32 = 9.8;
const ENEMY_SPEED: f32 = 2.0;
const CONTACT_RADIUS: f32 = 1.0;
const KNOCKBACK_SPEED: f32 = 25.0;
const PLAYER_ORBIT_RADIUS: f32 = 4.0;

#[derive(Debug, Default)]
struct Tally {
    spawned: [u32; Category::COUNT],
    despawned: [u32; Category::COUNT],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Spawn Pool (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SpawnConfig::load(path)?,
        None => SpawnConfig::default(),
    };
    let seconds: f32 = match args.next() {
        Some(s) => s.parse()?,
        None => 60.0,
    };

    let player = Rc::new(Cell::new(Vec3::new(PLAYER_ORBIT_RADIUS, SPAWN_HEIGHT, 0.0)));
    let mut coord = SpawnCoordinator::new(&config, Rc::clone(&player))?;

    let tally = Rc::new(RefCell::new(Tally::default()));
    let sink = Rc::clone(&tally);
    coord.subscribe(move |event| {
        let mut tally = sink.borrow_mut();
        match event {
            SpawnEvent::Spawned { .. } => tally.spawned[event.category().index()] += 1,
            SpawnEvent::Despawned { .. } => tally.despawned[event.category().index()] += 1,
        }
    });

    let mut timers: Vec<SpawnTimer> = config
        .pools
        .iter()
        .filter_map(|p| p.spawn_interval_secs.map(|secs| SpawnTimer::new(p.category, secs)))
        .collect();

    let fell = BelowHeight {
        threshold: FALL_THRESHOLD,
    };
    let ticks = (seconds / SIM_DT).ceil() as u64;
    let mut skipped = 0u32;

    for tick in 0..ticks {
        let t = tick as f32 * SIM_DT;
        player.set(Vec3::new(
            PLAYER_ORBIT_RADIUS * (t * 0.5).cos(),
            SPAWN_HEIGHT,
            PLAYER_ORBIT_RADIUS * (t * 0.5).sin(),
        ));

        for timer in &mut timers {
            for _ in 0..timer.advance(SIM_DT) {
                if let Err(err) = coord.spawn(timer.category) {
                    if !err.is_recoverable() {
                        return Err(err.into());
                    }
                    skipped += 1;
                }
            }
        }

        step_enemies(&mut coord, player.get());
        collect_powerups(&mut coord, player.get());
        coord.sweep(&fell);
    }

    let tally = tally.borrow();
    for category in coord.categories() {
        let pool = coord.pool(category)?;
        println!(
            "{:<8} spawned {:>4}  despawned {:>4}  active {:>2}/{:<2}",
            category.as_str(),
            tally.spawned[category.index()],
            tally.despawned[category.index()],
            pool.active_count(),
            pool.capacity()
        );
    }
    println!("skipped spawns: {}", skipped);

    Ok(())
}

/// Chase the player, bounce off on contact, fall once past the platform edge
fn step_enemies(coord: &mut SpawnCoordinator<Rc<Cell<Vec3>>>, player: Vec3) {
    let Ok(pool) = coord.pool_mut(Category::Enemy) else {
        return;
    };
    let ids: Vec<_> = pool.iter_active().map(|h| h.id).collect();

    for id in ids {
        let Some(enemy) = pool.get_mut(id) else {
            continue;
        };

        let on_platform = enemy.position.x.abs() <= PLATFORM_HALF
            && enemy.position.z.abs() <= PLATFORM_HALF
            && enemy.position.y >= 0.0;

        if on_platform {
            let mut to_player = player - enemy.position;
            to_player.y = 0.0;
            if to_player.length() < CONTACT_RADIUS {
                enemy.velocity = -to_player.normalize_or_zero() * KNOCKBACK_SPEED;
            } else {
                let chase = to_player.normalize_or_zero() * ENEMY_SPEED;
                enemy.velocity = enemy.velocity.lerp(chase, SIM_DT * 0.5);
            }
        } else {
            enemy.velocity.y -= GRAVITY * SIM_DT;
        }

        enemy.position += enemy.velocity * SIM_DT;
    }
}

/// Powerups vanish when the player touches them
fn collect_powerups(coord: &mut SpawnCoordinator<Rc<Cell<Vec3>>>, player: Vec3) {
    let Ok(positions) = coord.active_positions(Category::Powerup) else {
        return;
    };
    let touched: Vec<_> = positions
        .into_iter()
        .filter(|(_, pos)| (*pos - player).length() < CONTACT_RADIUS)
        .map(|(id, _)| id)
        .collect();

    for id in touched {
        if let Err(err) = coord.release(id) {
            log::warn!("Powerup pickup not released: {}", err);
        }
    }
}
