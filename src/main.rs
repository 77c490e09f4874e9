//! Level viewer with portal placement.
//!
//! ```bash
//! cargo run --release -- levels/demo.json --tiles tiles --scale 2
//! ```
//!
//! * arrows / WASD move, Shift runs
//! * left click on a wall places the red portal, right click the orange one
//! * R removes both portals, Escape quits

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::vec2;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use portal_grid::{
    data::load_level,
    renderer::{Renderer, RendererExt, Software},
    sim::{InputCmd, TicRunner, player_input},
    world::{CELL_SIZE, Hitbox, Level, PortalSlot, TextureBank},
};

const PLAYER_SIZE: f32 = 30.0;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Level description (JSON)
    #[arg(value_name = "FILE")]
    level: PathBuf,

    /// Directory holding `<letter>.png` tile images
    #[arg(long, value_name = "DIR", default_value = "tiles")]
    tiles: PathBuf,

    /// Screen pixels per level unit
    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&opts.log)),
        )
        .init();

    // ─────────── load level & textures ───────
    let mut bank = TextureBank::new();
    let mut level = load_level(&opts.level, &opts.tiles, &mut bank)
        .with_context(|| format!("loading {}", opts.level.display()))?;
    let bounds = level.bounds().context("level has no tiles")?;

    // ─────────── level‑space → screen‑space ────────────
    let scale = opts.scale.max(1) as f32;
    let width = (bounds.size.x * scale).ceil() as usize;
    let height = (bounds.size.y * scale).ceil() as usize;
    let mut renderer = Software::new(bounds.position, scale);

    let mut sim = TicRunner::new();
    let player = sim.spawn_player(find_spawn(&level, &bounds).context("no free cell to spawn in")?);

    let mut win = Window::new(
        &format!("portal_grid – {}", level.name),
        width,
        height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    let mut was_down = [false; 2];

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* --------------- placement requests (edge-triggered) -------------- */
        for (slot, button) in [
            (PortalSlot::Primary, MouseButton::Left),
            (PortalSlot::Secondary, MouseButton::Right),
        ] {
            let down = win.get_mouse_down(button);
            if down && !was_down[slot.index()] {
                if let Some((mx, my)) = win.get_mouse_pos(MouseMode::Discard) {
                    request_portal(&mut level, slot, renderer.to_level(mx, my));
                }
            }
            was_down[slot.index()] = down;
        }
        if win.is_key_pressed(Key::R, KeyRepeat::No) {
            level.clear_portals();
            info!("portals cleared");
        }

        /* --------------- build one InputCmd per frame --------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::Left) || win.is_key_down(Key::A) {
            cmd.right -= 1.0;
        }
        if win.is_key_down(Key::Right) || win.is_key_down(Key::D) {
            cmd.right += 1.0;
        }
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            cmd.down -= 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            cmd.down += 1.0;
        }
        cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);

        player_input(sim.world_mut(), player, cmd);
        sim.pump(&level);

        /* draw */
        renderer.begin_frame(width, height);
        renderer.draw_level(&level, &sim.bodies(), &bank);
        let mut shown = Ok(());
        renderer.end_frame(|fb, w, h| shown = win.update_with_buffer(fb, w, h));
        shown?;
    }
    Ok(())
}

fn request_portal(level: &mut Level, slot: PortalSlot, at: glam::Vec2) {
    let Some(edge) = level.edge_at(at) else {
        return;
    };
    match level.place_portal(slot, edge, at) {
        Ok(anchor) => info!(?slot, %anchor, "portal placed"),
        Err(err) => warn!(%err, "portal rejected"),
    }
}

/// First cell, row by row, where a player box touches no solid.
fn find_spawn(level: &Level, bounds: &Hitbox) -> Option<Hitbox> {
    let inset = (CELL_SIZE - PLAYER_SIZE) / 2.0;
    let cols = (bounds.size.x / CELL_SIZE) as usize;
    let rows = (bounds.size.y / CELL_SIZE) as usize;
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (c, r)))
        .map(|(c, r)| {
            let at = bounds.position + vec2(c as f32, r as f32) * CELL_SIZE + inset;
            Hitbox::new(at, vec2(PLAYER_SIZE, PLAYER_SIZE))
        })
        .find(|hb| !level.solids().any(|s| s.overlaps(hb)))
}
