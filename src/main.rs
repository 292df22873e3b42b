mod config;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use log::{debug, info};
use snap8_core::{key_for_char, Chip8, Emulator, KEY_COUNT, PIXEL_COUNT};

use crate::config::Config;

/// Runs a CHIP-8 program headless and prints the final screen.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// ROM image to run.
    rom: PathBuf,

    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Number of 60 Hz frames to run.
    #[arg(long, default_value_t = 60)]
    frames: usize,

    /// Keyboard characters to hold down for the whole run, e.g. "qe".
    #[arg(long, default_value = "")]
    hold: String,

    /// Seed for the random number generator, overriding the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Resume from a saved state instead of a fresh machine.
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Write the final machine state here.
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Save the effective configuration back to the config file.
    #[arg(long)]
    write_config: bool,
}

fn held_keys(chars: &str) -> anyhow::Result<[bool; KEY_COUNT]> {
    let mut keys = [false; KEY_COUNT];
    for c in chars.chars() {
        match key_for_char(c) {
            Some(key) => keys[key as usize] = true,
            None => bail!("'{}' is not mapped to a keypad key", c),
        }
    }
    Ok(keys)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    debug!("{:?}", config);
    if args.write_config {
        config.save(&args.config)?;
    }

    let mut chip8 = match config.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };

    chip8
        .load_rom_file(&args.rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;
    if let Some(path) = &args.load_state {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        chip8.set_state(&bytes)?;
        info!("resumed from {}", path.display());
    }
    chip8.set_input(&held_keys(&args.hold)?)?;

    let steps = config.steps_per_frame();
    let mut frame = vec![0; PIXEL_COUNT];
    let mut sound_frames = 0;
    for n in 0..args.frames {
        chip8
            .run_frame(steps, &mut frame)
            .with_context(|| format!("frame {}", n))?;
        if config.sound_enabled && chip8.sound_active() {
            sound_frames += 1;
        }
    }
    info!(
        "ran {} frames at {} steps each, sound on for {}",
        args.frames, steps, sound_frames
    );

    print!("{}", chip8.debug_display());

    if let Some(path) = &args.save_state {
        fs::write(path, chip8.get_state()).with_context(|| format!("writing {}", path.display()))?;
        info!("saved state to {}", path.display());
    }
    Ok(())
}
