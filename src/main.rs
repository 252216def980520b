//! Tilt Maze headless runner
//!
//! Loads settings and a map, then rolls the ball around under a seeded
//! jittery tilt and logs what happens.
//!
//! Usage: `tilt-maze [--settings FILE] [--map FILE] [--ticks N] [--seed N] [--dump]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tilt Maze (headless) starting...");

    if let Err(e) = headless::run(std::env::args().skip(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host application on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use glam::Vec2;

    use tilt_maze::Settings;
    use tilt_maze::input::{JitterTilt, TiltSource};
    use tilt_maze::sim::{BodyEvent, FixedTimestep, PulseTimer, Session, TickInput, tick};

    struct Args {
        settings: Option<String>,
        map: Option<String>,
        ticks: u32,
        seed: u64,
        dump: bool,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, Box<dyn Error>> {
        let mut parsed = Args {
            settings: None,
            map: None,
            ticks: 1500,
            seed: 1,
            dump: false,
        };
        while let Some(arg) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("missing value for {arg}"));
            match arg.as_str() {
                "--settings" => parsed.settings = Some(value()?),
                "--map" => parsed.map = Some(value()?),
                "--ticks" => parsed.ticks = value()?.parse()?,
                "--seed" => parsed.seed = value()?.parse()?,
                "--dump" => parsed.dump = true,
                other => return Err(format!("unknown argument {other}").into()),
            }
        }
        Ok(parsed)
    }

    pub fn run(args: impl Iterator<Item = String>) -> Result<(), Box<dyn Error>> {
        let args = parse_args(args)?;

        let settings = match &args.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let map_path = args
            .map
            .clone()
            .unwrap_or_else(|| settings.map_file_name.clone());

        let mut session = Session::load(&settings, &map_path, PulseTimer::new())?;
        log::info!(
            "Loaded {} ({}x{}, {} checkpoints)",
            map_path,
            session.field().width(),
            session.field().height(),
            session.list_checkpoints().len()
        );

        if args.dump {
            println!("{}", session.field().render_ascii(10));
        }

        // Slow drift towards the bottom right with some shake on top
        let mut tilt = JitterTilt::new(Vec2::new(1.5, 1.0), 3.0, args.seed);
        let mut clock = FixedTimestep::new(settings.time_step_size);
        let frame_ms = 1000.0 / 60.0;

        let mut ticks_run = 0;
        let mut buzzes = 0;
        while ticks_run < args.ticks {
            for _ in 0..clock.advance(frame_ms) {
                let input = TickInput {
                    tilt: tilt.acceleration(),
                    ..Default::default()
                };
                for event in tick(&mut session, &input) {
                    match event {
                        BodyEvent::Hole => {
                            log::info!("Hole at tick {} (total {})", ticks_run, session.holes())
                        }
                        BodyEvent::CheckpointReached { index } => {
                            let name = session
                                .list_checkpoints()
                                .get(index)
                                .map(|c| c.name().to_string())
                                .unwrap_or_default();
                            log::info!("Checkpoint {} '{}' at tick {}", index, name, ticks_run);
                        }
                    }
                }
                if session.haptic_mut().update(settings.time_step_size) {
                    buzzes += 1;
                }
                ticks_run += 1;
            }
        }

        let reached = session
            .list_checkpoints()
            .iter()
            .filter(|c| c.is_reached())
            .count();
        println!(
            "ticks: {}  holes: {}  checkpoints: {}/{}  haptic pulses: {}  final: ({:.1}, {:.1})",
            ticks_run,
            session.holes(),
            reached,
            session.list_checkpoints().len(),
            buzzes,
            session.position().x,
            session.position().y
        );
        Ok(())
    }
}
