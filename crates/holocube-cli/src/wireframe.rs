//! 3D wireframe demos
//!
//! The device renders and rotates the meshes itself; these demos only pick
//! meshes and tweak speed, colour and scale over time.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use holocube::prelude::*;
use tracing::warn;

use crate::console::{spawn_line_reader, StopSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Demo {
    /// Primitives, rotation, colour and scale back to back
    #[default]
    All,
    /// Every mesh in turn
    Primitives,
    /// One mesh under different rotation patterns
    Rotation,
    /// Colour cycling on a spinning cube
    Color,
    /// A pulsing diamond
    Scale,
    /// Drive the renderer from the console
    Interactive,
}

/// Neon palette the demos cycle through.
pub const HOLO_COLORS: [Color; 8] = [
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0xff, 0x66, 0x00),
    Color::rgb(0x00, 0xff, 0x88),
    Color::rgb(0xff, 0x00, 0x88),
    Color::rgb(0x88, 0x00, 0xff),
];

/// Rotation patterns: name and per-axis speeds.
pub const PATTERNS: [(&str, [i32; 3]); 4] = [
    ("Slow Y-axis", [0, 1, 0]),
    ("Fast spin", [2, 3, 1]),
    ("Tumble", [2, 1, 2]),
    ("X-axis only", [2, 0, 0]),
];

/// One breathing cycle for the scale demo.
pub const PULSE: [f32; 10] = [0.5, 0.7, 0.9, 1.1, 1.3, 1.5, 1.3, 1.1, 0.9, 0.7];

/// Demo lengths: stand-alone, and as part of `all`.
struct Timing {
    per_primitive: Duration,
    rotation: Duration,
    color: Duration,
    scale: Duration,
}

impl Timing {
    fn solo() -> Self {
        Self {
            per_primitive: Duration::from_secs(5),
            rotation: Duration::from_secs(10),
            color: Duration::from_secs(15),
            scale: Duration::from_secs(10),
        }
    }

    fn in_all() -> Self {
        Self {
            per_primitive: Duration::from_secs(3),
            rotation: Duration::from_secs(8),
            color: Duration::from_secs(10),
            scale: Duration::from_secs(8),
        }
    }
}

/// Split `total` into `parts` equal steps.
fn step(total: Duration, parts: usize) -> Duration {
    total / u32::try_from(parts.max(1)).unwrap_or(u32::MAX)
}

fn report(result: holocube::Result<ApiResponse>, what: &str) {
    if let Err(e) = result {
        warn!(error = %e, "{what} failed");
        println!("{}", format!("{what}: {e}").red());
    }
}

/// `false` once interrupted.
type Running = bool;

async fn primitives(cube: &HoloCube, each: Duration, stop: &mut StopSignal) -> Running {
    println!("{}", "Primitives".cyan().bold());
    for (i, prim) in Primitive3d::ALL.into_iter().enumerate() {
        println!("  {prim}");
        let anim = Animation3d::new(prim)
            .speeds(1, 2, 0)
            .color(HOLO_COLORS[i % HOLO_COLORS.len()])
            .scale(1.2);
        report(cube.animate_3d(&anim).await, "animate");
        if stop.sleep(each).await {
            return false;
        }
    }
    true
}

async fn rotation(cube: &HoloCube, total: Duration, stop: &mut StopSignal) -> Running {
    println!("{}", "Rotation patterns".cyan().bold());
    let each = step(total, PATTERNS.len());
    for (name, [x, y, z]) in PATTERNS {
        println!("  {name}");
        let anim = Animation3d::new(Primitive3d::Icosahedron)
            .speeds(x, y, z)
            .color(Color::CYAN);
        report(cube.animate_3d(&anim).await, "animate");
        if stop.sleep(each).await {
            return false;
        }
    }
    true
}

async fn color_cycle(cube: &HoloCube, total: Duration, stop: &mut StopSignal) -> Running {
    println!("{}", "Colour cycling".cyan().bold());
    let anim = Animation3d::new(Primitive3d::Cube).speeds(1, 2, 0);
    report(cube.animate_3d(&anim).await, "animate");
    let each = step(total, HOLO_COLORS.len());
    for color in HOLO_COLORS {
        report(cube.transform_3d(&Transform3d::color(color)).await, "transform");
        if stop.sleep(each).await {
            return false;
        }
    }
    true
}

async fn pulse(cube: &HoloCube, total: Duration, stop: &mut StopSignal) -> Running {
    println!("{}", "Scale pulse".cyan().bold());
    let anim = Animation3d::new(Primitive3d::Diamond)
        .speeds(0, 2, 1)
        .color(Color::MAGENTA)
        .scale(0.5);
    report(cube.animate_3d(&anim).await, "animate");
    let each = step(total, PULSE.len());
    for scale in PULSE {
        report(cube.transform_3d(&Transform3d::scale(scale)).await, "transform");
        if stop.sleep(each).await {
            return false;
        }
    }
    true
}

async fn all(cube: &HoloCube, stop: &mut StopSignal) -> Running {
    let t = Timing::in_all();
    let pause = Duration::from_secs(1);
    primitives(cube, t.per_primitive, stop).await
        && !stop.sleep(pause).await
        && rotation(cube, t.rotation, stop).await
        && !stop.sleep(pause).await
        && color_cycle(cube, t.color, stop).await
        && !stop.sleep(pause).await
        && pulse(cube, t.scale, stop).await
}

/// A line typed in interactive mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Primitive(Primitive3d),
    Color(Color),
    Scale(f32),
    Rotate([i32; 3]),
    Animate,
    Stop,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{0}")]
    Invalid(String),
    #[error("Unknown command: {0}")]
    Unknown(String),
}

pub fn parse_input(line: &str) -> Result<Option<Input>, InputError> {
    let line = line.trim().to_lowercase();
    let parts: Vec<&str> = line.split_whitespace().collect();
    let invalid = |e: &dyn std::fmt::Display| InputError::Invalid(e.to_string());
    let input = match parts.as_slice() {
        [] => return Ok(None),
        ["q"] => Input::Quit,
        ["a"] => Input::Animate,
        ["x"] => Input::Stop,
        ["p", name] => Input::Primitive(name.parse().map_err(|e| invalid(&e))?),
        ["c", hex] => Input::Color(hex.parse().map_err(|e| invalid(&e))?),
        ["s", value] => {
            let scale: f32 = value.parse().map_err(|e| invalid(&e))?;
            if !scale.is_finite() || scale <= 0.0 {
                return Err(InputError::Invalid(format!("scale must be positive, got {value}")));
            }
            Input::Scale(scale)
        }
        ["r", x, y, z] => Input::Rotate([
            x.parse().map_err(|e| invalid(&e))?,
            y.parse().map_err(|e| invalid(&e))?,
            z.parse().map_err(|e| invalid(&e))?,
        ]),
        _ => return Err(InputError::Unknown(line.clone())),
    };
    Ok(Some(input))
}

const INTERACTIVE_HELP: &str = "\
  p <type>    show a primitive (cube, pyramid, octahedron, diamond, tetrahedron, icosahedron)
  c <hex>     colour, e.g. c #ff00ff
  s <scale>   scale, e.g. s 1.5
  r <x> <y> <z>  rotation speeds for the next 'a'
  a           animate with the current settings
  x           stop the animation
  q           quit";

async fn interactive(cube: &HoloCube, stop: &mut StopSignal) -> Result<()> {
    println!("{}", "Interactive mode".cyan().bold());
    println!("{INTERACTIVE_HELP}");
    let mut lines = spawn_line_reader("wireframe-cmd")?;
    let mut anim = Animation3d::default();

    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            () = stop.wait() => None,
        };
        let Some(line) = line else { break };

        match parse_input(&line) {
            Ok(None) => {}
            Ok(Some(Input::Quit)) => {
                report(cube.stop_3d().await, "stop");
                println!("Goodbye!");
                break;
            }
            Ok(Some(Input::Primitive(p))) => {
                anim.primitive = p;
                report(cube.primitive_3d(p, anim.color, anim.scale).await, "primitive");
            }
            Ok(Some(Input::Color(c))) => {
                anim.color = c;
                report(cube.transform_3d(&Transform3d::color(c)).await, "transform");
            }
            Ok(Some(Input::Scale(s))) => {
                anim.scale = s;
                report(cube.transform_3d(&Transform3d::scale(s)).await, "transform");
            }
            Ok(Some(Input::Rotate([x, y, z]))) => {
                anim = anim.speeds(x, y, z);
                println!("speeds set to {x} {y} {z}; 'a' to apply");
            }
            Ok(Some(Input::Animate)) => report(cube.animate_3d(&anim).await, "animate"),
            Ok(Some(Input::Stop)) => report(cube.stop_3d().await, "stop"),
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }
    Ok(())
}

pub async fn run(cube: &HoloCube, demo: Demo) -> Result<()> {
    cube.wifi_status()
        .await
        .with_context(|| format!("cannot connect to HoloCube at {}", cube.base_url()))?;
    println!("{}", format!("Connected to HoloCube at {}", cube.base_url()).green());

    let mut stop = StopSignal::install();
    let solo = Timing::solo();
    let result = match demo {
        Demo::All => {
            all(cube, &mut stop).await;
            Ok(())
        }
        Demo::Primitives => {
            primitives(cube, solo.per_primitive, &mut stop).await;
            Ok(())
        }
        Demo::Rotation => {
            rotation(cube, solo.rotation, &mut stop).await;
            Ok(())
        }
        Demo::Color => {
            color_cycle(cube, solo.color, &mut stop).await;
            Ok(())
        }
        Demo::Scale => {
            pulse(cube, solo.scale, &mut stop).await;
            Ok(())
        }
        Demo::Interactive => interactive(cube, &mut stop).await,
    };

    // leave the screen free whatever happened above
    report(cube.stop_3d().await, "stop");
    if stop.is_set() {
        println!("{}", "Interrupted".yellow());
    }
    result?;
    println!("{}", "Demo complete".green());
    Ok(())
}
