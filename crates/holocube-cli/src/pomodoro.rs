//! Pomodoro timer
//!
//! Work sessions alternate with short breaks, and every `--sessions` work
//! sessions a long break. The status bar tracks water, exercise, focus
//! sessions and supplements; the console accepts commands to update them
//! while the timer runs.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use holocube::prelude::*;
use holocube::screens::{centered, timer_screen};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::assets;
use crate::console::{spawn_line_reader, StopSignal};

/// Task and focus labels are cut to this many characters.
pub const MAX_LABEL_LEN: usize = 20;

const TICK: Duration = Duration::from_secs(1);
const FLASH: Duration = Duration::from_millis(300);
const SPOTIFY_SCRIPT: &str = "spotify.sh";

pub const HELP: &str = "\
Commands:
  w | water          +1 water
  e | ex | exercise  +1 exercise
  f | focus          +1 focus
  p | pill | pills   toggle supplements
  set <water|exercise|focus> <n>
  help | ?           this help
  q | quit | exit    stop the timer";

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Work session length in minutes
    #[arg(long, default_value_t = 25)]
    work: u64,
    /// Short break length in minutes
    #[arg(long, default_value_t = 5)]
    short: u64,
    /// Long break length in minutes
    #[arg(long, default_value_t = 15)]
    long: u64,
    /// Work sessions before a long break
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    sessions: u32,
    /// Task name shown in the terminal
    #[arg(short, long, default_value = "FOCUS")]
    task: String,
    /// Label above the work timer (defaults to the task name)
    #[arg(long)]
    focus_text: Option<String>,
    /// Starting water count
    #[arg(long, default_value_t = 0)]
    water: u32,
    /// Starting exercise count
    #[arg(long, default_value_t = 0)]
    exercise: u32,
    /// Starting focus count
    #[arg(long, default_value_t = 0)]
    focus: u32,
    /// Supplements already taken
    #[arg(long)]
    pills: bool,
    /// Spotify URI to play during work sessions
    #[arg(long, default_value = "")]
    spotify_work: String,
    /// Spotify URI to play during breaks
    #[arg(long, default_value = "")]
    spotify_break: String,
    /// Script invoked as `<script> play <uri>` [default: spotify.sh next to the executable]
    #[arg(long)]
    spotify_script: Option<PathBuf>,
    /// Directory holding the tracker icons
    #[arg(long, env = "HOLOCUBE_ICONS", default_value = assets::DEFAULT_ICON_DIR)]
    icons: PathBuf,
}

/// Cut to [`MAX_LABEL_LEN`] characters and upper-case.
pub fn label_text(s: &str) -> String {
    s.chars().take(MAX_LABEL_LEN).collect::<String>().to_uppercase()
}

/// Label above the work timer: `focus_text` unless missing or empty, else the task.
pub fn focus_label(task: &str, focus_text: Option<&str>) -> String {
    label_text(focus_text.filter(|s| !s.is_empty()).unwrap_or(task))
}

/// `spotify.sh` next to the running executable, or in the working
/// directory when the executable's location is unknown.
pub fn default_spotify_script() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SPOTIFY_SCRIPT)))
        .unwrap_or_else(|| PathBuf::from(SPOTIFY_SCRIPT))
}

/// A console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bump(Tracker),
    Set(Tracker, u32),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("set: value must be a non-negative integer")]
    BadValue,
    #[error("set: key must be water|exercise|focus")]
    BadKey,
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),
}

/// Parse one console line. Blank lines are `Ok(None)`.
///
/// Only the first word selects the command; extra words are ignored.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let lower = line.trim().to_lowercase();
    let mut words = lower.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let cmd = match head {
        "w" | "water" => Command::Bump(Tracker::Water),
        "e" | "ex" | "exercise" => Command::Bump(Tracker::Exercise),
        "f" | "focus" => Command::Bump(Tracker::Focus),
        "p" | "pill" | "pills" => Command::Bump(Tracker::Supplements),
        "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "set" => match (words.next(), words.next()) {
            (Some(key), Some(value)) => {
                let tracker = match key {
                    "water" => Tracker::Water,
                    "exercise" | "ex" => Tracker::Exercise,
                    "focus" => Tracker::Focus,
                    _ => return Err(CommandError::BadKey),
                };
                let value = value.parse().map_err(|_| CommandError::BadValue)?;
                Command::Set(tracker, value)
            }
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        },
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(Some(cmd))
}

impl Command {
    /// Update the counters. Returns `true` if the header needs a redraw.
    pub fn apply(self, counts: &mut TrackerCounts) -> bool {
        match self {
            Command::Bump(tracker) => counts.bump(tracker),
            Command::Set(tracker, value) => counts.set(tracker, value),
            Command::Help | Command::Quit => return false,
        }
        true
    }
}

/// The break after a completed work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Break {
    Short,
    Long,
}

impl Break {
    /// A long break after every `sessions` completed work sessions.
    pub fn after(completed: u32, sessions: u32) -> Self {
        if sessions > 0 && completed % sessions == 0 {
            Break::Long
        } else {
            Break::Short
        }
    }

    fn banner(self) -> &'static str {
        match self {
            Break::Short => "BREAK",
            Break::Long => "LONG BREAK",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Break::Short => "SHORT BREAK",
            Break::Long => "LONG BREAK",
        }
    }

    fn color(self) -> Color {
        match self {
            Break::Short => Color::GREEN,
            Break::Long => Color::BLUE,
        }
    }

    fn flashes(self) -> u32 {
        match self {
            Break::Short => 3,
            Break::Long => 5,
        }
    }
}

/// Whether the app keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Plays playlists through an external script.
#[derive(Debug, Clone)]
pub struct Spotify {
    script: PathBuf,
}

impl Spotify {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Run `<script> play <uri>`. Empty URIs and a missing script are skipped.
    pub fn play(&self, uri: &str) {
        if uri.is_empty() {
            return;
        }
        if !self.script.exists() {
            println!(
                "{}",
                format!("Spotify script not found: {}", self.script.display()).yellow()
            );
            return;
        }
        debug!(script = %self.script.display(), uri, "starting playlist");
        match std::process::Command::new(&self.script).args(["play", uri]).output() {
            Ok(out) if out.status.success() => {}
            Ok(out) => warn!(status = %out.status, "spotify script failed"),
            Err(e) => warn!(error = %e, "cannot run spotify script"),
        }
    }
}

fn minutes(m: u64) -> u64 {
    m.saturating_mul(60)
}

/// Log a failed draw and carry on; the timer must keep ticking.
fn best_effort(result: holocube::Result<ApiResponse>, what: &str) {
    if let Err(e) = result {
        warn!(error = %e, "{what} failed");
    }
}

struct Pomodoro<'a> {
    cube: &'a HoloCube,
    layout: Layout,
    icons: TrackerIcons,
    counts: TrackerCounts,
    task: String,
    focus_text: String,
    work_secs: u64,
    short_secs: u64,
    long_secs: u64,
    sessions: u32,
    spotify_work: String,
    spotify_break: String,
    spotify: Spotify,
    completed: u32,
    commands: UnboundedReceiver<String>,
    stop: StopSignal,
}

impl Pomodoro<'_> {
    fn tracker_bar(&self) -> TrackerBar<'_> {
        TrackerBar::new(&self.icons, self.counts)
            .icon_scale(2)
            .content_inset(8)
            .count_offset_y(-8)
            .x_shift(-4)
            .value_gap(4)
            .border(Some(Color::GRAY))
    }

    /// Clear, header, label and lobster.
    fn full_screen(&self, label: &str, happy: bool) -> Vec<DrawCommand> {
        let mut cmds = vec![DrawCommand::clear(Color::BLACK)];
        self.tracker_bar().render(&self.layout, &mut cmds);

        let body = self.layout.body_rect();
        let style = TextStyle::new().size(2).color(Color::WHITE).cleared(Color::BLACK);
        cmds.push(centered(body.top_left.y + 14, label, style));

        let footer = self.layout.footer_rect();
        Lobster::new(Point::new(self.layout.screen_w / 2, footer.top_left.y + 22))
            .happy(happy)
            .scale(0.85)
            .render(&mut cmds);
        cmds
    }

    async fn draw_header(&self) {
        best_effort(
            self.cube.draw_tracker_bar(&self.layout, &self.tracker_bar()).await,
            "header redraw",
        );
    }

    async fn drain_commands(&mut self) -> Flow {
        while let Ok(line) = self.commands.try_recv() {
            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => return Flow::Stop,
                Ok(Some(Command::Help)) => println!("{HELP}"),
                Ok(Some(cmd)) => {
                    if cmd.apply(&mut self.counts) {
                        info!(?cmd, counts = ?self.counts, "trackers updated");
                        self.draw_header().await;
                    }
                }
                Err(e) => println!("{}", e.to_string().yellow()),
            }
        }
        Flow::Continue
    }

    /// Tick from `seconds` down to zero inclusive.
    async fn countdown(&mut self, seconds: u64, label: &str, color: Color, is_break: bool) -> Flow {
        let body = self.layout.body_rect();
        let view = TimerView::new()
            .colors(color, Color::BLACK)
            .at(body.top_left.y + 52)
            .size(4);

        for (frame, remaining) in (0u32..).zip((0..=seconds).rev()) {
            if self.stop.is_set() {
                return Flow::Stop;
            }
            let mut cmds = if frame == 0 {
                self.full_screen(label, is_break)
            } else if is_break {
                let mut confetti = Vec::new();
                Confetti::new(self.layout.mascot_anchor())
                    .frame(frame)
                    .clear_first(true)
                    .render(&mut confetti);
                confetti
            } else {
                Vec::new()
            };
            cmds.extend(timer_screen(remaining, &view));
            best_effort(self.cube.send_batched(&cmds).await, "timer frame");

            if self.drain_commands().await == Flow::Stop {
                return Flow::Stop;
            }
            if self.stop.sleep(TICK).await {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    async fn flash_alert(&mut self, message: &str, color: Color, times: u32) -> Flow {
        for _ in 0..times {
            best_effort(self.cube.clear(color).await, "flash");
            if self.stop.sleep(FLASH).await {
                return Flow::Stop;
            }
            best_effort(
                self.cube.show_message(&[message], &[Color::WHITE], 3, color).await,
                "flash",
            );
            if self.stop.sleep(FLASH).await {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    async fn run(mut self) -> u32 {
        loop {
            println!(
                "{}",
                format!("Work session {}: {}", self.completed + 1, self.task).red().bold()
            );
            self.spotify.play(&self.spotify_work);
            let label = self.focus_text.clone();
            if self.countdown(self.work_secs, &label, Color::RED, false).await == Flow::Stop {
                break;
            }

            self.completed += 1;
            self.counts.bump(Tracker::Focus);
            println!("Completed {} session(s)", self.completed);
            self.draw_header().await;

            let next = Break::after(self.completed, self.sessions);
            if self.flash_alert(next.banner(), next.color(), next.flashes()).await == Flow::Stop {
                break;
            }
            let secs = match next {
                Break::Short => self.short_secs,
                Break::Long => self.long_secs,
            };
            println!("{}", next.label().to_lowercase().green());
            self.spotify.play(&self.spotify_break);
            if self.countdown(secs, next.label(), next.color(), true).await == Flow::Stop {
                break;
            }
            if self.flash_alert("WORK", Color::RED, 3).await == Flow::Stop {
                break;
            }
        }

        let done = self.completed.to_string();
        best_effort(
            self.cube
                .show_message(
                    &["Done!", &done, "sessions"],
                    &[Color::WHITE, Color::CYAN, Color::WHITE],
                    3,
                    Color::BLACK,
                )
                .await,
            "final screen",
        );
        self.completed
    }
}

pub async fn run(cube: &HoloCube, args: Args) -> Result<()> {
    cube.wifi_status()
        .await
        .with_context(|| format!("cannot connect to HoloCube at {}", cube.base_url()))?;
    println!("{}", format!("Connected to HoloCube at {}", cube.base_url()).green());
    cube.clear(Color::BLACK).await.context("initial clear failed")?;

    let task = label_text(&args.task);
    let focus_text = focus_label(&args.task, args.focus_text.as_deref());
    let spotify_on = !args.spotify_work.is_empty() || !args.spotify_break.is_empty();
    println!(
        "Task: {task} | Work: {}min | Break: {}min | Spotify: {}",
        args.work,
        args.short,
        if spotify_on { "on" } else { "off" }
    );
    println!("{}", "Type 'help' for commands, 'q' or Ctrl-C to stop.".dimmed());

    let app = Pomodoro {
        cube,
        layout: Layout::default(),
        icons: assets::tracker_icons(&args.icons),
        counts: TrackerCounts {
            water: args.water,
            exercise: args.exercise,
            focus: args.focus,
            supplements_done: args.pills,
        },
        task,
        focus_text,
        work_secs: minutes(args.work),
        short_secs: minutes(args.short),
        long_secs: minutes(args.long),
        sessions: args.sessions,
        spotify_work: args.spotify_work,
        spotify_break: args.spotify_break,
        spotify: Spotify::new(args.spotify_script.unwrap_or_else(default_spotify_script)),
        completed: 0,
        commands: spawn_line_reader("pomodoro-cmd")?,
        stop: StopSignal::install(),
    };
    let completed = app.run().await;
    println!("{}", format!("Completed {completed} work session(s)").cyan().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_text_truncates_then_uppercases() {
        assert_eq!(label_text("write report"), "WRITE REPORT");
        assert_eq!(label_text("a very long task name indeed"), "A VERY LONG TASK NAM");
        assert_eq!(label_text(""), "");
    }

    #[test]
    fn test_empty_focus_text_falls_back_to_task() {
        assert_eq!(focus_label("deep work", None), "DEEP WORK");
        assert_eq!(focus_label("deep work", Some("")), "DEEP WORK");
        assert_eq!(focus_label("deep work", Some("essay")), "ESSAY");
    }

    #[test]
    fn test_spotify_script_defaults_next_to_executable() {
        let script = default_spotify_script();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(script.parent(), exe.parent());
        assert!(script.ends_with("spotify.sh"));
    }

    #[test]
    fn test_parse_tracker_shortcuts() {
        for (input, tracker) in [
            ("w", Tracker::Water),
            ("WATER", Tracker::Water),
            ("ex", Tracker::Exercise),
            ("exercise", Tracker::Exercise),
            (" f ", Tracker::Focus),
            ("pills", Tracker::Supplements),
        ] {
            assert_eq!(parse_command(input), Ok(Some(Command::Bump(tracker))), "{input}");
        }
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("?"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
        // trailing words are ignored
        assert_eq!(parse_command("w 2"), Ok(Some(Command::Bump(Tracker::Water))));
        assert_eq!(parse_command("q now"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_command("set ex 12"),
            Ok(Some(Command::Set(Tracker::Exercise, 12)))
        );
        assert_eq!(parse_command("set water lots"), Err(CommandError::BadValue));
        assert_eq!(parse_command("set water -1"), Err(CommandError::BadValue));
        assert_eq!(parse_command("set pills 1"), Err(CommandError::BadKey));
        // missing value is not a set command at all
        assert_eq!(
            parse_command("set water"),
            Err(CommandError::Unknown("set water".to_string()))
        );
        assert_eq!(
            parse_command("dance").unwrap_err().to_string(),
            "Unknown command: dance (try 'help')"
        );
    }

    #[test]
    fn test_commands_update_counts() {
        let mut counts = TrackerCounts::default();
        assert!(Command::Bump(Tracker::Water).apply(&mut counts));
        assert!(Command::Bump(Tracker::Supplements).apply(&mut counts));
        assert!(Command::Set(Tracker::Focus, 7).apply(&mut counts));
        assert!(!Command::Help.apply(&mut counts));
        assert_eq!(
            counts,
            TrackerCounts {
                water: 1,
                exercise: 0,
                focus: 7,
                supplements_done: true,
            }
        );
        Command::Bump(Tracker::Supplements).apply(&mut counts);
        assert!(!counts.supplements_done);
    }

    #[test]
    fn test_long_break_every_n_sessions() {
        let breaks: Vec<Break> = (1..=8).map(|n| Break::after(n, 4)).collect();
        assert_eq!(breaks[0], Break::Short);
        assert_eq!(breaks[3], Break::Long);
        assert_eq!(breaks[7], Break::Long);
        assert_eq!(breaks.iter().filter(|b| **b == Break::Long).count(), 2);
        assert_eq!(Break::after(1, 1), Break::Long);
        assert_eq!(Break::Long.flashes(), 5);
        assert_eq!(Break::Short.color(), Color::GREEN);
    }

    #[test]
    fn test_spotify_skips_missing_script() {
        // neither call may spawn anything or panic
        Spotify::new("/nonexistent/spotify.sh").play("spotify:playlist:x");
        Spotify::new("/nonexistent/spotify.sh").play("");
    }
}
