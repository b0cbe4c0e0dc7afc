use crate::canvas::BrailleCanvas;
use crate::config::{GrowConfig, PrintConfig, SvgConfig};
use crate::engine::GrowthEngine;
use crate::help::show_help_modal;
use crate::noise::JitterNoise;
use crate::scheduler::{Clock, GrowthScheduler, InteractionHooks, Phase, SystemClock};
use crate::svg::SvgCanvas;
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use std::io;
use std::time::Duration;

const HELP: &str = "\
FERN
─────────────────
space  Grow one generation
q/Esc  Quit
?      Close help";

fn pick_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    })
}

/// The "clickable" affordance: the scheduler flips it, the status line
/// reflects it.
#[derive(Default)]
struct StatusLine {
    armed: bool,
}

impl InteractionHooks for StatusLine {
    fn enable_interaction(&mut self) {
        self.armed = true;
    }

    fn disable_interaction(&mut self) {
        self.armed = false;
    }
}

/// Run an interactive growth session: one generation per spacebar press,
/// gated by the scheduler's cooldown and generation cap.
pub fn run_grow(config: GrowConfig) -> io::Result<()> {
    let seed = pick_seed(config.seed);
    let mut noise = JitterNoise::seeded(seed);

    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let (width, height) = term.size();
    // Bottom row is the status line; the figure grows on the rest.
    let canvas_rows = height.saturating_sub(1);
    let mut canvas = BrailleCanvas::new(width, canvas_rows);
    let mut engine = GrowthEngine::seeded(
        canvas.dot_width() as f64,
        canvas.dot_height() as f64,
        config.angle,
    );
    let mut scheduler = GrowthScheduler::new(
        SystemClock,
        config.max_generations,
        Duration::from_secs_f64(config.cooldown),
    );
    let mut status = StatusLine::default();
    status.enable_interaction();

    draw_frame(&mut term, &canvas, &engine, &scheduler, &status)?;

    loop {
        let mut dirty = scheduler.poll(&mut status);

        if config.auto
            && scheduler.phase() == Phase::Armed
            && scheduler.on_trigger(&mut engine, &mut canvas, &mut noise, &mut status)?
        {
            dirty = true;
        }

        if dirty {
            draw_frame(&mut term, &canvas, &engine, &scheduler, &status)?;
        }

        if let Some(code) = term.wait_key(50)? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('?') => {
                    if show_help_modal(&mut term, HELP)? {
                        break;
                    }
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if scheduler.on_trigger(&mut engine, &mut canvas, &mut noise, &mut status)? {
                        draw_frame(&mut term, &canvas, &engine, &scheduler, &status)?;
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw_frame(
    term: &mut Terminal,
    canvas: &BrailleCanvas,
    engine: &GrowthEngine,
    scheduler: &GrowthScheduler<impl Clock>,
    status: &StatusLine,
) -> io::Result<()> {
    term.clear();
    canvas.blit(term);

    let (_, height) = term.size();
    let y = height as i32 - 1;
    let counter = format!(
        " generation {}/{} · {} tips",
        scheduler.generation_index(),
        scheduler.max_generations() + 1,
        engine.wavefront().len()
    );
    term.set_str(0, y, &counter, Some(Color::DarkGrey), false);

    let (prompt, color, bold) = status_prompt(status.armed, scheduler.phase());
    term.set_str(counter.chars().count() as i32, y, prompt, Some(color), bold);

    term.render()
}

/// Bottom-line prompt. The "press to grow" cue follows the affordance flag
/// the scheduler hooks toggle; the phase only distinguishes a spent figure
/// from one that is merely resting.
fn status_prompt(armed: bool, phase: Phase) -> (&'static str, Color, bool) {
    if armed {
        ("  space grows · ? help · q quits", Color::Green, true)
    } else if phase == Phase::Exhausted {
        ("  fully grown · q quits", Color::Yellow, false)
    } else {
        ("  resting...", Color::DarkGrey, false)
    }
}

/// Grow the whole figure at once and print it to stdout, no interaction.
pub fn run_print(config: PrintConfig) -> io::Result<()> {
    let seed = pick_seed(config.seed);
    let mut noise = JitterNoise::seeded(seed);

    let mut term = Terminal::new(false)?;
    let (width, height) = term.size();
    let canvas = {
        let mut canvas = BrailleCanvas::new(width, height);
        let mut engine = GrowthEngine::seeded(
            canvas.dot_width() as f64,
            canvas.dot_height() as f64,
            config.angle,
        );
        for _ in 0..config.generations {
            engine.grow_one_generation(&mut canvas, &mut noise)?;
        }
        canvas
    };

    canvas.blit(&mut term);
    term.print_to_stdout();
    Ok(())
}

/// Grow the figure into an SVG document and write it to a file or stdout.
pub fn run_svg(config: SvgConfig) -> io::Result<()> {
    let seed = pick_seed(config.seed);
    let mut noise = JitterNoise::seeded(seed);

    let mut canvas = SvgCanvas::new(config.width, config.height);
    let mut engine = GrowthEngine::seeded(config.width, config.height, config.angle);
    for _ in 0..config.generations {
        engine.grow_one_generation(&mut canvas, &mut noise)?;
    }

    let document = canvas.document();
    match config.output {
        Some(path) => std::fs::write(path, document)?,
        None => print!("{document}"),
    }
    Ok(())
}
