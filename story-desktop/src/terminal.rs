use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use story_core::{HostEvent, ManualScheduler, Phase, Player, PlayerConfig, PlayerSignal};
use story_script::ScriptGraph;
use story_ui::{Layer, RecordingSurface};

const DEFAULT_SIZE: (u32, u32) = (1040, 720);
const IDLE_WAIT: Duration = Duration::from_secs(3600);

enum Input {
    Event(HostEvent),
    Help,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" | "n" | "next" => Input::Event(HostEvent::Advance),
        "b" | "back" => Input::Event(HostEvent::Back),
        "q" | "quit" | "exit" | "esc" => Input::Event(HostEvent::Escape),
        "h" | "help" | "?" => Input::Help,
        _ => {
            if let Ok(n) = line.parse::<usize>() {
                // 屏幕上从 1 开始编号
                return match n.checked_sub(1) {
                    Some(index) => Input::Event(HostEvent::Select(index)),
                    None => Input::Unknown(line.to_string()),
                };
            }
            if let Some(size) = line.strip_prefix("size ") {
                if let Some((w, h)) = size.trim().split_once('x') {
                    if let (Ok(width), Ok(height)) = (w.trim().parse(), h.trim().parse()) {
                        return Input::Event(HostEvent::Resize { width, height });
                    }
                }
            }
            Input::Unknown(line.to_string())
        }
    }
}

/// Line-based host: stdin lines become host events, the virtual clock
/// follows the wall clock, and the text layers are printed whenever the
/// screen settles.
pub fn run(graph: ScriptGraph, config: PlayerConfig) -> anyhow::Result<()> {
    let title = graph.title().to_string();
    let surface = RecordingSurface::new(DEFAULT_SIZE.0, DEFAULT_SIZE.1);
    let mut player = Player::new(graph, surface, ManualScheduler::new(), config);

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    print_help();
    player.start();

    let mut last_screen = String::new();
    let mut last_tick = Instant::now();
    loop {
        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        player.advance_clock(elapsed);

        if !player.is_animating() {
            let screen = render_screen(&player, &title);
            if screen != last_screen {
                print!("{}", screen);
                io::stdout().flush()?;
                last_screen = screen;
            }
        }

        let wait = player.scheduler().next_due_in().unwrap_or(IDLE_WAIT);
        let line = match rx.recv_timeout(wait) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                player.handle_event(HostEvent::Escape);
                break;
            }
        };

        match parse_line(&line) {
            Input::Event(event) => {
                if let HostEvent::Resize { width, height } = event {
                    player.surface_mut().set_size(width, height);
                }
                if player.handle_event(event) == PlayerSignal::ExitToMenu {
                    break;
                }
            }
            Input::Help => print_help(),
            Input::Unknown(cmd) => println!("Unknown command '{}', type 'help'", cmd),
        }
    }
    Ok(())
}

fn render_screen(player: &Player<RecordingSurface, ManualScheduler>, title: &str) -> String {
    let surface = player.surface();
    let mut out = String::new();

    out.push_str(&format!("\n== {} ==  {}\n", title, player.progress()));
    let portrait = surface.text_content(Layer::Portrait);
    if let Some(speaker) = portrait.lines().next() {
        out.push_str(&format!("[{}]\n", speaker));
    }

    for layer in [Layer::Text, Layer::Overlay, Layer::ChoicePanel] {
        let content = surface.text_content(layer);
        if !content.is_empty() {
            out.push_str(&content);
            out.push('\n');
        }
    }

    let hint = match player.phase() {
        Phase::AwaitingChoice => "Choose a number",
        Phase::Ending => "[q] back to menu",
        _ => "[Enter] continue",
    };
    out.push_str(&format!("-- {} --\n", hint));
    out
}

fn print_help() {
    println!("Enter: continue | <n>: choose | back | size WxH | quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert!(matches!(parse_line(""), Input::Event(HostEvent::Advance)));
        assert!(matches!(parse_line(" back "), Input::Event(HostEvent::Back)));
        assert!(matches!(parse_line("2"), Input::Event(HostEvent::Select(1))));
        assert!(matches!(parse_line("0"), Input::Unknown(_)));
        assert!(matches!(
            parse_line("size 640x360"),
            Input::Event(HostEvent::Resize { width: 640, height: 360 })
        ));
        assert!(matches!(parse_line("q"), Input::Event(HostEvent::Escape)));
        assert!(matches!(parse_line("dance"), Input::Unknown(_)));
    }
}
