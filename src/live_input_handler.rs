use std::{
    sync::mpsc::{SendError, Sender},
    thread::{self, JoinHandle},
};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use tetwist_engine::Command;

use crate::keybinds_presets::{normalize, Keybinds};

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum LiveTermSignal {
    RecognizedCommand(Command),
    Forfeit,
    Quit,
    RawEvent(Event),
}

/// Maps a terminal event to what the game loop should do with it.
pub fn interpret(event: Event, keybinds: &Keybinds) -> LiveTermSignal {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return LiveTermSignal::RawEvent(event);
    };
    // Releases only arrive on terminals with enhanced keyboard events; commands are press-only.
    if kind == KeyEventKind::Release {
        return LiveTermSignal::RawEvent(event);
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Esc => LiveTermSignal::Quit,
        KeyCode::Char('c') if ctrl => LiveTermSignal::Quit,
        KeyCode::Char('d') if ctrl => LiveTermSignal::Forfeit,
        _ => match keybinds.get(&normalize((code, modifiers))) {
            Some(&command) => LiveTermSignal::RecognizedCommand(command),
            None => LiveTermSignal::RawEvent(event),
        },
    }
}

pub fn spawn(input_sender: Sender<LiveTermSignal>, keybinds: Keybinds) -> JoinHandle<()> {
    thread::spawn(move || {
        'detect_events: loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(_e) => break 'detect_events,
            };

            let signal = interpret(event, &keybinds);
            let stop_thread = signal == LiveTermSignal::Quit;

            if let Err(SendError(_signal_which_failed_to_transmit)) = input_sender.send(signal) {
                break 'detect_events;
            }

            if stop_thread {
                break 'detect_events;
            }
        }
    })
}
