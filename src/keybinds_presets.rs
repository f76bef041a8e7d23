use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use tetwist_engine::Command;

pub type Keybinds = HashMap<(KeyCode, KeyModifiers), Command>;

#[derive(PartialEq, Eq, Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum KeybindsPreset {
    /// Arrow keys to move and fall, [Z]/[X] to rotate, [Space] to drop.
    #[default]
    Arrows,
    /// [H]/[L] to move, [J] to fall, [K] to drop, [A]/[D] to rotate.
    Vim,
}

impl KeybindsPreset {
    pub fn keybinds(self) -> Keybinds {
        match self {
            KeybindsPreset::Arrows => arrows_keybinds(),
            KeybindsPreset::Vim => vim_keybinds(),
        }
    }
}

pub fn normalize((mut code, mut modifiers): (KeyCode, KeyModifiers)) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Modifier(modifier_key_code) => {
            // A modifier key reported as keycode carries its own flag again; drop the duplicate.
            use crossterm::event::ModifierKeyCode as MKC;
            let modifier = match modifier_key_code {
                MKC::LeftShift | MKC::RightShift => KeyModifiers::SHIFT,
                MKC::LeftControl | MKC::RightControl => KeyModifiers::CONTROL,
                MKC::LeftAlt | MKC::RightAlt => KeyModifiers::ALT,
                MKC::LeftSuper | MKC::RightSuper => KeyModifiers::SUPER,
                MKC::LeftHyper | MKC::RightHyper => KeyModifiers::HYPER,
                MKC::LeftMeta | MKC::RightMeta => KeyModifiers::META,
                MKC::IsoLevel3Shift | MKC::IsoLevel5Shift => KeyModifiers::NONE,
            };

            modifiers.remove(modifier);
        }

        // Uppercase letters arrive with SHIFT set; bind on the lowercase char only.
        KeyCode::Char(ref mut char) => {
            if char.is_ascii_uppercase() {
                modifiers.remove(KeyModifiers::SHIFT);
            }
            *char = char.to_ascii_lowercase();
        }

        _ => {}
    }

    (code, modifiers)
}

pub fn arrows_keybinds() -> Keybinds {
    let keybinds_arrows: [(KeyCode, Command); 7] = [
        (KeyCode::Left, Command::MoveLeft),
        (KeyCode::Right, Command::MoveRight),
        (KeyCode::Up, Command::RotateClockwise),
        (KeyCode::Char('x'), Command::RotateClockwise),
        (KeyCode::Char('z'), Command::RotateCounterClockwise),
        (KeyCode::Down, Command::Fall),
        (KeyCode::Char(' '), Command::Drop),
    ];
    HashMap::from(keybinds_arrows.map(|(k, c)| ((k, KeyModifiers::NONE), c)))
}

pub fn vim_keybinds() -> Keybinds {
    let keybinds_vim: [(KeyCode, Command); 6] = [
        (KeyCode::Char('h'), Command::MoveLeft),
        (KeyCode::Char('l'), Command::MoveRight),
        (KeyCode::Char('a'), Command::RotateCounterClockwise),
        (KeyCode::Char('d'), Command::RotateClockwise),
        (KeyCode::Char('j'), Command::Fall),
        (KeyCode::Char('k'), Command::Drop),
    ];
    HashMap::from(keybinds_vim.map(|(k, c)| ((k, KeyModifiers::NONE), c)))
}

pub fn fmt_keybinds(command: Command, keybinds: &Keybinds) -> String {
    let mut keys = keybinds
        .iter()
        .filter(|&(_, &c)| c == command)
        .map(|((code, _), _)| match code {
            KeyCode::Left => "←".to_owned(),
            KeyCode::Right => "→".to_owned(),
            KeyCode::Up => "↑".to_owned(),
            KeyCode::Down => "↓".to_owned(),
            KeyCode::Char(' ') => "Space".to_owned(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            other => format!("{other:?}"),
        })
        .collect::<Vec<_>>();
    keys.sort();
    keys.join("/")
}
