mod application;
mod game_renderer;
mod keybinds_presets;
mod live_input_handler;

use std::io;

use clap::Parser;

use keybinds_presets::KeybindsPreset;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Custom starting seed, given as a 64-bit integer.
    /// The seed determines the sequence of shapes, so the same seed and the same inputs
    /// replay the same game.
    /// Example: `./tetwist --seed=42` or `./tetwist -s 42`.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Custom starting board (10-wide rows), encoded as string.
    /// Spaces indicate empty cells, any other character is a filled cell; newlines are ignored.
    /// The last character is the bottom right cell, so the string fills the board from the floor up.
    /// Example: `./tetwist --board="O  OOO   OXX  XXX XX"` or `./tetwist -b "O  OOO   OXX  XXX XX"`.
    #[arg(short, long)]
    board: Option<String>,
    /// Show the engine's debug messages next to the board.
    #[arg(short, long)]
    debug: bool,
    /// Deal shapes from a shuffled bag of all seven kinds instead of uniformly at random.
    #[arg(long)]
    bag: bool,
    /// Which set of keys to play with.
    #[arg(short, long, value_enum, default_value_t)]
    keybinds: KeybindsPreset,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read commandline arguments.
    let args = Args::parse();

    // Initialize application.
    let stdout = io::BufWriter::new(io::stdout());
    let mut app = match application::Application::new(
        stdout,
        args.seed,
        args.board,
        args.debug,
        args.bag,
        args.keybinds.keybinds(),
    ) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("invalid game configuration: {e}");
            std::process::exit(2);
        }
    };

    // A panic would otherwise leave the terminal in raw mode with the message swallowed.
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ =
            crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::style::ResetColor);
        let _ = crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::cursor::Show);
        let _ = crossterm::ExecutableCommand::execute(
            &mut io::stderr(),
            crossterm::terminal::LeaveAlternateScreen,
        );

        eprint!("{panic_info}\n\n");
    }));

    // Run main application.
    app.run()?;

    Ok(())
}
