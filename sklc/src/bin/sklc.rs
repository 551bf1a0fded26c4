use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use sklc::{compile_file, SquareKeyboard};
use squarekey_core::{Action, KeyPress, KeyState, SwipeDirection};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "SquareKeyboard layout checker and simulator", long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a layout file and report errors
    Check {
        input: PathBuf,
    },
    /// Print the label grid of a state
    Dump {
        input: PathBuf,

        /// State to show (defaults to main)
        #[arg(short, long)]
        state: Option<String>,

        /// Overlay to show
        #[arg(long, value_enum, default_value_t = Swipe::None)]
        swipe: Swipe,
    },
    /// Run a sequence of presses and print what the engine emits
    Press {
        input: PathBuf,

        /// Presses as ROW,COL or ROW,COL:SWIPE (SWIPE is 0-3 or none/lr/ud/alt)
        #[arg(required = true)]
        presses: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Swipe {
    None,
    Lr,
    Ud,
    Alt,
}

impl From<Swipe> for SwipeDirection {
    fn from(swipe: Swipe) -> Self {
        match swipe {
            Swipe::None => SwipeDirection::None,
            Swipe::Lr => SwipeDirection::LeftRight,
            Swipe::Ud => SwipeDirection::UpDown,
            Swipe::Alt => SwipeDirection::AltLabel,
        }
    }
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(args.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {} - {}", record.level(), record.target(), record.args()))
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Check { input } => {
            let keyboard = compile_file(&input)
                .with_context(|| format!("failed to compile {}", input.display()))?;
            println!(
                "{}: {}x{} grid, {} layouts, {} states",
                input.display(),
                keyboard.rows(),
                keyboard.cols(),
                keyboard.layout_names().count(),
                keyboard.state_names().count()
            );
        }
        Command::Dump { input, state, swipe } => {
            let mut engine = load(&input)?;
            if let Some(state) = state {
                engine.set_state(&state)?;
            }
            dump(&engine, swipe.into());
        }
        Command::Press { input, presses } => {
            let mut engine = load(&input)?;
            for arg in &presses {
                let press = parse_press(arg)?;
                engine.press_key(press);
                let actions = std::mem::take(engine.listener_mut());
                println!("{} -> [{}]", arg, format_actions(&actions));
            }
            println!("state: {}", engine.current_state());
        }
    }
    Ok(())
}

fn load(input: &Path) -> Result<SquareKeyboard<Vec<Action>>> {
    let keyboard = compile_file(input)
        .with_context(|| format!("failed to compile {}", input.display()))?;
    Ok(SquareKeyboard::new(keyboard, Vec::new()))
}

fn dump(engine: &SquareKeyboard<Vec<Action>>, swipe: SwipeDirection) {
    println!("state {} ({:?})", engine.current_state(), swipe);
    for row in 0..engine.rows() {
        let cells: Vec<String> = (0..engine.cols())
            .map(|col| {
                let label = engine.key_label(row, col, swipe);
                let label = if label.is_empty() { "*".to_string() } else { label };
                match engine.key_state(row, col, swipe) {
                    KeyState::Normal => label,
                    KeyState::DeadMeta => format!("[{}]", label),
                    KeyState::DeadKey => format!("<{}>", label),
                    KeyState::Swiped => format!("~{}", label),
                }
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
}

fn parse_press(arg: &str) -> Result<KeyPress> {
    let (pos, swipe) = match arg.split_once(':') {
        Some((pos, swipe)) => (pos, parse_swipe(swipe)?),
        None => (arg, SwipeDirection::None),
    };
    let Some((row, col)) = pos.split_once(',') else {
        bail!("press '{}' must look like ROW,COL[:SWIPE]", arg);
    };
    let row = row.trim().parse().with_context(|| format!("bad row in '{}'", arg))?;
    let col = col.trim().parse().with_context(|| format!("bad column in '{}'", arg))?;
    Ok(KeyPress::new(row, col, swipe))
}

fn parse_swipe(text: &str) -> Result<SwipeDirection> {
    let swipe = match text {
        "none" => SwipeDirection::None,
        "lr" => SwipeDirection::LeftRight,
        "ud" => SwipeDirection::UpDown,
        "alt" => SwipeDirection::AltLabel,
        code => {
            let code: u8 = code.parse().with_context(|| format!("unknown swipe '{}'", code))?;
            match SwipeDirection::from_code(code) {
                Some(swipe) => swipe,
                None => bail!("swipe code {} is out of range (0-3)", code),
            }
        }
    };
    Ok(swipe)
}

fn format_actions(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|action| match action {
            Action::Text(text) => format!("{:?}", text),
            Action::Device(code) => code.name().to_string(),
            Action::Redraw => "redraw".to_string(),
            Action::ExternalModeChange => "external".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
