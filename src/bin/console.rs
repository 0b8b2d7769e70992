use anyhow::Result;
use planera::agent::ProcessAgent;
use planera::config::Config;
use planera::pipeline::{ConfirmAction, Planner, Reply};
use planera::store::MemoryStore;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::io::{self, Write};

/// The console surface always talks as a single chat.
const CONSOLE_CHAT_ID: i64 = 1;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return Ok(());
    }

    TermLogger::init(
        LevelFilter::Info,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) if Config::is_missing_config_error(&e) => Config::default(),
        Err(e) => return Err(e),
    };

    let locale = if config.default_locale.is_empty() {
        sys_locale::get_locale()
            .map(|l| l.chars().take(2).collect::<String>())
            .unwrap_or_else(|| "en".to_string())
    } else {
        config.default_locale.clone()
    };
    let tz_name = config.default_timezone.clone();

    let planner = Planner::new(MemoryStore::new(), ProcessAgent::new(&config));

    println!(
        "Planera v{} - type an event in free text (RU/EN), 'save'/'edit' to act on a draft, 'quit' to exit.",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let reply = match line {
            "save" => {
                planner
                    .handle_confirm(CONSOLE_CHAT_ID, ConfirmAction::Save, &locale)
                    .await
            }
            "edit" => {
                planner
                    .handle_confirm(CONSOLE_CHAT_ID, ConfirmAction::Edit, &locale)
                    .await
            }
            text => {
                planner
                    .handle_text(CONSOLE_CHAT_ID, text, &tz_name, &locale)
                    .await
            }
        };

        render(&reply, &locale);
    }

    Ok(())
}

fn render(reply: &Reply, locale: &str) {
    println!("{}", reply.text);
    if !reply.actions.is_empty() {
        let labels: Vec<String> = reply
            .actions
            .iter()
            .map(|a| format!("{} ({})", a.label(locale), a.callback_data()))
            .collect();
        println!("[{}]", labels.join(" / "));
    }
}

fn print_help() {
    println!(
        "Planera v{} - free text to calendar events with a confirm/clarify dialogue (console)",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    planera            Start the interactive console");
    println!();
    println!("COMMANDS (inside the console):");
    println!("    <free text>        Extract events from the text");
    println!("    save               Persist the previewed draft");
    println!("    edit               Rework the previewed draft via clarification");
    println!("    quit               Exit");
}
