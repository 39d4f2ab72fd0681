use anyhow::Result;
use log::error;
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod app;
mod auth;
mod catalog;
mod commands;
mod room;
mod session;
mod store;
mod user;

use crate::app::App;
use crate::catalog::Catalog;
use crate::commands::Command;
use crate::store::disk::DiskStore;

const QUESTION_BANK: &str = include_str!("../assets/questions.csv");
const TICK_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    pretty_env_logger::init();

    let catalog = Catalog::parse(QUESTION_BANK);
    let store = DiskStore::in_user_data_dir()?;
    let app = Arc::new(Mutex::new(App::new(catalog, store)));

    // One ticker drives every countdown in the application; all transitions
    // happen under the single app lock.
    {
        let app = Arc::clone(&app);
        thread::spawn(move || loop {
            thread::sleep(TICK_INTERVAL);
            app.lock().tick(TICK_INTERVAL);
        });
    }

    println!("quizdeck — type `help` for commands");
    prompt()?;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }
        match commands::parse(&line) {
            Err(e) => eprintln!("{}", e),
            Ok(Command::Quit) => {
                println!("Bye!");
                break;
            }
            Ok(command) => match commands::execute(&mut app.lock(), command) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!("Command failed: {:#}", e);
                    eprintln!("{:#}", e);
                }
            },
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
