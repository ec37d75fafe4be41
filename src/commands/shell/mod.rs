mod app;
mod command;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::api::ApiClient;
use crate::config::ApiConfig;

use app::{App, Flow};
use command::{HELP, parse};

pub fn run(config: ApiConfig) -> Result<()> {
    info!(base_url = %config.base_url, "starting shell");
    let mut app = App::new(ApiClient::new(config))?;
    app.settle();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    app.render(&mut stdout).context("failed to write page")?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "mlguide {}> ", app.path()).context("failed to write prompt")?;
        stdout.flush().context("failed to flush prompt")?;

        let Some(line) = lines.next() else {
            writeln!(stdout)?;
            break;
        };
        let line = line.context("failed to read input")?;

        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(notice) => {
                writeln!(stdout, "{notice}")?;
                continue;
            }
        };

        match app.execute(command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Help) => writeln!(stdout, "{HELP}")?,
            Ok(Flow::Render) => {
                app.settle();
                app.render(&mut stdout).context("failed to write page")?;
            }
            Err(notice) => writeln!(stdout, "{notice}")?,
        }
    }

    info!("shell closed");
    Ok(())
}
