use std::process::ExitCode;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::{error, info};

mod cli;
mod controller;
mod dataset;
mod domain;
mod inputter;
mod logging;
mod model;
mod pipeline;
mod record;
mod table;
mod ui;

use cli::Args;
use controller::Controller;
use domain::{TVConfig, TVError};
use model::{Model, Status};
use table::Table;
use ui::TableUI;

fn main() -> ExitCode {
    match TVConfig::try_from(Args::parse()).and_then(|cfg| run(&cfg)) {
        Err(e) => {
            error!("Exiting with error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(cfg: &TVConfig) -> Result<(), TVError> {
    if logging::init_tracing(cfg)? {
        info!("Starting tabview with {:?}", cfg);
    }

    let table = Table::new(dataset::user_columns(), dataset::sample_users());
    let mut model = Model::init(cfg, table)?;

    if cfg.print {
        println!("{}", ui::render_plain(&model.uidata()));
        return Ok(());
    }

    let mut terminal = ratatui::init();
    let result = event_loop(cfg, &mut model, &mut terminal);
    ratatui::restore();

    info!("Bye! Last view state: {:?}", model.table().state());
    result
}

fn event_loop<R>(
    cfg: &TVConfig,
    model: &mut Model<R>,
    terminal: &mut DefaultTerminal,
) -> Result<(), TVError> {
    let ui = TableUI::new();
    let controller = Controller::new(cfg);

    while model.status != Status::QUITTING {
        // Render the current view
        let uidata = model.uidata();
        terminal.draw(|f| ui.draw(&uidata, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    Ok(())
}
