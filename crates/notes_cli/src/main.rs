//! Command-line driver for the notes backend.
//!
//! # Responsibility
//! - Resolve configuration, start logging and build the configured store.
//! - Serve newline-delimited commands from stdin, one JSON reply per line.

mod command;

use command::{bad_request, execute, parse_line, Command};
use log::{error, info};
use notes_core::{build_repository, init_logging, NoteService, NotesConfig};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match NotesConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("notes: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("notes: {err}");
            return ExitCode::FAILURE;
        }
    }

    let repo = match build_repository(&config) {
        Ok(repo) => repo,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("notes: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=cli_start module=cli status=ok backend={:?}",
        config.backend
    );

    match serve(&NoteService::new(repo), io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_io module=cli status=error error={err}");
            eprintln!("notes: {err}");
            ExitCode::FAILURE
        }
    }
}

fn serve(service: &NoteService, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let Some(parsed) = parse_line(&line) else {
            continue;
        };

        let (response, quit) = match parsed {
            Ok(Command::Quit) => (execute(service, Command::Quit), true),
            Ok(command) => (execute(service, command), false),
            Err(err) => (bad_request(&err), false),
        };

        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;
        if quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::serve;
    use notes_core::{InMemoryNoteRepository, NoteService};
    use serde_json::Value;
    use std::sync::Arc;

    #[test]
    fn serve_answers_each_line_and_stops_at_quit() {
        let service = NoteService::new(Arc::new(InMemoryNoteRepository::new()));
        let input = "create {\"title\":\"A\",\"content\":\"B\"}\n\nlist\nbogus\nquit\nlist\n";
        let mut output = Vec::new();

        serve(&service, input.as_bytes(), &mut output).unwrap();

        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let statuses: Vec<_> = replies.iter().map(|reply| reply["status"].clone()).collect();
        assert_eq!(statuses, vec![201, 200, 400, 200]);
        assert_eq!(replies[1]["body"].as_array().unwrap().len(), 1);
    }
}
