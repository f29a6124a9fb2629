use std::{
    io::{self, BufRead},
    thread,
};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use polychain::io::{parse, Command};

/// Queue depth between the stdin reader and the engine.
const INBOX_CAPACITY: usize = 64;

/// Read commands line by line from stdin on a background thread.
///
/// Malformed lines are logged and dropped. End of input counts as `exit`.
pub fn spawn_stdin_reader() -> io::Result<Receiver<Command>> {
    let (tx, rx) = crossbeam_channel::bounded(INBOX_CAPACITY);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || read_commands(io::stdin().lock(), &tx))?;
    Ok(rx)
}

fn read_commands(input: impl BufRead, tx: &Sender<Command>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "failed to read from stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse(&line) {
            Ok(command) => {
                if tx.send(command).is_err() {
                    // engine is gone
                    return;
                }
            }
            Err(err) => warn!(line = line.trim(), %err, "dropping malformed message"),
        }
    }

    debug!("stdin closed");
    let _ = tx.send(Command::Exit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(text: &str) -> Vec<Command> {
        let (tx, rx) = crossbeam_channel::unbounded();
        read_commands(Cursor::new(text), &tx);
        drop(tx);
        rx.iter().collect()
    }

    #[test]
    fn malformed_and_blank_lines_are_skipped() {
        let commands = read_all("note_on -n 60 -c 0\nbogus\n\n   \nnote_off -n 60 -c 0\n");

        assert_eq!(
            commands,
            vec![
                Command::NoteOn { note: 60, channel: 0 },
                Command::NoteOff { note: 60, channel: 0 },
                Command::Exit,
            ]
        );
    }

    #[test]
    fn end_of_input_means_exit() {
        assert_eq!(read_all(""), vec![Command::Exit]);
        assert_eq!(
            read_all("control_change -c 0 -n 1 -v 64"),
            vec![
                Command::ControlChange {
                    channel: 0,
                    controller: 1,
                    value: 64
                },
                Command::Exit,
            ]
        );
    }

    #[test]
    fn stops_once_the_engine_is_gone() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        // must return instead of spinning on a closed channel
        read_commands(Cursor::new("note_on -n 60 -c 0\nnote_on -n 62 -c 0\n"), &tx);
    }
}
