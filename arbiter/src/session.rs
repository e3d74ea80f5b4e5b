use std::io::{BufRead, Write};

use token_chess::{
    visualize_board, visualize_pools, Command, CommandFromStrErr, Event, Game, Response,
    RulesEngine, Snapshot, TurnState,
};
use tracing::{debug, trace, warn};

/// How the session talks to the outside world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Terse text commands in, human readable text out.
    Text { show_board: bool },
    /// One JSON [`Command`] per line in, one JSON [`Response`] per line out.
    Json,
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
}

/// Plays one game, reading commands line by line.
pub struct Session<R> {
    game: Game<R>,
    mode: Mode,
    // A re-usable buffer for reading lines.
    buf: String,
}

impl<R: RulesEngine> Session<R> {
    pub fn new(game: Game<R>, mode: Mode) -> Self {
        Self {
            game,
            mode,
            buf: String::new(),
        }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    /// Returns an error only on IO failure, not when a command is rejected.
    pub fn run(&mut self, mut input: impl BufRead, mut output: impl Write) -> anyhow::Result<SessionEnd> {
        if let Mode::Text { .. } = self.mode {
            self.write_position(&mut output)?;
        }
        loop {
            self.buf.clear();
            let num_bytes_read = input.read_line(&mut self.buf)?;
            if num_bytes_read == 0 {
                return Ok(SessionEnd::EndOfInput);
            }
            let line = self.buf.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            trace!(line, "Received input");
            let command = match self.parse(line) {
                Ok(command) => command,
                Err(message) => {
                    warn!(line, %message, "Could not parse command");
                    self.write_response(&mut output, Response::Error { message })?;
                    continue;
                }
            };
            debug!(?command, "Executing command");
            match command.execute(&mut self.game) {
                Some(result) => self.write_response(&mut output, Response::from(result))?,
                None if command == Command::Quit => return Ok(SessionEnd::Quit),
                None => {
                    let snapshot = Box::new(Snapshot::of(&self.game));
                    self.write_response(&mut output, Response::Snapshot { snapshot })?;
                }
            }
            output.flush()?;
        }
    }

    fn parse(&self, line: &str) -> Result<Command, String> {
        match self.mode {
            Mode::Text { .. } => line
                .parse::<Command>()
                .map_err(|err: CommandFromStrErr| err.to_string()),
            Mode::Json => serde_json::from_str::<Command>(line).map_err(|err| err.to_string()),
        }
    }

    fn write_response(&self, output: &mut impl Write, response: Response) -> anyhow::Result<()> {
        match self.mode {
            Mode::Json => {
                serde_json::to_writer(&mut *output, &response)?;
                writeln!(output)?;
            }
            Mode::Text { show_board } => match response {
                Response::Ok { event } => {
                    writeln!(output, "{}", describe_event(&event))?;
                    let changed_position = matches!(event, Event::Moved { .. } | Event::Swapped { .. });
                    if show_board && changed_position {
                        self.write_position(output)?;
                    } else {
                        writeln!(output, "{}", self.turn_indicator())?;
                    }
                }
                Response::Rejected { message, .. } => writeln!(output, "Rejected: {}", message)?,
                Response::Snapshot { .. } => self.write_position(output)?,
                Response::Error { message } => writeln!(output, "Error: {}", message)?,
            },
        }
        Ok(())
    }

    fn write_position(&self, output: &mut impl Write) -> anyhow::Result<()> {
        writeln!(output, "{}", visualize_board(self.game.rules(), self.game.selection()))?;
        writeln!(output, "{}", visualize_pools(self.game.pools(), self.game.pending_swap()))?;
        writeln!(output, "{}", self.turn_indicator())?;
        Ok(())
    }

    fn turn_indicator(&self) -> String {
        let side = self.game.side_to_move();
        let status = self.game.status();
        match self.game.turn_state() {
            TurnState::SelectNeutralToken => format!("{}: choose a neutral token", side),
            TurnState::SelectPiece if status.is_game_over() => format!("Game over ({:?})", status),
            TurnState::SelectPiece => {
                let check = if status == token_chess::GameStatus::Check { ", in check" } else { "" };
                format!("{} to move{}", side, check)
            }
        }
    }
}

pub fn describe_event(event: &Event) -> String {
    match event {
        Event::PieceSelected { selection } => match selection.token {
            Some(token) => format!(
                "Selected {} on {}, moving it spends token {}",
                selection.piece, selection.square, token
            ),
            None => format!("Selected {} on {}", selection.piece, selection.square),
        },
        Event::SelectionCleared => String::from("Selection cleared"),
        Event::Moved {
            report,
            awaiting_swap,
        } => {
            let mut text = format!("{} {}-{}", report.piece, report.from, report.to);
            if let Some(captured) = report.captured {
                text += &format!(", captures {}", captured);
            }
            if let Some(promotion) = report.promotion {
                text += &format!(", promotes to {}", promotion);
            }
            if *awaiting_swap {
                text += ", token spent";
            }
            text
        }
        Event::Swapped { record } => format!(
            "{} swapped a {} token for a {} token",
            record.owner, record.spent_kind, record.received_kind
        ),
    }
}
