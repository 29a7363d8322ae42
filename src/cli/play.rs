//! Play command implementation.

use super::output::{JsonGame, format_move_line};
use super::{CliError, PlayFormat};
use tricolor::game::render_board;
use tricolor::{AgentCommand, Arbiter, ArbiterConfig, Player, ProcessAgent};

/// Execute the play command.
///
/// A verdict is always reported; agent failures are part of the verdict, not
/// errors of the command.
///
/// # Errors
///
/// Returns an error if the result cannot be written.
pub(crate) fn execute(
    agents: &[AgentCommand; 2],
    config: ArbiterConfig,
    format: PlayFormat,
    board: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let [first, second] = agents;
    let names = [first.label(), second.label()];

    let arbiter = Arbiter::new(
        ProcessAgent::launch(Player::One.to_string(), first, config.agent),
        ProcessAgent::launch(Player::Two.to_string(), second, config.agent),
        config,
    );

    match format {
        PlayFormat::Text => {
            let report = arbiter.run(|round| {
                if board {
                    println!("{}", format_move_line(round));
                }
                if !quiet {
                    println!("{round}");
                }
                if board {
                    print!("{}", render_board(&round.state));
                }
            });
            println!("{}", report.verdict);
        }
        PlayFormat::Json => {
            let mut moves = Vec::new();
            let report = arbiter.run(|round| moves.push(round.text.clone()));
            let json = JsonGame::new(&names, &report, moves);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
