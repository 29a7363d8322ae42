//! Agent probe command implementation.

use super::CliError;
use std::time::{Duration, Instant};
use tricolor::arbiter::START;
use tricolor::game::check_legal;
use tricolor::{Agent, AgentCommand, AgentOptions, GameState, Move, Player, ProcessAgent};

/// Execute the probe command: start the agent, send `START`, and check the
/// answer is a legal opening move.
///
/// # Errors
///
/// Returns an error if the agent fails any check.
pub(crate) fn execute(command: &AgentCommand, timeout: Duration) -> Result<(), CliError> {
    println!("Probing: {command}");
    println!();

    let mut agent = ProcessAgent::spawn(Player::One.to_string(), command, AgentOptions::default());
    print_check("Process started", agent.is_ok());
    let agent = agent.as_mut().map_err(|e| CliError::new(e.to_string()))?;

    let sent = agent.send(START);
    print_check("Accepts START", sent.is_ok());
    sent?;

    let start = Instant::now();
    let reply = agent.receive(timeout);
    let elapsed = start.elapsed();
    print_check("Answers in time", reply.is_ok());
    let text = reply?;

    let parsed: Result<Move, _> = text.parse();
    print_check("Well-formed move", parsed.is_ok());
    let mv = parsed.map_err(|e| CliError::new(format!("`{text}`: {e}")))?;

    let legal = check_legal(&GameState::new(), mv, Player::One);
    print_check("Legal opening move", legal.is_ok());
    legal.map_err(|e| CliError::new(format!("`{text}`: {e}")))?;

    agent.destroy();

    println!();
    println!("Summary:");
    println!("  Opening move: {mv}");
    println!("  Response time: {:.0} ms", elapsed.as_secs_f64() * 1000.0);

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
