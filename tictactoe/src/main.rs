use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use console::style;
use match_arena::{Broadcast, MatchHandle, MatchMessage, MatchRegistry, Presence};
use rand::Rng;
use tictactoe::wire::{decode_snapshot, MovePayload, StateSnapshot, OP_MOVE};
use tictactoe::TicTacToe;

/// tictactoe - local demo match driven through the arena harness
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scripted cell indices, comma-separated; players alternate.
    /// Defaults to a quick top-row win for the first player.
    #[arg(short, long)]
    moves: Option<String>,

    /// Let both players pick random legal moves instead of a script
    #[arg(short, long)]
    random: bool,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // One registry, one pairing, one match - the matchmaker's job here
    // is played by us
    let mut registry = MatchRegistry::new();
    let players = [Presence::guest(), Presence::guest()];
    let match_id = registry.matchmaker_matched(Arc::new(TicTacToe), &players)?;
    let handle = registry.get(&match_id)?.clone();
    let broadcasts = handle.broadcasts();

    println!(
        "Match {}: {} vs {}",
        style(match_id.as_str()).cyan(),
        style(&players[0].username).red(),
        style(&players[1].username).blue()
    );

    handle.join(players[0].clone()).await?;
    handle.join(players[1].clone()).await?;

    if args.random {
        watch_until_finished(&broadcasts, &players, Some(&handle)).await?;
    } else {
        let script = parse_script(args.moves.as_deref())?;
        for (turn, &index) in script.iter().enumerate() {
            let sender = players[turn % 2].clone();
            handle.send(MatchMessage::new(
                sender,
                OP_MOVE,
                serde_json::to_vec(&MovePayload { index })?,
            ))?;
        }
        watch_until_finished(&broadcasts, &players, None).await?;
    }

    handle.stop()?;
    Ok(())
}

/// Parse "0,4,1,5,2"-style scripts; default is a top-row win
fn parse_script(moves: Option<&str>) -> anyhow::Result<Vec<i64>> {
    let Some(moves) = moves else {
        return Ok(vec![0, 4, 1, 5, 2]);
    };
    moves
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .with_context(|| format!("bad cell index '{}'", part))
        })
        .collect()
}

/// Render every snapshot until the match reports a winner or a draw;
/// when `responder` is set, answer each snapshot with a random move
/// for whichever player owns the turn
async fn watch_until_finished(
    broadcasts: &flume::Receiver<Broadcast>,
    players: &[Presence; 2],
    responder: Option<&MatchHandle>,
) -> anyhow::Result<()> {
    loop {
        let broadcast = tokio::time::timeout(Duration::from_secs(30), broadcasts.recv_async())
            .await
            .context("timed out waiting for a snapshot")?
            .context("match closed unexpectedly")?;

        let Some(snapshot) = decode_snapshot(&broadcast.payload) else {
            continue;
        };
        render(&snapshot, players);

        if snapshot.winner.is_some() || snapshot.draw == Some(true) {
            return Ok(());
        }

        if let (Some(handle), Some(active_id)) = (responder, &snapshot.active_player_id) {
            let Some(active) = players.iter().find(|p| &p.user_id == active_id) else {
                bail!("unknown active player '{}'", active_id);
            };
            let vacant: Vec<i64> = snapshot
                .board
                .iter()
                .enumerate()
                .filter(|(_, &code)| code == 0)
                .map(|(index, _)| index as i64)
                .collect();
            if vacant.is_empty() {
                continue;
            }
            let index = vacant[rand::rng().random_range(0..vacant.len())];
            handle.send(MatchMessage::new(
                active.clone(),
                OP_MOVE,
                serde_json::to_vec(&MovePayload { index })?,
            ))?;
        }
    }
}

/// Print one snapshot as a 3x3 grid with a status line
fn render(snapshot: &StateSnapshot, players: &[Presence; 2]) {
    println!();
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                match snapshot.board[index] {
                    1 => style("X").red().to_string(),
                    2 => style("O").blue().to_string(),
                    _ => style(index.to_string()).dim().to_string(),
                }
            })
            .collect();
        println!(" {}", cells.join(" | "));
        if row < 2 {
            println!("---+---+---");
        }
    }

    if let Some(code) = snapshot.winner {
        let name = players
            .iter()
            .find(|p| snapshot.marks.get(p.user_id.as_str()) == Some(&code))
            .map(|p| p.username.as_str())
            .unwrap_or("unknown");
        println!("{}", style(format!("{} wins!", name)).green().bold());
    } else if snapshot.draw == Some(true) {
        println!("{}", style("Draw.").yellow().bold());
    } else if let Some(active_id) = &snapshot.active_player_id {
        let name = snapshot
            .usernames
            .get(active_id.as_str())
            .map(String::as_str)
            .unwrap_or("unknown");
        println!("{} to move", style(name).bold());
    }
}
