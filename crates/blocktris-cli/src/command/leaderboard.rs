use std::io::{self, Write};

use blocktris_profile::{KeyValueStore, Leaderboard, Profile};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct LeaderboardArg {
    /// Show at most this many entries
    #[arg(long)]
    limit: Option<usize>,
}

pub(crate) fn run<S>(arg: &LeaderboardArg, profile: &Profile<S>) -> anyhow::Result<()>
where
    S: KeyValueStore,
{
    let board = profile.leaderboard()?;
    let high_score = profile.high_score()?;
    let mut out = io::stdout().lock();
    write_table(&mut out, &board, arg.limit.unwrap_or(Leaderboard::CAPACITY))?;
    writeln!(out)?;
    writeln!(out, "High score: {high_score}")?;
    Ok(())
}

fn write_table<W>(out: &mut W, board: &Leaderboard, limit: usize) -> io::Result<()>
where
    W: Write,
{
    if board.is_empty() {
        return writeln!(out, "No scores yet.");
    }
    writeln!(
        out,
        "{:>4}  {:<16}  {:>10}  {:>5}  {:<10}",
        "RANK", "NAME", "SCORE", "LEVEL", "DATE"
    )?;
    for (rank, entry) in board.entries().iter().take(limit).enumerate() {
        writeln!(
            out,
            "{:>4}  {:<16}  {:>10}  {:>5}  {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.level,
            entry.date
        )?;
    }
    Ok(())
}
