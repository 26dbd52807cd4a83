//! Interactive command loop

mod platform;

pub use platform::TerminalPlatform;

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use magic8::answer::plain_text;
use magic8::{AskOutcome, Magic8Ball, RecordId, RejectReason, ShareOutcome, Theme, Timestamp};

const HELP: &str = "\
Commands:
  ask <question>        shake the ball
  popular               list popular questions
  ask-popular <n>       ask popular question number n
  history               list past answers
  like <id>             like a history entry
  rate <id> <stars>     rate a history entry
  delete <id>           delete a history entry
  profile               show level, XP and badges
  level-up              spend XP on a level
  settings              show settings
  set dark <on|off>     toggle dark mode
  set speed <0.5-2.0>   animation speed
  set theme <name>      classic, neon, sunset or galaxy
  sound <on|off>        toggle sound effects
  share                 share the last answer
  help                  show this list
  quit                  leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ask(String),
    Popular,
    AskPopular(usize),
    History,
    Like(RecordId),
    Rate(RecordId, i32),
    Delete(RecordId),
    Profile,
    LevelUp,
    Settings,
    SetDark(bool),
    SetSpeed(f32),
    SetTheme(Theme),
    Sound(bool),
    Share,
    Help,
    Quit,
}

impl Command {
    /// Parses a line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word {
            "ask" => Self::Ask(rest.to_string()),
            "popular" => Self::Popular,
            "ask-popular" => Self::AskPopular(rank_arg(&args)?),
            "history" => Self::History,
            "like" => Self::Like(id_arg(&args)?),
            "rate" => {
                let stars = args
                    .get(1)
                    .ok_or_else(|| anyhow!("usage: rate <id> <stars>"))?
                    .parse()?;
                Self::Rate(id_arg(&args)?, stars)
            }
            "delete" => Self::Delete(id_arg(&args)?),
            "profile" => Self::Profile,
            "level-up" => Self::LevelUp,
            "settings" => Self::Settings,
            "set" => match args.as_slice() {
                ["dark", value] => Self::SetDark(on_off(value)?),
                ["speed", value] => Self::SetSpeed(value.parse()?),
                ["theme", value] => Self::SetTheme(value.parse()?),
                _ => bail!("usage: set dark <on|off> | set speed <f> | set theme <name>"),
            },
            "sound" => Self::Sound(on_off(args.first().copied().unwrap_or_default())?),
            "share" => Self::Share,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{}', try 'help'", other),
        };
        Ok(Some(command))
    }
}

fn id_arg(args: &[&str]) -> Result<RecordId> {
    let raw: i64 = args
        .first()
        .ok_or_else(|| anyhow!("missing record id"))?
        .parse()?;
    Ok(RecordId::new(raw))
}

fn rank_arg(args: &[&str]) -> Result<usize> {
    let n: usize = args
        .first()
        .ok_or_else(|| anyhow!("missing question number"))?
        .parse()?;
    n.checked_sub(1)
        .ok_or_else(|| anyhow!("question numbers start at 1"))
}

fn on_off(value: &str) -> Result<bool> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => bail!("expected on or off, got '{}'", other),
    }
}

fn format_time(ts: Timestamp) -> String {
    DateTime::<chrono::Utc>::from_timestamp_millis(ts.as_millis())
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| ts.to_string())
}

/// Runs the loop until `quit` or end of input.
pub async fn run(ball: Arc<Magic8Ball>) -> Result<()> {
    // History arrives in the background; asks made before it lands are
    // overwritten by the fetched records.
    let loader = Arc::clone(&ball);
    tokio::spawn(async move {
        if let Err(e) = loader.refresh_history().await {
            tracing::warn!(error = %e, "History refresh failed");
        }
    });

    println!("Magic 8 Ball. Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = execute(&ball, command).await {
            println!("{}", e);
        }
    }

    match Arc::try_unwrap(ball) {
        Ok(ball) => ball.close()?,
        Err(_) => tracing::debug!("History refresh still running, skipping close"),
    }
    Ok(())
}

async fn execute(ball: &Magic8Ball, command: Command) -> Result<()> {
    match command {
        Command::Ask(question) => print_outcome(ball.ask(&question).await?),
        Command::AskPopular(rank) => print_outcome(ball.ask_popular(rank).await?),
        Command::Popular => {
            for (i, entry) in ball.popular().iter().enumerate() {
                println!("{:>2}. {} ({})", i + 1, entry.text, entry.count);
            }
        }
        Command::History => {
            let history = ball.history();
            if history.is_empty() {
                println!("No answers yet.");
            }
            for record in &history {
                println!(
                    "[{}] {} {}: {} -> {} ({} likes, {} stars)",
                    record.id,
                    format_time(record.created_at),
                    record.author,
                    record.question,
                    plain_text(&record.answer),
                    record.like_count,
                    record.rating
                );
            }
        }
        Command::Like(id) => report_match(ball.like(id), id),
        Command::Rate(id, stars) => report_match(ball.rate(id, stars), id),
        Command::Delete(id) => report_match(ball.delete(id), id),
        Command::Profile => {
            let profile = ball.profile();
            println!("{} - Level {}", profile.name, profile.level);
            println!(
                "XP {}/{} ({:.0}%)",
                profile.xp,
                profile.xp_to_next_level(),
                profile.progress() * 100.0
            );
            println!("Badges: {}", profile.badges.join(", "));
            if profile.can_level_up() {
                println!("Level up available!");
            }
        }
        Command::LevelUp => {
            let level = ball.level_up()?;
            println!("Welcome to level {}!", level);
        }
        Command::Settings => {
            let settings = ball.settings();
            println!(
                "dark mode: {}, speed: {}, theme: {}, sound: {}",
                if settings.dark_mode { "on" } else { "off" },
                settings.animation_speed,
                settings.theme,
                if ball.session().sound_on { "on" } else { "off" }
            );
        }
        Command::SetDark(on) => ball.set_dark_mode(on)?,
        Command::SetSpeed(speed) => ball.set_animation_speed(speed)?,
        Command::SetTheme(theme) => ball.set_theme(theme)?,
        Command::Sound(on) => ball.set_sound(on),
        Command::Share => {
            if ball.share() == ShareOutcome::Unavailable {
                println!("Sharing is not available.");
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

fn print_outcome(outcome: AskOutcome) {
    match outcome {
        AskOutcome::Answered(report) => {
            println!("\n  {}\n", plain_text(&report.answer));
            if let Some(level) = report.profile.new_level {
                println!("Level up! You are now level {}.", level);
            }
            for badge in &report.profile.badges_awarded {
                println!("New badge: {}", badge);
            }
        }
        AskOutcome::Rejected(RejectReason::EmptyQuestion) => {
            println!("Ask a question first.");
        }
        AskOutcome::Rejected(RejectReason::Busy) => {
            println!("The ball is still shaking.");
        }
    }
}

fn report_match(matched: bool, id: RecordId) {
    if !matched {
        println!("No entry {}", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_keeps_spacing() {
        let command = Command::parse("ask  Will it  rain? ").unwrap().unwrap();
        assert_eq!(command, Command::Ask("Will it  rain?".to_string()));
    }

    #[test]
    fn test_parse_blank() {
        assert!(Command::parse("   ").unwrap().is_none());
    }

    #[test]
    fn test_parse_ask_popular_is_one_based() {
        assert_eq!(
            Command::parse("ask-popular 1").unwrap(),
            Some(Command::AskPopular(0))
        );
        assert!(Command::parse("ask-popular 0").is_err());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(
            Command::parse("rate 42 5").unwrap(),
            Some(Command::Rate(RecordId::new(42), 5))
        );
        assert!(Command::parse("rate 42").is_err());
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            Command::parse("set theme neon").unwrap(),
            Some(Command::SetTheme(Theme::Neon))
        );
        assert_eq!(
            Command::parse("set dark on").unwrap(),
            Some(Command::SetDark(true))
        );
        assert!(Command::parse("set theme plaid").is_err());
        assert!(Command::parse("set volume 3").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        assert!(Command::parse("dance").is_err());
    }
}
