mod config;
mod engine;
mod generator;
mod history;
mod session;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::Config;
use engine::targeting::targeted_patterns;
use generator::dictionary::Dictionary;
use generator::weighted::WordGenerator;
use session::raw::RawSession;
use store::json_store::JsonStore;

#[derive(Parser)]
#[command(
    name = "typedrill",
    version,
    about = "Adaptive typing practice engine with weighted word selection"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the next practice word batch
    Words {
        #[arg(short, long, help = "Number of words to generate")]
        count: Option<usize>,
    },
    /// Show the weakest letters, bigrams, and words from recorded history
    Stats,
    /// Delete all recorded practice data
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let store = JsonStore::new()?;

    match cli.command {
        Command::Words { count } => {
            let history = store.load_history();
            let dictionary = Dictionary::load(config.min_word_len);
            let mut generator = WordGenerator::new();
            // No live session on the CLI surface; session-local signals are empty
            let batch = generator.next_batch(
                count.unwrap_or(config.word_count),
                &dictionary,
                &history,
                &RawSession::default(),
            );
            println!("{}", batch.join(" "));
        }
        Command::Stats => {
            let history = store.load_history();
            if !history.has_completed_sessions() {
                println!("No completed sessions recorded yet.");
                return Ok(());
            }

            let sessions = history.historical_performance.len();
            let last = &history.historical_performance[sessions - 1];
            println!("Sessions: {sessions}");
            println!("Last session: {:.1} wpm, {:.1}% accuracy", last.wpm, last.accuracy);

            let targets = targeted_patterns(&history);
            println!("\nSlowest letters:");
            for letter in &targets.letters {
                let avg = history.letter_average(*letter).unwrap_or(0.0);
                println!("  {letter}  {avg:.0} ms");
            }
            println!("\nSlowest bigrams:");
            for bigram in &targets.bigrams {
                let avg = history.bigram_average(bigram).unwrap_or(0.0);
                println!("  {bigram}  {avg:.0} ms");
            }
            println!("\nWeakest words:");
            for word in &targets.words {
                let avg = history.word_average(word).unwrap_or(0.0);
                let mistypes = history.word_mistypes.get(word).copied().unwrap_or(0);
                println!("  {word}  {avg:.0} ms/char, {mistypes} mistypes");
            }
        }
        Command::Reset => {
            store.delete_history()?;
            println!("Practice data deleted.");
        }
    }

    Ok(())
}
