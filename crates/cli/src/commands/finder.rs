//! `breedbox finder` — Interactive or single-message breed-finder chat.

use std::io::Write as _;

use breedbox_assistant::{
    FinderEngine, FinderSession, TurnContext, TurnOutcome, CONVERSATION_STARTERS,
};
use breedbox_config::AppConfig;
use breedbox_core::executor::{QueryExecutor, TableNames};
use breedbox_explorer::{compile, CompiledFilters, FilterCatalog};
use tokio::io::AsyncBufReadExt;

use super::{open_executor, FilterArgs};

pub async fn run(
    filters: FilterArgs,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let executor = open_executor(&config).await?;
    let tables = config.warehouse.table_names();

    let catalog = FilterCatalog::load(executor.as_ref(), &tables)
        .await
        .map_err(|e| format!("Failed to load filter options: {e}"))?;
    let compiled = compile(&filters.into_selection(&catalog));

    let chat = breedbox_llm::client_from_config(&config.llm);
    let engine = FinderEngine::new(chat);
    let mut session = FinderSession::new();

    if let Some(message) = message {
        // Single message mode
        return run_one_turn(
            &engine,
            &mut session,
            executor.as_ref(),
            &tables,
            &compiled,
            &message,
        )
        .await;
    }

    // Interactive mode
    println!();
    println!("  Breedbox Finder — grounded in your filtered dataset");
    println!("  Model: {}", config.llm.model);
    println!();
    println!("  Pick a starter by number, or type your own message:");
    for (i, starter) in CONVERSATION_STARTERS.iter().enumerate() {
        println!("    {}. {starter}", i + 1);
    }
    println!();
    println!("  Type '/reset' to clear the conversation, 'exit' to quit.");
    println!();

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        match input {
            "" => {}
            "exit" | "quit" => break,
            "/reset" => {
                session.reset();
                println!("  Conversation cleared.");
            }
            _ => {
                let text = match input {
                    "1" => CONVERSATION_STARTERS[0].to_string(),
                    "2" => CONVERSATION_STARTERS[1].to_string(),
                    "3" => CONVERSATION_STARTERS[2].to_string(),
                    other => other.to_string(),
                };
                run_one_turn(
                    &engine,
                    &mut session,
                    executor.as_ref(),
                    &tables,
                    &compiled,
                    &text,
                )
                .await?;
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

async fn run_one_turn(
    engine: &FinderEngine,
    session: &mut FinderSession,
    executor: &dyn QueryExecutor,
    tables: &TableNames,
    compiled: &CompiledFilters,
    user_text: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Grounding is rebuilt every turn so a reloaded warehouse shows up
    // immediately.
    let context = TurnContext::load(executor, tables, compiled)
        .await
        .map_err(|e| format!("Failed to build grounding context: {e}"))?;

    let mut streamed_any = false;
    let outcome = engine
        .run_turn(session, &context, user_text, |fragment| {
            if !streamed_any {
                println!();
                streamed_any = true;
            }
            print!("{fragment}");
            let _ = std::io::stdout().flush();
        })
        .await;

    match &outcome {
        TurnOutcome::Streamed { .. } => {
            // Fragments are already on screen.
            println!();
            println!();
        }
        TurnOutcome::Fallback { text, notice } => {
            if streamed_any {
                println!();
            }
            eprintln!("  [Notice] {notice}");
            println!();
            println!("{text}");
            println!();
        }
        TurnOutcome::Retried { text } => {
            println!();
            println!("{text}");
            println!();
        }
        TurnOutcome::Failed { text } => {
            if streamed_any {
                println!();
            }
            eprintln!("  [Error] {text}");
            println!();
        }
    }

    Ok(())
}
